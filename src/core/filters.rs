use crate::models::{Candidate, SkillSlot};

/// Two declared skills name the same subject
#[inline]
pub fn same_skill(a: &SkillSlot, b: &SkillSlot) -> bool {
    a.key == b.key
}

/// Check that a candidate complements the requester in both directions
///
/// The candidate must teach what the requester wants to learn, and want to
/// learn what the requester teaches. Anything else is excluded outright.
#[inline]
pub fn is_complementary(
    requester_offer: &SkillSlot,
    requester_want: &SkillSlot,
    candidate: &Candidate,
) -> bool {
    same_skill(requester_want, &candidate.offer) && same_skill(&candidate.want, requester_offer)
}

/// Check whether a candidate id is the requester or explicitly excluded
#[inline]
pub fn is_excluded(candidate_id: &str, requester_id: Option<&str>, exclude_ids: &[String]) -> bool {
    let candidate_id = candidate_id.trim();
    requester_id.is_some_and(|id| id.trim() == candidate_id)
        || exclude_ids.iter().any(|id| id.trim() == candidate_id)
}
