use crate::models::{Candidate, ScoringWeights, SkillSlot};

/// Calculate the compatibility score (0-100) of a complementary candidate
///
/// Scoring formula (default weights):
/// score = round(
///     level_score * 0.7 +   # 100 - 25 per step of level difference, both directions
///     trust_score * 0.3     # candidate trust scaled to 0-100, 60 when unreviewed
/// )
///
/// Returns the composite score and the level sub-score.
pub fn calculate_match_score(
    requester_offer: &SkillSlot,
    requester_want: &SkillSlot,
    candidate: &Candidate,
    weights: &ScoringWeights,
) -> (u8, f64) {
    let difference = level_difference(requester_offer, requester_want, candidate);
    let level = level_score(difference, weights);
    let trust = trust_component(candidate.trust_score, weights);

    let total = (level * weights.level + trust * weights.trust).round();

    (total.clamp(0.0, 100.0) as u8, level)
}

/// Summed level difference over both teaching directions (0-4)
#[inline]
pub fn level_difference(
    requester_offer: &SkillSlot,
    requester_want: &SkillSlot,
    candidate: &Candidate,
) -> u8 {
    // Requester teaches the candidate
    let outgoing = requester_offer.level.distance(candidate.want.level);
    // Candidate teaches the requester
    let incoming = candidate.offer.level.distance(requester_want.level);

    outgoing + incoming
}

/// Level sub-score (0-100), inverse linear in the summed difference
#[inline]
pub fn level_score(summed_difference: u8, weights: &ScoringWeights) -> f64 {
    (100.0 - f64::from(summed_difference) * weights.level_step_penalty).clamp(0.0, 100.0)
}

/// Trust sub-score (0-100)
#[inline]
pub fn trust_component(trust_score: Option<f64>, weights: &ScoringWeights) -> f64 {
    match trust_score {
        Some(trust) => (trust / 5.0 * 100.0).clamp(0.0, 100.0),
        None => weights.neutral_trust,
    }
}
