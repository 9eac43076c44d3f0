use crate::models::{
    Candidate, CandidateRecord, Requester, SkillDeclaration, SkillDirection, SkillInput,
    SkillLevel, SkillSlot, UserSkills,
};
use thiserror::Error;

/// Reasons a candidate or requester record cannot be used for ranking
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RecordError {
    #[error("record has no identifier")]
    MissingId,

    #[error("missing {0} skill")]
    MissingSkill(SkillDirection),

    #[error("missing level for {0} skill")]
    MissingLevel(SkillDirection),

    #[error("invalid {direction} level {value:?}")]
    InvalidLevel {
        direction: SkillDirection,
        value: String,
    },

    #[error("trust score {0} is outside 0.0-5.0")]
    InvalidTrustScore(f64),
}

/// Normalize a free-text skill name for comparison
///
/// Trims, collapses inner whitespace runs to one space and lowercases, so
/// `"JavaScript "` and `"javascript"` compare equal.
pub fn normalize_skill_name(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Validate one `{ skill, level }` pair
///
/// An absent pair or a blank skill name is `Ok(None)`: the skill is simply
/// not declared. A declared skill with a missing or unknown level is an error.
pub fn skill_slot(
    input: Option<&SkillInput>,
    direction: SkillDirection,
) -> Result<Option<SkillSlot>, RecordError> {
    let Some(input) = input else {
        return Ok(None);
    };

    let name = match input.skill.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name,
        _ => return Ok(None),
    };

    let raw_level = input
        .level
        .as_deref()
        .ok_or(RecordError::MissingLevel(direction))?;

    let level: SkillLevel = raw_level.parse().map_err(|_| RecordError::InvalidLevel {
        direction,
        value: raw_level.to_string(),
    })?;

    Ok(Some(SkillSlot {
        name: name.to_string(),
        key: normalize_skill_name(name),
        level,
    }))
}

/// Turn the requester's explicit skills into a ranking input
pub fn requester_from_skills(
    id: Option<String>,
    skills: &UserSkills,
) -> Result<Requester, RecordError> {
    Ok(Requester {
        id: id.filter(|id| !id.trim().is_empty()),
        offer: skill_slot(skills.teach.as_ref(), SkillDirection::Offer)?,
        want: skill_slot(skills.learn.as_ref(), SkillDirection::Want)?,
    })
}

/// Validate a raw candidate record
///
/// Candidates must carry an id, both an offer and a want, valid levels, and
/// a trust score in 0.0-5.0 when one is present.
pub fn validate_candidate(record: &CandidateRecord) -> Result<Candidate, RecordError> {
    let id = record
        .id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or(RecordError::MissingId)?;

    let offer = skill_slot(record.teach.as_ref(), SkillDirection::Offer)?
        .ok_or(RecordError::MissingSkill(SkillDirection::Offer))?;
    let want = skill_slot(record.learn.as_ref(), SkillDirection::Want)?
        .ok_or(RecordError::MissingSkill(SkillDirection::Want))?;

    if let Some(trust) = record.trust_score {
        if !trust.is_finite() || !(0.0..=5.0).contains(&trust) {
            return Err(RecordError::InvalidTrustScore(trust));
        }
    }

    Ok(Candidate {
        id: id.to_string(),
        name: record.name.clone(),
        avatar: record.avatar.clone(),
        trust_score: record.trust_score,
        offer,
        want,
    })
}

/// Pick the active declaration for a direction
///
/// The most recently created declaration wins; among equal timestamps the
/// later one in the list wins. Undated declarations lose to dated ones.
pub fn active_skill(
    declarations: &[SkillDeclaration],
    direction: SkillDirection,
) -> Option<SkillInput> {
    declarations
        .iter()
        .filter(|d| d.direction() == Some(direction))
        .max_by(|a, b| a.created_at.cmp(&b.created_at))
        .map(|d| SkillInput {
            skill: d.skill_name.clone(),
            level: d.level.clone(),
        })
}
