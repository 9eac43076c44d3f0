use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised when an operation would break a domain invariant
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DomainError {
    #[error("A match needs two distinct participants, got {0} twice")]
    SameParticipant(String),

    #[error("Cannot move match from {from} to {to}")]
    InvalidTransition { from: MatchStatus, to: MatchStatus },

    #[error("Match {0} is not completed")]
    MatchNotCompleted(Uuid),

    #[error("Profile {0} is not a participant of this match")]
    NotParticipant(String),

    #[error("Reviewer and reviewee must be different profiles")]
    SelfReview,

    #[error("Rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(u8),

    #[error("Message content is empty")]
    EmptyMessage,
}

/// Error returned when a proficiency level string is not recognised
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown skill level: {0:?}")]
pub struct ParseLevelError(pub String);

/// Proficiency level, totally ordered beginner < intermediate < expert
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Expert,
}

impl SkillLevel {
    /// Position on the 0/1/2 ordinal scale
    pub fn ordinal(self) -> u8 {
        match self {
            SkillLevel::Beginner => 0,
            SkillLevel::Intermediate => 1,
            SkillLevel::Expert => 2,
        }
    }

    /// Absolute number of steps between two levels
    #[inline]
    pub fn distance(self, other: SkillLevel) -> u8 {
        self.ordinal().abs_diff(other.ordinal())
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SkillLevel::Beginner => "beginner",
            SkillLevel::Intermediate => "intermediate",
            SkillLevel::Expert => "expert",
        }
    }
}

impl FromStr for SkillLevel {
    type Err = ParseLevelError;

    /// Accepts both the stored lowercase form and the onboarding form ("Expert")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(SkillLevel::Beginner),
            "intermediate" => Ok(SkillLevel::Intermediate),
            "expert" => Ok(SkillLevel::Expert),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a declared skill is taught or wanted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillDirection {
    Offer,
    Want,
}

impl SkillDirection {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "offer" => Some(SkillDirection::Offer),
            "want" => Some(SkillDirection::Want),
            _ => None,
        }
    }
}

impl fmt::Display for SkillDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkillDirection::Offer => f.write_str("offer"),
            SkillDirection::Want => f.write_str("want"),
        }
    }
}

/// Profile row as stored by the profile/skill store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// Mean review rating, absent until the first review
    #[serde(default)]
    pub trust_score: Option<f64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A skill declaration exactly as the store holds it
///
/// Direction and level stay raw so that a bad row can be reported instead of
/// failing the whole response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillDeclaration {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(rename = "type")]
    pub direction: String,
    #[serde(default)]
    pub skill_name: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl SkillDeclaration {
    pub fn direction(&self) -> Option<SkillDirection> {
        SkillDirection::parse(&self.direction)
    }
}

/// Untyped `{ skill, level }` pair as entered during onboarding
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillInput {
    #[serde(default)]
    pub skill: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
}

impl SkillInput {
    pub fn new(skill: impl Into<String>, level: impl Into<String>) -> Self {
        Self {
            skill: Some(skill.into()),
            level: Some(level.into()),
        }
    }
}

/// The requester's declared skills, passed explicitly with every ranking call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserSkills {
    #[serde(default)]
    pub teach: Option<SkillInput>,
    #[serde(default)]
    pub learn: Option<SkillInput>,
}

/// Candidate as received from the store or a client, before validation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandidateRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(rename = "trustScore", default)]
    pub trust_score: Option<f64>,
    /// Active offer
    #[serde(default)]
    pub teach: Option<SkillInput>,
    /// Active want
    #[serde(default)]
    pub learn: Option<SkillInput>,
}

/// A validated skill with its comparison key
#[derive(Debug, Clone, PartialEq)]
pub struct SkillSlot {
    /// Name as entered, trimmed
    pub name: String,
    /// Lowercased, whitespace-collapsed name used for equality
    pub key: String,
    pub level: SkillLevel,
}

/// A candidate that passed record validation
#[derive(Debug, Clone)]
pub struct Candidate {
    pub id: String,
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub trust_score: Option<f64>,
    pub offer: SkillSlot,
    pub want: SkillSlot,
}

/// The profile asking for matches
#[derive(Debug, Clone, Default)]
pub struct Requester {
    pub id: Option<String>,
    pub offer: Option<SkillSlot>,
    pub want: Option<SkillSlot>,
}

/// Ranked match entry, shaped for a dashboard match card
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredMatch {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub name: Option<String>,
    pub avatar: Option<String>,
    #[serde(rename = "skillOffered")]
    pub skill_offered: String,
    #[serde(rename = "offeredLevel")]
    pub offered_level: SkillLevel,
    #[serde(rename = "skillWanted")]
    pub skill_wanted: String,
    #[serde(rename = "wantedLevel")]
    pub wanted_level: SkillLevel,
    #[serde(rename = "trustScore")]
    pub trust_score: Option<f64>,
    #[serde(rename = "levelScore")]
    pub level_score: f64,
    #[serde(rename = "matchScore")]
    pub match_score: u8,
}

/// A candidate record left out of ranking because it was malformed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedRecord {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    pub reason: String,
}

/// Scoring weights
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub level: f64,
    pub trust: f64,
    /// Points removed from the level term per step of level difference
    pub level_step_penalty: f64,
    /// Trust term used for profiles with no reviews
    pub neutral_trust: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            level: 0.7,
            trust: 0.3,
            level_step_penalty: 25.0,
            neutral_trust: 60.0,
        }
    }
}

/// Match lifecycle, forward-only
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Pending,
    Accepted,
    Completed,
}

impl MatchStatus {
    pub fn next(self) -> Option<MatchStatus> {
        match self {
            MatchStatus::Pending => Some(MatchStatus::Accepted),
            MatchStatus::Accepted => Some(MatchStatus::Completed),
            MatchStatus::Completed => None,
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStatus::Pending => f.write_str("pending"),
            MatchStatus::Accepted => f.write_str("accepted"),
            MatchStatus::Completed => f.write_str("completed"),
        }
    }
}

/// A pairing of two profiles for a teaching exchange
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillMatch {
    pub id: Uuid,
    pub user_a: String,
    pub user_b: String,
    pub status: MatchStatus,
    /// Compatibility score frozen when the match was created
    pub match_score: Option<u8>,
    pub created_at: DateTime<Utc>,
}

impl SkillMatch {
    /// Create a pending match between two distinct profiles
    pub fn new(
        user_a: impl Into<String>,
        user_b: impl Into<String>,
        match_score: Option<u8>,
    ) -> Result<Self, DomainError> {
        let user_a = user_a.into();
        let user_b = user_b.into();
        if user_a == user_b {
            return Err(DomainError::SameParticipant(user_a));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            user_a,
            user_b,
            status: MatchStatus::Pending,
            match_score,
            created_at: Utc::now(),
        })
    }

    pub fn involves(&self, profile_id: &str) -> bool {
        self.user_a == profile_id || self.user_b == profile_id
    }

    /// The other participant, if `profile_id` is one of the pair
    pub fn partner_of(&self, profile_id: &str) -> Option<&str> {
        if self.user_a == profile_id {
            Some(&self.user_b)
        } else if self.user_b == profile_id {
            Some(&self.user_a)
        } else {
            None
        }
    }

    /// Pairs are unordered: (a, b) and (b, a) are the same pair
    pub fn is_pair(&self, first: &str, second: &str) -> bool {
        (self.user_a == first && self.user_b == second)
            || (self.user_a == second && self.user_b == first)
    }

    /// Move one step forward in the lifecycle
    pub fn advance(&mut self) -> Result<MatchStatus, DomainError> {
        let next = self.status.next().ok_or(DomainError::InvalidTransition {
            from: self.status,
            to: self.status,
        })?;
        self.status = next;
        Ok(next)
    }

    /// Move to `target`, which must be the immediate successor of the current status
    pub fn transition_to(&mut self, target: MatchStatus) -> Result<(), DomainError> {
        if self.status.next() != Some(target) {
            return Err(DomainError::InvalidTransition {
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        Ok(())
    }
}

/// Chat message inside a match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub match_id: Uuid,
    pub sender_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    /// Insertion sequence, breaks timestamp ties
    pub sequence: u64,
}

/// Rating left by one participant of a completed match about the other
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub match_id: Uuid,
    pub reviewer_id: String,
    pub reviewee_id: String,
    pub rating: u8,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Activity summary shown next to a profile's trust badge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub id: String,
    pub full_name: Option<String>,
    /// Trust score as stored on the profile
    pub trust_score: Option<f64>,
    pub sessions_completed: usize,
    /// Mean of received ratings, absent until the first review
    pub avg_rating: Option<f64>,
    pub total_reviews: usize,
}
