use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::{CandidateRecord, UserSkills};

/// Request to rank a candidate pool supplied in the body
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RankMatchesRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId", default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub skills: UserSkills,
    #[serde(default)]
    pub candidates: Vec<CandidateRecord>,
    #[serde(alias = "exclude_user_ids", rename = "excludeUserIds", default)]
    pub exclude_user_ids: Vec<String>,
    #[validate(range(min = 1))]
    #[serde(default)]
    pub limit: Option<u16>,
}

/// Request to find matches among the profiles held by the store
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FindMatchesRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[serde(default)]
    pub skills: UserSkills,
    #[serde(alias = "exclude_user_ids", rename = "excludeUserIds", default)]
    pub exclude_user_ids: Vec<String>,
    #[validate(range(min = 1))]
    #[serde(default)]
    pub limit: Option<u16>,
    /// Bypass the cached candidate pool ("Refresh Matches")
    #[serde(default)]
    pub refresh: bool,
}
