use serde::{Deserialize, Serialize};
use crate::models::domain::{ScoredMatch, SkippedRecord};

/// Response for the rank and find endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchesResponse {
    pub matches: Vec<ScoredMatch>,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
    #[serde(rename = "skippedRecords")]
    pub skipped_records: usize,
    pub skipped: Vec<SkippedRecord>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    #[serde(rename = "cachedPools")]
    pub cached_pools: u64,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Trust score recomputed from a profile's reviews
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrustScoreResponse {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "trustScore")]
    pub trust_score: Option<f64>,
    #[serde(rename = "totalReviews")]
    pub total_reviews: usize,
}
