use crate::core::normalize::active_skill;
use crate::models::{CandidateRecord, MatchStatus, Profile, SkillDeclaration, SkillDirection};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with the profile/skill store
#[derive(Debug, Error)]
pub enum SupabaseError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Unauthorized: invalid API key")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Table names in the store
#[derive(Debug, Clone)]
pub struct SupabaseTables {
    pub profiles: String,
    pub skills: String,
    pub reviews: String,
    pub matches: String,
}

impl Default for SupabaseTables {
    fn default() -> Self {
        Self {
            profiles: "profiles".to_string(),
            skills: "skills".to_string(),
            reviews: "reviews".to_string(),
            matches: "matches".to_string(),
        }
    }
}

/// Profile row with its skill declarations embedded
#[derive(Debug, Deserialize)]
struct CandidateRow {
    id: String,
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    avatar_url: Option<String>,
    #[serde(default)]
    trust_score: Option<f64>,
    #[serde(default)]
    skills: Vec<SkillDeclaration>,
}

impl CandidateRow {
    fn into_record(self) -> CandidateRecord {
        CandidateRecord {
            teach: active_skill(&self.skills, SkillDirection::Offer),
            learn: active_skill(&self.skills, SkillDirection::Want),
            id: Some(self.id),
            name: self.full_name,
            avatar: self.avatar_url,
            trust_score: self.trust_score,
        }
    }
}

/// PostgREST `ilike` pattern for a normalized skill name
///
/// Whitespace runs become wildcards so stored names with stray spacing still
/// come back. The pattern is looser than the engine's comparison.
fn skill_pattern(key: &str) -> String {
    format!("*{}*", key.split_whitespace().collect::<Vec<_>>().join("*"))
}

#[derive(Debug, Deserialize)]
struct RatingRow {
    rating: i64,
}

/// REST client for the profile/skill store (PostgREST API)
///
/// Handles all reads the matching service needs:
/// - Looking up a single profile
/// - Fetching candidate profiles with their skill declarations
/// - Fetching review ratings for trust score computation
pub struct SupabaseClient {
    base_url: String,
    api_key: String,
    client: Client,
    tables: SupabaseTables,
}

impl SupabaseClient {
    /// Create a new store client
    pub fn new(
        base_url: String,
        api_key: String,
        tables: SupabaseTables,
        timeout: Duration,
    ) -> Result<Self, SupabaseError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            api_key,
            client,
            tables,
        })
    }

    fn table_url(&self, table: &str, query: &[(&str, String)]) -> String {
        let query = query
            .iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&");

        format!(
            "{}/rest/v1/{}?{}",
            self.base_url.trim_end_matches('/'),
            table,
            query
        )
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, SupabaseError> {
        let url = self.table_url(table, query);
        tracing::debug!("Querying store: {}", url);

        let response = self
            .client
            .get(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(SupabaseError::Unauthorized);
        }
        if !status.is_success() {
            return Err(SupabaseError::ApiError(format!(
                "Query on {} failed: {}",
                table, status
            )));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| SupabaseError::InvalidResponse(e.to_string()))
    }

    /// Fetch a profile by id; unknown ids are `Ok(None)`
    pub async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, SupabaseError> {
        let rows: Vec<Profile> = self
            .select(
                &self.tables.profiles,
                &[
                    ("select", "id,full_name,avatar_url,trust_score,created_at".to_string()),
                    ("id", format!("eq.{}", user_id)),
                ],
            )
            .await?;

        Ok(rows.into_iter().next())
    }

    /// Fetch up to `pool_size` candidate profiles other than the requester
    ///
    /// Only profiles offering something like `want_key` and wanting something
    /// like `offer_key` are returned, so the size cap applies after the store
    /// has narrowed the pool. Each profile's active offer and want are picked
    /// from its full list of declarations. Profiles are returned in id order.
    pub async fn fetch_candidates(
        &self,
        requester_id: &str,
        offer_key: &str,
        want_key: &str,
        pool_size: usize,
    ) -> Result<Vec<CandidateRecord>, SupabaseError> {
        let skills = &self.tables.skills;
        let select = format!(
            "id,full_name,avatar_url,trust_score,\
             skills:{skills}(type,skill_name,level,created_at),\
             offers:{skills}!inner(skill_name),\
             wants:{skills}!inner(skill_name)"
        );

        let rows: Vec<CandidateRow> = self
            .select(
                &self.tables.profiles,
                &[
                    ("select", select),
                    ("id", format!("neq.{}", requester_id)),
                    ("offers.type", format!("eq.{}", SkillDirection::Offer)),
                    ("offers.skill_name", format!("ilike.{}", skill_pattern(want_key))),
                    ("wants.type", format!("eq.{}", SkillDirection::Want)),
                    ("wants.skill_name", format!("ilike.{}", skill_pattern(offer_key))),
                    ("order", "id.asc".to_string()),
                    ("limit", pool_size.to_string()),
                ],
            )
            .await?;

        if rows.len() >= pool_size {
            tracing::warn!(
                "Candidate pool for {} hit the limit of {} profiles, later profiles are not ranked",
                requester_id,
                pool_size
            );
        } else {
            tracing::debug!("Fetched {} candidate profiles for {}", rows.len(), requester_id);
        }

        Ok(rows.into_iter().map(CandidateRow::into_record).collect())
    }

    /// Count completed matches the profile took part in, on either side
    pub async fn count_completed_sessions(&self, user_id: &str) -> Result<usize, SupabaseError> {
        let rows: Vec<serde_json::Value> = self
            .select(
                &self.tables.matches,
                &[
                    ("select", "id".to_string()),
                    ("status", format!("eq.{}", MatchStatus::Completed)),
                    ("or", format!("(user_a.eq.\"{0}\",user_b.eq.\"{0}\")", user_id)),
                ],
            )
            .await?;

        Ok(rows.len())
    }

    /// Fetch all ratings a profile has received
    ///
    /// Ratings outside 1-5 are dropped with a warning.
    pub async fn get_ratings(&self, reviewee_id: &str) -> Result<Vec<u8>, SupabaseError> {
        let rows: Vec<RatingRow> = self
            .select(
                &self.tables.reviews,
                &[
                    ("select", "rating".to_string()),
                    ("reviewee_id", format!("eq.{}", reviewee_id)),
                ],
            )
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| match u8::try_from(row.rating) {
                Ok(rating) if (1..=5).contains(&rating) => Some(rating),
                _ => {
                    tracing::warn!("Ignoring out-of-range rating {} for {}", row.rating, reviewee_id);
                    None
                }
            })
            .collect())
    }

    /// Health check for the store connection
    pub async fn health_check(&self) -> Result<bool, SupabaseError> {
        let _: Vec<serde_json::Value> = self
            .select(
                &self.tables.profiles,
                &[("select", "id".to_string()), ("limit", "1".to_string())],
            )
            .await?;
        Ok(true)
    }
}
