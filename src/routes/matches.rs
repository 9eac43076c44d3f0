use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::models::{
    ErrorResponse, FindMatchesRequest, HealthResponse, MatchesResponse, RankMatchesRequest,
    Requester, UserSkills,
};
use crate::services::{CacheKey, CandidateCache, SupabaseClient};
use crate::core::{requester_from_skills, Matcher, RankingResult};
use std::sync::Arc;

/// Result-count and pool-size limits applied around the engine
#[derive(Debug, Clone, Copy)]
pub struct MatchLimits {
    pub default_limit: u16,
    pub max_limit: u16,
    pub candidate_pool_size: usize,
}

impl MatchLimits {
    /// Requested limit, or the default, capped at `max_limit`
    pub fn resolve(&self, requested: Option<u16>) -> usize {
        usize::from(requested.unwrap_or(self.default_limit).min(self.max_limit))
    }
}

impl Default for MatchLimits {
    fn default() -> Self {
        Self {
            default_limit: 20,
            max_limit: 100,
            candidate_pool_size: 500,
        }
    }
}

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SupabaseClient>,
    pub cache: Arc<CandidateCache>,
    pub matcher: Matcher,
    pub limits: MatchLimits,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matches/rank", web::post().to(rank_matches))
        .route("/matches/find", web::post().to(find_matches));
}

fn bad_request(error: &str, message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: 400,
    })
}

fn parse_requester(user_id: Option<String>, skills: &UserSkills) -> Result<Requester, HttpResponse> {
    requester_from_skills(user_id, skills).map_err(|e| {
        tracing::info!("Rejected requester skills: {}", e);
        bad_request("Invalid requester skills", e.to_string())
    })
}

fn matches_response(mut result: RankingResult, limit: usize) -> MatchesResponse {
    result.matches.truncate(limit);
    MatchesResponse {
        skipped_records: result.skipped_count(),
        matches: result.matches,
        total_candidates: result.total_candidates,
        skipped: result.skipped,
    }
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store_healthy = match state.store.health_check().await {
        Ok(healthy) => healthy,
        Err(e) => {
            tracing::warn!("Store health check failed: {}", e);
            false
        }
    };

    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        cached_pools: state.cache.stats().await.cached_pools,
    })
}

/// Rank an inline candidate pool
///
/// POST /api/v1/matches/rank
///
/// Request body:
/// ```json
/// {
///   "userId": "string",
///   "skills": {
///     "teach": { "skill": "React", "level": "Expert" },
///     "learn": { "skill": "Design", "level": "Beginner" }
///   },
///   "candidates": [
///     { "id": "string", "name": "string", "trustScore": 4.5,
///       "teach": { "skill": "Design", "level": "Beginner" },
///       "learn": { "skill": "React", "level": "Expert" } }
///   ],
///   "excludeUserIds": ["string"],
///   "limit": 20
/// }
/// ```
async fn rank_matches(
    state: web::Data<AppState>,
    req: web::Json<RankMatchesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return bad_request("Validation failed", errors.to_string());
    }

    let req = req.into_inner();
    let requester = match parse_requester(req.user_id, &req.skills) {
        Ok(requester) => requester,
        Err(response) => return response,
    };
    let limit = state.limits.resolve(req.limit);

    let result = state
        .matcher
        .rank_excluding(&requester, &req.candidates, &req.exclude_user_ids);

    tracing::info!(
        "Ranked {} matches from {} inline candidates ({} skipped)",
        result.matches.len(),
        result.total_candidates,
        result.skipped_count()
    );

    HttpResponse::Ok().json(matches_response(result, limit))
}

/// Find matches among the store's profiles
///
/// POST /api/v1/matches/find
///
/// Request body:
/// ```json
/// {
///   "userId": "string",
///   "skills": { "teach": { ... }, "learn": { ... } },
///   "excludeUserIds": ["string"],
///   "limit": 20,
///   "refresh": false
/// }
/// ```
async fn find_matches(
    state: web::Data<AppState>,
    req: web::Json<FindMatchesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for find_matches request: field_errors={:?}", errors);
        return bad_request("Validation failed", errors.to_string());
    }

    let req = req.into_inner();
    let user_id = req.user_id.clone();
    let requester = match parse_requester(Some(req.user_id), &req.skills) {
        Ok(requester) => requester,
        Err(response) => return response,
    };
    let limit = state.limits.resolve(req.limit);
    let pool_size = state.limits.candidate_pool_size;

    tracing::info!("Finding matches for user: {}, limit: {}, refresh: {}", user_id, limit, req.refresh);

    // Nothing can be complementary to a half-filled skill pair
    let (Some(offer), Some(want)) = (&requester.offer, &requester.want) else {
        tracing::debug!("User {} has no complete skill pair, skipping store query", user_id);
        return HttpResponse::Ok().json(matches_response(RankingResult::default(), limit));
    };

    let cache_key = CacheKey::candidates(&user_id, &offer.key, &want.key, pool_size);
    let cached = if req.refresh {
        None
    } else {
        state.cache.get(&cache_key).await
    };

    let candidates = match cached {
        Some(pool) => pool,
        None => match state
            .store
            .fetch_candidates(&user_id, &offer.key, &want.key, pool_size)
            .await
        {
            Ok(pool) => state.cache.insert(&cache_key, pool).await,
            Err(e) => {
                tracing::error!("Failed to fetch candidates for {}: {}", user_id, e);
                return HttpResponse::InternalServerError().json(ErrorResponse {
                    error: "Failed to fetch candidates".to_string(),
                    message: e.to_string(),
                    status_code: 500,
                });
            }
        },
    };

    let result = state
        .matcher
        .rank_excluding(&requester, &candidates, &req.exclude_user_ids);

    tracing::info!(
        "Returning {} matches for user {} (from {} candidates, {} skipped)",
        result.matches.len().min(limit),
        user_id,
        result.total_candidates,
        result.skipped_count()
    );

    HttpResponse::Ok().json(matches_response(result, limit))
}
