use actix_web::{web, HttpResponse, Responder};
use crate::core::{trust_score, user_stats};
use crate::models::{ErrorResponse, Profile, TrustScoreResponse};
use crate::routes::matches::AppState;

/// Configure profile routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/profiles/{user_id}/trust", web::get().to(get_trust_score))
        .route("/profiles/{user_id}/stats", web::get().to(get_user_stats));
}

fn store_failure(error: &str, e: impl std::fmt::Display) -> HttpResponse {
    HttpResponse::InternalServerError().json(ErrorResponse {
        error: error.to_string(),
        message: e.to_string(),
        status_code: 500,
    })
}

/// Look up a profile, turning "unknown" and store failures into responses
async fn find_profile(state: &AppState, user_id: &str) -> Result<Profile, HttpResponse> {
    match state.store.get_profile(user_id).await {
        Ok(Some(profile)) => Ok(profile),
        Ok(None) => Err(HttpResponse::NotFound().json(ErrorResponse {
            error: "Profile not found".to_string(),
            message: format!("No profile with id {}", user_id),
            status_code: 404,
        })),
        Err(e) => {
            tracing::error!("Failed to fetch profile {}: {}", user_id, e);
            Err(store_failure("Failed to fetch profile", e))
        }
    }
}

/// Recompute a profile's trust score from its reviews
///
/// GET /api/v1/profiles/{userId}/trust
async fn get_trust_score(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let user_id = path.into_inner();

    if let Err(response) = find_profile(&state, &user_id).await {
        return response;
    }

    match state.store.get_ratings(&user_id).await {
        Ok(ratings) => HttpResponse::Ok().json(TrustScoreResponse {
            trust_score: trust_score(ratings.iter().copied()),
            total_reviews: ratings.len(),
            user_id,
        }),
        Err(e) => {
            tracing::error!("Failed to fetch reviews for {}: {}", user_id, e);
            store_failure("Failed to fetch reviews", e)
        }
    }
}

/// Completed sessions, ratings and trust for a profile
///
/// GET /api/v1/profiles/{userId}/stats
async fn get_user_stats(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let user_id = path.into_inner();

    let profile = match find_profile(&state, &user_id).await {
        Ok(profile) => profile,
        Err(response) => return response,
    };

    let lookups = tokio::try_join!(
        state.store.get_ratings(&user_id),
        state.store.count_completed_sessions(&user_id),
    );

    match lookups {
        Ok((ratings, sessions)) => {
            tracing::debug!("Stats for {}: {} sessions, {} reviews", user_id, sessions, ratings.len());
            HttpResponse::Ok().json(user_stats(&profile, sessions, &ratings))
        }
        Err(e) => {
            tracing::error!("Failed to fetch stats for {}: {}", user_id, e);
            store_failure("Failed to fetch stats", e)
        }
    }
}
