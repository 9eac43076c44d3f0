// Integration tests for Maven Match

use actix_web::{http::StatusCode, test, web, App};
use maven_match::core::Matcher;
use maven_match::models::{ErrorResponse, HealthResponse, MatchesResponse, TrustScoreResponse, UserStats};
use maven_match::routes::{self, matches::{AppState, MatchLimits}};
use maven_match::services::{CandidateCache, SupabaseClient, SupabaseTables};
use mockito::Matcher as QueryMatcher;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn create_state(store_url: String) -> AppState {
    create_state_with_pool(store_url, 200)
}

fn create_state_with_pool(store_url: String, candidate_pool_size: usize) -> AppState {
    let store = SupabaseClient::new(
        store_url,
        "service-key".to_string(),
        SupabaseTables::default(),
        Duration::from_secs(5),
    )
    .expect("store client");

    AppState {
        store: Arc::new(store),
        cache: Arc::new(CandidateCache::new(100, 60)),
        matcher: Matcher::with_default_weights(),
        limits: MatchLimits {
            default_limit: 20,
            max_limit: 50,
            candidate_pool_size,
        },
    }
}

macro_rules! test_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .app_data(web::JsonConfig::default().error_handler(routes::handle_json_payload_error))
                .configure(routes::configure_routes),
        )
        .await
    };
}

fn requester_skills() -> serde_json::Value {
    json!({
        "teach": { "skill": "React", "level": "Expert" },
        "learn": { "skill": "Design", "level": "Beginner" }
    })
}

#[actix_web::test]
async fn test_rank_endpoint_worked_example() {
    let app = test_app!(create_state("http://127.0.0.1:9".to_string()));

    let req = test::TestRequest::post()
        .uri("/api/v1/matches/rank")
        .set_json(json!({
            "userId": "me",
            "skills": requester_skills(),
            "candidates": [
                { "id": "B", "trustScore": 3.0,
                  "teach": { "skill": "Design", "level": "expert" },
                  "learn": { "skill": "React", "level": "expert" } },
                { "id": "A", "name": "Candidate A", "trustScore": 5.0,
                  "teach": { "skill": "design ", "level": "beginner" },
                  "learn": { "skill": "REACT", "level": "expert" } },
                { "id": "C", "trustScore": 5.0,
                  "teach": { "skill": "Guitar", "level": "beginner" },
                  "learn": { "skill": "React", "level": "expert" } },
                { "id": "D",
                  "teach": { "skill": "Design", "level": "legendary" },
                  "learn": { "skill": "React", "level": "expert" } }
            ]
        }))
        .to_request();

    let resp: MatchesResponse = test::call_and_read_body_json(&app, req).await;

    let scores: Vec<_> = resp.matches.iter().map(|m| (m.user_id.as_str(), m.match_score)).collect();
    assert_eq!(scores, vec![("A", 100), ("B", 53)]);
    assert_eq!(resp.total_candidates, 4);
    assert_eq!(resp.skipped_records, 1);
    assert_eq!(resp.skipped[0].user_id.as_deref(), Some("D"));
}

#[actix_web::test]
async fn test_rank_endpoint_applies_limit() {
    let app = test_app!(create_state("http://127.0.0.1:9".to_string()));

    let candidates: Vec<_> = (0..10)
        .map(|i| json!({
            "id": format!("c{:02}", i),
            "teach": { "skill": "Design", "level": "beginner" },
            "learn": { "skill": "React", "level": "expert" }
        }))
        .collect();

    let req = test::TestRequest::post()
        .uri("/api/v1/matches/rank")
        .set_json(json!({ "skills": requester_skills(), "candidates": candidates, "limit": 3 }))
        .to_request();

    let resp: MatchesResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(resp.matches.len(), 3);
    assert_eq!(resp.total_candidates, 10);
    assert_eq!(resp.matches[0].user_id, "c00");
}

#[actix_web::test]
async fn test_rank_endpoint_rejects_bad_requester_level() {
    let app = test_app!(create_state("http://127.0.0.1:9".to_string()));

    let req = test::TestRequest::post()
        .uri("/api/v1/matches/rank")
        .set_json(json!({
            "skills": {
                "teach": { "skill": "React", "level": "Grandmaster" },
                "learn": { "skill": "Design", "level": "Beginner" }
            },
            "candidates": []
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_invalid_json_returns_400() {
    let app = test_app!(create_state("http://127.0.0.1:9".to_string()));

    let req = test::TestRequest::post()
        .uri("/api/v1/matches/rank")
        .insert_header(("content-type", "application/json"))
        .set_payload("{ not json")
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_json");
}

#[actix_web::test]
async fn test_rank_endpoint_rejects_non_json_body() {
    let app = test_app!(create_state("http://127.0.0.1:9".to_string()));

    let req = test::TestRequest::post()
        .uri("/api/v1/matches/rank")
        .insert_header(("content-type", "text/plain"))
        .set_payload("skills please")
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, "unsupported_media_type");
    assert_eq!(body.status_code, 415);
}

#[actix_web::test]
async fn test_find_endpoint_uses_cache_until_refresh() {
    let mut server = mockito::Server::new_async().await;
    let profiles = server
        .mock("GET", "/rest/v1/profiles")
        .match_query(QueryMatcher::UrlEncoded("id".into(), "neq.me".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([
                {
                    "id": "p1",
                    "full_name": "Sarah Chen",
                    "trust_score": 5.0,
                    "skills": [
                        { "type": "offer", "skill_name": "Design", "level": "beginner" },
                        { "type": "want", "skill_name": "React", "level": "expert" }
                    ]
                },
                {
                    "id": "p2",
                    "full_name": "Marco Rodriguez",
                    "trust_score": null,
                    "skills": [
                        { "type": "offer", "skill_name": "Graphic Design", "level": "expert" },
                        { "type": "want", "skill_name": "JavaScript", "level": "beginner" }
                    ]
                },
                {
                    "id": "p3",
                    "full_name": "No Skills Yet",
                    "trust_score": null,
                    "skills": []
                }
            ])
            .to_string(),
        )
        .expect(2)
        .create_async()
        .await;

    let app = test_app!(create_state(server.url()));

    for refresh in [false, false, true] {
        let req = test::TestRequest::post()
            .uri("/api/v1/matches/find")
            .set_json(json!({ "userId": "me", "skills": requester_skills(), "refresh": refresh }))
            .to_request();

        let resp: MatchesResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp.matches.len(), 1);
        assert_eq!(resp.matches[0].user_id, "p1");
        assert_eq!(resp.matches[0].match_score, 100);
        assert_eq!(resp.total_candidates, 3);
        // The profile without declarations is reported, not fatal
        assert_eq!(resp.skipped_records, 1);
    }

    profiles.assert_async().await;
}

#[actix_web::test]
async fn test_find_endpoint_narrows_pool_before_limit() {
    // The store holds more profiles than the pool size, and the only
    // complementary one sorts last by id. The skill filters must reach the
    // store so that the limit applies to the narrowed set.
    let mut server = mockito::Server::new_async().await;
    let narrowed = server
        .mock("GET", "/rest/v1/profiles")
        .match_query(QueryMatcher::AllOf(vec![
            QueryMatcher::UrlEncoded("id".into(), "neq.me".into()),
            QueryMatcher::UrlEncoded("offers.type".into(), "eq.offer".into()),
            QueryMatcher::UrlEncoded("offers.skill_name".into(), "ilike.*design*".into()),
            QueryMatcher::UrlEncoded("wants.type".into(), "eq.want".into()),
            QueryMatcher::UrlEncoded("wants.skill_name".into(), "ilike.*react*".into()),
            QueryMatcher::UrlEncoded("order".into(), "id.asc".into()),
            QueryMatcher::UrlEncoded("limit".into(), "2".into()),
        ]))
        .with_status(200)
        .with_body(
            json!([{
                "id": "z9",
                "full_name": "Zoe Park",
                "trust_score": 5.0,
                "skills": [
                    { "type": "offer", "skill_name": "Design", "level": "beginner" },
                    { "type": "want", "skill_name": "React", "level": "expert" }
                ]
            }])
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let app = test_app!(create_state_with_pool(server.url(), 2));

    let req = test::TestRequest::post()
        .uri("/api/v1/matches/find")
        .set_json(json!({ "userId": "me", "skills": requester_skills() }))
        .to_request();

    let resp: MatchesResponse = test::call_and_read_body_json(&app, req).await;

    narrowed.assert_async().await;
    assert_eq!(resp.matches.len(), 1);
    assert_eq!(resp.matches[0].user_id, "z9");
    assert_eq!(resp.matches[0].match_score, 100);
}

#[actix_web::test]
async fn test_find_endpoint_half_filled_skills_skip_store() {
    let mut server = mockito::Server::new_async().await;
    let untouched = server
        .mock("GET", "/rest/v1/profiles")
        .match_query(QueryMatcher::Any)
        .expect(0)
        .create_async()
        .await;

    let app = test_app!(create_state(server.url()));

    let req = test::TestRequest::post()
        .uri("/api/v1/matches/find")
        .set_json(json!({
            "userId": "me",
            "skills": { "teach": { "skill": "React", "level": "Expert" } }
        }))
        .to_request();

    let resp: MatchesResponse = test::call_and_read_body_json(&app, req).await;

    untouched.assert_async().await;
    assert!(resp.matches.is_empty());
    assert_eq!(resp.total_candidates, 0);
}

#[actix_web::test]
async fn test_find_endpoint_store_failure() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/rest/v1/profiles")
        .match_query(QueryMatcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let app = test_app!(create_state(server.url()));

    let req = test::TestRequest::post()
        .uri("/api/v1/matches/find")
        .set_json(json!({ "userId": "me", "skills": requester_skills() }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[actix_web::test]
async fn test_find_endpoint_requires_user_id() {
    let app = test_app!(create_state("http://127.0.0.1:9".to_string()));

    let req = test::TestRequest::post()
        .uri("/api/v1/matches/find")
        .set_json(json!({ "userId": "", "skills": requester_skills() }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_trust_endpoint() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/rest/v1/profiles")
        .match_query(QueryMatcher::UrlEncoded("id".into(), "eq.p1".into()))
        .with_status(200)
        .with_body(r#"[{"id": "p1", "full_name": "Sarah Chen", "trust_score": null}]"#)
        .create_async()
        .await;
    server
        .mock("GET", "/rest/v1/profiles")
        .match_query(QueryMatcher::UrlEncoded("id".into(), "eq.ghost".into()))
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;
    server
        .mock("GET", "/rest/v1/reviews")
        .match_query(QueryMatcher::UrlEncoded("reviewee_id".into(), "eq.p1".into()))
        .with_status(200)
        .with_body(r#"[{"rating": 5}, {"rating": 4}]"#)
        .create_async()
        .await;

    let app = test_app!(create_state(server.url()));

    let req = test::TestRequest::get().uri("/api/v1/profiles/p1/trust").to_request();
    let resp: TrustScoreResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(resp.trust_score, Some(4.5));
    assert_eq!(resp.total_reviews, 2);

    let req = test::TestRequest::get().uri("/api/v1/profiles/ghost/trust").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_stats_endpoint() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/rest/v1/profiles")
        .match_query(QueryMatcher::UrlEncoded("id".into(), "eq.p1".into()))
        .with_status(200)
        .with_body(r#"[{"id": "p1", "full_name": "Sarah Chen", "trust_score": 4.0}]"#)
        .create_async()
        .await;
    server
        .mock("GET", "/rest/v1/profiles")
        .match_query(QueryMatcher::UrlEncoded("id".into(), "eq.ghost".into()))
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;
    server
        .mock("GET", "/rest/v1/reviews")
        .match_query(QueryMatcher::UrlEncoded("reviewee_id".into(), "eq.p1".into()))
        .with_status(200)
        .with_body(r#"[{"rating": 5}, {"rating": 4}]"#)
        .create_async()
        .await;
    let sessions = server
        .mock("GET", "/rest/v1/matches")
        .match_query(QueryMatcher::AllOf(vec![
            QueryMatcher::UrlEncoded("status".into(), "eq.completed".into()),
            QueryMatcher::UrlEncoded("or".into(), r#"(user_a.eq."p1",user_b.eq."p1")"#.into()),
        ]))
        .with_status(200)
        .with_body(r#"[{"id": "m1"}, {"id": "m2"}, {"id": "m3"}]"#)
        .create_async()
        .await;

    let app = test_app!(create_state(server.url()));

    let req = test::TestRequest::get().uri("/api/v1/profiles/p1/stats").to_request();
    let stats: UserStats = test::call_and_read_body_json(&app, req).await;

    sessions.assert_async().await;
    assert_eq!(stats.id, "p1");
    assert_eq!(stats.full_name.as_deref(), Some("Sarah Chen"));
    assert_eq!(stats.trust_score, Some(4.0));
    assert_eq!(stats.sessions_completed, 3);
    assert_eq!(stats.avg_rating, Some(4.5));
    assert_eq!(stats.total_reviews, 2);

    let req = test::TestRequest::get().uri("/api/v1/profiles/ghost/stats").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_health_reports_degraded_store() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/rest/v1/profiles")
        .match_query(QueryMatcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let app = test_app!(create_state(server.url()));

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let resp: HealthResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(resp.status, "degraded");
    assert_eq!(resp.cached_pools, 0);
}
