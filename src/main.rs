use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use maven_match::config::Settings;
use maven_match::core::Matcher;
use maven_match::routes::{self, matches::{AppState, MatchLimits}};
use maven_match::services::{CandidateCache, SupabaseClient, SupabaseTables};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_logging(level: &str, format: &str) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}

fn startup_error(context: &str, e: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", context, e))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            // Logging is not configured yet
            eprintln!("Failed to load configuration: {}", e);
            return Err(startup_error("Configuration error", e));
        }
    };

    init_logging(&settings.logging.level, &settings.logging.format);

    info!("Starting Maven matching service...");

    let tables = SupabaseTables {
        profiles: settings.supabase.profiles_table.clone(),
        skills: settings.supabase.skills_table.clone(),
        reviews: settings.supabase.reviews_table.clone(),
        matches: settings.supabase.matches_table.clone(),
    };

    let store = SupabaseClient::new(
        settings.supabase.url.clone(),
        settings.supabase.api_key.clone(),
        tables,
        Duration::from_secs(settings.supabase.timeout_secs.unwrap_or(10)),
    )
    .map_err(|e| {
        error!("Failed to create store client: {}", e);
        startup_error("Store client error", e)
    })?;

    info!("Store client initialized for {}", settings.supabase.url);

    let cache_ttl = settings.cache.ttl_secs.unwrap_or(120);
    let cache_entries = settings.cache.max_entries.unwrap_or(5000);
    let cache = CandidateCache::new(cache_entries, cache_ttl);

    info!("Candidate cache initialized ({} entries, TTL: {}s)", cache_entries, cache_ttl);

    let defaults = MatchLimits::default();
    let limits = MatchLimits {
        default_limit: settings.matching.default_limit.unwrap_or(defaults.default_limit),
        max_limit: settings.matching.max_limit.unwrap_or(defaults.max_limit),
        candidate_pool_size: settings
            .matching
            .candidate_pool_size
            .unwrap_or(defaults.candidate_pool_size),
    };

    let weights = settings.scoring.to_weights();
    if (weights.level + weights.trust - 1.0).abs() > 1e-9 {
        tracing::warn!(
            "Scoring weights sum to {:.3}, composite scores will be clamped to 0-100",
            weights.level + weights.trust
        );
    }
    let matcher = Matcher::new(weights);

    info!("Matcher initialized with weights: {:?}", weights);

    let app_state = AppState {
        store: Arc::new(store),
        cache: Arc::new(cache),
        matcher,
        limits,
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(routes::handle_json_payload_error))
            .app_data(web::PathConfig::default().error_handler(routes::handle_path_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
