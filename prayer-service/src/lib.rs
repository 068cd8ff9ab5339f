pub mod aggregator;
pub mod cache;
pub mod clock;
pub mod config;
pub mod geocode;
pub mod handlers;
pub mod local_time;
pub mod openapi;
pub mod prayer_api;

use axum::{Router, routing::get};
use common::errors::AppError;
use common::http_client::HttpClient;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::aggregator::PrayerDataAggregator;
use crate::cache::TtlCache;
use crate::clock::Clock;
use crate::config::Config;
use crate::geocode::GeocodeResolver;
use crate::handlers::AppState;
use crate::prayer_api::PrayerTimesClient;

/// Wire the resolver, provider client and aggregator around one clock.
pub fn build_state(config: &Config, clock: Arc<dyn Clock>) -> Result<AppState, AppError> {
    let http_client = Arc::new(HttpClient::new(config.http_timeout_secs)?);

    let resolver = Arc::new(GeocodeResolver::new(
        http_client.clone(),
        TtlCache::new(config.geocode_cache_ttl_ms, clock.clone()),
        config.geocode_api_url.clone(),
        config.user_agent.clone(),
    ));
    let prayer_client = Arc::new(PrayerTimesClient::new(
        http_client,
        config.prayer_api_url.clone(),
        config.islamic_api_key.clone(),
    ));
    let aggregator = Arc::new(PrayerDataAggregator::new(
        resolver.clone(),
        prayer_client.clone(),
        TtlCache::new(config.prayer_cache_ttl_ms, clock.clone()),
        clock,
    ));

    Ok(AppState {
        resolver,
        prayer_client,
        aggregator,
    })
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/geocode", get(handlers::geocode))
        .route("/api/prayer-times", get(handlers::prayer_times))
        .route("/api/prayer-data", get(handlers::prayer_data))
        .merge(openapi::swagger_ui())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
