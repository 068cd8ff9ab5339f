use axum::{
    extract::{Query, State, rejection::QueryRejection},
    response::Json,
};
use common::errors::AppError;
use common::models::{GeocodeResult, PrayerDataResult};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use utoipa::IntoParams;

use crate::aggregator::PrayerDataAggregator;
use crate::geocode::GeocodeResolver;
use crate::prayer_api::{DEFAULT_METHOD, DEFAULT_SCHOOL, PrayerTimesClient};

const MAX_CITY_CHARS: usize = 100;

#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<GeocodeResolver>,
    pub prayer_client: Arc<PrayerTimesClient>,
    pub aggregator: Arc<PrayerDataAggregator>,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CityQuery {
    /// City name, 1 to 100 characters
    #[serde(default)]
    pub city: String,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PrayerTimesQuery {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    /// Calculation method, defaults to 3
    pub method: Option<u32>,
    /// Juristic school, defaults to 1
    pub school: Option<u32>,
}

fn validate_city(city: &str) -> Result<(), AppError> {
    let len = city.chars().count();
    if len == 0 || len > MAX_CITY_CHARS {
        return Err(AppError::validation(format!(
            "city must be between 1 and {} characters",
            MAX_CITY_CHARS
        )));
    }
    Ok(())
}

fn validate_coordinate(name: &str, value: Option<f64>, limit: f64) -> Result<f64, AppError> {
    match value {
        Some(v) if v.is_finite() && v.abs() <= limit => Ok(v),
        Some(_) => Err(AppError::validation(format!(
            "{} must be between -{} and {}",
            name, limit, limit
        ))),
        None => Err(AppError::validation(format!("{} is required", name))),
    }
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service health check")
    )
)]
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok", "service": "prayer-service" }))
}

#[utoipa::path(
    get,
    path = "/api/geocode",
    params(CityQuery),
    responses(
        (status = 200, description = "Coordinates for the city", body = GeocodeResult),
        (status = 400, description = "Invalid city parameter"),
        (status = 404, description = "City not found"),
        (status = 500, description = "Geocoding provider failure")
    ),
    tag = "geocode"
)]
pub async fn geocode(
    State(state): State<AppState>,
    query: Result<Query<CityQuery>, QueryRejection>,
) -> Result<Json<GeocodeResult>, AppError> {
    let Query(params) = query?;
    validate_city(&params.city)?;
    info!(city = %params.city, "Geocode request received");

    let result = state.resolver.resolve(&params.city).await?;

    Ok(Json(result))
}

#[utoipa::path(
    get,
    path = "/api/prayer-times",
    params(PrayerTimesQuery),
    responses(
        (status = 200, description = "Raw prayer-time provider payload"),
        (status = 400, description = "Invalid coordinates"),
        (status = 500, description = "Prayer-time provider failure")
    ),
    tag = "prayer-times"
)]
pub async fn prayer_times(
    State(state): State<AppState>,
    query: Result<Query<PrayerTimesQuery>, QueryRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Query(params) = query?;
    let lat = validate_coordinate("lat", params.lat, 90.0)?;
    let lon = validate_coordinate("lon", params.lon, 180.0)?;
    let method = params.method.unwrap_or(DEFAULT_METHOD);
    let school = params.school.unwrap_or(DEFAULT_SCHOOL);
    info!(lat, lon, method, school, "Prayer times request received");

    let payload = state
        .prayer_client
        .get_prayer_times(lat, lon, method, school)
        .await?;

    Ok(Json(payload))
}

#[utoipa::path(
    get,
    path = "/api/prayer-data",
    params(CityQuery),
    responses(
        (status = 200, description = "Prayer times, coordinates and local time for the city", body = PrayerDataResult),
        (status = 400, description = "Invalid city parameter"),
        (status = 404, description = "City not found"),
        (status = 500, description = "Upstream failure")
    ),
    tag = "prayer-times"
)]
pub async fn prayer_data(
    State(state): State<AppState>,
    query: Result<Query<CityQuery>, QueryRejection>,
) -> Result<Json<PrayerDataResult>, AppError> {
    let Query(params) = query?;
    validate_city(&params.city)?;
    info!(city = %params.city, "Prayer data request received");

    let result = state.aggregator.get_prayer_data(&params.city).await?;

    Ok(Json(result))
}
