use common::errors::AppError;
use common::http_client::HttpClient;
use common::models::GeocodeResult;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::cache::TtlCache;

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    display_name: String,
    lat: String,
    lon: String,
}

/// Cache key form of a city query: trimmed and lower-cased.
pub fn normalize_city(city: &str) -> String {
    city.trim().to_lowercase()
}

/// Resolves free-text city names to coordinates through a Nominatim-style
/// search endpoint, caching results per normalized name.
pub struct GeocodeResolver {
    http_client: Arc<HttpClient>,
    cache: TtlCache<GeocodeResult>,
    base_url: String,
    user_agent: Option<String>,
}

impl GeocodeResolver {
    pub fn new(
        http_client: Arc<HttpClient>,
        cache: TtlCache<GeocodeResult>,
        base_url: String,
        user_agent: Option<String>,
    ) -> Self {
        Self {
            http_client,
            cache,
            base_url,
            user_agent,
        }
    }

    pub fn cache(&self) -> &TtlCache<GeocodeResult> {
        &self.cache
    }

    #[instrument(skip(self), fields(city = %city))]
    pub async fn resolve(&self, city: &str) -> Result<GeocodeResult, AppError> {
        let key = normalize_city(city);

        if let Some(cached) = self.cache.get(&key).await {
            info!(cache_key = %key, "Geocode cache hit");
            return Ok(cached);
        }

        let headers = self.headers()?;
        let url = format!(
            "{}?q={}&format=json&limit=1",
            self.base_url,
            urlencoding::encode(city)
        );

        info!(cache_key = %key, "Geocoding city");

        let places: Vec<NominatimPlace> = self
            .http_client
            .get_json_with_headers(&url, headers)
            .await
            .map_err(|e| match e {
                AppError::Upstream(message) => {
                    AppError::upstream(format!("Geocoding failed: {}", message))
                }
                other => other,
            })?;

        let place = places.into_iter().next().ok_or_else(|| {
            warn!(cache_key = %key, "Geocoding returned no results");
            AppError::not_found("City not found")
        })?;

        let result = GeocodeResult {
            city: place.display_name,
            lat: parse_coordinate("lat", &place.lat)?,
            lon: parse_coordinate("lon", &place.lon)?,
        };

        self.cache.insert(key, result.clone()).await;

        Ok(result)
    }

    fn headers(&self) -> Result<HeaderMap, AppError> {
        let user_agent = self.user_agent.as_deref().ok_or_else(|| {
            AppError::upstream("Geocoding is not configured: USER_AGENT is not set")
        })?;
        let value = HeaderValue::from_str(user_agent)
            .map_err(|e| AppError::upstream(format!("Invalid USER_AGENT header: {}", e)))?;

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, value);
        Ok(headers)
    }
}

fn parse_coordinate(field: &str, raw: &str) -> Result<f64, AppError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| {
            AppError::upstream(format!("Geocoding returned invalid {}: {:?}", field, raw))
        })
}
