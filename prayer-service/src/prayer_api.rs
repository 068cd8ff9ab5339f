use common::errors::AppError;
use common::http_client::HttpClient;
use std::sync::Arc;
use tracing::{info, instrument};

/// Calculation method used outside Indonesia.
pub const DEFAULT_METHOD: u32 = 3;
/// Calculation method of the Indonesian religious affairs ministry.
pub const INDONESIA_METHOD: u32 = 20;
pub const DEFAULT_SCHOOL: u32 = 1;

/// Client for the prayer-time provider. The payload is passed through untouched.
pub struct PrayerTimesClient {
    http_client: Arc<HttpClient>,
    base_url: String,
    api_key: Option<String>,
}

impl PrayerTimesClient {
    pub fn new(http_client: Arc<HttpClient>, base_url: String, api_key: Option<String>) -> Self {
        Self {
            http_client,
            base_url,
            api_key,
        }
    }

    #[instrument(skip(self))]
    pub async fn get_prayer_times(
        &self,
        lat: f64,
        lon: f64,
        method: u32,
        school: u32,
    ) -> Result<serde_json::Value, AppError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            AppError::upstream("Prayer times are not configured: ISLAMIC_API_KEY is not set")
        })?;

        let url = format!(
            "{}?lat={}&lon={}&method={}&school={}&api_key={}",
            self.base_url,
            lat,
            lon,
            method,
            school,
            urlencoding::encode(api_key)
        );

        info!("Fetching prayer times from API");

        self.http_client
            .get_json(&url)
            .await
            .map_err(|e| match e {
                AppError::Upstream(message) => {
                    AppError::upstream(format!("Error fetching prayer times: {}", message))
                }
                other => other,
            })
    }
}
