use std::env;

pub const DEFAULT_GEOCODE_CACHE_TTL_MS: i64 = 60 * 60 * 1000;
pub const DEFAULT_PRAYER_CACHE_TTL_MS: i64 = 6 * 60 * 60 * 1000;

pub struct Config {
    pub port: u16,
    pub geocode_api_url: String,
    pub prayer_api_url: String,
    pub geocode_cache_ttl_ms: i64,
    pub prayer_cache_ttl_ms: i64,
    /// Sent as `User-Agent` to the geocoding provider; checked per call.
    pub user_agent: Option<String>,
    /// Appended as `api_key` to prayer-time requests; checked per call.
    pub islamic_api_key: Option<String>,
    pub http_timeout_secs: u64,
    pub log_format: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            geocode_api_url: lookup("GEOCODE_API_URL")
                .unwrap_or_else(|| "https://nominatim.openstreetmap.org/search".to_string()),
            prayer_api_url: lookup("PRAYER_API_URL")
                .unwrap_or_else(|| "https://islamicapi.com/api/v1/prayer-time/".to_string()),
            geocode_cache_ttl_ms: parse_ttl_ms(
                lookup("GEOCODE_CACHE_TTL_MS").as_deref(),
                DEFAULT_GEOCODE_CACHE_TTL_MS,
            ),
            prayer_cache_ttl_ms: parse_ttl_ms(
                lookup("PRAYER_CACHE_TTL_MS").as_deref(),
                DEFAULT_PRAYER_CACHE_TTL_MS,
            ),
            user_agent: non_empty("USER_AGENT").or_else(|| non_empty("user_agent")),
            islamic_api_key: non_empty("ISLAMIC_API_KEY"),
            http_timeout_secs: lookup("HTTP_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .filter(|s| *s > 0)
                .unwrap_or(10),
            log_format: lookup("LOG_FORMAT").unwrap_or_else(|| "pretty".to_string()),
        }
    }
}

/// Positive, finite millisecond values are accepted; anything else yields `default`.
///
/// Fractional values are truncated, so "1500.9" becomes 1500.
pub fn parse_ttl_ms(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v >= 1.0 && *v <= i64::MAX as f64)
        .map(|v| v as i64)
        .unwrap_or(default)
}
