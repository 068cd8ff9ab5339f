use chrono::{DateTime, Utc};
use common::errors::AppError;
use common::models::PrayerDataResult;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::cache::TtlCache;
use crate::clock::Clock;
use crate::geocode::{GeocodeResolver, normalize_city};
use crate::local_time::{DEFAULT_UTC_OFFSET, derive_local_time};
use crate::prayer_api::{DEFAULT_METHOD, DEFAULT_SCHOOL, INDONESIA_METHOD, PrayerTimesClient};

/// Prayer-data cache key: normalized city plus the current UTC calendar date,
/// so entries roll over at UTC midnight whatever the TTL says.
pub fn cache_key(city: &str, now: DateTime<Utc>) -> String {
    format!("{}:{}", normalize_city(city), now.format("%Y-%m-%d"))
}

/// Coarse locale heuristic: a substring match on the provider's display
/// name, not a country-code lookup.
pub fn is_indonesia(display_name: &str) -> bool {
    display_name.to_lowercase().contains("indonesia")
}

pub fn calculation_method(is_indonesia: bool) -> u32 {
    if is_indonesia {
        INDONESIA_METHOD
    } else {
        DEFAULT_METHOD
    }
}

pub struct PrayerDataAggregator {
    resolver: Arc<GeocodeResolver>,
    prayer_client: Arc<PrayerTimesClient>,
    cache: TtlCache<PrayerDataResult>,
    clock: Arc<dyn Clock>,
}

impl PrayerDataAggregator {
    pub fn new(
        resolver: Arc<GeocodeResolver>,
        prayer_client: Arc<PrayerTimesClient>,
        cache: TtlCache<PrayerDataResult>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            resolver,
            prayer_client,
            cache,
            clock,
        }
    }

    pub fn cache(&self) -> &TtlCache<PrayerDataResult> {
        &self.cache
    }

    /// Geocode, fetch and combine prayer data for `city`.
    ///
    /// All-or-nothing: nothing is cached unless every step succeeds.
    /// Concurrent misses for the same key each go upstream.
    #[instrument(skip(self), fields(city = %city))]
    pub async fn get_prayer_data(&self, city: &str) -> Result<PrayerDataResult, AppError> {
        let started = self.clock.now();
        let key = cache_key(city, started);

        if let Some(cached) = self.cache.get(&key).await {
            info!(cache_key = %key, "Prayer data cache hit");
            return Ok(cached);
        }

        let result = self.aggregate(city).await.map_err(|e| {
            let e = e.reclassify();
            warn!(cache_key = %key, error = %e, "Prayer data aggregation failed");
            e
        })?;

        // Expiry counts from the same instant the day key was taken from.
        self.cache.insert_at(key, result.clone(), started).await;

        Ok(result)
    }

    async fn aggregate(&self, city: &str) -> Result<PrayerDataResult, AppError> {
        let geo = self.resolver.resolve(city).await?;

        let is_indonesia = is_indonesia(&geo.city);
        let method = calculation_method(is_indonesia);
        info!(resolved = %geo.city, method, "Resolved city");

        let prayer_times = self
            .prayer_client
            .get_prayer_times(geo.lat, geo.lon, method, DEFAULT_SCHOOL)
            .await?;

        let utc_offset = prayer_times
            .pointer("/data/timezone/utc_offset")
            .and_then(serde_json::Value::as_str)
            .filter(|offset| !offset.is_empty())
            .unwrap_or(DEFAULT_UTC_OFFSET)
            .to_string();
        let current_time = derive_local_time(&utc_offset, self.clock.now())?;

        Ok(PrayerDataResult {
            city: geo.city,
            lat: geo.lat,
            lon: geo.lon,
            prayer_times,
            is_indonesia,
            current_time,
        })
    }
}
