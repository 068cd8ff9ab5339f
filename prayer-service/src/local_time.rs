//! UTC offset parsing and wall-clock derivation for a remote location.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use common::errors::AppError;
use common::models::CurrentTime;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_UTC_OFFSET: &str = "+00:00";

/// A signed `±HH:MM` offset from UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UtcOffset {
    total_minutes: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidOffset(pub String);

impl fmt::Display for InvalidOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid UTC offset {:?}: expected ±HH:MM", self.0)
    }
}

impl UtcOffset {
    pub fn total_minutes(&self) -> i32 {
        self.total_minutes
    }

    pub fn as_duration(&self) -> Duration {
        Duration::minutes(self.total_minutes as i64)
    }
}

impl FromStr for UtcOffset {
    type Err = InvalidOffset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidOffset(s.to_string());
        let bytes = s.as_bytes();
        if bytes.len() != 6 || bytes[3] != b':' {
            return Err(invalid());
        }

        let sign = match bytes[0] {
            b'+' => 1,
            b'-' => -1,
            _ => return Err(invalid()),
        };

        let two_digits = |hi: u8, lo: u8| -> Option<i32> {
            (hi.is_ascii_digit() && lo.is_ascii_digit())
                .then(|| ((hi - b'0') * 10 + (lo - b'0')) as i32)
        };
        let hours = two_digits(bytes[1], bytes[2]).ok_or_else(invalid)?;
        let minutes = two_digits(bytes[4], bytes[5]).ok_or_else(invalid)?;
        if hours > 14 || minutes > 59 {
            return Err(invalid());
        }

        Ok(Self {
            total_minutes: sign * (hours * 60 + minutes),
        })
    }
}

/// Shift `now_utc` by `utc_offset` and describe the resulting wall-clock instant.
///
/// The returned `formatted` value renders the shifted instant with a `Z`
/// suffix, matching what browser clients expect to feed back into `Date`.
pub fn derive_local_time(utc_offset: &str, now_utc: DateTime<Utc>) -> Result<CurrentTime, AppError> {
    let offset: UtcOffset = utc_offset
        .parse()
        .map_err(|e: InvalidOffset| AppError::upstream(e.to_string()))?;

    let local = now_utc + offset.as_duration();

    Ok(CurrentTime {
        timestamp: local.timestamp_millis(),
        formatted: local.to_rfc3339_opts(SecondsFormat::Millis, true),
        utc_offset: utc_offset.to_string(),
    })
}
