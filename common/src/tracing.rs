use tracing_subscriber::EnvFilter;

/// Output style for the global subscriber, taken from `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    /// Anything other than `json` (case-insensitive) means pretty output.
    pub fn from_setting(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Pretty
        }
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the `info` default.
pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormat::Json => builder.json().with_current_span(true).init(),
        LogFormat::Pretty => builder
            .with_target(false)
            .with_file(true)
            .with_line_number(true)
            .init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_setting_is_case_insensitive() {
        assert_eq!(LogFormat::from_setting("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::from_setting(" json "), LogFormat::Json);
    }

    #[test]
    fn unknown_settings_fall_back_to_pretty() {
        assert_eq!(LogFormat::from_setting("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::from_setting("logfmt"), LogFormat::Pretty);
        assert_eq!(LogFormat::from_setting(""), LogFormat::Pretty);
    }
}
