use axum::{
    Json,
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Error taxonomy shared by the resolver, the aggregator and the handlers.
///
/// Every outbound failure ends up as either `NotFound` or `Upstream` before
/// it reaches the transport layer. `Validation` only covers inbound query
/// checks done by the handlers themselves.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Upstream(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: String,
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Folds an upstream message mentioning "city not found" into `NotFound`.
    pub fn reclassify(self) -> Self {
        match self {
            Self::Upstream(message) if message.to_lowercase().contains("city not found") => {
                Self::NotFound(message)
            }
            other => other,
        }
    }

    /// Stable machine-readable code carried in the response body.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Upstream(_) => "INTERNAL_ERROR",
            AppError::Validation(_) => "VALIDATION_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Upstream(format!("Request timed out: {}", err))
        } else {
            Self::Upstream(format!("Network error: {}", err))
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::Upstream(format!("Malformed upstream payload: {}", err))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        let message = match self {
            AppError::NotFound(_) => "City not found".to_string(),
            AppError::Upstream(message) => format!("Internal Server Error: {}", message),
            AppError::Validation(message) => message,
        };

        (status, Json(ErrorResponse { error: code, message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reclassify_matches_city_not_found_case_insensitively() {
        let err = AppError::upstream("Geocoding: CITY NOT FOUND").reclassify();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn reclassify_keeps_other_upstream_errors() {
        let err = AppError::upstream("HTTP error: 503 Service Unavailable").reclassify();
        assert!(matches!(err, AppError::Upstream(_)));
    }

    #[test]
    fn status_and_code_follow_the_variant() {
        let not_found = AppError::not_found("City not found");
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.code(), "NOT_FOUND");

        let upstream = AppError::upstream("boom");
        assert_eq!(upstream.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(upstream.code(), "INTERNAL_ERROR");

        let invalid = AppError::validation("city is required");
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
        assert_eq!(invalid.code(), "VALIDATION_ERROR");
    }

    #[test]
    fn json_errors_become_upstream() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: AppError = parse_err.into();
        assert!(matches!(err, AppError::Upstream(m) if m.starts_with("Malformed upstream payload")));
    }
}
