//! Application error type mapping to HTTP status codes and envelope format.
//!
//! Every error is logged here, at the handler boundary, before it is turned
//! into a response: caller mistakes at `warn`, store failures at `error`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use parley_types::error::{SessionError, StatsError};

use crate::http::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Session-related errors.
    Session(SessionError),
    /// Statistics-related errors.
    Stats(StatsError),
    /// Request could not be parsed.
    Validation(String),
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        AppError::Session(e)
    }
}

impl From<StatsError> for AppError {
    fn from(e: StatsError) -> Self {
        AppError::Stats(e)
    }
}

impl AppError {
    /// Status code, stable machine-readable code, and message.
    pub fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Session(SessionError::NotFound(id)) => (
                StatusCode::NOT_FOUND,
                "SESSION_NOT_FOUND",
                format!("Session '{id}' not found"),
            ),
            AppError::Session(SessionError::Validation(msg)) | AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Session(SessionError::Storage(msg)) => {
                (StatusCode::SERVICE_UNAVAILABLE, "STORE_FAILURE", msg.clone())
            }
            AppError::Session(SessionError::Statistics(e)) | AppError::Stats(e) => match e {
                StatsError::MissingCounter(date) => (
                    StatusCode::CONFLICT,
                    "COUNTER_NOT_FOUND",
                    format!("No statistics counter exists for {date}"),
                ),
                StatsError::Storage(msg) => {
                    (StatusCode::SERVICE_UNAVAILABLE, "STORE_FAILURE", msg.clone())
                }
            },
        }
    }

    fn retryable(&self) -> bool {
        match self {
            AppError::Session(e) => e.is_retryable(),
            AppError::Stats(e) => e.is_retryable(),
            AppError::Validation(_) => false,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        let retryable = self.retryable();

        if status.is_server_error() {
            tracing::error!(%status, code, retryable, "{message}");
        } else {
            tracing::warn!(%status, code, "{message}");
        }

        ApiResponse::error(status, code, &message, Some(json!({ "retryable": retryable })))
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_not_found_maps_to_404() {
        let err = AppError::from(SessionError::NotFound("abc".into()));
        let (status, code, message) = err.parts();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(code, "SESSION_NOT_FOUND");
        assert!(message.contains("abc"));
    }

    #[test]
    fn test_validation_maps_to_400() {
        let (status, code, _) = AppError::Validation("bad json".into()).parts();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "VALIDATION_ERROR");

        let (status, _, _) = AppError::from(SessionError::Validation("x".into())).parts();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_store_failures_map_to_503() {
        let (status, code, _) = AppError::from(SessionError::Storage("locked".into())).parts();
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(code, "STORE_FAILURE");

        let (status, code, _) = AppError::from(StatsError::Storage("locked".into())).parts();
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(code, "STORE_FAILURE");
    }

    #[test]
    fn test_missing_counter_maps_to_409() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let err = AppError::from(SessionError::from(StatsError::MissingCounter(date)));
        let (status, code, message) = err.parts();
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(code, "COUNTER_NOT_FOUND");
        assert!(message.contains("2024-01-01"));
    }

    #[test]
    fn test_into_response_status_matches_parts() {
        let errors = [
            AppError::from(SessionError::from(StatsError::MissingCounter(
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            ))),
            AppError::from(SessionError::NotFound("abc".into())),
            AppError::from(StatsError::Storage("locked".into())),
            AppError::Validation("bad".into()),
        ];
        for err in errors {
            let (status, _, _) = err.parts();
            assert_eq!(err.into_response().status(), status);
        }
    }
}
