//! Envelope response format for all API responses.
//!
//! Every response is wrapped in a consistent envelope:
//! ```json
//! {
//!   "data": { ... },
//!   "meta": { "request_id": "...", "timestamp": "...", "response_time_ms": 5 },
//!   "errors": [],
//!   "_links": { "self": "..." }
//! }
//! ```

use std::collections::HashMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Envelope response wrapping all API data.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// The main response payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    /// Request metadata.
    pub meta: ApiMeta,

    /// Error list (empty on success).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ApiErrorDetail>,

    /// HATEOAS-style links for discoverability.
    #[serde(rename = "_links", skip_serializing_if = "HashMap::is_empty")]
    pub links: HashMap<String, String>,

    /// HTTP status the envelope is sent with.
    #[serde(skip)]
    pub status: StatusCode,
}

/// Metadata included in every response.
#[derive(Debug, Serialize)]
pub struct ApiMeta {
    pub request_id: String,
    /// RFC 3339 timestamp of the response.
    pub timestamp: String,
    pub response_time_ms: u64,
}

/// Individual error detail.
#[derive(Debug, Serialize)]
pub struct ApiErrorDetail {
    /// Machine-readable error code.
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a success response with data.
    pub fn success(data: T, request_id: String, response_time_ms: u64) -> Self {
        Self {
            data: Some(data),
            meta: ApiMeta {
                request_id,
                timestamp: chrono::Utc::now().to_rfc3339(),
                response_time_ms,
            },
            errors: Vec::new(),
            links: HashMap::new(),
            status: StatusCode::OK,
        }
    }

    /// Add a HATEOAS link.
    pub fn with_link(mut self, rel: &str, href: &str) -> Self {
        self.links.insert(rel.to_string(), href.to_string());
        self
    }
}

impl ApiResponse<()> {
    /// Create an error response (no data) sent with `status`.
    pub fn error(
        status: StatusCode,
        code: &str,
        message: &str,
        details: Option<serde_json::Value>,
    ) -> Self {
        Self {
            data: None,
            meta: ApiMeta {
                request_id: String::new(),
                timestamp: chrono::Utc::now().to_rfc3339(),
                response_time_ms: 0,
            },
            errors: vec![ApiErrorDetail {
                code: code.to_string(),
                message: message.to_string(),
                details,
            }],
            links: HashMap::new(),
            status,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let (status, body) = match serde_json::to_string(&self) {
            Ok(body) => (self.status, body),
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize response");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    r#"{"errors":[{"code":"SERIALIZATION_ERROR","message":"Failed to serialize response"}]}"#.to_string(),
                )
            }
        };

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_shape() {
        let resp = ApiResponse::success(serde_json::json!({"a": 1}), "req-1".into(), 3)
            .with_link("self", "/api/v1/sessions");
        let value = serde_json::to_value(&resp).unwrap();

        assert_eq!(value["data"]["a"], 1);
        assert_eq!(value["meta"]["request_id"], "req-1");
        assert_eq!(value["meta"]["response_time_ms"], 3);
        assert_eq!(value["_links"]["self"], "/api/v1/sessions");
        assert!(value.get("errors").is_none());
    }

    #[test]
    fn test_error_envelope_carries_status() {
        let resp = ApiResponse::error(StatusCode::CONFLICT, "COUNTER_NOT_FOUND", "missing", None);
        let value = serde_json::to_value(&resp).unwrap();
        assert!(value.get("status").is_none());
        assert!(value.get("data").is_none());
        assert_eq!(value["errors"][0]["code"], "COUNTER_NOT_FOUND");
        assert_eq!(resp.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_success_is_ok() {
        let resp = ApiResponse::success(Vec::<u8>::new(), "req".into(), 0).into_response();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
