//! The JSON envelope every endpoint answers with.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Uniform response body: `{"success": bool, "message": string, "data"?: object}`.
///
/// # JSON Example
///
/// ```json
/// {
///   "success": true,
///   "message": "Email sent successfully"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse {
    /// Whether the request achieved its goal
    pub success: bool,
    /// Human-readable outcome
    pub message: String,
    /// Optional diagnostic payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub data: Option<serde_json::Value>,
}

impl ApiResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

impl IntoResponse for ApiResponse {
    /// Successful envelopes answer 200; failures go through `AppError` so they
    /// carry the right status code.
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_data_is_omitted_when_absent() {
        let body = serde_json::to_value(ApiResponse::ok("done")).unwrap();
        assert_eq!(body, json!({"success": true, "message": "done"}));
    }

    #[test]
    fn test_data_is_serialized_when_present() {
        let body =
            serde_json::to_value(ApiResponse::ok("done").with_data(json!({"website": "main"})))
                .unwrap();
        assert_eq!(body["data"]["website"], "main");
    }

    #[test]
    fn test_failure_envelope() {
        let response = ApiResponse::failure("nope");
        assert!(!response.success);
        assert_eq!(response.message, "nope");
    }
}
