use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Value};

/// Uniform `{success, message, body}` envelope returned by every endpoint
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    pub body: Option<T>,
    pub status_code: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    /// 200 OK with the default message
    pub fn success(body: T) -> Self {
        Self::success_with(Some(body), 200, "")
    }

    /// Success envelope. Unknown status codes fall back to 200 and an empty
    /// message becomes the status' reason phrase.
    pub fn success_with(body: Option<T>, status_code: u16, message: impl Into<String>) -> Self {
        let status_code = normalize_status(status_code, StatusCode::OK);
        Self {
            success: true,
            message: default_message(message.into(), status_code),
            body,
            status_code,
        }
    }

    /// Error envelope. Unknown status codes fall back to 500.
    pub fn error_with(body: Option<T>, status_code: u16, message: impl Into<String>) -> Self {
        let status_code = normalize_status(status_code, StatusCode::INTERNAL_SERVER_ERROR);
        Self {
            success: false,
            message: default_message(message.into(), status_code),
            body,
            status_code,
        }
    }

    pub fn to_json(&self) -> Result<Value, serde_json::Error> {
        Ok(json!({
            "success": self.success,
            "message": self.message,
            "body": serde_json::to_value(&self.body)?,
        }))
    }
}

impl ApiResponse<()> {
    /// `{success: true, message: "OK", body: null}`
    pub fn empty() -> Self {
        Self::success_with(None, 200, "")
    }
}

/// A status is usable when it has a canonical reason phrase.
pub fn normalize_status(code: u16, fallback: StatusCode) -> StatusCode {
    StatusCode::from_u16(code)
        .ok()
        .filter(|status| status.canonical_reason().is_some())
        .unwrap_or(fallback)
}

fn default_message(message: String, status: StatusCode) -> String {
    if message.is_empty() {
        status.canonical_reason().unwrap_or_default().to_string()
    } else {
        message
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        match self.to_json() {
            Ok(envelope) => (self.status_code, Json(envelope)).into_response(),
            Err(e) => {
                tracing::error!("Failed to serialize response body: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "success": false,
                        "message": "Failed to serialize response body",
                        "body": null
                    })),
                )
                    .into_response()
            }
        }
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;
