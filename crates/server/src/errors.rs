use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::errors::ServiceError;
use tracing::error;

pub const NOT_FOUND_MESSAGE: &str = "Service not found";

/// Error response rendered as `{"error": message}`.
///
/// Internal failures carry only a fixed message; the cause is logged, not returned.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub message: String,
}

impl JsonApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE)
    }

    /// Map a store error: missing records become 404, everything else a 500 with `message`.
    pub fn from_service(err: ServiceError, message: &str) -> Self {
        match err {
            ServiceError::NotFound(_) => Self::not_found(),
            other => {
                error!(error = %other, "{}", message);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        }
    }
}

/// Body rejections keep axum's status (400/413/415/422) but use the JSON error shape.
impl From<JsonRejection> for JsonApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({"error": self.message}))).into_response()
    }
}
