//! API error types with IntoResponse
//!
//! Errors are converted to `{"message": ...}` JSON responses with
//! appropriate status codes. Server faults are logged here in full and
//! reported to the caller with an opaque message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::db::GatewayError;
use crate::models::ValidationError;

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Malformed or out-of-range client input (400)
    Validation(ValidationError),

    /// Well-formed request the current state refuses (400)
    BadRequest { message: String },

    /// Resource missing or meaningfully empty (404)
    NotFound { message: String },

    /// Store failure (500, logged)
    Internal {
        context: &'static str,
        source: GatewayError,
    },
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Map a gateway failure to a 500 reporting only `context`.
    ///
    /// ```ignore
    /// gateway.list_houses().await.map_err(ApiError::server("server error getting houses"))?;
    /// ```
    pub fn server(context: &'static str) -> impl FnOnce(GatewayError) -> Self {
        move |source| Self::Internal { context, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::Validation(e) => e.to_string(),
            Self::BadRequest { message } | Self::NotFound { message } => message,
            Self::Internal { context, source } => {
                // Log the actual error, return generic message
                tracing::error!(error = %source, kind = ?source.kind(), "{}", context);
                context.to_owned()
            }
        };

        (status, Json(ErrorBody { message })).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn validation_error_is_400() {
        let err = ApiError::Validation(ValidationError::Empty { field: "species" });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "message": "must specify species" })
        );
    }

    #[tokio::test]
    async fn not_found_is_404() {
        let response = ApiError::not_found("no House exists with ID 3").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn internal_hides_detail() {
        let err = ApiError::server("server error getting Trees")(GatewayError::Sqlx(
            sqlx::Error::Protocol("secret detail".into()),
        ));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers()["content-type"],
            "application/json"
        );
        let body = body_json(response).await;
        assert_eq!(body["message"], "server error getting Trees");
        assert!(!body.to_string().contains("secret"));
    }
}
