pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Standard error response structure.
///
/// Returned for all error responses:
/// - `code`: Integer error code for logging/monitoring (e.g., 2003)
/// - `error`: Machine-readable error identifier (e.g., "DATABASE_ERROR")
/// - `message`: Human-readable error message
/// - `details`: Optional additional error details
///
/// # JSON Example
///
/// ```json
/// {
///   "code": 2003,
///   "error": "DATABASE_ERROR",
///   "message": "Failed to create event",
///   "details": { "error": "connection refused" }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable error identifier for programmatic handling
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Optional structured error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application error type that can be converted to HTTP responses.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON parsing error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    /// Store failure. `message` names the failed operation, `details` carries
    /// the underlying driver error text.
    #[error("{message}: {details}")]
    Database { message: String, details: String },

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, details, code) = match self {
            AppError::SerdeJson(e) => {
                tracing::error!(
                    error_code = ErrorCode::SerdeJsonError.code(),
                    "JSON parsing error: {:?}",
                    e
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::SerdeJsonError.default_message().to_string(),
                    None,
                    ErrorCode::SerdeJsonError,
                )
            }
            AppError::Io(e) => {
                tracing::error!(error_code = ErrorCode::IoError.code(), "I/O error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::IoError.default_message().to_string(),
                    None,
                    ErrorCode::IoError,
                )
            }
            AppError::JsonExtractorRejection(e) => {
                tracing::warn!(
                    error_code = ErrorCode::JsonExtraction.code(),
                    "JSON extraction error: {:?}",
                    e
                );
                // Every body rejection is a 400, including axum's 422 and 415.
                (
                    StatusCode::BAD_REQUEST,
                    e.body_text(),
                    None,
                    ErrorCode::JsonExtraction,
                )
            }
            AppError::ValidationError(e) => {
                tracing::info!(
                    error_code = ErrorCode::ValidationError.code(),
                    "Validation error: {:?}",
                    e
                );
                (
                    StatusCode::BAD_REQUEST,
                    first_validation_message(&e),
                    Some(serde_json::to_value(&e).unwrap_or(serde_json::Value::Null)),
                    ErrorCode::ValidationError,
                )
            }
            AppError::BadRequest(msg) => {
                tracing::info!(error_code = ErrorCode::BadRequest.code(), "Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, msg, None, ErrorCode::BadRequest)
            }
            AppError::NotFound(msg) => {
                tracing::info!(
                    error_code = ErrorCode::NotFound.code(),
                    "Not found: {}",
                    msg
                );
                (StatusCode::NOT_FOUND, msg, None, ErrorCode::NotFound)
            }
            AppError::Database { message, details } => {
                tracing::error!(
                    error_code = ErrorCode::DatabaseError.code(),
                    details = %details,
                    "{}",
                    message
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    message,
                    Some(serde_json::json!({ "error": details })),
                    ErrorCode::DatabaseError,
                )
            }
            AppError::InternalServerError(msg) => {
                tracing::error!(
                    error_code = ErrorCode::InternalError.code(),
                    "Internal server error: {}",
                    msg
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    msg,
                    None,
                    ErrorCode::InternalError,
                )
            }
            AppError::ServiceUnavailable(msg) => {
                tracing::warn!("Service unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    msg,
                    None,
                    ErrorCode::ServiceUnavailable,
                )
            }
        };

        let body = Json(ErrorResponse {
            code: code.code(),
            error: code.as_str().to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Picks the first custom message attached to a failing field, falling back
/// to the generic validation message. Fields are visited in name order so the
/// result is stable across runs.
pub fn first_validation_message(errors: &ValidationErrors) -> String {
    let field_errors = errors.field_errors();
    let mut fields: Vec<_> = field_errors.keys().collect();
    fields.sort();

    fields
        .into_iter()
        .filter_map(|field| field_errors.get(field))
        .flat_map(|errs| errs.iter())
        .find_map(|err| err.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| ErrorCode::ValidationError.default_message().to_string())
}

/// Helper function to create error responses.
///
/// # Example
///
/// ```rust,ignore
/// use axum_helpers::errors::{error_response, ErrorCode};
/// use axum::http::StatusCode;
///
/// let response = error_response(
///     StatusCode::BAD_REQUEST,
///     "Invalid input".to_string(),
///     ErrorCode::ValidationError,
/// );
/// ```
pub fn error_response(status: StatusCode, message: String, error_code: ErrorCode) -> Response {
    let body = Json(ErrorResponse {
        code: error_code.code(),
        error: error_code.as_str().to_string(),
        message,
        details: None,
    });

    (status, body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use validator::ValidationError;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_not_found_maps_to_404() {
        let response = AppError::NotFound("Event not found".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(body["message"], "Event not found");
        assert_eq!(body["error"], "NOT_FOUND");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_database_error_carries_details() {
        let response = AppError::Database {
            message: "Failed to load events".to_string(),
            details: "connection refused".to_string(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["message"], "Failed to load events");
        assert_eq!(body["code"], 2003);
        assert_eq!(body["details"]["error"], "connection refused");
    }

    #[tokio::test]
    async fn test_validation_error_uses_field_message() {
        let mut errors = ValidationErrors::new();
        errors.add(
            "title",
            ValidationError::new("required").with_message("Missing required fields".into()),
        );

        let response = AppError::ValidationError(errors).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["message"], "Missing required fields");
        assert_eq!(body["error"], "VALIDATION_ERROR");
    }

    #[test]
    fn test_validation_message_falls_back_to_default() {
        let mut errors = ValidationErrors::new();
        errors.add("title", ValidationError::new("length"));
        assert_eq!(
            first_validation_message(&errors),
            "Request validation failed"
        );
    }
}
