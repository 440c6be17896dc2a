//! Type-safe error codes for API responses.
//!
//! Each error code has a string form for clients (e.g. "VALIDATION_ERROR"),
//! an integer form for logs and metrics (e.g. 1001), and a default message.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::ValidationError;
//! assert_eq!(code.as_str(), "VALIDATION_ERROR");
//! assert_eq!(code.code(), 1001);
//! assert_eq!(code.default_message(), "Request validation failed");
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Standardized error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1999)
    /// Request validation failed
    ValidationError,

    /// Malformed request that is not a field validation failure
    BadRequest,

    /// Requested resource was not found
    NotFound,

    /// JSON extraction from request body failed
    JsonExtraction,

    /// An unexpected internal server error occurred
    InternalError,

    /// Service is temporarily unavailable
    ServiceUnavailable,

    // Database errors (2000-2999)
    /// Store query or write failed
    DatabaseError,

    /// Store is not reachable
    DatabaseUnavailable,

    // I/O errors (4000s)
    IoError,

    // JSON errors (5000s)
    SerdeJsonError,
}

impl ErrorCode {
    /// SCREAMING_SNAKE_CASE identifier clients can match on.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",
            Self::NotFound => "NOT_FOUND",
            Self::JsonExtraction => "JSON_EXTRACTION",
            Self::InternalError => "INTERNAL_ERROR",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::DatabaseUnavailable => "DATABASE_UNAVAILABLE",
            Self::IoError => "IO_ERROR",
            Self::SerdeJsonError => "SERDE_JSON_ERROR",
        }
    }

    /// Integer code used in structured logs.
    ///
    /// - 1000-1999: client and generic server errors
    /// - 2000-2999: database errors
    /// - 4000-4999: I/O errors
    /// - 5000-5999: serialization errors
    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::BadRequest => 1002,
            Self::JsonExtraction => 1003,
            Self::NotFound => 1004,
            Self::InternalError => 1005,
            Self::ServiceUnavailable => 1011,

            Self::DatabaseError => 2003,
            Self::DatabaseUnavailable => 2013,

            Self::IoError => 4001,

            Self::SerdeJsonError => 5001,
        }
    }

    /// Default user-facing message; handlers may override it.
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Request validation failed",
            Self::BadRequest => "Bad request",
            Self::NotFound => "Resource not found",
            Self::JsonExtraction => "Failed to parse request body",
            Self::InternalError => "An internal server error occurred",
            Self::ServiceUnavailable => "Service is temporarily unavailable",
            Self::DatabaseError => "Database error occurred",
            Self::DatabaseUnavailable => "Database is unavailable",
            Self::IoError => "I/O error occurred",
            Self::SerdeJsonError => "JSON serialization error",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
