use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use axum_helpers::errors::first_validation_message;
use thiserror::Error;

/// Client-facing message for an id with no matching event.
pub const EVENT_NOT_FOUND: &str = "Event not found";

#[derive(Debug, Error)]
pub enum EventError {
    #[error("Event not found: {id}")]
    NotFound { id: String },

    #[error("{message}")]
    Validation { message: String },

    /// Store failure. `message` names the failed operation once the service
    /// has attached context; `details` is the underlying error text.
    #[error("{message}: {details}")]
    Database { message: String, details: String },
}

pub type EventResult<T> = Result<T, EventError>;

impl EventError {
    pub fn database(details: impl Into<String>) -> Self {
        Self::Database {
            message: "Database error".to_string(),
            details: details.into(),
        }
    }

    /// Replaces the message of a `Database` error, e.g. with
    /// "Failed to load events". Other variants pass through unchanged.
    pub fn context(self, message: &str) -> Self {
        match self {
            Self::Database { details, .. } => Self::Database {
                message: message.to_string(),
                details,
            },
            other => other,
        }
    }
}

impl From<EventError> for AppError {
    fn from(err: EventError) -> Self {
        match err {
            EventError::NotFound { .. } => AppError::NotFound(EVENT_NOT_FOUND.to_string()),
            EventError::Validation { message } => AppError::BadRequest(message),
            EventError::Database { message, details } => AppError::Database { message, details },
        }
    }
}

impl IntoResponse for EventError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for EventError {
    fn from(err: mongodb::error::Error) -> Self {
        Self::database(err.to_string())
    }
}

impl From<mongodb::bson::oid::Error> for EventError {
    fn from(err: mongodb::bson::oid::Error) -> Self {
        Self::database(format!("Invalid ObjectId: {}", err))
    }
}

impl From<mongodb::bson::ser::Error> for EventError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        Self::database(format!("BSON serialization error: {}", err))
    }
}

impl From<validator::ValidationErrors> for EventError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation {
            message: first_validation_message(&err),
        }
    }
}
