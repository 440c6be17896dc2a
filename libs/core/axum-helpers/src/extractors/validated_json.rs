//! JSON extractor with automatic validation using the validator crate.

use crate::errors::AppError;
use axum::extract::{FromRequest, Json, OptionalFromRequest, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON extractor with automatic validation.
///
/// Malformed bodies are rejected as [`AppError::JsonExtractorRejection`];
/// bodies that parse but fail `Validate` become [`AppError::ValidationError`],
/// whose response message is the first custom field message.
///
/// # Example
/// ```ignore
/// use axum::Router;
/// use axum::routing::post;
/// use axum_helpers::extractors::ValidatedJson;
/// use serde::Deserialize;
/// use validator::Validate;
///
/// #[derive(Deserialize, Validate)]
/// struct JoinRequest {
///     #[validate(length(min = 1, message = "User email is required"))]
///     user_email: String,
/// }
///
/// async fn join(ValidatedJson(payload): ValidatedJson<JoinRequest>) -> String {
///     format!("Joining: {}", payload.user_email)
/// }
///
/// let app = Router::new().route("/join", post(join));
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = <Json<T> as FromRequest<S>>::from_request(req, state).await?;
        data.validate()?;
        Ok(ValidatedJson(data))
    }
}

/// `Option<ValidatedJson<T>>` is `None` when the request has no
/// `Content-Type` header, so handlers can treat it as an empty body.
impl<T, S> OptionalFromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Option<Self>, Self::Rejection> {
        let Some(Json(data)) =
            <Json<T> as OptionalFromRequest<S>>::from_request(req, state).await?
        else {
            return Ok(None);
        };
        data.validate()?;
        Ok(Some(ValidatedJson(data)))
    }
}
