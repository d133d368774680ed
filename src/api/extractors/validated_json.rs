//! Validated JSON extractor - Combines deserialization with validation.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::errors::AppError;
use crate::schemas::InputSchema;

/// Field name used when the body cannot be parsed at all
const BODY_FIELD: &str = "body";

/// JSON body that has passed its schema rules.
///
/// # Example
///
/// ```rust,ignore
/// async fn create_specie(ValidatedJson(payload): ValidatedJson<SpecieRequest>) {
///     // payload.name is non-empty here
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + InputSchema,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(BODY_FIELD, e.body_text()))?;

        value.check()?;

        Ok(ValidatedJson(value))
    }
}
