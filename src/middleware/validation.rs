//! JSON body extractor that runs `validator` rules

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::ApiError;

/// Deserialized and validated JSON body.
///
/// Type mismatches and failed rules both reject with the message-array
/// validation response; a missing content type or unparsable JSON is a
/// plain bad request.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| match rejection {
                JsonRejection::JsonDataError(err) => ApiError::Validation(vec![err.body_text()]),
                other => ApiError::BadRequest(other.body_text()),
            })?;

        value.validate()?;

        Ok(ValidatedJson(value))
    }
}
