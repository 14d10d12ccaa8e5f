use crate::error::FieldError;
use crate::params::Validate;
use crate::Error;
use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;

/// A JSON body that deserialized and passed its [`Validate`] rules. Either failure is
/// answered with 400 and a list of field errors.
pub(crate) struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                Error::Validation(vec![FieldError::new("body", rejection.body_text())])
            })?;

        value.validate().map_err(Error::Validation)?;
        Ok(ValidatedJson(value))
    }
}
