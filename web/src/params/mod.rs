//! Typed request bodies for the endpoints.
//!
//! Each body deserializes with serde and then runs its own [`Validate`] rules, so handlers
//! only ever see input that passed both. Failures are reported per field in the
//! `details` array of a 400 response.

pub(crate) mod contract;
pub(crate) mod meeting;
pub(crate) mod user;
pub(crate) mod zoom;

use crate::error::FieldError;

/// Field-level checks that serde cannot express.
pub(crate) trait Validate {
    fn validate(&self) -> Result<(), Vec<FieldError>>;
}

/// Collects field errors, turning an empty list into success.
pub(crate) fn into_result(errors: Vec<FieldError>) -> Result<(), Vec<FieldError>> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
