use domain::meeting_status::MeetingStatus;
use serde::Deserialize;
use utoipa::ToSchema;

use super::Validate;
use crate::error::FieldError;

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct UpdateStatusParams {
    pub(crate) status: MeetingStatus,
}

// Unknown statuses already fail deserialization; transition rules are checked by the domain.
impl Validate for UpdateStatusParams {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Ok(())
    }
}
