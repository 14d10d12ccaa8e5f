use domain::fcm_platform::FcmPlatform;
use serde::Deserialize;
use utoipa::ToSchema;

use super::{into_result, Validate};
use crate::error::FieldError;

/// Body of `POST /users/fcm-token`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RegisterFcmTokenParams {
    pub(crate) fcm_token: String,
    pub(crate) platform: FcmPlatform,
}

impl Validate for RegisterFcmTokenParams {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        if self.fcm_token.trim().is_empty() {
            errors.push(FieldError::new("fcmToken", "fcmToken is required"));
        }
        into_result(errors)
    }
}
