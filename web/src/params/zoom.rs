use chrono::{DateTime, Utc};
use domain::gateway::zoom;
use domain::jwt::SdkRole;
use domain::meeting::{MeetingOptions, MAX_DURATION_MINUTES, MIN_DURATION_MINUTES};
use domain::meeting_type::MeetingType;
use serde::Deserialize;
use utoipa::ToSchema;

use super::{into_result, Validate};
use crate::error::FieldError;

const MAX_TITLE_LENGTH: usize = 200;

/// Body of `POST /zoom/meetings`. Every field is optional.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateMeetingParams {
    #[schema(example = "Contract Call")]
    pub(crate) title: Option<String>,
    #[serde(rename = "type")]
    pub(crate) meeting_type: Option<MeetingType>,
    /// Required when `type` is `scheduled`.
    pub(crate) start_time: Option<DateTime<Utc>>,
    /// Minutes, 1 to 480.
    #[schema(example = 60)]
    pub(crate) duration: Option<i32>,
    pub(crate) waiting_room: Option<bool>,
    pub(crate) join_before_host: Option<bool>,
}

impl Validate for CreateMeetingParams {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        if self
            .title
            .as_ref()
            .is_some_and(|title| title.chars().count() > MAX_TITLE_LENGTH)
        {
            errors.push(FieldError::new(
                "title",
                format!("title must be at most {MAX_TITLE_LENGTH} characters"),
            ));
        }

        if let Some(duration) = self.duration {
            if !(MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES).contains(&duration) {
                errors.push(FieldError::new(
                    "duration",
                    format!(
                        "duration must be between {MIN_DURATION_MINUTES} and {MAX_DURATION_MINUTES} minutes"
                    ),
                ));
            }
        }

        if self.meeting_type == Some(MeetingType::Scheduled) && self.start_time.is_none() {
            errors.push(FieldError::new(
                "startTime",
                "startTime is required for scheduled meetings",
            ));
        }

        into_result(errors)
    }
}

impl From<CreateMeetingParams> for MeetingOptions {
    fn from(params: CreateMeetingParams) -> Self {
        MeetingOptions {
            title: params.title,
            meeting_type: params.meeting_type,
            start_time: params.start_time,
            duration: params.duration,
            waiting_room: params.waiting_room,
            join_before_host: params.join_before_host,
        }
    }
}

/// Body of `POST /zoom/sdk-signature`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SdkSignatureParams {
    /// Zoom meeting number, as a string or a number.
    #[serde(deserialize_with = "zoom::meeting_id")]
    #[schema(value_type = String, example = "85746065432")]
    pub(crate) meeting_id: String,
    /// 0 joins as participant, 1 as host. There is no default.
    #[schema(value_type = u8, example = 0)]
    pub(crate) role: Option<i64>,
}

impl SdkSignatureParams {
    /// The requested role; only meaningful once [`Validate::validate`] passed.
    pub(crate) fn sdk_role(&self) -> Option<SdkRole> {
        self.role
            .and_then(|role| u8::try_from(role).ok())
            .and_then(|role| SdkRole::try_from(role).ok())
    }
}

impl Validate for SdkSignatureParams {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        if self.meeting_id.trim().is_empty() {
            errors.push(FieldError::new("meetingId", "meetingId is required"));
        }

        match self.role {
            None => errors.push(FieldError::new("role", "role is required")),
            Some(_) if self.sdk_role().is_none() => {
                errors.push(FieldError::new("role", "role must be 0 or 1"))
            }
            Some(_) => {}
        }

        into_result(errors)
    }
}
