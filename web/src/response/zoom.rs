//! Response bodies of the `/zoom` endpoints, shaped the way the mobile app reads them.

use domain::meeting::CreatedMeeting;
use domain::meetings::Model as MeetingModel;
use serde::Serialize;
use utoipa::ToSchema;

/// A new meeting plus everything needed to start or share it.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedMeetingResponse {
    /// Zoom's meeting number.
    pub meeting_id: String,
    pub password: Option<String>,
    pub deeplink: String,
    pub join_url: Option<String>,
    /// `null` when the host's ZAK could not be obtained.
    pub zak_token: Option<String>,
    pub meeting: MeetingModel,
}

impl From<CreatedMeeting> for CreatedMeetingResponse {
    fn from(created: CreatedMeeting) -> Self {
        Self {
            meeting_id: created.meeting.zoom_meeting_id.clone(),
            password: created.meeting.password.clone(),
            deeplink: created.deeplink,
            join_url: created.meeting.join_url.clone(),
            zak_token: created.zak_token,
            meeting: created.meeting,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ZakResponse {
    pub zak_token: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SdkSignatureResponse {
    pub signature: String,
}
