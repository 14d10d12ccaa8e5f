//! Meetings: creation through Zoom, lookups and the status state machine.

use crate::error::Error;
use crate::gateway::zoom::{self, CreateMeetingRequest, MeetingSettings};
use crate::{meeting_status::MeetingStatus, meeting_type::MeetingType, meetings, users, Id};
use chrono::{DateTime, SecondsFormat, Utc};
use entity_api::error::EntityApiErrorKind;
use entity_api::meeting as meeting_api;
use log::*;
use sea_orm::DatabaseConnection;
use serde::Serialize;

pub const DEFAULT_TITLE: &str = "Contract Call";
pub const DEFAULT_DURATION_MINUTES: i32 = 60;
pub const MIN_DURATION_MINUTES: i32 = 1;
pub const MAX_DURATION_MINUTES: i32 = 480;

/// What the host asked for. Unset fields take the defaults: an instant 60 minute
/// "Contract Call" without a waiting room that participants may join before the host.
#[derive(Debug, Clone, Default)]
pub struct MeetingOptions {
    pub title: Option<String>,
    pub meeting_type: Option<MeetingType>,
    pub start_time: Option<DateTime<Utc>>,
    pub duration: Option<i32>,
    pub waiting_room: Option<bool>,
    pub join_before_host: Option<bool>,
}

impl MeetingOptions {
    fn title(&self) -> String {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .unwrap_or(DEFAULT_TITLE)
            .to_string()
    }

    fn zoom_request(&self) -> Result<CreateMeetingRequest, Error> {
        let meeting_type = self.meeting_type.unwrap_or_default();
        let duration = self.duration.unwrap_or(DEFAULT_DURATION_MINUTES);

        if !(MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES).contains(&duration) {
            return Err(Error::invalid(format!(
                "duration must be between {MIN_DURATION_MINUTES} and {MAX_DURATION_MINUTES} minutes"
            )));
        }

        let start_time = match (meeting_type, self.start_time) {
            (MeetingType::Scheduled, None) => {
                return Err(Error::invalid("startTime is required for scheduled meetings"))
            }
            (MeetingType::Scheduled, Some(start)) => {
                Some(start.to_rfc3339_opts(SecondsFormat::Secs, true))
            }
            (MeetingType::Instant, _) => None,
        };

        Ok(CreateMeetingRequest {
            topic: self.title(),
            meeting_type: meeting_type.zoom_code(),
            start_time,
            duration,
            settings: MeetingSettings {
                waiting_room: self.waiting_room.unwrap_or(false),
                join_before_host: self.join_before_host.unwrap_or(true),
            },
        })
    }
}

/// A freshly created meeting with everything the app needs to join or start it.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedMeeting {
    pub meeting: meetings::Model,
    pub deeplink: String,
    /// `None` when the host's ZAK could not be obtained.
    pub zak_token: Option<String>,
}

/// Creates a Zoom meeting, stores it hosted by `host` and tries to fetch a ZAK for
/// starting it. Each call creates a new remote meeting.
pub async fn create(
    db: &DatabaseConnection,
    zoom: &zoom::Client,
    deeplink_scheme: &str,
    host: &users::Model,
    options: MeetingOptions,
) -> Result<CreatedMeeting, Error> {
    let request = options.zoom_request()?;
    let remote = zoom.create_meeting(&request).await?;

    let now = Utc::now();
    let meeting = meeting_api::create(
        db,
        meetings::Model {
            id: Id::nil(),
            zoom_meeting_id: remote.id,
            host_user_id: host.id,
            title: request.topic,
            password: remote.password,
            join_url: remote.join_url,
            start_time: options
                .start_time
                .filter(|_| options.meeting_type == Some(MeetingType::Scheduled))
                .map(Into::into),
            duration: request.duration,
            meeting_type: options.meeting_type.unwrap_or_default(),
            status: MeetingStatus::Created,
            created_at: now.into(),
            updated_at: now.into(),
        },
    )
    .await?;
    info!(
        "Stored meeting {} (Zoom {}) for host {}",
        meeting.id, meeting.zoom_meeting_id, host.id
    );

    let zak_token = match zoom.host_zak_token().await {
        Ok(token) => Some(token),
        Err(err) => {
            warn!("Meeting {} created without a ZAK token: {err}", meeting.id);
            None
        }
    };

    let deeplink = join_deeplink(
        deeplink_scheme,
        &meeting.zoom_meeting_id,
        meeting.password.as_deref(),
    );

    Ok(CreatedMeeting {
        meeting,
        deeplink,
        zak_token,
    })
}

pub async fn find_by_id(db: &DatabaseConnection, id: Id) -> Result<meetings::Model, Error> {
    Ok(meeting_api::find_by_id(db, id).await?)
}

pub async fn find_by_zoom_meeting_id(
    db: &DatabaseConnection,
    zoom_meeting_id: &str,
) -> Result<meetings::Model, Error> {
    meeting_api::find_by_zoom_meeting_id(db, zoom_meeting_id)
        .await?
        .ok_or_else(Error::not_found)
}

/// Meetings hosted by `host_user_id`, newest first.
pub async fn find_by_host(
    db: &DatabaseConnection,
    host_user_id: Id,
) -> Result<Vec<meetings::Model>, Error> {
    Ok(meeting_api::find_by_host(db, host_user_id).await?)
}

pub async fn update_status(
    db: &DatabaseConnection,
    id: Id,
    status: MeetingStatus,
) -> Result<meetings::Model, Error> {
    let meeting = find_by_id(db, id).await?;
    transition(db, meeting, status).await
}

/// Moves `meeting` to `next`. Asking for the current status returns the row untouched;
/// any move the state machine does not allow is a conflict.
pub async fn transition(
    db: &DatabaseConnection,
    meeting: meetings::Model,
    next: MeetingStatus,
) -> Result<meetings::Model, Error> {
    if meeting.status == next {
        debug!("Meeting {} is already {next}", meeting.id);
        return Ok(meeting);
    }

    if !meeting.status.can_transition_to(next) {
        warn!(
            "Rejected status change of meeting {}: {} -> {next}",
            meeting.id, meeting.status
        );
        return Err(Error::conflict(format!(
            "Cannot change meeting status from {} to {next}",
            meeting.status
        )));
    }

    let (id, current) = (meeting.id, meeting.status);
    match meeting_api::update_status(db, meeting, next).await {
        Ok(updated) => Ok(updated),
        Err(err) if err.error_kind == EntityApiErrorKind::RecordNotUpdated => {
            warn!("Meeting {id} left {current} before it could move to {next}");
            Err(Error::conflict(format!(
                "Meeting status changed from {current} concurrently; cannot move to {next}"
            )))
        }
        Err(err) => Err(err.into()),
    }
}

/// `{scheme}://join?meetingId=..&password=..`, the link the mobile app opens to join.
/// The password is left out when there is none.
pub fn join_deeplink(scheme: &str, zoom_meeting_id: &str, password: Option<&str>) -> String {
    let mut link = format!(
        "{scheme}://join?meetingId={}",
        urlencoding::encode(zoom_meeting_id)
    );
    if let Some(password) = password.filter(|p| !p.is_empty()) {
        link.push_str("&password=");
        link.push_str(&urlencoding::encode(password));
    }
    link
}
