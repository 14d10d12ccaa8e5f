use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Lifecycle of a meeting.
///
/// `created -> started -> ended`, and `created | started -> cancelled`.
/// `ended` and `cancelled` are terminal.
#[derive(
    Debug,
    Clone,
    Copy,
    Eq,
    PartialEq,
    EnumIter,
    Deserialize,
    Default,
    Serialize,
    DeriveActiveEnum,
    ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "meeting_status")]
pub enum MeetingStatus {
    #[sea_orm(string_value = "created")]
    #[default]
    Created,
    #[sea_orm(string_value = "started")]
    Started,
    #[sea_orm(string_value = "ended")]
    Ended,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl MeetingStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, MeetingStatus::Ended | MeetingStatus::Cancelled)
    }

    /// Whether moving from `self` to `next` is a real transition. Staying in the
    /// same status is not a transition; callers treat it as a no-op.
    pub fn can_transition_to(&self, next: MeetingStatus) -> bool {
        use MeetingStatus::*;
        matches!(
            (self, next),
            (Created, Started) | (Started, Ended) | (Created, Cancelled) | (Started, Cancelled)
        )
    }
}

impl std::fmt::Display for MeetingStatus {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeetingStatus::Created => write!(fmt, "created"),
            MeetingStatus::Started => write!(fmt, "started"),
            MeetingStatus::Ended => write!(fmt, "ended"),
            MeetingStatus::Cancelled => write!(fmt, "cancelled"),
        }
    }
}
