use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

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
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "meeting_type")]
pub enum MeetingType {
    /// Starts immediately; Zoom meeting type 1.
    #[sea_orm(string_value = "instant")]
    #[default]
    Instant,
    /// Has a start time; Zoom meeting type 2.
    #[sea_orm(string_value = "scheduled")]
    Scheduled,
}

impl MeetingType {
    /// Zoom's numeric `type` for meeting creation.
    pub fn zoom_code(&self) -> u8 {
        match self {
            MeetingType::Instant => 1,
            MeetingType::Scheduled => 2,
        }
    }
}

impl std::fmt::Display for MeetingType {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeetingType::Instant => write!(fmt, "instant"),
            MeetingType::Scheduled => write!(fmt, "scheduled"),
        }
    }
}
