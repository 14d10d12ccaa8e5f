//! Local mirror of a Zoom meeting created through this service.

use crate::meeting_status::MeetingStatus;
use crate::meeting_type::MeetingType;
use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize, ToSchema)]
#[schema(as = entity::meetings::Model)]
#[sea_orm(schema_name = "dealflow", table_name = "meetings")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    pub id: Id,

    /// Zoom's meeting number, kept as a string.
    pub zoom_meeting_id: String,

    #[schema(value_type = String, format = Uuid)]
    pub host_user_id: Id,

    pub title: String,

    pub password: Option<String>,

    pub join_url: Option<String>,

    #[schema(value_type = Option<String>, format = DateTime)]
    pub start_time: Option<DateTimeWithTimeZone>,

    /// Minutes.
    pub duration: i32,

    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub meeting_type: MeetingType,

    pub status: MeetingStatus,

    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,

    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::HostUserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
