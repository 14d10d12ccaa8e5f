//! Users are provisioned by the external authentication provider; this service
//! reads them for role checks and writes only the push-notification fields.

use crate::fcm_platform::FcmPlatform;
use crate::roles::Role;
use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize, ToSchema)]
#[schema(as = entity::users::Model)]
#[sea_orm(schema_name = "dealflow", table_name = "users")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    pub id: Id,
    #[sea_orm(unique)]
    pub email: String,
    pub name: Option<String>,
    pub role: Role,
    #[serde(skip_serializing)]
    pub fcm_token: Option<String>,
    pub fcm_platform: Option<FcmPlatform>,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub fcm_updated_at: Option<DateTimeWithTimeZone>,
    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,
    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::meetings::Entity")]
    Meetings,
}

impl Related<super::meetings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Meetings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_seller(&self) -> bool {
        self.role == Role::Seller
    }

    /// Name used in notification copy, falling back to the email address.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.email)
    }
}
