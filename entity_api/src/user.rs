use super::error::Error;
use entity::fcm_platform::FcmPlatform;
use entity::users::{ActiveModel, Column, Entity, Model};
use entity::Id;
use log::*;
use sea_orm::{entity::prelude::*, ActiveValue::Set, DatabaseConnection};

pub async fn find_by_id(db: &DatabaseConnection, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(Error::not_found)
}

pub async fn find_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::Email.eq(email.trim().to_lowercase()))
        .one(db)
        .await?)
}

/// Stores the device token push notifications are delivered to.
pub async fn update_fcm_token(
    db: &DatabaseConnection,
    user: Model,
    fcm_token: String,
    platform: FcmPlatform,
) -> Result<Model, Error> {
    debug!("Registering {platform} push token for user {}", user.id);

    let now = chrono::Utc::now();
    let mut active_model: ActiveModel = user.into();
    active_model.fcm_token = Set(Some(fcm_token));
    active_model.fcm_platform = Set(Some(platform));
    active_model.fcm_updated_at = Set(Some(now.into()));
    active_model.updated_at = Set(now.into());

    Ok(active_model.update(db).await?)
}
