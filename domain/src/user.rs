use crate::error::Error;
use crate::{fcm_platform::FcmPlatform, users, Id};
use entity_api::user as user_api;
use log::*;
use sea_orm::DatabaseConnection;

pub async fn find_by_id(db: &DatabaseConnection, id: Id) -> Result<users::Model, Error> {
    Ok(user_api::find_by_id(db, id).await?)
}

/// Case-insensitive lookup; `None` when nobody registered with `email`.
pub async fn find_by_email(
    db: &DatabaseConnection,
    email: &str,
) -> Result<Option<users::Model>, Error> {
    Ok(user_api::find_by_email(db, email).await?)
}

/// Stores the device token push notifications for `user` go to, replacing any earlier one.
pub async fn register_fcm_token(
    db: &DatabaseConnection,
    user: users::Model,
    fcm_token: &str,
    platform: FcmPlatform,
) -> Result<users::Model, Error> {
    let fcm_token = fcm_token.trim();
    if fcm_token.is_empty() {
        return Err(Error::invalid("fcmToken must not be empty"));
    }

    let user = user_api::update_fcm_token(db, user, fcm_token.to_string(), platform).await?;
    info!("Registered {platform} push token for user {}", user.id);
    Ok(user)
}
