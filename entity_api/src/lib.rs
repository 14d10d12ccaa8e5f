use chrono::Utc;
use log::*;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

pub use entity::{
    fcm_platform, jwt, meeting_status, meeting_type, meetings, roles, users, Id,
};

pub mod error;
pub mod meeting;
pub mod user;

/// Inserts a demo seller and a demo client for local development.
pub async fn seed_database(db: &DatabaseConnection) -> Result<(), error::Error> {
    let now = Utc::now();

    let seller = users::ActiveModel {
        email: Set("seller@dealflow.dev".to_owned()),
        name: Set(Some("Sam Seller".to_owned())),
        role: Set(roles::Role::Seller),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .insert(db)
    .await?;
    info!("Seeded seller {} ({})", seller.email, seller.id);

    let client = users::ActiveModel {
        email: Set("client@dealflow.dev".to_owned()),
        name: Set(Some("Casey Client".to_owned())),
        role: Set(roles::Role::Client),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .insert(db)
    .await?;
    info!("Seeded client {} ({})", client.email, client.id);

    Ok(())
}
