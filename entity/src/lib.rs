use uuid::Uuid;

pub mod fcm_platform;
pub mod jwt;
pub mod meeting_status;
pub mod meeting_type;
pub mod meetings;
pub mod roles;
pub mod users;

/// A type alias that represents any Entity's internal id field data type.
/// Aliased so that it's easy to change the underlying type if necessary.
pub type Id = Uuid;
