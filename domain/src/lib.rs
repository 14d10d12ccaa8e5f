//! Business logic of the DealFlow backend.
//!
//! Entity types are re-exported from `entity_api` so consumers of the `domain` crate never
//! need to depend on `entity_api` or `entity` directly.

// Re-exports from `entity` crate via `entity_api`
pub use entity_api::{
    fcm_platform, meeting_status, meeting_type, meetings, roles, users, Id,
};

pub mod contract;
pub mod emails;
pub mod error;
pub mod gateway;
pub mod jwt;
pub mod meeting;
pub mod user;
pub mod webhook;

#[cfg(test)]
pub(crate) mod test_support;
