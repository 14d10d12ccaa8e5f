//! Application states, users and tokens shared by this crate's tests.

use crate::AppState;
use chrono::Utc;
use clap::Parser;
use domain::gateway::Gateways;
use domain::{roles::Role, users, Id};
use sea_orm::DatabaseConnection;
use service::config::Config;
use std::sync::Arc;

pub(crate) const AUTH_SECRET: &str = "test-auth-secret";

/// Every provider pointed at `base`, Zoom credentials set, no SendGrid or Firebase.
pub(crate) fn config(base: &str) -> Config {
    Config::parse_from([
        "dealflow".to_string(),
        "--auth-jwt-secret".to_string(),
        AUTH_SECRET.to_string(),
        "--zoom-oauth-token-url".to_string(),
        format!("{base}/oauth/token"),
        "--zoom-api-base-url".to_string(),
        format!("{base}/v2"),
        "--zoom-account-id".to_string(),
        "acct-42".to_string(),
        "--zoom-s2s-client-id".to_string(),
        "client".to_string(),
        "--zoom-s2s-client-secret".to_string(),
        "secret".to_string(),
        "--zoom-sdk-client-id".to_string(),
        "sdk-key".to_string(),
        "--zoom-sdk-client-secret".to_string(),
        "sdk-secret".to_string(),
        "--zoom-host-email".to_string(),
        "host@dealflow.dev".to_string(),
        "--zoom-webhook-secret-token".to_string(),
        "whsec_test".to_string(),
    ])
}

pub(crate) fn app_state_with(config: Config, db: DatabaseConnection) -> AppState {
    let gateways = Gateways::new(&config).unwrap();
    let service_state = service::AppState::new(config, &Arc::new(db));
    AppState::new(service_state, gateways)
}

/// A state whose database is never reached.
pub(crate) fn app_state(base: &str) -> AppState {
    app_state_with(config(base), DatabaseConnection::Disconnected)
}

pub(crate) fn user(role: Role) -> users::Model {
    let now = Utc::now();
    users::Model {
        id: Id::new_v4(),
        email: format!("{role}@example.com"),
        name: Some(format!("Test {role}")),
        role,
        fcm_token: None,
        fcm_platform: None,
        fcm_updated_at: None,
        created_at: now.into(),
        updated_at: now.into(),
    }
}
