//! Firebase Cloud Messaging HTTP v1 client.

use super::{http_client, upstream_error};
use crate::error::{DomainErrorKind, Error, InternalErrorKind};
use log::*;
use meeting_auth::oauth::providers::google::{
    ServiceAccountKey, ServiceAccountSource, FIREBASE_MESSAGING_SCOPE,
};
use meeting_auth::oauth::token::TokenCache;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use service::config::Config;
use std::collections::BTreeMap;
use std::time::Duration;

pub const SERVICE_ACCOUNT_VAR: &str = "FIREBASE_SERVICE_ACCOUNT_KEY";

// Google tokens live an hour; refresh a minute early.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

pub struct Client {
    http: reqwest::Client,
    base_url: String,
    project_id: String,
    tokens: TokenCache<ServiceAccountSource>,
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    message: &'a Message,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    name: String,
}

/// A push notification addressed to one device.
#[derive(Debug, Serialize)]
pub struct Message {
    pub token: String,
    pub notification: Notification,
    /// FCM data values must be strings.
    pub data: BTreeMap<String, String>,
    pub android: AndroidConfig,
    pub apns: ApnsConfig,
}

#[derive(Debug, Serialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Serialize)]
pub struct AndroidConfig {
    pub priority: String,
    pub notification: AndroidNotification,
}

#[derive(Debug, Serialize)]
pub struct AndroidNotification {
    pub sound: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub click_action: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ApnsConfig {
    pub payload: ApnsPayload,
}

#[derive(Debug, Serialize)]
pub struct ApnsPayload {
    pub aps: Aps,
}

#[derive(Debug, Serialize)]
pub struct Aps {
    pub sound: String,
    pub badge: u32,
}

impl Message {
    /// High priority on Android, default sound and a badge of 1 on iOS.
    pub fn new(
        token: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
        data: BTreeMap<String, String>,
    ) -> Self {
        Self {
            token: token.into(),
            notification: Notification {
                title: title.into(),
                body: body.into(),
            },
            data,
            android: AndroidConfig {
                priority: "HIGH".to_string(),
                notification: AndroidNotification {
                    sound: "default".to_string(),
                    click_action: None,
                },
            },
            apns: ApnsConfig {
                payload: ApnsPayload {
                    aps: Aps {
                        sound: "default".to_string(),
                        badge: 1,
                    },
                },
            },
        }
    }

    pub fn with_click_action(mut self, action: impl Into<String>) -> Self {
        self.android.notification.click_action = Some(action.into());
        self
    }
}

impl Client {
    /// `None` when Firebase is not configured. A key that is set but unreadable is
    /// a configuration error.
    pub fn from_config(config: &Config) -> Result<Option<Self>, Error> {
        let Some(raw_key) = config.firebase_service_account_key() else {
            return Ok(None);
        };

        let key = ServiceAccountKey::from_json(&raw_key).map_err(|err| {
            warn!("Failed to parse Firebase service account key: {err}");
            Error {
                source: Some(Box::new(err)),
                error_kind: DomainErrorKind::Internal(InternalErrorKind::Config(
                    SERVICE_ACCOUNT_VAR.to_string(),
                )),
            }
        })?;

        let http = http_client(config, HeaderMap::new())?;
        let project_id = key.project_id.clone();
        let source = ServiceAccountSource::new(http.clone(), key, FIREBASE_MESSAGING_SCOPE);

        Ok(Some(Self {
            http,
            base_url: config.fcm_base_url().to_string(),
            project_id,
            tokens: TokenCache::new(source, TOKEN_EXPIRY_MARGIN),
        }))
    }

    /// Sends `message` and returns the FCM message name.
    pub async fn send(&self, message: &Message) -> Result<String, Error> {
        let url = format!(
            "{}/projects/{}/messages:send",
            self.base_url, self.project_id
        );
        let token = self.tokens.get_token().await?;

        let response = self
            .http
            .post(&url)
            .bearer_auth(token.expose_secret())
            .json(&SendRequest { message })
            .send()
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            warn!("FCM rejected the access token, dropping it from the cache");
            self.tokens.invalidate().await;
        }
        if !response.status().is_success() {
            return Err(upstream_error("FCM", response).await);
        }

        let sent: SendResponse = response.json().await?;
        info!("Push notification sent: {}", sent.name);
        Ok(sent.name)
    }
}
