//! Zoom Server-to-Server OAuth (`account_credentials` grant).

use async_trait::async_trait;
use chrono::Duration;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::warn;

use crate::error::{config_error, oauth_error, Error, OAuthErrorKind};
use crate::oauth::token::{AccessToken, TokenSource};

pub const ACCOUNT_ID_VAR: &str = "ZOOM_ACCOUNT_ID";
pub const CLIENT_ID_VAR: &str = "ZOOM_S2S_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "ZOOM_S2S_CLIENT_SECRET";

/// Credentials of a Zoom Server-to-Server OAuth app. Any of them may be absent;
/// the exchange then fails naming the first missing variable.
#[derive(Clone, Default)]
pub struct AccountCredentials {
    pub account_id: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<SecretString>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

pub struct AccountCredentialsSource {
    http: reqwest::Client,
    token_url: String,
    credentials: AccountCredentials,
}

impl AccountCredentialsSource {
    pub fn new(http: reqwest::Client, token_url: &str, credentials: AccountCredentials) -> Self {
        Self {
            http,
            token_url: token_url.to_string(),
            credentials,
        }
    }
}

#[async_trait]
impl TokenSource for AccountCredentialsSource {
    async fn fetch_token(&self) -> Result<AccessToken, Error> {
        let account_id = self
            .credentials
            .account_id
            .as_deref()
            .ok_or_else(|| config_error(ACCOUNT_ID_VAR))?;
        let client_id = self
            .credentials
            .client_id
            .as_deref()
            .ok_or_else(|| config_error(CLIENT_ID_VAR))?;
        let client_secret = self
            .credentials
            .client_secret
            .as_ref()
            .ok_or_else(|| config_error(CLIENT_SECRET_VAR))?;

        let response = self
            .http
            .post(&self.token_url)
            .basic_auth(client_id, Some(client_secret.expose_secret()))
            .query(&[
                ("grant_type", "account_credentials"),
                ("account_id", account_id),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Zoom token exchange rejected: {body}");
            return Err(oauth_error(
                OAuthErrorKind::TokenExchangeFailed {
                    status: status.as_u16(),
                },
                &body,
            ));
        }

        let token: TokenResponse = response.json().await?;
        let expires_in = match Duration::try_seconds(token.expires_in) {
            Some(lifetime) if lifetime > Duration::zero() => lifetime,
            _ => {
                warn!(
                    expires_in = token.expires_in,
                    "Zoom token endpoint returned an unusable expires_in, token will not be reused"
                );
                Duration::zero()
            }
        };
        Ok(AccessToken {
            value: SecretString::from(token.access_token),
            expires_in,
        })
    }

    fn name(&self) -> &str {
        "zoom_s2s"
    }
}
