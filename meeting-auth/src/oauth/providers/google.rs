//! Google service-account grant (RFC 7523 JWT bearer assertion), used for FCM.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{oauth_error, Error, ErrorKind, OAuthErrorKind};
use crate::oauth::token::{AccessToken, TokenSource};

pub const FIREBASE_MESSAGING_SCOPE: &str = "https://www.googleapis.com/auth/firebase.messaging";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// The fields of a downloaded service-account key file that the grant needs.
#[derive(Deserialize)]
pub struct ServiceAccountKey {
    pub project_id: String,
    pub client_email: String,
    pub private_key: SecretString,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

fn invalid_credentials<E>(err: E) -> Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    Error {
        source: Some(Box::new(err)),
        error_kind: ErrorKind::OAuth(OAuthErrorKind::InvalidCredentials),
    }
}

impl ServiceAccountKey {
    pub fn from_json(raw: &str) -> Result<Self, Error> {
        serde_json::from_str(raw).map_err(invalid_credentials)
    }
}

#[derive(Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

pub struct ServiceAccountSource {
    http: reqwest::Client,
    key: ServiceAccountKey,
    scope: String,
}

impl ServiceAccountSource {
    pub fn new(http: reqwest::Client, key: ServiceAccountKey, scope: &str) -> Self {
        Self {
            http,
            key,
            scope: scope.to_string(),
        }
    }

    pub fn project_id(&self) -> &str {
        &self.key.project_id
    }

    fn signed_assertion(&self) -> Result<String, Error> {
        let iat = Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope: &self.scope,
            aud: &self.key.token_uri,
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };

        let signing_key =
            EncodingKey::from_rsa_pem(self.key.private_key.expose_secret().as_bytes())
                .map_err(invalid_credentials)?;

        encode(&Header::new(Algorithm::RS256), &claims, &signing_key).map_err(invalid_credentials)
    }
}

#[async_trait]
impl TokenSource for ServiceAccountSource {
    async fn fetch_token(&self) -> Result<AccessToken, Error> {
        let assertion = self.signed_assertion()?;

        let response = self
            .http
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Google token exchange rejected: {body}");
            return Err(oauth_error(
                OAuthErrorKind::TokenExchangeFailed {
                    status: status.as_u16(),
                },
                &body,
            ));
        }

        let token: TokenResponse = response.json().await?;
        Ok(AccessToken {
            value: SecretString::from(token.access_token),
            expires_in: Duration::try_seconds(token.expires_in).unwrap_or_else(Duration::zero),
        })
    }

    fn name(&self) -> &str {
        "google_service_account"
    }
}
