//! Zoom REST API client: meeting creation and ZAK tokens.
//!
//! Requests are authorized with a Server-to-Server OAuth token held in a
//! [`TokenCache`]. A 401 from the API drops the cached token so the next call
//! performs a fresh exchange.

use super::{http_client, upstream_error};
use crate::error::{DomainErrorKind, Error, ExternalErrorKind};
use log::*;
use meeting_auth::oauth::providers::zoom::{AccountCredentials, AccountCredentialsSource};
use meeting_auth::oauth::token::TokenCache;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize};
use service::config::Config;

pub const HOST_EMAIL_VAR: &str = "ZOOM_HOST_EMAIL";

/// Body of `POST /users/me/meetings`.
#[derive(Debug, Serialize)]
pub struct CreateMeetingRequest {
    pub topic: String,
    /// 1 = instant, 2 = scheduled.
    #[serde(rename = "type")]
    pub meeting_type: u8,
    /// `yyyy-MM-ddTHH:mm:ssZ`, only for scheduled meetings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    pub duration: i32,
    pub settings: MeetingSettings,
}

#[derive(Debug, Serialize)]
pub struct MeetingSettings {
    pub waiting_room: bool,
    pub join_before_host: bool,
}

#[derive(Debug, Deserialize)]
pub struct MeetingResponse {
    #[serde(deserialize_with = "meeting_id")]
    pub id: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub join_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ZakResponse {
    token: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawMeetingId {
    Number(u64),
    Text(String),
}

/// Zoom sends meeting ids as JSON numbers in some payloads and strings in others.
pub fn meeting_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawMeetingId::deserialize(deserializer)? {
        RawMeetingId::Number(id) => id.to_string(),
        RawMeetingId::Text(id) => id,
    })
}

pub struct Client {
    http: reqwest::Client,
    api_base_url: String,
    host_email: Option<String>,
    tokens: TokenCache<AccountCredentialsSource>,
}

impl Client {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let http = http_client(config, HeaderMap::new())?;

        let credentials = AccountCredentials {
            account_id: config.zoom_account_id(),
            client_id: config.zoom_s2s_client_id(),
            client_secret: config.zoom_s2s_client_secret().map(SecretString::from),
        };
        let source =
            AccountCredentialsSource::new(http.clone(), config.zoom_oauth_token_url(), credentials);

        Ok(Self {
            http,
            api_base_url: config.zoom_api_base_url().to_string(),
            host_email: config.zoom_host_email(),
            tokens: TokenCache::new(source, config.zoom_token_expiry_margin()),
        })
    }

    pub fn host_email(&self) -> Option<&str> {
        self.host_email.as_deref()
    }

    /// Creates a meeting owned by the Server-to-Server app's user.
    pub async fn create_meeting(
        &self,
        request: &CreateMeetingRequest,
    ) -> Result<MeetingResponse, Error> {
        let url = format!("{}/users/me/meetings", self.api_base_url);
        debug!("Creating Zoom meeting \"{}\"", request.topic);

        let response = self.send(self.http.post(&url).json(request)).await?;
        let meeting: MeetingResponse = response.json().await?;

        info!("Created Zoom meeting {}", meeting.id);
        Ok(meeting)
    }

    /// ZAK token of `email`, used by the SDK to start meetings as that user.
    pub async fn zak_token(&self, email: &str) -> Result<String, Error> {
        let url = format!(
            "{}/users/{}/token",
            self.api_base_url,
            urlencoding::encode(email)
        );

        let response = self
            .send(self.http.get(&url).query(&[("type", "zak")]))
            .await?;
        let zak: ZakResponse = response.json().await?;

        Ok(zak.token)
    }

    /// ZAK token of the configured host user.
    pub async fn host_zak_token(&self) -> Result<String, Error> {
        let email = self.host_email().ok_or_else(|| Error::config(HOST_EMAIL_VAR))?;
        self.zak_token(email).await
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, Error> {
        let token = self.tokens.get_token().await?;
        let response = request.bearer_auth(token.expose_secret()).send().await?;

        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::UNAUTHORIZED => {
                warn!("Zoom rejected the access token, dropping it from the cache");
                self.tokens.invalidate().await;
                Err(Error {
                    source: Some(Box::new(upstream_error("Zoom", response).await)),
                    error_kind: DomainErrorKind::External(ExternalErrorKind::Auth),
                })
            }
            _ => Err(upstream_error("Zoom", response).await),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{mock_zoom_token, zoom_config};
    use mockito::Matcher;

    fn instant_request() -> CreateMeetingRequest {
        CreateMeetingRequest {
            topic: "Demo".to_string(),
            meeting_type: 1,
            start_time: None,
            duration: 30,
            settings: MeetingSettings {
                waiting_room: false,
                join_before_host: true,
            },
        }
    }

    #[test]
    fn instant_request_omits_start_time() {
        let json = serde_json::to_value(instant_request()).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "topic": "Demo",
                "type": 1,
                "duration": 30,
                "settings": { "waiting_room": false, "join_before_host": true }
            })
        );
    }

    #[tokio::test]
    async fn numeric_meeting_id_is_normalized_to_a_string() {
        let mut server = mockito::Server::new_async().await;
        let token = mock_zoom_token(&mut server, 1).await;
        let meeting = server
            .mock("POST", "/v2/users/me/meetings")
            .match_header("authorization", "Bearer zoom-token")
            .match_body(Matcher::PartialJson(serde_json::json!({"topic": "Demo", "type": 1})))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":85746065432,"password":"abc","join_url":"https://zoom.us/j/85746065432"}"#)
            .create_async()
            .await;

        let client = Client::new(&zoom_config(&server.url())).unwrap();
        let created = client.create_meeting(&instant_request()).await.unwrap();

        assert_eq!(created.id, "85746065432");
        assert_eq!(created.password.as_deref(), Some("abc"));
        token.assert_async().await;
        meeting.assert_async().await;
    }

    #[tokio::test]
    async fn rejected_token_is_dropped_and_refetched() {
        let mut server = mockito::Server::new_async().await;
        let token = mock_zoom_token(&mut server, 2).await;
        let _meeting = server
            .mock("POST", "/v2/users/me/meetings")
            .with_status(401)
            .with_body(r#"{"code":124,"message":"Invalid access token."}"#)
            .expect(2)
            .create_async()
            .await;

        let client = Client::new(&zoom_config(&server.url())).unwrap();
        let err = client.create_meeting(&instant_request()).await.unwrap_err();
        assert_eq!(err.error_kind, DomainErrorKind::External(ExternalErrorKind::Auth));

        client.create_meeting(&instant_request()).await.unwrap_err();
        token.assert_async().await;
    }

    #[tokio::test]
    async fn zak_request_encodes_the_host_email() {
        let mut server = mockito::Server::new_async().await;
        let _token = mock_zoom_token(&mut server, 1).await;
        let zak = server
            .mock("GET", "/v2/users/host%2Bsales%40dealflow.dev/token")
            .match_query(Matcher::UrlEncoded("type".into(), "zak".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"token":"zak-123"}"#)
            .create_async()
            .await;

        let client = Client::new(&zoom_config(&server.url())).unwrap();

        assert_eq!(client.host_zak_token().await.unwrap(), "zak-123");
        zak.assert_async().await;
    }

    #[tokio::test]
    async fn zak_without_host_email_is_a_configuration_error() {
        use clap::Parser;

        let config = Config::parse_from(["dealflow", "--zoom-api-base-url", "http://127.0.0.1:9"]);
        let client = Client::new(&config).unwrap();

        let err = client.host_zak_token().await.unwrap_err();
        assert!(err.is_config());
        assert_eq!(err.to_string(), "Missing configuration: ZOOM_HOST_EMAIL is not set");
    }

    #[tokio::test]
    async fn missing_credentials_fail_naming_the_variable() {
        use clap::Parser;

        let config = Config::parse_from(["dealflow", "--zoom-oauth-token-url", "http://127.0.0.1:9"]);
        let client = Client::new(&config).unwrap();

        let err = client.create_meeting(&instant_request()).await.unwrap_err();
        assert_eq!(err.to_string(), "Missing configuration: ZOOM_ACCOUNT_ID is not set");
    }
}
