//! Clients for the third-party APIs DealFlow calls.

use crate::error::Error;
use log::*;
use meeting_auth::http::HttpClientBuilder;
use reqwest::header::HeaderMap;
use service::config::Config;

pub mod fcm;
pub mod sendgrid;
pub mod zoom;

/// Every provider client the request handlers need, built once at startup.
pub struct Gateways {
    pub zoom: zoom::Client,
    /// `None` when SendGrid is not configured; contract emails are then skipped.
    pub email: Option<sendgrid::Client>,
    /// `None` when Firebase is not configured; push notifications are then skipped.
    pub push: Option<fcm::Client>,
}

impl Gateways {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let zoom = zoom::Client::new(config)?;

        let email = match sendgrid::Client::new(config) {
            Ok(client) => Some(client),
            Err(err) if err.is_config() => {
                warn!("Contract emails are disabled: {err}");
                None
            }
            Err(err) => return Err(err),
        };

        let push = fcm::Client::from_config(config)?;
        if push.is_none() {
            warn!("Push notifications are disabled: FIREBASE_SERVICE_ACCOUNT_KEY is not set");
        }

        Ok(Self { zoom, email, push })
    }
}

/// A client with the configured timeouts and the given default headers.
pub(crate) fn http_client(config: &Config, headers: HeaderMap) -> Result<reqwest::Client, Error> {
    Ok(HttpClientBuilder::new()
        .with_timeout(config.http_timeout())
        .with_connect_timeout(config.http_connect_timeout())
        .with_user_agent(format!("dealflow/{}", env!("CARGO_PKG_VERSION")))
        .with_default_headers(headers)
        .build()?)
}

/// Turns a non-success provider response into an upstream API error, keeping the
/// provider's own message when the body carries one.
pub(crate) async fn upstream_error(provider: &str, response: reqwest::Response) -> Error {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    warn!("{provider} API error: {status} - {body}");

    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|json| {
            json.get("message")
                .or_else(|| json.pointer("/error/message"))
                .or_else(|| json.pointer("/errors/0/message"))
                .and_then(|message| message.as_str())
                .map(str::to_string)
        })
        .unwrap_or(body);

    Error::upstream(status, message)
}
