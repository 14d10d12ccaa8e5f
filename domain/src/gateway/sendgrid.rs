use super::{http_client, upstream_error};
use crate::error::{DomainErrorKind, Error, InternalErrorKind};
use email_address::EmailAddress;
use log::*;
use serde::Serialize;
use service::config::Config;

pub const API_KEY_VAR: &str = "SENDGRID_API_KEY";
pub const FROM_EMAIL_VAR: &str = "SENDGRID_FROM_EMAIL";

/// SendGrid v3 client for transactional email.
pub struct Client {
    client: reqwest::Client,
    base_url: String,
    from: EmailContact,
}

/// An address with an optional display name.
#[derive(Debug, Clone, Serialize)]
pub struct EmailContact {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Personalization {
    pub to: Vec<EmailContact>,
}

#[derive(Debug, Serialize)]
pub struct Content {
    #[serde(rename = "type")]
    pub content_type: String,
    pub value: String,
}

/// Request payload for `POST /mail/send`.
#[derive(Debug, Serialize)]
pub struct SendEmailRequest {
    pub personalizations: Vec<Personalization>,
    pub from: EmailContact,
    pub subject: String,
    pub content: Vec<Content>,
}

#[derive(Debug)]
pub struct SendEmailResponse {
    pub message_id: Option<String>,
}

/// An email before it is addressed from the configured sender.
#[derive(Debug, Default)]
pub struct Email {
    pub to: String,
    pub to_name: Option<String>,
    pub subject: String,
    pub text: String,
    pub html: Option<String>,
}

impl Client {
    /// Fails with a configuration error when the API key or sender address is missing.
    pub fn new(config: &Config) -> Result<Self, Error> {
        let from_email = config.sendgrid_from_email().ok_or_else(|| {
            warn!("Failed to get SendGrid sender address from config");
            Error::config(FROM_EMAIL_VAR)
        })?;
        let headers = build_auth_headers(config)?;

        Ok(Self {
            client: http_client(config, headers)?,
            base_url: config.sendgrid_base_url().to_string(),
            from: EmailContact {
                email: from_email,
                name: Some("DealFlow".to_string()),
            },
        })
    }

    pub async fn send_email(&self, email: Email) -> Result<SendEmailResponse, Error> {
        if !is_valid_email(&email.to) {
            warn!("Invalid recipient email: {}", email.to);
            return Err(Error {
                source: None,
                error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(format!(
                    "Invalid recipient email address: {}",
                    email.to
                ))),
            });
        }

        let request = self.request_for(email);
        let url = format!("{}/mail/send", self.base_url);
        debug!("Email subject: {}", request.subject);

        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            return Err(upstream_error("SendGrid", response).await);
        }

        let message_id = response
            .headers()
            .get("x-message-id")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        info!("Email sent successfully, message_id: {:?}", message_id);

        Ok(SendEmailResponse { message_id })
    }

    fn request_for(&self, email: Email) -> SendEmailRequest {
        // SendGrid requires text/plain to come before text/html.
        let mut content = vec![Content {
            content_type: "text/plain".to_string(),
            value: email.text,
        }];
        if let Some(html) = email.html {
            content.push(Content {
                content_type: "text/html".to_string(),
                value: html,
            });
        }

        SendEmailRequest {
            personalizations: vec![Personalization {
                to: vec![EmailContact {
                    email: email.to,
                    name: email.to_name,
                }],
            }],
            from: self.from.clone(),
            subject: email.subject,
            content,
        }
    }
}

fn build_auth_headers(config: &Config) -> Result<reqwest::header::HeaderMap, Error> {
    let api_key = config.sendgrid_api_key().ok_or_else(|| {
        warn!("Failed to get SendGrid API key from config");
        Error::config(API_KEY_VAR)
    })?;

    let mut headers = reqwest::header::HeaderMap::new();
    let mut auth_header = reqwest::header::HeaderValue::from_str(&format!("Bearer {api_key}"))
        .map_err(|err| {
            warn!("Failed to create authorization header value: {err:?}");
            Error {
                source: Some(Box::new(err)),
                error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
                    "Failed to create authorization header value".to_string(),
                )),
            }
        })?;
    auth_header.set_sensitive(true);
    headers.insert(reqwest::header::AUTHORIZATION, auth_header);

    Ok(headers)
}

/// Validate email address format using email_address crate
pub fn is_valid_email(email: &str) -> bool {
    EmailAddress::is_valid(email)
}
