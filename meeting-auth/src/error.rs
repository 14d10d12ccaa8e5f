//! Error types for the `meeting-auth` crate.
//!
//! Same shape as `domain::error`: a root `Error` struct carrying a kind enum and an
//! optional source for chaining.

use std::error::Error as StdError;
use std::fmt;

#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: ErrorKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    /// A required setting is absent. Carries the variable name.
    Config(String),
    OAuth(OAuthErrorKind),
    Webhook(WebhookErrorKind),
    Http(HttpErrorKind),
}

#[derive(Debug, Clone, PartialEq)]
pub enum OAuthErrorKind {
    /// The token endpoint answered with a non-success status.
    TokenExchangeFailed { status: u16 },
    /// The token endpoint answered 2xx with a body we could not use.
    InvalidResponse,
    /// A signed assertion could not be produced from the configured key.
    InvalidCredentials,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WebhookErrorKind {
    InvalidSignature,
    MissingSignature,
    InvalidPayload,
    /// The request timestamp is outside the accepted window around now.
    StaleTimestamp,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HttpErrorKind {
    BuilderFailed,
    Timeout,
    Network,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.error_kind {
            ErrorKind::Config(var) => write!(f, "Missing configuration: {var} is not set"),
            ErrorKind::OAuth(kind) => write!(f, "OAuth error: {:?}", kind),
            ErrorKind::Webhook(kind) => write!(f, "Webhook error: {:?}", kind),
            ErrorKind::Http(kind) => write!(f, "HTTP error: {:?}", kind),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let error_kind = if err.is_builder() {
            ErrorKind::Http(HttpErrorKind::BuilderFailed)
        } else if err.is_timeout() {
            ErrorKind::Http(HttpErrorKind::Timeout)
        } else if err.is_decode() {
            ErrorKind::OAuth(OAuthErrorKind::InvalidResponse)
        } else {
            ErrorKind::Http(HttpErrorKind::Network)
        };

        Error {
            source: Some(Box::new(err)),
            error_kind,
        }
    }
}

/// Error for a required setting that is not configured.
pub fn config_error(variable: &str) -> Error {
    Error {
        source: None,
        error_kind: ErrorKind::Config(variable.to_string()),
    }
}

pub fn oauth_error(kind: OAuthErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: ErrorKind::OAuth(kind),
    }
}

pub fn webhook_error(kind: WebhookErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: ErrorKind::Webhook(kind),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_names_the_variable() {
        let err = config_error("ZOOM_ACCOUNT_ID");
        assert_eq!(err.error_kind, ErrorKind::Config("ZOOM_ACCOUNT_ID".to_string()));
        assert_eq!(
            err.to_string(),
            "Missing configuration: ZOOM_ACCOUNT_ID is not set"
        );
    }

    #[test]
    fn helper_errors_keep_their_message_as_source() {
        let err = oauth_error(OAuthErrorKind::TokenExchangeFailed { status: 401 }, "bad creds");
        assert_eq!(
            err.source.as_ref().map(|s| s.to_string()),
            Some("bad creds".to_string())
        );
    }
}
