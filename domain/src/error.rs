//! Error types for the `domain` layer.
use entity_api::error::{EntityApiErrorKind, Error as EntityApiError};
use meeting_auth::error::{
    Error as MeetingAuthError, ErrorKind as MeetingAuthErrorKind, HttpErrorKind,
};
use std::error::Error as StdError;
use std::fmt;

/// Top-level domain error type.
/// Errors in the Domain layer are modeled as a tree with `domain::error::Error` at the
/// root, holding an `error_kind` that says what went wrong in this layer or a lower
/// one, plus the underlying `source` for logging. `web` depends on `domain` only and turns
/// the kinds into HTTP status codes; it never looks at `entity_api` or `meeting_auth`.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: DomainErrorKind,
}

/// Enum representing the major categories of errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum DomainErrorKind {
    Internal(InternalErrorKind),
    External(ExternalErrorKind),
}

#[derive(Debug, PartialEq)]
pub enum InternalErrorKind {
    Entity(EntityErrorKind),
    /// A required setting is missing. Carries the environment variable name.
    Config(String),
    Other(String),
}

/// Entity errors reduced to what callers of the domain care about.
#[derive(Debug, PartialEq)]
pub enum EntityErrorKind {
    NotFound,
    /// Input the domain refuses to act on.
    Invalid(String),
    /// The requested change is not allowed from the record's current state.
    Conflict(String),
    DbTransaction,
    Other(String),
}

/// Failures talking to Zoom, SendGrid, FCM or Google OAuth.
#[derive(Debug, PartialEq)]
pub enum ExternalErrorKind {
    Network,
    Timeout,
    /// The provider refused our credentials.
    Auth,
    /// The provider answered with a non-success status.
    Api { status: u16, message: String },
    Other(String),
}

impl Error {
    pub fn config(var: &str) -> Self {
        Error {
            source: None,
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Config(var.to_string())),
        }
    }

    pub fn not_found() -> Self {
        Error {
            source: None,
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(
                EntityErrorKind::NotFound,
            )),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Error {
            source: None,
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(
                EntityErrorKind::Invalid(message.into()),
            )),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Error {
            source: None,
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(
                EntityErrorKind::Conflict(message.into()),
            )),
        }
    }

    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        Error {
            source: None,
            error_kind: DomainErrorKind::External(ExternalErrorKind::Api {
                status,
                message: message.into(),
            }),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Error {
            source: None,
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(message.into())),
        }
    }

    pub fn is_config(&self) -> bool {
        matches!(
            self.error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Config(_))
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self.error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::NotFound))
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.error_kind {
            DomainErrorKind::Internal(InternalErrorKind::Config(var)) => {
                write!(f, "Missing configuration: {var} is not set")
            }
            DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::NotFound)) => {
                write!(f, "Resource not found")
            }
            DomainErrorKind::Internal(InternalErrorKind::Entity(
                EntityErrorKind::Conflict(message) | EntityErrorKind::Invalid(message),
            )) => write!(f, "{message}"),
            DomainErrorKind::External(ExternalErrorKind::Api { status, message }) => {
                write!(f, "Upstream API error ({status}): {message}")
            }
            _ => write!(f, "Domain Error: {:?}", self.error_kind),
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

// This is where we translate errors from the `entity_api` layer to the `domain` layer.
impl From<EntityApiError> for Error {
    fn from(err: EntityApiError) -> Self {
        let entity_error_kind = match err.error_kind {
            EntityApiErrorKind::RecordNotFound => EntityErrorKind::NotFound,
            EntityApiErrorKind::SystemError => EntityErrorKind::DbTransaction,
            EntityApiErrorKind::RecordNotUpdated => {
                EntityErrorKind::Other("Record not updated".to_string())
            }
        };

        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(entity_error_kind)),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        // Builder errors happen before any network call is made.
        let error_kind = if err.is_builder() {
            DomainErrorKind::Internal(InternalErrorKind::Other(
                "Failed to build reqwest client".to_string(),
            ))
        } else if err.is_timeout() {
            DomainErrorKind::External(ExternalErrorKind::Timeout)
        } else if err.is_decode() {
            DomainErrorKind::External(ExternalErrorKind::Other(
                "Unexpected response body".to_string(),
            ))
        } else {
            DomainErrorKind::External(ExternalErrorKind::Network)
        };

        Error {
            source: Some(Box::new(err)),
            error_kind,
        }
    }
}

impl From<jsonwebtoken::errors::Error> for Error {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
                "JWT encoding related error".to_string(),
            )),
        }
    }
}

impl From<MeetingAuthError> for Error {
    fn from(err: MeetingAuthError) -> Self {
        let error_kind = match &err.error_kind {
            MeetingAuthErrorKind::Config(var) => {
                DomainErrorKind::Internal(InternalErrorKind::Config(var.clone()))
            }
            MeetingAuthErrorKind::OAuth(_) => DomainErrorKind::External(ExternalErrorKind::Auth),
            MeetingAuthErrorKind::Http(HttpErrorKind::Timeout) => {
                DomainErrorKind::External(ExternalErrorKind::Timeout)
            }
            MeetingAuthErrorKind::Http(HttpErrorKind::Network) => {
                DomainErrorKind::External(ExternalErrorKind::Network)
            }
            MeetingAuthErrorKind::Http(HttpErrorKind::BuilderFailed)
            | MeetingAuthErrorKind::Webhook(_) => {
                DomainErrorKind::Internal(InternalErrorKind::Other(err.to_string()))
            }
        };
        Error {
            source: Some(Box::new(err)),
            error_kind,
        }
    }
}
