use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use domain::error::{
    DomainErrorKind, EntityErrorKind, Error as DomainError, ExternalErrorKind, InternalErrorKind,
};

use log::*;

pub type Result<T> = core::result::Result<T, Error>;

/// One rejected input field, reported back in the `details` array.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug)]
pub enum Error {
    Domain(DomainError),
    Validation(Vec<FieldError>),
    Forbidden,
    Unauthorized,
}

impl StdError for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<FieldError>>,
}

fn error_response(status: StatusCode, error: String, details: Option<Vec<FieldError>>) -> Response {
    let body = ErrorBody {
        success: false,
        error,
        details,
    };
    (status, Json(body)).into_response()
}

fn domain_status(err: &DomainError) -> (StatusCode, String) {
    match &err.error_kind {
        DomainErrorKind::Internal(internal_error_kind) => match internal_error_kind {
            InternalErrorKind::Entity(entity_error_kind) => match entity_error_kind {
                EntityErrorKind::NotFound => (StatusCode::NOT_FOUND, err.to_string()),
                EntityErrorKind::Invalid(message) => (StatusCode::BAD_REQUEST, message.clone()),
                EntityErrorKind::Conflict(message) => (StatusCode::CONFLICT, message.clone()),
                EntityErrorKind::DbTransaction | EntityErrorKind::Other(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                ),
            },
            InternalErrorKind::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            InternalErrorKind::Other(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        },
        DomainErrorKind::External(external_error_kind) => match external_error_kind {
            ExternalErrorKind::Timeout => (
                StatusCode::GATEWAY_TIMEOUT,
                "Upstream request timed out".to_string(),
            ),
            ExternalErrorKind::Auth => (
                StatusCode::BAD_GATEWAY,
                "Upstream authentication failed".to_string(),
            ),
            ExternalErrorKind::Api { .. } => (StatusCode::BAD_GATEWAY, err.to_string()),
            ExternalErrorKind::Network | ExternalErrorKind::Other(_) => (
                StatusCode::BAD_GATEWAY,
                "Upstream service unavailable".to_string(),
            ),
        },
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::Domain(err) => {
                let (status, message) = domain_status(&err);
                if status.is_server_error() {
                    error!("{status}: {err:?}");
                } else {
                    debug!("{status}: {err}");
                }
                error_response(status, message, None)
            }
            Error::Validation(details) => error_response(
                StatusCode::BAD_REQUEST,
                "Validation failed".to_string(),
                Some(details),
            ),
            Error::Forbidden => error_response(StatusCode::FORBIDDEN, "Forbidden".to_string(), None),
            Error::Unauthorized => {
                error_response(StatusCode::UNAUTHORIZED, "Unauthorized".to_string(), None)
            }
        }
    }
}

impl<E> From<E> for Error
where
    E: Into<DomainError>,
{
    fn from(err: E) -> Self {
        Self::Domain(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::{json, Value};

    async fn render(err: Error) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn missing_configuration_names_the_variable() {
        let (status, body) = render(DomainError::config("ZOOM_ACCOUNT_ID").into()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("ZOOM_ACCOUNT_ID"));
    }

    #[tokio::test]
    async fn upstream_api_error_keeps_provider_message() {
        let (status, body) = render(DomainError::upstream(404, "User does not exist").into()).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("User does not exist"));
    }

    #[tokio::test]
    async fn entity_errors_map_to_client_statuses() {
        assert_eq!(
            render(DomainError::not_found().into()).await.0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            render(DomainError::invalid("duration out of range").into())
                .await
                .0,
            StatusCode::BAD_REQUEST
        );

        let (status, body) =
            render(DomainError::conflict("Cannot change meeting status from ended to started").into())
                .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(
            body["error"],
            "Cannot change meeting status from ended to started"
        );
    }

    #[tokio::test]
    async fn validation_lists_field_details() {
        let (status, body) =
            render(Error::Validation(vec![FieldError::new("role", "role must be 0 or 1")])).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({
                "success": false,
                "error": "Validation failed",
                "details": [{"field": "role", "message": "role must be 0 or 1"}]
            })
        );
    }

    #[tokio::test]
    async fn forbidden_has_no_details() {
        let (status, body) = render(Error::Forbidden).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, json!({"success": false, "error": "Forbidden"}));
    }
}
