//! Zoom webhook events: the endpoint URL challenge and meeting status updates.
//!
//! Only a missing secret on the URL challenge is reported as an error the caller must
//! surface. Anything else that cannot be processed comes back as [`Outcome::Ignored`] or
//! as an error the caller logs, so Zoom always gets a 200 and does not retry.

use crate::error::{DomainErrorKind, EntityErrorKind, Error, InternalErrorKind};
use crate::gateway::zoom;
use crate::{meeting, meeting_status::MeetingStatus, meetings};
use log::*;
use meeting_auth::webhook::{encrypt_plain_token, WebhookValidator, ZoomWebhookValidator};
use sea_orm::DatabaseConnection;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const SECRET_TOKEN_VAR: &str = "ZOOM_WEBHOOK_SECRET_TOKEN";
pub const URL_VALIDATION_EVENT: &str = "endpoint.url_validation";

#[derive(Debug, Deserialize)]
struct Event {
    event: String,
    #[serde(default)]
    payload: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct UrlValidationPayload {
    #[serde(rename = "plainToken")]
    plain_token: String,
}

#[derive(Debug, Deserialize)]
struct MeetingPayload {
    object: MeetingObject,
}

#[derive(Debug, Deserialize)]
struct MeetingObject {
    #[serde(deserialize_with = "zoom::meeting_id")]
    id: String,
}

/// Answer to the `endpoint.url_validation` challenge.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlValidation {
    pub plain_token: String,
    pub encrypted_token: String,
}

#[derive(Debug, PartialEq)]
pub enum Outcome {
    UrlValidation(UrlValidation),
    StatusChanged(meetings::Model),
    /// Nothing was done; carries the reason for the log.
    Ignored(String),
}

fn ignored(reason: impl Into<String>) -> Outcome {
    let reason = reason.into();
    warn!("Ignoring Zoom webhook delivery: {reason}");
    Outcome::Ignored(reason)
}

/// Processes one webhook delivery. `headers` must use lowercase names and `body` must be
/// the raw request body, since the signature covers its exact bytes.
pub async fn handle(
    db: &DatabaseConnection,
    secret: Option<String>,
    headers: &HashMap<String, String>,
    body: &[u8],
) -> Result<Outcome, Error> {
    let event: Event = match serde_json::from_slice(body) {
        Ok(event) => event,
        Err(err) => return Ok(ignored(format!("unparseable body: {err}"))),
    };
    let secret = secret.map(SecretString::from);

    if event.event == URL_VALIDATION_EVENT {
        let secret = secret.ok_or_else(|| {
            error!("Cannot answer Zoom URL validation: {SECRET_TOKEN_VAR} is not set");
            Error::config(SECRET_TOKEN_VAR)
        })?;
        let outcome = url_validation(&secret, event.payload)?;
        return Ok(outcome.unwrap_or_else(|| ignored("url_validation without plainToken")));
    }

    match &secret {
        Some(secret) => {
            let validator = ZoomWebhookValidator::new(secret.clone());
            match validator.validate(headers, body) {
                Ok(true) => {}
                Ok(false) => return Ok(ignored(format!("invalid signature on {}", event.event))),
                Err(err) => return Ok(ignored(format!("{err} on {}", event.event))),
            }
        }
        None => warn!(
            "{SECRET_TOKEN_VAR} is not set, processing {} without signature verification",
            event.event
        ),
    }

    let next = match event.event.as_str() {
        "meeting.started" => MeetingStatus::Started,
        "meeting.ended" => MeetingStatus::Ended,
        other => {
            debug!("Unhandled Zoom event {other}");
            return Ok(Outcome::Ignored(format!("unhandled event {other}")));
        }
    };

    let payload: MeetingPayload = match serde_json::from_value(event.payload) {
        Ok(payload) => payload,
        Err(err) => return Ok(ignored(format!("{} without meeting id: {err}", event.event))),
    };

    let meeting = match meeting::find_by_zoom_meeting_id(db, &payload.object.id).await {
        Ok(meeting) => meeting,
        Err(Error {
            error_kind:
                DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::NotFound)),
            ..
        }) => return Ok(ignored(format!("unknown Zoom meeting {}", payload.object.id))),
        Err(err) => return Err(err),
    };

    let updated = meeting::transition(db, meeting, next).await?;
    info!(
        "Meeting {} (Zoom {}) is now {}",
        updated.id, updated.zoom_meeting_id, updated.status
    );
    Ok(Outcome::StatusChanged(updated))
}

fn url_validation(
    secret: &SecretString,
    payload: serde_json::Value,
) -> Result<Option<Outcome>, Error> {
    let Ok(payload) = serde_json::from_value::<UrlValidationPayload>(payload) else {
        return Ok(None);
    };

    let encrypted_token = encrypt_plain_token(secret, &payload.plain_token)?;
    debug!("Answered Zoom URL validation challenge");

    Ok(Some(Outcome::UrlValidation(UrlValidation {
        plain_token: payload.plain_token,
        encrypted_token,
    })))
}


#[cfg(test)]
#[cfg(feature = "mock")]
mod mock_tests {
    use super::*;
    use crate::{meeting_type::MeetingType, Id};
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn meeting(status: MeetingStatus) -> meetings::Model {
        let now = chrono::Utc::now();
        meetings::Model {
            id: Id::new_v4(),
            zoom_meeting_id: "85746065432".to_string(),
            host_user_id: Id::new_v4(),
            title: "Contract Call".to_string(),
            password: None,
            join_url: None,
            start_time: None,
            duration: 60,
            meeting_type: MeetingType::Instant,
            status,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn meeting_started_event_moves_created_meeting_to_started() {
        let body = r#"{"event":"meeting.started","payload":{"object":{"id":85746065432}}}"#;
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![
                vec![meeting(MeetingStatus::Created)],
                vec![meeting(MeetingStatus::Started)],
            ])
            .into_connection();

        let outcome = handle(&db, None, &HashMap::new(), body.as_bytes())
            .await
            .unwrap();

        assert!(
            matches!(outcome, Outcome::StatusChanged(m) if m.status == MeetingStatus::Started)
        );
    }

    #[tokio::test]
    async fn event_for_unknown_meeting_is_ignored() {
        let body = r#"{"event":"meeting.ended","payload":{"object":{"id":"999"}}}"#;
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<meetings::Model>::new()])
            .into_connection();

        let outcome = handle(&db, None, &HashMap::new(), body.as_bytes())
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Ignored("unknown Zoom meeting 999".to_string()));
    }

    #[tokio::test]
    async fn late_start_after_end_is_rejected() {
        let body = r#"{"event":"meeting.started","payload":{"object":{"id":85746065432}}}"#;
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![meeting(MeetingStatus::Ended)]])
            .into_connection();

        let err = handle(&db, None, &HashMap::new(), body.as_bytes())
            .await
            .unwrap_err();

        assert!(!err.is_config());
    }
}
