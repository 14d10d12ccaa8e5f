//! Zoom event deliveries.
//!
//! Processing failures are logged and acknowledged with 200. The URL validation challenge
//! without a configured secret is the only delivery answered with an error.

use crate::{AppState, Error};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use domain::webhook::{self as WebhookApi, Outcome};
use log::*;
use std::collections::HashMap;

/// Header names lowercased, values that are not valid UTF-8 dropped.
fn header_map(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_lowercase(), value.to_string()))
        })
        .collect()
}

/// POST receive a Zoom webhook event
#[utoipa::path(
    post,
    path = "/meetings/webhook",
    request_body(content = String, description = "Raw Zoom event notification", content_type = "application/json"),
    responses(
        (status = 200, description = "Event acknowledged, or the URL validation answer"),
        (status = 500, description = "ZOOM_WEBHOOK_SECRET_TOKEN is not configured")
    )
)]
pub async fn zoom(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let result = WebhookApi::handle(
        app_state.db_conn_ref(),
        app_state.config.zoom_webhook_secret_token(),
        &header_map(&headers),
        &body,
    )
    .await;

    match result {
        Ok(Outcome::UrlValidation(answer)) => {
            info!("Answered Zoom URL validation challenge");
            Json(answer).into_response()
        }
        Ok(Outcome::StatusChanged(meeting)) => {
            debug!("Webhook moved meeting {} to {}", meeting.id, meeting.status);
            StatusCode::OK.into_response()
        }
        Ok(Outcome::Ignored(reason)) => {
            trace!("Webhook ignored: {reason}");
            StatusCode::OK.into_response()
        }
        Err(err) if err.is_config() => Error::from(err).into_response(),
        Err(err) => {
            warn!("Failed to process Zoom webhook, acknowledging anyway: {err:?}");
            StatusCode::OK.into_response()
        }
    }
}
