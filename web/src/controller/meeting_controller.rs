use crate::controller::ApiResponse;
use crate::extractors::{
    authenticated_user::AuthenticatedUser, validated_json::ValidatedJson,
};
use crate::params::meeting::UpdateStatusParams;
use crate::{AppState, Error};
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use domain::{meeting as MeetingApi, Id};
use log::*;

/// GET all meetings hosted by the authenticated user, newest first
#[utoipa::path(
    get,
    path = "/meetings",
    responses(
        (status = 200, description = "Successfully retrieved the caller's meetings", body = [domain::meetings::Model]),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn index(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET all meetings hosted by {}", user.id);

    let meetings = MeetingApi::find_by_host(app_state.db_conn_ref(), user.id).await?;

    debug!("Found {} meetings", meetings.len());

    Ok(Json(ApiResponse::new(meetings)))
}

/// GET a meeting by its id
#[utoipa::path(
    get,
    path = "/meetings/{id}",
    params(
        ("id" = Uuid, Path, description = "Meeting id to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved a meeting", body = domain::meetings::Model),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Meeting not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn read(
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET meeting by id: {id}");

    let meeting = MeetingApi::find_by_id(app_state.db_conn_ref(), id).await?;

    Ok(Json(ApiResponse::new(meeting)))
}

/// GET a meeting by its Zoom meeting number
#[utoipa::path(
    get,
    path = "/meetings/zoom/{zoom_meeting_id}",
    params(
        ("zoom_meeting_id" = String, Path, description = "Zoom meeting number")
    ),
    responses(
        (status = 200, description = "Successfully retrieved a meeting", body = domain::meetings::Model),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Meeting not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn read_by_zoom_id(
    State(app_state): State<AppState>,
    Path(zoom_meeting_id): Path<String>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET meeting by Zoom id: {zoom_meeting_id}");

    let meeting =
        MeetingApi::find_by_zoom_meeting_id(app_state.db_conn_ref(), &zoom_meeting_id).await?;

    Ok(Json(ApiResponse::new(meeting)))
}

/// PATCH the status of a meeting hosted by the authenticated user
#[utoipa::path(
    patch,
    path = "/meetings/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Id of the meeting to update"),
    ),
    request_body = UpdateStatusParams,
    responses(
        (status = 200, description = "Successfully updated the meeting status", body = domain::meetings::Model),
        (status = 400, description = "Unknown status"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only the host may change the status"),
        (status = 404, description = "Meeting not found"),
        (status = 409, description = "The status change is not allowed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_status(
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    ValidatedJson(params): ValidatedJson<UpdateStatusParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("PATCH meeting {id} status to {}", params.status);

    let meeting = MeetingApi::update_status(app_state.db_conn_ref(), id, params.status).await?;

    debug!("Updated meeting: {meeting:?}");

    Ok(Json(ApiResponse::new(meeting)))
}
