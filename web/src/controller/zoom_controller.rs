use crate::controller::ApiResponse;
use crate::extractors::{
    authenticated_user::AuthenticatedUser, validated_json::ValidatedJson,
};
use crate::params::zoom::{CreateMeetingParams, SdkSignatureParams};
use crate::response::zoom::{CreatedMeetingResponse, SdkSignatureResponse, ZakResponse};
use crate::{AppState, Error};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use domain::jwt::{self as JwtApi, SdkKeys};
use domain::meeting as MeetingApi;
use log::*;

/// GET a credential for initializing the Meeting SDK on a device
#[utoipa::path(
    get,
    path = "/zoom/jwt",
    responses(
        (status = 200, description = "Successfully issued an SDK init credential", body = domain::jwt::SdkCredential),
        (status = 500, description = "Zoom SDK key or secret is not configured")
    )
)]
pub async fn jwt(State(app_state): State<AppState>) -> Result<impl IntoResponse, Error> {
    debug!("GET SDK init credential");

    let keys = SdkKeys::from_config(&app_state.config)?;
    let credential = JwtApi::generate_sdk_init_credential(&keys, Utc::now())?;

    Ok(Json(ApiResponse::new(credential)))
}

/// POST create a Zoom meeting hosted by the authenticated seller
#[utoipa::path(
    post,
    path = "/zoom/meetings",
    request_body = CreateMeetingParams,
    responses(
        (status = 200, description = "Successfully created a meeting", body = CreatedMeetingResponse),
        (status = 400, description = "Invalid meeting options"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only sellers may create meetings"),
        (status = 502, description = "Zoom rejected the request"),
        (status = 504, description = "Zoom did not answer in time")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_meeting(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    ValidatedJson(params): ValidatedJson<CreateMeetingParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Create Zoom meeting for host {}: {params:?}", user.id);

    let created = MeetingApi::create(
        app_state.db_conn_ref(),
        &app_state.gateways.zoom,
        app_state.config.deeplink_scheme(),
        &user,
        params.into(),
    )
    .await?;

    debug!("New meeting: {:?}", created.meeting);

    Ok(Json(ApiResponse::new(CreatedMeetingResponse::from(created))))
}

/// GET the host's ZAK token for starting meetings from the SDK
#[utoipa::path(
    get,
    path = "/zoom/zak",
    responses(
        (status = 200, description = "Successfully retrieved a ZAK token", body = ZakResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only sellers may start meetings"),
        (status = 500, description = "ZOOM_HOST_EMAIL is not configured"),
        (status = 502, description = "Zoom rejected the request")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn zak(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET ZAK token requested by {}", user.id);

    let zak_token = app_state.gateways.zoom.host_zak_token().await?;

    Ok(Json(ApiResponse::new(ZakResponse { zak_token })))
}

/// POST sign a request to join a meeting through the SDK
#[utoipa::path(
    post,
    path = "/zoom/sdk-signature",
    request_body = SdkSignatureParams,
    responses(
        (status = 200, description = "Successfully signed the join request", body = SdkSignatureResponse),
        (status = 400, description = "Missing meeting id or role"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Zoom SDK key or secret is not configured")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn sdk_signature(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    ValidatedJson(params): ValidatedJson<SdkSignatureParams>,
) -> Result<impl IntoResponse, Error> {
    let role = params.sdk_role().ok_or_else(|| {
        Error::Validation(vec![crate::error::FieldError::new(
            "role",
            "role must be 0 or 1",
        )])
    })?;
    debug!(
        "POST SDK signature for meeting {} as {role:?} by {}",
        params.meeting_id, user.id
    );

    let keys = SdkKeys::from_config(&app_state.config)?;
    let signature = JwtApi::generate_join_signature(&keys, &params.meeting_id, role, Utc::now())?;

    Ok(Json(SdkSignatureResponse { signature }))
}
