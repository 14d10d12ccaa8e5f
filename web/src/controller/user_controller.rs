use crate::extractors::{
    authenticated_user::AuthenticatedUser, validated_json::ValidatedJson,
};
use crate::{controller::ApiResponse, params::user::RegisterFcmTokenParams};
use crate::{AppState, Error};
use axum::{extract::State, response::IntoResponse, Json};
use domain::{user as UserApi, users};

use log::*;

/// POST register the device token push notifications for the current user go to
#[utoipa::path(
    post,
    path = "/users/fcm-token",
    request_body = RegisterFcmTokenParams,
    responses(
        (status = 200, description = "Successfully registered the push token", body = users::Model),
        (status = 400, description = "Missing token or unknown platform"),
        (status = 401, description = "Unauthorized"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn register_fcm_token(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    ValidatedJson(params): ValidatedJson<RegisterFcmTokenParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST register {} push token for {}", params.platform, user.id);

    let user: users::Model = UserApi::register_fcm_token(
        app_state.db_conn_ref(),
        user,
        &params.fcm_token,
        params.platform,
    )
    .await?;

    Ok(Json(ApiResponse::new(user)))
}
