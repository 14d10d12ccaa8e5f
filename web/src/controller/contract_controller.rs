use crate::controller::ApiResponse;
use crate::extractors::{
    authenticated_user::AuthenticatedUser, validated_json::ValidatedJson,
};
use crate::params::contract::SendContractParams;
use crate::{AppState, Error};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use domain::contract as ContractApi;
use log::*;

/// POST send a contract to a client by email and push notification
///
/// Delivery problems do not fail the request: the response tells which channels went out.
#[utoipa::path(
    post,
    path = "/contracts/send",
    request_body = SendContractParams,
    responses(
        (status = 200, description = "Contract dispatched; see emailSent and pushSent"),
        (status = 400, description = "Invalid client email or contract URL"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not the seller named in the request"),
        (status = 404, description = "Attached meeting not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn send(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    ValidatedJson(params): ValidatedJson<SendContractParams>,
) -> Result<impl IntoResponse, Error> {
    if params.seller_user_id != user.id {
        warn!(
            "User {} tried to send a contract as seller {}",
            user.id, params.seller_user_id
        );
        return Err(Error::Forbidden);
    }
    debug!("POST send contract from {} to {}", user.id, params.client_email);

    let delivery = ContractApi::send(
        app_state.db_conn_ref(),
        &app_state.gateways,
        &app_state.config,
        &user,
        params.into(),
    )
    .await?;

    info!(
        "Contract from {}: email sent {}, push sent {}",
        user.id, delivery.email_sent, delivery.push_sent
    );

    Ok(Json(ApiResponse::new(delivery)))
}
