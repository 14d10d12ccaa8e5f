use crate::{
    controller::health_check_controller, middleware::auth::require_auth, params, protect,
    response, AppState,
};
use axum::{
    middleware::from_fn_with_state,
    routing::{get, patch, post},
    Router,
};

use crate::controller::{
    contract_controller, meeting_controller, user_controller, webhook_controller,
    zoom_controller,
};

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "DealFlow API"
        ),
        paths(
            health_check_controller::health_check,
            zoom_controller::jwt,
            zoom_controller::create_meeting,
            zoom_controller::zak,
            zoom_controller::sdk_signature,
            meeting_controller::index,
            meeting_controller::read,
            meeting_controller::read_by_zoom_id,
            meeting_controller::update_status,
            webhook_controller::zoom,
            contract_controller::send,
            user_controller::register_fcm_token,
        ),
        components(
            schemas(
                domain::meetings::Model,
                domain::users::Model,
                domain::jwt::SdkCredential,
                domain::meeting_status::MeetingStatus,
                domain::meeting_type::MeetingType,
                domain::roles::Role,
                domain::fcm_platform::FcmPlatform,
                params::zoom::CreateMeetingParams,
                params::zoom::SdkSignatureParams,
                params::meeting::UpdateStatusParams,
                params::contract::SendContractParams,
                params::user::RegisterFcmTokenParams,
                response::zoom::CreatedMeetingResponse,
                response::zoom::ZakResponse,
                response::zoom::SdkSignatureResponse,
            )
        ),
        modifiers(&SecurityAddon),
        tags(
            (name = "dealflow", description = "DealFlow meetings, Zoom credentials and contracts API")
        )
    )]
struct ApiDoc;

struct SecurityAddon;

// Protected endpoints expect the access token issued by the authentication provider.
impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(zoom_routes(app_state.clone()))
        .merge(meeting_routes(app_state.clone()))
        .merge(webhook_routes(app_state.clone()))
        .merge(contract_routes(app_state.clone()))
        .merge(user_routes(app_state))
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/rapidoc"))
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

fn zoom_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/zoom/jwt", get(zoom_controller::jwt))
        .merge(
            Router::new()
                .route(
                    "/zoom/sdk-signature",
                    post(zoom_controller::sdk_signature),
                )
                .merge(
                    // POST /zoom/meetings and GET /zoom/zak
                    Router::new()
                        .route("/zoom/meetings", post(zoom_controller::create_meeting))
                        .route("/zoom/zak", get(zoom_controller::zak))
                        .route_layer(from_fn_with_state(
                            app_state.clone(),
                            protect::users::seller,
                        )),
                )
                .route_layer(from_fn_with_state(app_state.clone(), require_auth)),
        )
        .with_state(app_state)
}

fn meeting_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/meetings", get(meeting_controller::index))
        .route("/meetings/{id}", get(meeting_controller::read))
        .route(
            "/meetings/zoom/{zoom_meeting_id}",
            get(meeting_controller::read_by_zoom_id),
        )
        .merge(
            // PATCH /meetings/{id}/status
            Router::new()
                .route(
                    "/meetings/{id}/status",
                    patch(meeting_controller::update_status),
                )
                .route_layer(from_fn_with_state(
                    app_state.clone(),
                    protect::meetings::update_status,
                )),
        )
        .route_layer(from_fn_with_state(app_state.clone(), require_auth))
        .with_state(app_state)
}

fn webhook_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/meetings/webhook", post(webhook_controller::zoom))
        .with_state(app_state)
}

fn contract_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/contracts/send", post(contract_controller::send))
        .route_layer(from_fn_with_state(
            app_state.clone(),
            protect::users::seller,
        ))
        .route_layer(from_fn_with_state(app_state.clone(), require_auth))
        .with_state(app_state)
}

fn user_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/users/fcm-token", post(user_controller::register_fcm_token))
        .route_layer(from_fn_with_state(app_state.clone(), require_auth))
        .with_state(app_state)
}
