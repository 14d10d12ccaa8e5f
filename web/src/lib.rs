use axum::http::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use domain::gateway::Gateways;
use log::*;
use sea_orm::DatabaseConnection;
use service::config::Config;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

mod controller;
mod error;
pub(crate) mod extractors;
pub(crate) mod middleware;
pub(crate) mod params;
pub(crate) mod protect;
pub(crate) mod response;
mod router;

#[cfg(test)]
mod test_support;

pub use error::{Error, Result};

/// Shared by every handler: the database pool, the configuration and the provider
/// clients. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub gateways: Arc<Gateways>,
    database_connection: Arc<DatabaseConnection>,
}

impl AppState {
    pub fn new(service_state: service::AppState, gateways: Gateways) -> Self {
        Self {
            config: service_state.config,
            gateways: Arc::new(gateways),
            database_connection: service_state.database_connection,
        }
    }

    pub fn db_conn_ref(&self) -> &DatabaseConnection {
        self.database_connection.as_ref()
    }
}

pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let interface = app_state
        .config
        .interface
        .clone()
        .unwrap_or_else(|| "0.0.0.0".to_string());
    let server_url = format!("{interface}:{}", app_state.config.port);
    let listener = TcpListener::bind(&server_url).await?;

    info!("Server starting... listening for connections on http://{server_url}");

    let allowed_origins: Vec<HeaderValue> = app_state
        .config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {origin}");
                None
            }
        })
        .collect();

    let cors_layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_origin(allowed_origins);

    axum::serve(listener, router::define_routes(app_state).layer(cors_layer)).await
}
