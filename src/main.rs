use domain::gateway::Gateways;
use log::*;
use service::{config::Config, logging::Logger};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let config = Config::new();
    if let Err(e) = Logger::init_logger(&config) {
        eprintln!("Failed to initialize logger: {e}");
    }

    info!(
        "Starting DealFlow backend [{}] in {:?}",
        env!("CARGO_PKG_VERSION"),
        config.runtime_env()
    );

    let missing = config.missing_zoom_variables();
    if !missing.is_empty() {
        warn!(
            "Zoom is not fully configured, dependent endpoints will fail: missing {}",
            missing.join(", ")
        );
    }

    let db = match service::init_database(&config).await {
        Ok(db) => Arc::new(db),
        Err(e) => {
            error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    let gateways = match Gateways::new(&config) {
        Ok(gateways) => gateways,
        Err(e) => {
            error!("Failed to initialize provider clients: {e}");
            std::process::exit(1);
        }
    };

    let app_state = web::AppState::new(service::AppState::new(config, &db), gateways);

    if let Err(e) = web::init_server(app_state).await {
        error!("Server stopped with an error: {e}");
        std::process::exit(1);
    }
}
