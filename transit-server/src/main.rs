use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use transit_server::config::ServerConfig;
use transit_server::departures::QueryConfig;
use transit_server::gtfs::GtfsStore;
use transit_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(%e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    // Load the feed up front (fail fast if unreadable)
    let data_dir = config.data_dir.clone();
    let store = match tokio::task::spawn_blocking(move || GtfsStore::load(data_dir)).await {
        Ok(Ok(store)) => store,
        Ok(Err(e)) => {
            error!(%e, "failed to load GTFS feed");
            return ExitCode::FAILURE;
        }
        Err(e) => {
            error!(%e, "feed loader panicked");
            return ExitCode::FAILURE;
        }
    };

    let state = AppState::new(
        store,
        QueryConfig::default(),
        &config.city,
        config.query_timeout,
    );
    let app = create_router(state);

    let listener = match tokio::net::TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(addr = %config.bind_addr, %e, "failed to bind");
            return ExitCode::FAILURE;
        }
    };

    info!(addr = %config.bind_addr, city = %config.city, "public transport API listening");
    info!("  GET /public_transport/city/{}/closest_departures", config.city);
    info!("  GET /public_transport/city/{}/trip/{{trip_id}}", config.city);

    if let Err(e) = axum::serve(listener, app).await {
        error!(%e, "server error");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
