use std::sync::Arc;

use anyhow::Result;
use log::info;

use sviluppo::analytics;
use sviluppo::config::{self, Config};
use sviluppo::logger::setup_logger;
use sviluppo::web::{self, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger
    setup_logger()?;

    let config: Arc<Config> = Arc::new(config::read_config());

    let (events_tx, events_rx) = analytics::channel();
    tokio::spawn(analytics::run_sink(events_rx));

    let (shutdown_tx, shutdown_rx) = tokio::sync::broadcast::channel::<()>(1);
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        info!("Shutdown signal received");
        let _ = shutdown_tx.send(());
    });

    let state = AppState::new(config, events_tx);
    web::start_http_server(state, shutdown_rx).await;

    Ok(())
}
