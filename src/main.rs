use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};

use nl_dash::config::{AppConfig, CliArgs, MYSQL_PORT};
use nl_dash::db::{DatabaseClient, MySqlClient};
use nl_dash::persist::MySqlSavedQueryStore;
use nl_dash::util::logging::init_tracing;
use nl_dash::web::{self, state::AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    init_tracing();

    // Parse command line arguments
    let args = CliArgs::parse();

    // Load configuration
    let config = match AppConfig::new(&args) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    info!(
        "Using MySQL database '{}' at {}:{}",
        config.database.database, config.database.host, MYSQL_PORT
    );

    // The pool is lazy: connections are made per request, not at startup.
    let client = MySqlClient::new(&config.database)?;
    let saved = Arc::new(MySqlSavedQueryStore::new(client.pool().clone()));
    let db: Arc<dyn DatabaseClient> = Arc::new(client);

    let state = Arc::new(AppState::new(config.clone(), db, saved));

    info!(
        "Starting nl-dash server on {}:{}",
        config.web.host, config.web.port
    );
    match web::run_server(config.web, state).await {
        Ok(_) => info!("Server stopped gracefully"),
        Err(e) => {
            error!("Server error: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
