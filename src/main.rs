//! Bootstrap binary: initializes logging, loads configuration, connects to
//! the database, and creates the schema. The engine itself is a library;
//! whatever transport serves it runs this first.

use dotenvy::dotenv;
use frontdesk::{config, errors::Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars may also be set externally
    dotenv().ok();

    // 3. Load the application configuration
    let app_config = config::settings::load_default_config()?;
    info!(
        timeout_secs = app_config.check_in_timeout_secs,
        "configuration loaded"
    );

    // 4. Connect and create the schema
    let db = config::database::create_connection(&app_config.effective_database_url()).await?;
    config::database::create_tables(&db).await?;
    info!("database schema ready");

    Ok(())
}
