//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the doctor directory REST API on its own.
//!
//! ## Intended use
//! Useful for development when only the HTTP server is wanted. The workspace's `docdir-run`
//! binary also loads `.env` before starting the same router.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{router, AppState};
use docdir_core::{
    config::{
        data_dir_from_env_value, ensure_storage_dirs, lookup_timeout_from_env_value,
        lookup_url_from_env_value,
    },
    CoreConfig,
};

/// Main entry point for the doctor directory REST API server.
///
/// # Environment Variables
/// - `DOCDIR_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `DOCDIR_DATA_DIR`: Doctor storage directory (default: "doctor_data")
/// - `ADDRESS_LOOKUP_URL`: ViaCEP-compatible base URL
/// - `ADDRESS_LOOKUP_TIMEOUT_SECS`: Outbound lookup timeout in seconds
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the configuration is invalid or the storage directory cannot be created,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("DOCDIR_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let cfg = Arc::new(CoreConfig::new(
        data_dir_from_env_value(std::env::var("DOCDIR_DATA_DIR").ok()),
        lookup_url_from_env_value(std::env::var("ADDRESS_LOOKUP_URL").ok())?,
        lookup_timeout_from_env_value(std::env::var("ADDRESS_LOOKUP_TIMEOUT_SECS").ok())?,
    )?);
    ensure_storage_dirs(&cfg)?;

    tracing::info!(
        data_dir = %cfg.doctor_data_dir().display(),
        lookup_url = cfg.address_lookup_url(),
        "-- Starting doctor directory REST API on {}",
        addr
    );

    let app = router(AppState::from_config(cfg)?);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
