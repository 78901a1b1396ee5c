use std::sync::Arc;

use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, router};
use docdir_core::{
    CoreConfig,
    config::{
        data_dir_from_env_value, ensure_storage_dirs, lookup_timeout_from_env_value,
        lookup_url_from_env_value,
    },
};

/// Main entry point for the doctor directory.
///
/// Loads `.env`, resolves configuration once, prepares the storage directory and serves
/// the REST API (with Swagger UI at `/swagger-ui`) until Ctrl-C.
///
/// # Environment Variables
/// - `DOCDIR_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `DOCDIR_DATA_DIR`: Directory for doctor storage (default: "doctor_data")
/// - `ADDRESS_LOOKUP_URL`: ViaCEP-compatible base URL (default: "https://viacep.com.br/ws")
/// - `ADDRESS_LOOKUP_TIMEOUT_SECS`: Outbound lookup timeout (default: 10)
///
/// # Returns
/// * `Ok(())` - If the server starts and shuts down cleanly
/// * `Err(anyhow::Error)` - If configuration, startup or serving fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("docdir_run=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("docdir_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("DOCDIR_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let cfg = Arc::new(config_from_env()?);
    ensure_storage_dirs(&cfg)?;

    tracing::info!("++ Doctor data in {}", cfg.doctor_data_dir().display());
    tracing::info!("++ Address lookup via {}", cfg.address_lookup_url());
    tracing::info!("++ Starting doctor directory REST on {}", rest_addr);

    let app = build_app(cfg)?;
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("-- Doctor directory stopped");
    Ok(())
}

fn config_from_env() -> anyhow::Result<CoreConfig> {
    Ok(CoreConfig::new(
        data_dir_from_env_value(std::env::var("DOCDIR_DATA_DIR").ok()),
        lookup_url_from_env_value(std::env::var("ADDRESS_LOOKUP_URL").ok())?,
        lookup_timeout_from_env_value(std::env::var("ADDRESS_LOOKUP_TIMEOUT_SECS").ok())?,
    )?)
}

fn build_app(cfg: Arc<CoreConfig>) -> anyhow::Result<Router> {
    Ok(router(AppState::from_config(cfg)?))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
