//! Binary entrypoint: boots the Axum HTTP server, wiring routes, shared
//! state, and middleware.

use anyhow::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use honeypot_intel::api::{self, AppState};
use honeypot_intel::config::AppConfig;

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("honeypot_intel=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = AppConfig::from_env();
    let bind_addr = config.bind_addr.clone();
    let state = AppState::from_config(config);
    let router = api::router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("bind {bind_addr}"))?;
    tracing::info!(addr = %bind_addr, version = api::SERVICE_VERSION, "honeypot api listening");

    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}
