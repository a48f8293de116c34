// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Document Visit Notifier Service
//!
//! Serves `/<document name>` links. A visit that passes the scanner filter
//! and the per-visitor rate limit is relayed to the document's webhook as
//! `{"doc_name", "access_time", "ip_address"}`.
//!
//! ## Configuration
//!
//! Process settings come from environment variables (a `.env` file is
//! honoured):
//!
//! - `BIND_ADDR`: Server bind address (default: 0.0.0.0:5000)
//! - `CONFIG_PATH`: YAML notification config (default: config.yaml)
//! - `CLEANUP_INTERVAL_SECS`: Rate limiter sweep interval (default: 60)
//! - `RUST_LOG`: Log filter (default: info)
//!
//! Webhook mappings and filter settings live in the YAML file and are
//! re-read on every request.

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use doc_visit_notifier::{
    config::{ConfigSource, FileConfigSource, ServerConfig},
    handlers::{router, AppState},
    limiter::RateLimiter,
    notifier::WebhookClient,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let server = ServerConfig::from_env();
    let config_source = Arc::new(FileConfigSource::new(server.config_path.clone()));
    let initial = config_source.load();
    info!(
        bind_addr = %server.bind_addr,
        config_path = %server.config_path.display(),
        webhooks = initial.webhooks.len(),
        default_webhook = initial.default_webhook.is_some(),
        enable_rate_limit = initial.enable_rate_limit,
        rate_limit_seconds = initial.rate_limit_seconds,
        chinese_only = initial.chinese_only,
        "Starting document visit notifier"
    );

    let state = Arc::new(AppState::new(
        config_source.clone(),
        RateLimiter::new(),
        WebhookClient::new()?,
    ));

    // Spawn cleanup task
    let cleanup_state = state.clone();
    let interval = server.cleanup_interval();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            let window = cleanup_state.config.load().rate_limit_window();
            let removed = cleanup_state.limiter.cleanup(window).await;
            debug!(removed, "Rate limiter cleanup finished");
        }
    });

    let app = router(state);

    let addr: SocketAddr = server.bind_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
