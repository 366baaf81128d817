// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use coffee_shop_server::{
    api::router,
    auth::AuthGuard,
    config::{AppConfig, LogFormat, DEFAULT_LOG_FILTER},
    state::AppState,
    store::DrinkStore,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// How long in-flight requests get to finish after a shutdown signal.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

async fn shutdown_signal(handle: Handle<SocketAddr>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    info!("shutdown signal received, draining connections");
    handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;
    let addr = config.bind_addr()?;

    let auth = AuthGuard::new(&config.auth)?;
    info!(
        domain = %config.auth.identity_domain,
        audience = %config.auth.audience,
        jwks_url = %config.auth.jwks_url(),
        cache_ttl_secs = config.auth.jwks_cache_ttl.as_secs(),
        refresh_cooldown_secs = config.auth.jwks_refresh_cooldown.as_secs(),
        leeway_secs = config.auth.leeway,
        "auth configured"
    );

    // Warm the key cache; failures are retried on the first request.
    if let Err(e) = auth.jwks().refresh().await {
        warn!(error = %e, "initial JWKS fetch failed");
    }

    let store = if config.seed_drinks {
        DrinkStore::seeded()
    } else {
        DrinkStore::new()
    };

    let app = router(AppState::new(store, auth));

    let handle: Handle<SocketAddr> = Handle::new();
    tokio::spawn(shutdown_signal(handle.clone()));

    info!("Coffee shop server listening on http://{addr} (docs at /docs)");
    axum_server::bind(addr)
        .handle(handle)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing(coffee_shop_server::config::log_format_from_env());

    if let Err(e) = run().await {
        error!(error = %e, "server failed");
        std::process::exit(1);
    }
}
