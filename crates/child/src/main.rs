// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use bos_adapters::ReqwestHttpClient;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use bos_child::env::{drain_timeout, flag_cache_ttl, ChildIdentity};
use bos_child::state::ChildState;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))).init();

    let identity = ChildIdentity::from_env()?;
    let service_name = identity.service_name.clone();
    let port = identity.port;

    let http = Arc::new(ReqwestHttpClient::new());
    let state = Arc::new(ChildState::new(identity, http, flag_cache_ttl()));
    let app = bos_child::build_router(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    tracing::info!(service_name = %service_name, port, "child service runtime listening");

    let shutdown = CancellationToken::new();
    let shutdown_for_serve = shutdown.clone();
    let serve_handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown_for_serve.cancelled().await;
            })
            .await
    });

    let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;
    tokio::select! {
        _ = sigterm.recv() => {}
        _ = tokio::signal::ctrl_c() => {}
    }
    tracing::info!("received shutdown signal, draining in-flight requests");
    shutdown.cancel();

    let drain = drain_timeout();
    match tokio::time::timeout(drain, serve_handle).await {
        Ok(Ok(result)) => result?,
        Ok(Err(join_err)) => return Err(join_err.into()),
        Err(_) => tracing::warn!("drain timeout elapsed, forcing exit"),
    }

    tracing::info!(service_name = %service_name, "child service runtime stopped");
    Ok(())
}
