// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{env, net::SocketAddr};

use tracing_subscriber::EnvFilter;

use spaceshare_server::api::router;
use spaceshare_server::auth::TokenKeys;
use spaceshare_server::config::{
    DATA_DIR_ENV, DEFAULT_HOST, DEFAULT_PORT, HOST_ENV, LOG_FORMAT_ENV, PORT_ENV, TOKEN_SECRET_ENV,
};
use spaceshare_server::state::AppState;
use spaceshare_server::storage::paths::DATA_ROOT;
use spaceshare_server::storage::{FileStorage, StoragePaths};

#[tokio::main]
async fn main() {
    init_tracing();

    // The signing key is mandatory: without a stable key, issued tokens
    // would stop validating across restarts.
    let secret = match env::var(TOKEN_SECRET_ENV) {
        Ok(value) if !value.is_empty() => value,
        _ => {
            eprintln!("{TOKEN_SECRET_ENV} must be set to a non-empty signing key");
            std::process::exit(1);
        }
    };

    // Initialize storage
    let data_dir = env::var(DATA_DIR_ENV).unwrap_or_else(|_| DATA_ROOT.to_string());
    let mut storage = FileStorage::new(StoragePaths::new(&data_dir));
    storage
        .initialize()
        .expect("Failed to initialize storage directories");

    let state = AppState::new(storage, TokenKeys::new(secret.as_bytes()));
    let app = router(state);

    // Parse bind address
    let host = env::var(HOST_ENV).unwrap_or_else(|_| DEFAULT_HOST.to_string());
    let port: u16 = env::var(PORT_ENV)
        .unwrap_or_else(|_| DEFAULT_PORT.to_string())
        .parse()
        .unwrap_or(DEFAULT_PORT);

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .expect("Failed to parse bind address");

    tracing::info!(%addr, data_dir = %data_dir, "spaceshare server listening (docs at /docs)");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server failed");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install ctrl-c handler");
    tracing::info!("shutdown signal received");
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    let json = env::var(LOG_FORMAT_ENV)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
