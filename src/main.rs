// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Creative Marketplace API Server

use creative_marketplace::{config::Config, db::DocumentStore, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging()?;

    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        backend = ?config.store_backend,
        "Starting Creative Marketplace API"
    );

    let db = DocumentStore::connect(&config).await?;
    tracing::info!(backend = db.backend_name(), "Document store ready");

    let state = Arc::new(AppState::new(config.clone(), db));

    // Audit trail of sign-ins and sign-outs
    let _auth_events = state.identity.subscribe(|change| match change.identity {
        Some(identity) => tracing::info!(
            uid = %change.subject,
            email = %identity.email,
            "Auth state: signed in"
        ),
        None => tracing::info!(uid = %change.subject, "Auth state: signed out"),
    });

    let app = creative_marketplace::routes::create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("creative_marketplace=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
