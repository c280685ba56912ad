// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP surface for the synchronizer's health status.

pub mod http;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::synchronizer::HealthProbe;

/// Build the axum `Router` serving the health endpoint.
pub fn build_router(health: HealthProbe) -> Router {
    Router::new()
        .route("/api/v1/health", get(http::health))
        .layer(TraceLayer::new_for_http())
        .with_state(health)
}
