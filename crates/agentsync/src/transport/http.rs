// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::synchronizer::HealthProbe;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// `GET /api/v1/health`: 200 when the last pass succeeded, 503 otherwise.
pub async fn health(State(probe): State<HealthProbe>) -> impl IntoResponse {
    match probe.check() {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse { status: "ok".to_owned(), code: None, error: None }),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "error".to_owned(),
                code: Some(e.as_str().to_owned()),
                error: Some(e.to_string()),
            }),
        ),
    }
}
