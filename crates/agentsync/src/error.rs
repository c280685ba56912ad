// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// Errors produced while talking to the controller or loading configuration.
///
/// Messages are captured as strings so the error can be cloned into the
/// health channel and read from any task.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// Network, TLS, or timeout failure reaching the controller.
    #[error("transport error: {0}")]
    Transport(String),
    /// Non-success HTTP status or a response body that could not be decoded.
    #[error("protocol error: {0}")]
    Protocol(String),
    /// Missing or invalid startup configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// No reconciliation pass has completed yet.
    #[error("controller is not yet synced")]
    NotSynced,
}

impl SyncError {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transport(_) => "TRANSPORT",
            Self::Protocol(_) => "PROTOCOL",
            Self::Configuration(_) => "CONFIGURATION",
            Self::NotSynced => "NOT_SYNCED",
        }
    }

    /// Classify a `reqwest` failure into the transport/protocol split.
    ///
    /// Status and decode failures mean the controller answered; everything
    /// else means we never got a usable response.
    pub fn from_reqwest(context: &str, err: reqwest::Error) -> Self {
        if err.is_status() || err.is_decode() {
            Self::Protocol(format!("{context}: {err}"))
        } else {
            Self::Transport(format!("{context}: {err}"))
        }
    }
}
