// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Controller API: connected-agent listing and service credential generation.

pub mod client;
pub mod wire;

use std::future::Future;
use std::pin::Pin;

use crate::error::SyncError;
use crate::snapshot::{AgentSession, ServiceKey};

pub use client::ControllerClient;

/// Boxed future returned by [`Controller`] calls.
pub type ControllerFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, SyncError>> + Send + 'a>>;

/// Connection details generated by the controller for one service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCredentials {
    pub url: String,
    pub token: String,
}

/// The two controller requests the synchronizer depends on.
///
/// Object-safe so the reconciliation engine can take `&dyn Controller`.
pub trait Controller: Send + Sync + 'static {
    /// List every agent session the controller currently knows about.
    fn list_connected_agents(&self) -> ControllerFuture<'_, Vec<AgentSession>>;

    /// Generate (or re-issue) the URL and credential for one service.
    fn fetch_credentials<'a>(&'a self, key: &'a ServiceKey)
        -> ControllerFuture<'a, ServiceCredentials>;
}
