// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! agentsync: keeps a local view of the services exposed by agents connected
//! to a controller, and streams add/update/delete events for them.

pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod reconcile;
pub mod snapshot;
pub mod synchronizer;
pub mod test_support;
pub mod transport;
pub mod version;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::config::SyncArgs;
use crate::controller::ControllerClient;
use crate::events::{Operation, ServiceUpdateEvent};
use crate::synchronizer::{EventStream, Synchronizer};
use crate::transport::build_router;

/// Run the synchronizer and its health endpoint until SIGINT/SIGTERM.
pub async fn run(args: SyncArgs) -> anyhow::Result<()> {
    let config = args.controller_config()?;
    let service_types = args.service_types();
    let client = ControllerClient::new(&config.url, &config.token)?;

    let addr = format!("{}:{}", args.host, args.port);
    let listener = TcpListener::bind(&addr).await?;

    let (sync, events) =
        Synchronizer::start(client, service_types.clone(), config.update_interval());
    tracing::info!(
        controller = %config.url,
        interval_secs = config.update_frequency_seconds,
        service_types = ?service_types,
        version = %version::version_string(),
        "agentsync started, health on {addr}"
    );

    let consumer = tokio::spawn(log_events(events));

    let shutdown = CancellationToken::new();
    spawn_signal_handler(shutdown.clone());

    let router = build_router(sync.health());
    let served = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown.clone().cancelled_owned())
        .await;

    // Stop the worker even if the server failed.
    shutdown.cancel();
    sync.shutdown().await;
    if let Err(e) = consumer.await {
        tracing::warn!(err = %e, "event consumer did not exit cleanly");
    }
    served?;
    tracing::info!("agentsync stopped");
    Ok(())
}

/// Default consumer: log every service change.
async fn log_events(mut events: EventStream) {
    while let Some(event) = events.recv().await {
        log_event(&event);
    }
}

fn log_event(event: &ServiceUpdateEvent) {
    match event.operation {
        Operation::Update => tracing::info!(
            service = %event.key(),
            url = event.url.as_deref().unwrap_or_default(),
            annotations = ?event.annotations,
            "service update"
        ),
        Operation::Delete => tracing::info!(service = %event.key(), "service delete"),
    }
}

fn spawn_signal_handler(shutdown: CancellationToken) {
    tokio::spawn(async move {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()).ok();
        let mut sigint =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt()).ok();

        tokio::select! {
            _ = shutdown.cancelled() => {}
            _ = async {
                if let Some(ref mut s) = sigterm { s.recv().await } else { std::future::pending().await }
            } => {
                tracing::info!("received SIGTERM");
                shutdown.cancel();
            }
            _ = async {
                if let Some(ref mut s) = sigint { s.recv().await } else { std::future::pending().await }
            } => {
                tracing::info!("received SIGINT");
                shutdown.cancel();
            }
        }
    });
}
