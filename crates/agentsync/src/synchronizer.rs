// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Background poll→resolve→reconcile worker and its lifecycle handle.
//!
//! Each [`Synchronizer`] owns exactly one tokio task. The service table lives
//! inside that task and is never shared; the only cross-task state is the
//! shutdown token, the bounded event channel, and a watch channel carrying
//! the health status.

use std::collections::HashSet;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::controller::Controller;
use crate::error::SyncError;
use crate::events::ServiceUpdateEvent;
use crate::reconcile::Reconciler;
use crate::snapshot::resolve;

/// Capacity of the event channel. A consumer that stops reading blocks the
/// worker once this many events are queued, which in turn delays polling.
pub const EVENT_CHANNEL_CAPACITY: usize = 10;

type Health = Result<(), SyncError>;

/// Handle to a running synchronizer.
///
/// Dropping the handle cancels the worker without waiting for it; call
/// [`Synchronizer::shutdown`] to stop and wait.
pub struct Synchronizer {
    shutdown: CancellationToken,
    health: HealthProbe,
    worker: Option<JoinHandle<()>>,
}

impl Synchronizer {
    /// Spawn the worker and return its handle with the event stream.
    ///
    /// The first pass runs immediately; later passes start `poll_interval`
    /// after the previous one finished. Must be called within a tokio runtime.
    pub fn start<C: Controller>(
        controller: C,
        service_types: impl IntoIterator<Item = String>,
        poll_interval: Duration,
    ) -> (Self, EventStream) {
        let shutdown = CancellationToken::new();
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (health_tx, health_rx) = watch::channel(Err(SyncError::NotSynced));

        let worker = Worker {
            controller,
            service_types: service_types.into_iter().collect(),
            poll_interval,
            reconciler: Reconciler::new(),
            event_tx,
            health_tx,
            shutdown: shutdown.clone(),
        };
        let handle = tokio::spawn(worker.run());

        let sync = Self {
            shutdown: shutdown.clone(),
            health: HealthProbe { rx: health_rx },
            worker: Some(handle),
        };
        (sync, EventStream { rx: event_rx, shutdown })
    }

    /// Result of the most recent pass: `Err(NotSynced)` before the first pass
    /// completes, the pass error after a failure, `Ok(())` otherwise.
    pub fn check(&self) -> Result<(), SyncError> {
        self.health.check()
    }

    /// A cloneable view of the health status, for serving from other tasks.
    pub fn health(&self) -> HealthProbe {
        self.health.clone()
    }

    pub fn is_running(&self) -> bool {
        self.worker.as_ref().is_some_and(|w| !w.is_finished())
    }

    /// Stop polling and wait for the worker to exit.
    ///
    /// Preempts the wait between passes and any blocked event send. A request
    /// already in flight is allowed to finish (or time out) first. Once this
    /// returns, the event stream yields nothing further and reports closed.
    pub async fn shutdown(mut self) {
        self.shutdown.cancel();
        if let Some(worker) = self.worker.take() {
            if let Err(e) = worker.await {
                tracing::warn!(err = %e, "synchronizer worker did not exit cleanly");
            }
        }
        tracing::debug!("synchronizer stopped");
    }
}

impl Drop for Synchronizer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Read side of the health status.
#[derive(Debug, Clone)]
pub struct HealthProbe {
    rx: watch::Receiver<Health>,
}

impl HealthProbe {
    pub fn check(&self) -> Result<(), SyncError> {
        self.rx.borrow().clone()
    }

    /// Wait until a pass publishes a new status. Returns `false` once the
    /// worker has exited.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}

/// Receiving end of the service update channel.
///
/// Closed when the synchronizer shuts down. Events still queued at that
/// point are discarded rather than delivered.
pub struct EventStream {
    rx: mpsc::Receiver<ServiceUpdateEvent>,
    shutdown: CancellationToken,
}

impl EventStream {
    /// Next event, or `None` once the synchronizer has shut down.
    pub async fn recv(&mut self) -> Option<ServiceUpdateEvent> {
        if self.shutdown.is_cancelled() {
            self.rx.close();
            return None;
        }
        self.rx.recv().await
    }

    /// Non-blocking variant of [`Self::recv`].
    pub fn try_recv(&mut self) -> Option<ServiceUpdateEvent> {
        if self.shutdown.is_cancelled() {
            self.rx.close();
            return None;
        }
        self.rx.try_recv().ok()
    }
}

struct Worker<C> {
    controller: C,
    service_types: HashSet<String>,
    poll_interval: Duration,
    reconciler: Reconciler,
    event_tx: mpsc::Sender<ServiceUpdateEvent>,
    health_tx: watch::Sender<Health>,
    shutdown: CancellationToken,
}

impl<C: Controller> Worker<C> {
    async fn run(mut self) {
        tracing::debug!(interval_secs = self.poll_interval.as_secs(), "synchronizer worker started");
        loop {
            if self.shutdown.is_cancelled() {
                break;
            }
            if !self.pass().await {
                break;
            }

            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => break,
                _ = tokio::time::sleep(self.poll_interval) => {}
            }
        }
        tracing::debug!("synchronizer worker exited");
    }

    fn set_health(&self, health: Health) {
        self.health_tx.send_modify(|h| *h = health);
    }

    /// Run one reconciliation pass. Returns `false` when the worker should
    /// stop.
    async fn pass(&mut self) -> bool {
        let sessions = match self.controller.list_connected_agents().await {
            Ok(sessions) => sessions,
            Err(e) => {
                tracing::warn!(err = %e, "unable to list connected agents from controller");
                self.set_health(Err(e));
                return true;
            }
        };

        let candidates = resolve(sessions, &self.service_types);
        let events = match self.reconciler.reconcile(&self.controller, candidates).await {
            Ok(events) => events,
            Err(e) => {
                tracing::warn!(err = %e, "unable to fetch service credentials from controller");
                self.set_health(Err(e));
                return true;
            }
        };
        self.set_health(Ok(()));

        for event in events {
            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => return false,
                sent = self.event_tx.send(event) => {
                    if sent.is_err() {
                        tracing::debug!("event receiver dropped, stopping synchronizer");
                        return false;
                    }
                }
            }
        }
        true
    }
}

#[cfg(test)]
#[path = "synchronizer_tests.rs"]
mod tests;
