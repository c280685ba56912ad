// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reconciliation engine: owns the last-known service table and diffs it
//! against each freshly resolved candidate table.
//!
//! A pass is committed all-or-nothing. Credentials for every new key are
//! fetched before the table is touched; the first failed fetch aborts the
//! pass with no events and the table exactly as it was. Only a pass that
//! completes produces events.

use std::collections::HashMap;

use crate::controller::Controller;
use crate::error::SyncError;
use crate::events::ServiceUpdateEvent;
use crate::snapshot::{CandidateService, ServiceKey};

/// A discovered, credentialed service.
///
/// `url` and `token` are fetched once, on first discovery, and kept for as
/// long as the key stays present. A URL change on the controller side is not
/// detected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRecord {
    pub key: ServiceKey,
    pub annotations: HashMap<String, String>,
    pub url: String,
    pub token: String,
}

/// Owner of the service table.
#[derive(Debug, Default)]
pub struct Reconciler {
    services: HashMap<ServiceKey, ServiceRecord>,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    pub fn get(&self, key: &ServiceKey) -> Option<&ServiceRecord> {
        self.services.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &ServiceKey> {
        self.services.keys()
    }

    /// Bring the table in line with `candidates` and return one event per
    /// change.
    ///
    /// On error the table is unchanged and nothing should be emitted; the
    /// caller retries on its next tick.
    pub async fn reconcile(
        &mut self,
        controller: &dyn Controller,
        candidates: HashMap<ServiceKey, CandidateService>,
    ) -> Result<Vec<ServiceUpdateEvent>, SyncError> {
        let mut staged: Vec<ServiceRecord> = Vec::new();
        let mut added = 0usize;

        for (key, candidate) in &candidates {
            match self.services.get(key) {
                Some(existing) => {
                    if existing.annotations != candidate.annotations {
                        staged.push(ServiceRecord {
                            key: key.clone(),
                            annotations: candidate.annotations.clone(),
                            url: existing.url.clone(),
                            token: existing.token.clone(),
                        });
                    }
                }
                None => {
                    let creds = controller.fetch_credentials(key).await.map_err(|e| {
                        tracing::debug!(service = %key, err = %e, "credential fetch failed, aborting pass");
                        e
                    })?;
                    added += 1;
                    staged.push(ServiceRecord {
                        key: key.clone(),
                        annotations: candidate.annotations.clone(),
                        url: creds.url,
                        token: creds.token,
                    });
                }
            }
        }

        let removed: Vec<ServiceKey> =
            self.services.keys().filter(|key| !candidates.contains_key(key)).cloned().collect();

        let updated = staged.len() - added;
        let mut events = Vec::with_capacity(staged.len() + removed.len());
        for record in staged {
            tracing::debug!(service = %record.key, "service updated");
            events.push(ServiceUpdateEvent::update(&record));
            self.services.insert(record.key.clone(), record);
        }
        for key in removed {
            if self.services.remove(&key).is_some() {
                tracing::debug!(service = %key, "service removed");
                events.push(ServiceUpdateEvent::delete(&key));
            }
        }

        if !events.is_empty() {
            tracing::info!(
                added,
                updated,
                removed = events.len() - added - updated,
                total = self.services.len(),
                "reconciled services"
            );
        }
        Ok(events)
    }
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;
