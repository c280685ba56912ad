// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Service update events handed to the downstream consumer.
//!
//! The stream is a sequence of set-reconciliation notifications: order within
//! a pass is unspecified, and an `Update` for a key the consumer has never
//! seen means "add".

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::reconcile::ServiceRecord;
use crate::snapshot::ServiceKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// A service appeared or its annotations changed.
    Update,
    /// A service is no longer reported by the controller.
    Delete,
}

/// One change to the discovered service set.
///
/// `annotations`, `url` and `token` are only set for [`Operation::Update`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceUpdateEvent {
    pub operation: Operation,
    pub agent_name: String,
    pub endpoint_name: String,
    pub endpoint_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<HashMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl ServiceUpdateEvent {
    pub fn update(record: &ServiceRecord) -> Self {
        Self {
            operation: Operation::Update,
            agent_name: record.key.agent_name.clone(),
            endpoint_name: record.key.endpoint_name.clone(),
            endpoint_type: record.key.endpoint_type.clone(),
            annotations: Some(record.annotations.clone()),
            url: Some(record.url.clone()),
            token: Some(record.token.clone()),
        }
    }

    pub fn delete(key: &ServiceKey) -> Self {
        Self {
            operation: Operation::Delete,
            agent_name: key.agent_name.clone(),
            endpoint_name: key.endpoint_name.clone(),
            endpoint_type: key.endpoint_type.clone(),
            annotations: None,
            url: None,
            token: None,
        }
    }

    /// Rebuild the service key this event refers to.
    pub fn key(&self) -> ServiceKey {
        ServiceKey::new(&self.agent_name, &self.endpoint_name, &self.endpoint_type)
    }
}
