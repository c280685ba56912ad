// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON bodies exchanged with the controller.
//!
//! The controller reports more fields than we use (session IDs, hostnames,
//! ping times, agent-level annotations). Unknown fields are ignored and
//! missing ones fall back to their defaults.

use serde::{Deserialize, Serialize};

use crate::error::SyncError;
use crate::snapshot::{null_as_default, AgentSession, ServiceKey};

/// `GET /api/v1/getAgentStatistics` response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedAgentsResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub connected_agents: Vec<AgentSession>,
}

/// `POST /api/v1/generateServiceCredentials` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsRequest {
    pub agent_name: String,
    pub name: String,
    #[serde(rename = "type")]
    pub endpoint_type: String,
}

impl From<&ServiceKey> for CredentialsRequest {
    fn from(key: &ServiceKey) -> Self {
        Self {
            agent_name: key.agent_name.clone(),
            name: key.endpoint_name.clone(),
            endpoint_type: key.endpoint_type.clone(),
        }
    }
}

/// `POST /api/v1/generateServiceCredentials` response body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub agent_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, rename = "type", deserialize_with = "null_as_default")]
    pub endpoint_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub credential_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub credential: Credential,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credential {
    #[serde(default, deserialize_with = "null_as_default")]
    pub password: String,
}

/// Decode a connected-agents body. An empty body is an error.
pub fn parse_connected_agents(data: &[u8]) -> Result<Vec<AgentSession>, SyncError> {
    let decoded: ConnectedAgentsResponse = serde_json::from_slice(data).map_err(|e| {
        SyncError::Protocol(format!("cannot decode connected agent JSON: {e}"))
    })?;
    Ok(decoded.connected_agents)
}

/// Decode a service credentials body.
pub fn parse_credentials(data: &[u8]) -> Result<CredentialsResponse, SyncError> {
    serde_json::from_slice(data)
        .map_err(|e| SyncError::Protocol(format!("cannot decode service credentials JSON: {e}")))
}

#[cfg(test)]
#[path = "wire_tests.rs"]
mod tests;
