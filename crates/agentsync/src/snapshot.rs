// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent snapshot resolution: picks the newest session per agent and
//! flattens its accepted endpoints into a candidate-service table.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// One controller-reported connection of an agent.
///
/// Several sessions may share a name when an agent reconnects before the
/// controller has dropped the old connection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentSession {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Connect time in epoch milliseconds.
    #[serde(default, deserialize_with = "null_as_default")]
    pub connected_at: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub endpoints: Vec<Endpoint>,
}

/// A named, typed capability exposed by an agent session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, rename = "type", deserialize_with = "null_as_default")]
    pub endpoint_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub configured: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub annotations: HashMap<String, String>,
}

/// Decode an explicit JSON `null` as the field's default, same as a missing
/// field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Identity of a service across polls: `(agent, endpoint name, endpoint type)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceKey {
    pub agent_name: String,
    pub endpoint_name: String,
    pub endpoint_type: String,
}

impl ServiceKey {
    pub fn new(
        agent_name: impl Into<String>,
        endpoint_name: impl Into<String>,
        endpoint_type: impl Into<String>,
    ) -> Self {
        Self {
            agent_name: agent_name.into(),
            endpoint_name: endpoint_name.into(),
            endpoint_type: endpoint_type.into(),
        }
    }
}

/// Renders as `agent:name:type`.
impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.agent_name, self.endpoint_name, self.endpoint_type)
    }
}

/// An accepted endpoint of the newest session for an agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateService {
    pub key: ServiceKey,
    pub annotations: HashMap<String, String>,
}

/// Build the candidate-service table from a raw list of agent sessions.
///
/// Only the session with the greatest `connected_at` is used for each agent
/// name. On an exact timestamp tie the session appearing later in `sessions`
/// wins, so the result depends on input order in that case.
///
/// Endpoints must be `configured` and have a type in `accepted_types`. If one
/// session lists the same name and type twice, the later entry wins. Names are
/// not validated; empty strings simply become empty key components.
pub fn resolve(
    sessions: Vec<AgentSession>,
    accepted_types: &HashSet<String>,
) -> HashMap<ServiceKey, CandidateService> {
    let mut newest: HashMap<String, AgentSession> = HashMap::new();
    for session in sessions {
        let newer = newest
            .get(&session.name)
            .map_or(true, |current| session.connected_at >= current.connected_at);
        if newer {
            newest.insert(session.name.clone(), session);
        }
    }

    let mut candidates = HashMap::new();
    for (agent_name, session) in newest {
        for endpoint in session.endpoints {
            if !endpoint.configured || !accepted_types.contains(&endpoint.endpoint_type) {
                continue;
            }
            let key = ServiceKey::new(agent_name.clone(), endpoint.name, endpoint.endpoint_type);
            candidates.insert(
                key.clone(),
                CandidateService { key, annotations: endpoint.annotations },
            );
        }
    }
    candidates
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
