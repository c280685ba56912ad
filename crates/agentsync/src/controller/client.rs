// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP client for the controller API.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Url};

use crate::controller::wire::{self, CredentialsRequest};
use crate::controller::{Controller, ControllerFuture, ServiceCredentials};
use crate::error::SyncError;
use crate::snapshot::{AgentSession, ServiceKey};

const AGENT_STATISTICS_PATH: &str = "/api/v1/getAgentStatistics";
const GENERATE_CREDENTIALS_PATH: &str = "/api/v1/generateServiceCredentials";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(30);
const POOL_MAX_IDLE_PER_HOST: usize = 20;

/// Authenticated client for one controller.
///
/// The underlying connection pool is created once and reused for every
/// request, both within a pass and across passes.
#[derive(Debug, Clone)]
pub struct ControllerClient {
    base_url: String,
    token: String,
    client: Client,
}

impl ControllerClient {
    /// Build a client for `base_url`, authenticating with `token` as a
    /// bearer credential.
    pub fn new(base_url: &str, token: &str) -> Result<Self, SyncError> {
        if token.is_empty() {
            return Err(SyncError::Configuration("controller token is empty".to_owned()));
        }
        Url::parse(base_url).map_err(|e| {
            SyncError::Configuration(format!("invalid controller url {base_url:?}: {e}"))
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .pool_idle_timeout(POOL_IDLE_TIMEOUT)
            .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
            .build()
            .map_err(|e| SyncError::Transport(format!("making http client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            token: token.to_owned(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn apply_auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.bearer_auth(&self.token)
    }

    /// Send a request and return the body of a 2xx response.
    async fn send(&self, req: reqwest::RequestBuilder, context: &str) -> Result<Vec<u8>, SyncError> {
        let resp = self
            .apply_auth(req)
            .send()
            .await
            .map_err(|e| SyncError::from_reqwest(context, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SyncError::Protocol(format!(
                "{context}: http status {}",
                status.as_u16()
            )));
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| SyncError::Protocol(format!("{context}: reading body: {e}")))?;
        Ok(bytes.to_vec())
    }

    /// `GET /api/v1/getAgentStatistics`
    pub async fn list_connected_agents(&self) -> Result<Vec<AgentSession>, SyncError> {
        let req = self.client.get(self.url(AGENT_STATISTICS_PATH));
        let body = self.send(req, "fetching connected agents").await?;
        let sessions = wire::parse_connected_agents(&body)?;
        tracing::debug!(sessions = sessions.len(), "fetched connected agents");
        Ok(sessions)
    }

    /// `POST /api/v1/generateServiceCredentials`
    pub async fn fetch_credentials(&self, key: &ServiceKey) -> Result<ServiceCredentials, SyncError> {
        let req =
            self.client.post(self.url(GENERATE_CREDENTIALS_PATH)).json(&CredentialsRequest::from(key));
        let body = self.send(req, "fetching service credentials").await?;
        let creds = wire::parse_credentials(&body)?;
        tracing::debug!(service = %key, credential_type = %creds.credential_type, "fetched service credentials");
        Ok(ServiceCredentials { url: creds.url, token: creds.credential.password })
    }
}

impl Controller for ControllerClient {
    fn list_connected_agents(&self) -> ControllerFuture<'_, Vec<AgentSession>> {
        Box::pin(ControllerClient::list_connected_agents(self))
    }

    fn fetch_credentials<'a>(
        &'a self,
        key: &'a ServiceKey,
    ) -> ControllerFuture<'a, ServiceCredentials> {
        Box::pin(ControllerClient::fetch_credentials(self, key))
    }
}
