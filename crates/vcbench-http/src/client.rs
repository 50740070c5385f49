//! Agent admin API client backed by `reqwest`.
//!
//! Every request carries the JSON content headers and, when configured, the
//! `x-api-key` header. Non-success statuses become
//! [`IssuanceError::Service`], connection-level failures
//! [`IssuanceError::Transport`], and unexpected bodies
//! [`IssuanceError::Decode`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;

use vcbench_core::{CredentialOffer, ExchangeHandle, ExchangeState, IssuanceError, IssuanceService};

use crate::types::{ExchangeRecord, SendResponse};

const API_KEY_HEADER: &str = "x-api-key";

/// Configuration for `AgentAdminClient`.
#[derive(Debug, Clone)]
pub struct AgentClientConfig {
    /// Base URL of the admin API, e.g. `http://localhost:8034`.
    pub admin_url: String,
    /// Sent as `x-api-key` when present and non-empty.
    pub api_key: Option<String>,
    pub request_timeout: Duration,
}

impl Default for AgentClientConfig {
    fn default() -> Self {
        Self {
            admin_url: "http://localhost:8034".into(),
            api_key: None,
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl AgentClientConfig {
    pub fn new(admin_url: impl Into<String>) -> Self {
        Self {
            admin_url: admin_url.into(),
            ..Default::default()
        }
    }

    pub fn api_key(mut self, key: Option<String>) -> Self {
        self.api_key = key;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Client for one agent's admin API.
pub struct AgentAdminClient {
    base_url: String,
    http: reqwest::Client,
}

impl AgentAdminClient {
    /// Build a client; fails if the API key is not a valid header value.
    pub fn new(config: AgentClientConfig) -> Result<Self, IssuanceError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(key) = config.api_key.as_deref().filter(|k| !k.is_empty()) {
            let mut value = HeaderValue::from_str(key)
                .map_err(|e| IssuanceError::Config(format!("invalid admin API key: {e}")))?;
            value.set_sensitive(true);
            headers.insert(HeaderName::from_static(API_KEY_HEADER), value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| IssuanceError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: config.admin_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Create with default settings for `admin_url`.
    pub fn default_for(admin_url: impl Into<String>) -> Result<Self, IssuanceError> {
        Self::new(AgentClientConfig::new(admin_url))
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// `GET` a path and decode the JSON body.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, IssuanceError> {
        let req = self.http.get(self.url(path)).query(query);
        self.execute(req).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<T, IssuanceError> {
        let resp = req
            .send()
            .await
            .map_err(|e| IssuanceError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(IssuanceError::Service {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| IssuanceError::Transport(e.to_string()))?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl IssuanceService for AgentAdminClient {
    async fn submit(&self, offer: &CredentialOffer) -> Result<ExchangeHandle, IssuanceError> {
        let req = self.http.post(self.url("issue-credential/send")).json(offer);
        let resp: SendResponse = self.execute(req).await?;
        if let Some(state) = &resp.state {
            tracing::debug!(exchange = %resp.credential_exchange_id, %state, "offer accepted");
        }
        Ok(ExchangeHandle::new(resp.credential_exchange_id))
    }

    async fn status(&self, handle: &ExchangeHandle) -> Result<ExchangeState, IssuanceError> {
        let path = format!("issue-credential/records/{handle}");
        let record: ExchangeRecord = self.get_json(&path, &[]).await?;
        Ok(record.state)
    }

    fn endpoint(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use vcbench_core::{AttributeTemplate, OfferContext, OfferFactory};

    fn offer() -> CredentialOffer {
        OfferFactory::new(
            OfferContext::new("did:2:reg:1.0", "reg", "1.0", "did:3:CL:7:default", "conn-1"),
            AttributeTemplate::from_names(["entity_name"]),
        )
        .build(&mut StdRng::seed_from_u64(7))
    }

    #[tokio::test]
    async fn submit_sends_offer_with_api_key() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/issue-credential/send")
            .match_header("x-api-key", "secret")
            .match_header("content-type", "application/json")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "connection_id": "conn-1",
                "cred_def_id": "did:3:CL:7:default",
                "issuer_did": "did"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"credential_exchange_id":"ex-1","state":"offer_sent"}"#)
            .create_async()
            .await;

        let client = AgentAdminClient::new(
            AgentClientConfig::new(server.url()).api_key(Some("secret".into())),
        )
        .unwrap();
        let handle = client.submit(&offer()).await.unwrap();

        assert_eq!(handle.as_str(), "ex-1");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn empty_api_key_is_not_sent() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/issue-credential/records/ex-1")
            .match_header("x-api-key", mockito::Matcher::Missing)
            .with_status(200)
            .with_body(r#"{"credential_exchange_id":"ex-1","state":"credential_issued"}"#)
            .create_async()
            .await;

        let client = AgentAdminClient::new(
            AgentClientConfig::new(server.url()).api_key(Some(String::new())),
        )
        .unwrap();
        let state = client.status(&ExchangeHandle::new("ex-1")).await.unwrap();

        assert_eq!(state, ExchangeState::CredentialIssued);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn status_reports_acked() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/issue-credential/records/ex-9")
            .with_status(200)
            .with_body(r#"{"state":"credential_acked"}"#)
            .create_async()
            .await;

        let client = AgentAdminClient::default_for(format!("{}/", server.url())).unwrap();
        let state = client.status(&ExchangeHandle::new("ex-9")).await.unwrap();
        assert!(state.is_acknowledged());
    }

    #[tokio::test]
    async fn non_success_status_is_service_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/issue-credential/send")
            .with_status(503)
            .with_body("agent busy")
            .create_async()
            .await;

        let client = AgentAdminClient::default_for(server.url()).unwrap();
        let err = client.submit(&offer()).await.unwrap_err();
        match err {
            IssuanceError::Service { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "agent busy");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/issue-credential/records/ex-1")
            .with_status(200)
            .with_body(r#"{"credential_exchange_id":"ex-1"}"#)
            .create_async()
            .await;

        let client = AgentAdminClient::default_for(server.url()).unwrap();
        let err = client.status(&ExchangeHandle::new("ex-1")).await.unwrap_err();
        assert!(matches!(err, IssuanceError::Decode(_)), "got {err}");
    }

    #[tokio::test]
    async fn unreachable_agent_is_transport_error() {
        let client = AgentAdminClient::new(
            AgentClientConfig::new("http://127.0.0.1:1").request_timeout(Duration::from_secs(2)),
        )
        .unwrap();
        let err = client.status(&ExchangeHandle::new("ex-1")).await.unwrap_err();
        assert!(matches!(err, IssuanceError::Transport(_)), "got {err}");
        assert!(err.is_retryable());
    }

    #[test]
    fn invalid_api_key_rejected() {
        let err = AgentAdminClient::new(
            AgentClientConfig::default().api_key(Some("bad\nkey".into())),
        )
        .err()
        .unwrap();
        assert!(matches!(err, IssuanceError::Config(_)));
    }
}
