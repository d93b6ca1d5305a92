//! Knowledge store HTTP client
//!
//! Used by rqa-ms (context lookup) and rqa-va (factual cross-reference).
//! Every request is bounded by the timeout given at construction; there is
//! no retry.

use crate::api::KnowledgeMatch;
use crate::{Error, Result};
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("rqa/", env!("CARGO_PKG_VERSION"));

/// Client for the rqa-ks HTTP API
#[derive(Debug, Clone)]
pub struct KnowledgeStoreClient {
    http_client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl KnowledgeStoreClient {
    /// Create a client for `base_url` (e.g. `http://127.0.0.1:8000`)
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// `GET /manual_search_get?question=...`
    ///
    /// Non-success statuses and undecodable bodies are errors; a well-formed
    /// "not found" body is `Ok` with `found == false`.
    pub async fn search(&self, question: &str) -> Result<KnowledgeMatch> {
        let url = format!("{}/manual_search_get", self.base_url);
        debug!(url = %url, "Querying knowledge store");

        let response = self
            .http_client
            .get(&url)
            .query(&[("question", question)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Http(format!(
                "knowledge store returned {} for {}",
                status.as_u16(),
                url
            )));
        }

        let found: KnowledgeMatch = response
            .json()
            .await
            .map_err(|e| Error::Http(format!("invalid knowledge store response: {}", e)))?;

        debug!(found = found.found, confidence = found.confidence, "Knowledge store replied");
        Ok(found)
    }

    /// `GET /health`; `Ok(true)` only for a success status
    pub async fn health(&self) -> Result<bool> {
        let url = format!("{}/health", self.base_url);
        let response = self.http_client.get(&url).send().await?;
        Ok(response.status().is_success())
    }
}
