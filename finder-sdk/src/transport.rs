//! Network collaborator and per-organization transport wiring

use crate::backend::BackendKind;
use crate::error::TransportError;
use crate::initiator::{Initiator, SearchOutcome};
use crate::search::{SearchConstraint, SearchRefinement};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

const USER_AGENT: &str = concat!("finder-sdk/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The network collaborator: given a fully-formed URL, return the raw
/// response bytes or a transport error. Implementations own all policy
/// below that line (pooling, TLS, timeouts); the SDK core owns none of it.
///
/// Tests implement this with canned bytes so the whole pipeline runs
/// without a socket.
#[async_trait]
pub trait HttpFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, TransportError>;
}

/// Production fetcher backed by a shared reqwest client.
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpFetcher for ReqwestFetcher {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, TransportError> {
        let response = self
            .client
            .get(url.clone())
            // Directory data changes out from under caches; always revalidate
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TransportError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

/// One organization's connection to one backend server: the server root
/// URL, the fetcher, and the initiator that drives the strategy pair.
pub struct Transport {
    server_url: String,
    fetcher: Arc<dyn HttpFetcher>,
    initiator: Initiator,
}

impl Transport {
    pub fn new(kind: BackendKind, server_url: String, fetcher: Arc<dyn HttpFetcher>) -> Self {
        Self {
            server_url,
            fetcher,
            initiator: Initiator::new(kind),
        }
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub(crate) async fn fetch(&self, url: &Url) -> Result<Vec<u8>, TransportError> {
        self.fetcher.fetch(url).await
    }

    /// Run one search round trip through this transport's initiator.
    pub async fn search(
        &self,
        organization_key: &str,
        constraint: &SearchConstraint,
        refinements: &[SearchRefinement],
    ) -> SearchOutcome {
        self.initiator
            .search(self, organization_key, constraint, refinements)
            .await
    }
}
