//! SDK façade: one organization, one transport, one public entry point

use crate::config::OrganizationConfig;
use crate::data_set::MeetingDataSet;
use crate::error::Result;
use crate::initiator::SearchOutcome;
use crate::search::{SearchConstraint, SearchRefinement};
use crate::transport::{HttpFetcher, ReqwestFetcher, Transport};
use std::sync::{Arc, Mutex, PoisonError};

/// An organization and its owned transport. Meetings refer back to the
/// organization by key, never by reference.
pub struct Organization {
    pub key: String,
    pub name: String,
    pub description: String,
    transport: Transport,
}

impl Organization {
    pub fn transport(&self) -> &Transport {
        &self.transport
    }
}

/// Client handle for one organization's directory server.
///
/// `search` may be called concurrently from many tasks; each call scopes
/// its own round trip. The only shared state is the last-search cache,
/// where a later completion overwriting an earlier one is the documented
/// last-writer-wins behavior, not a race to guard against.
pub struct MeetingSdk {
    organization: Organization,
    last_search: Mutex<Option<Arc<MeetingDataSet>>>,
}

impl MeetingSdk {
    /// Build an SDK instance with the production HTTP fetcher.
    pub fn new(config: OrganizationConfig) -> Result<Self> {
        let fetcher = Arc::new(ReqwestFetcher::new()?);
        Ok(Self::with_fetcher(config, fetcher))
    }

    /// Build an SDK instance around a caller-supplied fetcher. This is the
    /// seam tests use to inject canned response bytes.
    pub fn with_fetcher(config: OrganizationConfig, fetcher: Arc<dyn HttpFetcher>) -> Self {
        let transport = Transport::new(config.backend, config.server_url, fetcher);
        Self {
            organization: Organization {
                key: config.key,
                name: config.name,
                description: config.description,
                transport,
            },
            last_search: Mutex::new(None),
        }
    }

    pub fn organization(&self) -> &Organization {
        &self.organization
    }

    /// The single public search entry point.
    ///
    /// Completes exactly once with a dual-channel [`SearchOutcome`]; see
    /// its documentation for the three channel pairings. Successful data
    /// sets (including the empty set paired with a parse error) are
    /// retained as the last-search cache.
    pub async fn search(
        &self,
        constraint: SearchConstraint,
        refinements: Vec<SearchRefinement>,
    ) -> SearchOutcome {
        self.search_with_context(constraint, refinements, None).await
    }

    /// `search` with an opaque caller context attached to the resulting
    /// data set.
    pub async fn search_with_context(
        &self,
        constraint: SearchConstraint,
        refinements: Vec<SearchRefinement>,
        extra_context: Option<serde_json::Value>,
    ) -> SearchOutcome {
        let mut outcome = self
            .organization
            .transport
            .search(&self.organization.key, &constraint, &refinements)
            .await;

        if let Some(data) = &mut outcome.data {
            data.extra_context = extra_context;
            let snapshot = Arc::new(data.clone());
            *self
                .last_search
                .lock()
                .unwrap_or_else(PoisonError::into_inner) = Some(snapshot);
        }

        outcome
    }

    /// The most recent completed search, if any. A single cached value,
    /// not a history; later completions overwrite earlier ones.
    pub fn last_search(&self) -> Option<Arc<MeetingDataSet>> {
        self.last_search
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
