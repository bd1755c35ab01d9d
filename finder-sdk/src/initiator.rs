//! Search initiator: one query builder + parser pair, one round trip
//!
//! The initiator is stateless between calls; every search scopes its own
//! request/response pair, so overlapping searches through the same
//! initiator cannot corrupt each other.

use crate::backend::{BackendKind, QueryBuilder, ResponseParser, SearchContext};
use crate::data_set::MeetingDataSet;
use crate::error::SearchError;
use crate::search::{SearchConstraint, SearchRefinement};
use crate::transport::Transport;

/// The dual-channel completion of one search.
///
/// Exactly one outcome is produced per call. The channels are populated
/// the way the contract documents them and no other way:
///
/// - success: `data = Some(set)`, `error = None`
/// - configuration or transport failure: `data = None`, `error = Some(_)`
/// - top-level parse failure: `data = Some(empty set)`, `error = Some(_)`
///   so callers can always inspect `.meetings` without a null check
#[derive(Debug)]
pub struct SearchOutcome {
    pub data: Option<MeetingDataSet>,
    pub error: Option<SearchError>,
}

impl SearchOutcome {
    pub(crate) fn success(data: MeetingDataSet) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    pub(crate) fn failure(error: SearchError) -> Self {
        Self {
            data: None,
            error: Some(error),
        }
    }

    pub(crate) fn parse_failure(empty: MeetingDataSet, error: SearchError) -> Self {
        Self {
            data: Some(empty),
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Owns the strategy pair for one backend protocol.
pub struct Initiator {
    query_builder: Box<dyn QueryBuilder>,
    parser: Box<dyn ResponseParser>,
}

impl Initiator {
    pub fn new(kind: BackendKind) -> Self {
        let (query_builder, parser) = kind.strategies();
        Self {
            query_builder,
            parser,
        }
    }

    /// Build the request, run it through the transport, parse and refine
    /// the response. No retries: a failure is surfaced once, immediately.
    pub async fn search(
        &self,
        transport: &Transport,
        organization_key: &str,
        constraint: &SearchConstraint,
        refinements: &[SearchRefinement],
    ) -> SearchOutcome {
        let Some(url) =
            self.query_builder
                .build_query(transport.server_url(), constraint, refinements)
        else {
            return SearchOutcome::failure(SearchError::Config(format!(
                "missing or malformed server URL: '{}'",
                transport.server_url()
            )));
        };

        tracing::debug!(url = %url, organization = organization_key, "dispatching search");

        let raw = match transport.fetch(&url).await {
            Ok(bytes) => bytes,
            Err(error) => {
                tracing::warn!(%error, organization = organization_key, "search transport failed");
                return SearchOutcome::failure(error.into());
            }
        };

        let ctx = SearchContext {
            organization_key,
            constraint,
            refinements,
        };
        match self.parser.parse(&ctx, &raw) {
            Ok(data) => {
                tracing::info!(
                    organization = organization_key,
                    meetings = data.len(),
                    "search completed"
                );
                SearchOutcome::success(data)
            }
            Err(error) => {
                tracing::warn!(%error, organization = organization_key, "response parse failed");
                SearchOutcome::parse_failure(
                    MeetingDataSet::empty(constraint.clone(), refinements.to_vec()),
                    error.into(),
                )
            }
        }
    }
}
