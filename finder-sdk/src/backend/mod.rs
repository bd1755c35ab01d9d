//! Backend strategy pairs
//!
//! Each supported directory protocol is a (query builder, response parser)
//! pair of small stateless strategy objects behind shared traits. The
//! initiator picks the pair from [`BackendKind`] at configuration time;
//! nothing else in the SDK knows which protocol it is talking to.

pub mod bmlt;
pub mod meeting_server;
mod zone;

use crate::data_set::MeetingDataSet;
use crate::error::ParseError;
use crate::search::{SearchConstraint, SearchRefinement};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use url::Url;

/// Which wire protocol a server speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackendKind {
    /// Backend A: the legacy BMLT aggregator protocol (string-typed JSON)
    Bmlt,
    /// Backend B: the successor meeting-server protocol (natively-typed JSON)
    MeetingServer,
}

impl BackendKind {
    /// The strategy pair for this protocol.
    pub fn strategies(self) -> (Box<dyn QueryBuilder>, Box<dyn ResponseParser>) {
        match self {
            BackendKind::Bmlt => (
                Box::new(bmlt::BmltQueryBuilder),
                Box::new(bmlt::BmltResponseParser),
            ),
            BackendKind::MeetingServer => (
                Box::new(meeting_server::MeetingServerQueryBuilder),
                Box::new(meeting_server::MeetingServerResponseParser),
            ),
        }
    }
}

impl std::str::FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bmlt" => Ok(BackendKind::Bmlt),
            "meeting-server" => Ok(BackendKind::MeetingServer),
            other => Err(format!(
                "unknown backend '{other}' (expected 'bmlt' or 'meeting-server')"
            )),
        }
    }
}

/// Parameters of the search a parser is normalizing for.
pub struct SearchContext<'a> {
    /// Key of the organization that owns the queried server
    pub organization_key: &'a str,
    pub constraint: &'a SearchConstraint,
    pub refinements: &'a [SearchRefinement],
}

/// Translates a search specification into a protocol-specific URL.
pub trait QueryBuilder: Send + Sync {
    /// Build the request URL. Returns `None` only when `server_url` is
    /// absent or unparseable; malformed individual refinements are
    /// dropped from the query instead (the refinement engine still
    /// enforces them client-side).
    fn build_query(
        &self,
        server_url: &str,
        constraint: &SearchConstraint,
        refinements: &[SearchRefinement],
    ) -> Option<Url>;
}

/// Converts raw response bytes into a refined [`MeetingDataSet`].
pub trait ResponseParser: Send + Sync {
    /// Decode the protocol envelope, normalize each record into the
    /// canonical model, and run the refinement engine over the result.
    ///
    /// Individual malformed records are dropped; only an unparseable
    /// top-level body is an error.
    fn parse(&self, ctx: &SearchContext<'_>, raw: &[u8]) -> Result<MeetingDataSet, ParseError>;
}

/// Widen an inclusive start-time range by one minute on each side, clamped
/// to the day's edges (00:00 / 23:59). Backend query semantics are
/// exclusive at the boundary while callers expect inclusive matching, so
/// the encoded window is widened rather than wrapped.
pub(crate) fn widened_time_bounds(range: &RangeInclusive<u32>) -> (u32, u32) {
    const LAST_MINUTE: u32 = 23 * 3600 + 59 * 60;
    let lower = range.start().saturating_sub(60);
    let upper = range.end().saturating_add(60).min(LAST_MINUTE);
    (lower, upper)
}

/// Format a float for a query string, keeping a decimal point so servers
/// that distinguish int/float fields parse it as a float ("1" -> "1.0").
pub(crate) fn format_query_float(value: f64) -> String {
    let s = format!("{value}");
    if s.contains('.') || s.contains('e') {
        s
    } else {
        format!("{s}.0")
    }
}
