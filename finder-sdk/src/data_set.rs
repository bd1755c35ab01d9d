//! Immutable search-result snapshot

use crate::model::{Meeting, MeetingType};
use crate::search::{SearchConstraint, SearchRefinement};
use serde::{Deserialize, Serialize};

/// The result of one completed search: the constraint and refinements that
/// were used, and the meetings that satisfied them.
///
/// Constructed once per search by the response parser (after the
/// refinement engine has run) and never mutated afterwards, apart from the
/// caller-driven [`sort_by_distance`](MeetingDataSet::sort_by_distance).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetingDataSet {
    pub constraint: SearchConstraint,
    pub refinements: Vec<SearchRefinement>,
    pub meetings: Vec<Meeting>,
    /// Opaque caller context attached at search time
    pub extra_context: Option<serde_json::Value>,
}

impl MeetingDataSet {
    pub fn new(
        constraint: SearchConstraint,
        refinements: Vec<SearchRefinement>,
        meetings: Vec<Meeting>,
    ) -> Self {
        Self {
            constraint,
            refinements,
            meetings,
            extra_context: None,
        }
    }

    /// An empty set carrying the search parameters. Paired with the error
    /// channel on top-level parse failure so callers can always inspect
    /// `.meetings` without a null check.
    pub fn empty(constraint: SearchConstraint, refinements: Vec<SearchRefinement>) -> Self {
        Self::new(constraint, refinements, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.meetings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meetings.is_empty()
    }

    /// Meetings with at least one usable location. Display surfaces that
    /// require validity read this instead of `.meetings`.
    pub fn valid_meetings(&self) -> impl Iterator<Item = &Meeting> {
        self.meetings
            .iter()
            .filter(|m| m.meeting_type() != MeetingType::Invalid)
    }

    /// Sort ascending by computed distance, unknown distances last, ties
    /// broken by meeting ID so the order is total.
    pub fn sort_by_distance(&mut self) {
        crate::refine::sort_by_distance(&mut self.meetings);
    }
}
