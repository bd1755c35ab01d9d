//! Search constraints and refinements
//!
//! Pure input data. Validation happens where the input is consumed (query
//! builder and refinement engine each re-validate independently), because
//! callers are not required to pre-validate.

use crate::geo::Coordinate;
use crate::model::{MeetingType, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ops::RangeInclusive;

/// Seconds in a day minus one; the last encodable start time (23:59:59)
pub const MAX_START_TIME_SECONDS: u32 = 86_399;

/// The spatial/lookup mode of a search. Exactly one variant is active per
/// search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "mode")]
pub enum SearchConstraint {
    /// No server-side constraint; the backend decides what to return
    None,
    /// Everything within a fixed radius of a center point
    FixedRadius {
        center: Coordinate,
        radius_meters: f64,
    },
    /// Server expands the radius until at least `minimum_results` meetings
    /// are found or the cap is hit. `None` cap means "no cap" (never a
    /// numeric sentinel).
    AutoRadius {
        center: Coordinate,
        minimum_results: u32,
        max_radius_meters: Option<f64>,
    },
    /// Direct lookup by composite 64-bit IDs, bypassing spatial search
    MeetingIds { ids: Vec<u64> },
}

impl SearchConstraint {
    /// Center point of the spatial modes, if any.
    pub fn center(&self) -> Option<Coordinate> {
        match self {
            SearchConstraint::FixedRadius { center, .. }
            | SearchConstraint::AutoRadius { center, .. } => Some(*center),
            _ => None,
        }
    }
}

/// One client-requested filter. Active refinements are AND-combined.
///
/// Only `Weekdays` and `StartTimeRange` can be expressed in backend query
/// languages; the rest are enforced exclusively by the refinement engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchRefinement {
    /// Keep only meetings on these weekdays
    Weekdays(BTreeSet<Weekday>),
    /// Keep only meetings starting within this range of seconds since
    /// local midnight, inclusive at both ends
    StartTimeRange(RangeInclusive<u32>),
    /// Keep only meetings of these venue classifications
    VenueTypes(BTreeSet<MeetingType>),
    /// Case-insensitive free-text match over name, comments, and venue text
    Text(String),
    /// Compute each meeting's distance from this point (overriding the
    /// distance implied by the spatial search). Not a filter.
    DistanceFrom(Coordinate),
}

impl SearchRefinement {
    /// Validation predicate: a refinement that fails this is silently
    /// dropped wherever it would be consumed, never a fatal error.
    ///
    /// An empty or full weekday set is a no-op filter and is dropped. A
    /// start-time range is dropped when its bounds leave `[0, 86399]` or
    /// are inverted/degenerate.
    pub fn is_effective(&self) -> bool {
        match self {
            SearchRefinement::Weekdays(days) => !days.is_empty() && days.len() < 7,
            SearchRefinement::StartTimeRange(range) => {
                range.start() < range.end() && *range.end() <= MAX_START_TIME_SECONDS
            }
            SearchRefinement::VenueTypes(types) => !types.is_empty(),
            SearchRefinement::Text(text) => !text.trim().is_empty(),
            SearchRefinement::DistanceFrom(point) => point.is_valid(),
        }
    }
}

/// The refinements that survive validation, in caller order.
pub fn effective_refinements(
    refinements: &[SearchRefinement],
) -> impl Iterator<Item = &SearchRefinement> {
    refinements.iter().filter(|r| r.is_effective())
}
