//! Client-side refinement engine
//!
//! Query builders can only push `Weekdays` and `StartTimeRange` to the
//! server, and even those are advisory — a backend may ignore them. This
//! engine is the safety net: it re-validates every active refinement
//! against the fetched meetings, so the caller-visible result always
//! satisfies 100% of what was asked for. It also fills in the one
//! attribute no backend can compute: distance from an arbitrary point.
//!
//! The whole pass is synchronous, CPU-bound, and side-effect-free, so it
//! is safe to run on whatever thread delivered the response. Running it
//! twice over an already-refined set is a no-op.

use crate::geo::{great_circle_distance, Coordinate};
use crate::model::Meeting;
use crate::search::{effective_refinements, SearchConstraint, SearchRefinement};

/// Apply all effective refinements to `meetings`, returning the surviving
/// set in parser order.
pub fn refine(
    mut meetings: Vec<Meeting>,
    constraint: &SearchConstraint,
    refinements: &[SearchRefinement],
) -> Vec<Meeting> {
    // Distance origin: an explicit DistanceFrom refinement always wins
    // over the spatial search's own center.
    let origin = refinements
        .iter()
        .find_map(|r| match r {
            SearchRefinement::DistanceFrom(point) if r.is_effective() => Some(*point),
            _ => None,
        })
        .or_else(|| constraint.center().filter(Coordinate::is_valid));

    if let Some(origin) = origin {
        for meeting in &mut meetings {
            meeting.distance_meters = meeting
                .coordinate()
                .map(|at| great_circle_distance(origin, at));
        }
    }

    let before = meetings.len();
    meetings.retain(|meeting| effective_refinements(refinements).all(|r| matches(meeting, r)));
    if meetings.len() != before {
        tracing::debug!(
            dropped = before - meetings.len(),
            kept = meetings.len(),
            "refinement engine filtered server results"
        );
    }

    meetings
}

/// Does one meeting satisfy one refinement?
fn matches(meeting: &Meeting, refinement: &SearchRefinement) -> bool {
    match refinement {
        SearchRefinement::Weekdays(days) => days
            .iter()
            .any(|day| day.index() == meeting.weekday_index),
        SearchRefinement::StartTimeRange(range) => range.contains(&meeting.start_time_seconds()),
        SearchRefinement::VenueTypes(types) => types.contains(&meeting.meeting_type()),
        SearchRefinement::Text(text) => matches_text(meeting, text),
        // Computation, not a filter
        SearchRefinement::DistanceFrom(_) => true,
    }
}

fn matches_text(meeting: &Meeting, text: &str) -> bool {
    let needle = text.trim().to_lowercase();
    let mut haystacks: Vec<&str> = vec![&meeting.name, &meeting.comments];
    if let Some(physical) = &meeting.physical_location {
        haystacks.push(&physical.venue_name);
        haystacks.push(&physical.address.street);
        haystacks.push(&physical.address.city);
    }
    if let Some(virtual_loc) = &meeting.virtual_location {
        haystacks.push(&virtual_loc.extra_info);
        for venue in [&virtual_loc.video, &virtual_loc.phone].into_iter().flatten() {
            haystacks.push(&venue.description);
        }
    }
    haystacks
        .iter()
        .any(|haystack| haystack.to_lowercase().contains(&needle))
}

/// Ascending distance, unknown distances last, meeting ID as the
/// tie-break so the order is total.
pub fn sort_by_distance(meetings: &mut [Meeting]) {
    meetings.sort_by(|a, b| {
        match (a.distance_meters, b.distance_meters) {
            (Some(da), Some(db)) => da.total_cmp(&db),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        }
        .then(a.id.cmp(&b.id))
    });
}
