//! Backend B: the successor meeting-server protocol
//!
//! Query parameters are flat (`geo_radius` in kilometers, `geocenter_lng`/
//! `geocenter_lat`, `minimum_found`, `ids=(server,local),...`,
//! `weekdays=csv`, `start_time`/`end_time` in seconds since midnight) and
//! the response envelope is natively typed JSON with nested per-meeting
//! format, address, and virtual-information objects. Records are decoded
//! one at a time so a single malformed meeting never poisons the batch.

use crate::backend::zone::resolve_time_zone;
use crate::backend::{
    format_query_float, widened_time_bounds, QueryBuilder, ResponseParser, SearchContext,
};
use crate::data_set::MeetingDataSet;
use crate::error::ParseError;
use crate::geo::Coordinate;
use crate::model::{ids, Format, Meeting, PhysicalLocation, PostalAddress, VirtualLocation, VirtualVenue};
use crate::refine;
use crate::search::{effective_refinements, SearchConstraint, SearchRefinement};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use url::Url;

pub struct MeetingServerQueryBuilder;

impl QueryBuilder for MeetingServerQueryBuilder {
    fn build_query(
        &self,
        server_url: &str,
        constraint: &SearchConstraint,
        refinements: &[SearchRefinement],
    ) -> Option<Url> {
        let mut url = Url::parse(server_url.trim()).ok()?;
        if !matches!(url.scheme(), "http" | "https") {
            return None;
        }

        {
            let mut query = url.query_pairs_mut();

            match constraint {
                SearchConstraint::None => {}
                SearchConstraint::FixedRadius {
                    center,
                    radius_meters,
                } => {
                    query.append_pair("geo_radius", &format_query_float(radius_meters / 1000.0));
                    query.append_pair("geocenter_lng", &center.longitude.to_string());
                    query.append_pair("geocenter_lat", &center.latitude.to_string());
                }
                SearchConstraint::AutoRadius {
                    center,
                    minimum_results,
                    max_radius_meters,
                } => {
                    if let Some(cap) = max_radius_meters {
                        query.append_pair("geo_radius", &format_query_float(cap / 1000.0));
                    }
                    query.append_pair("geocenter_lng", &center.longitude.to_string());
                    query.append_pair("geocenter_lat", &center.latitude.to_string());
                    query.append_pair("minimum_found", &minimum_results.to_string());
                }
                SearchConstraint::MeetingIds { ids: meeting_ids } => {
                    let pairs: Vec<String> = meeting_ids
                        .iter()
                        .map(|id| {
                            let (server, local) = ids::decompose(*id);
                            format!("({server},{local})")
                        })
                        .collect();
                    query.append_pair("ids", &pairs.join(","));
                }
            }

            for refinement in effective_refinements(refinements) {
                match refinement {
                    SearchRefinement::Weekdays(days) => {
                        let csv: Vec<String> =
                            days.iter().map(|day| day.index().to_string()).collect();
                        query.append_pair("weekdays", &csv.join(","));
                    }
                    SearchRefinement::StartTimeRange(range) => {
                        let (lower, upper) = widened_time_bounds(range);
                        query.append_pair("start_time", &lower.to_string());
                        query.append_pair("end_time", &upper.to_string());
                    }
                    SearchRefinement::VenueTypes(_)
                    | SearchRefinement::Text(_)
                    | SearchRefinement::DistanceFrom(_) => {}
                }
            }
        }

        Some(url)
    }
}

/// Raw wire shapes. Kept private to this parser; the envelope schema is
/// this backend's own business.
#[derive(Debug, Deserialize)]
struct RawEnvelope {
    #[serde(default)]
    meetings: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct RawMeeting {
    server_id: u64,
    meeting_id: u64,
    weekday: u8,
    /// Seconds since local midnight
    start_time: u32,
    #[serde(default)]
    duration: u64,
    #[serde(default)]
    name: String,
    #[serde(default)]
    comments: String,
    #[serde(default)]
    time_zone: Option<String>,
    /// RFC 3339 date for one-off entries (`weekday == 0`)
    #[serde(default)]
    next_date: Option<DateTime<Utc>>,
    #[serde(default)]
    formats: Vec<RawFormat>,
    #[serde(default)]
    physical_address: Option<RawAddress>,
    #[serde(default)]
    virtual_information: Option<RawVirtual>,
}

#[derive(Debug, Deserialize)]
struct RawFormat {
    id: u64,
    #[serde(default)]
    key: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct RawAddress {
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    info: String,
    #[serde(default)]
    street: String,
    #[serde(default)]
    city: String,
    #[serde(default)]
    province: String,
    #[serde(default)]
    postal_code: String,
    #[serde(default)]
    nation: String,
    #[serde(default)]
    time_zone: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawVirtual {
    #[serde(default)]
    video: Option<RawVenue>,
    #[serde(default)]
    phone: Option<RawVenue>,
    #[serde(default)]
    info: String,
}

#[derive(Debug, Deserialize)]
struct RawVenue {
    #[serde(default)]
    description: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    meeting_id: Option<String>,
    #[serde(default)]
    password: Option<String>,
    #[serde(default)]
    time_zone: Option<String>,
}

pub struct MeetingServerResponseParser;

impl ResponseParser for MeetingServerResponseParser {
    fn parse(&self, ctx: &SearchContext<'_>, raw: &[u8]) -> Result<MeetingDataSet, ParseError> {
        let envelope: RawEnvelope = serde_json::from_slice(raw)
            .map_err(|e| ParseError::JsonParseFailure(e.to_string()))?;

        let mut meetings = Vec::with_capacity(envelope.meetings.len());
        for record in envelope.meetings {
            match serde_json::from_value::<RawMeeting>(record) {
                Ok(raw_meeting) => {
                    if let Some(meeting) = normalize(raw_meeting, ctx.organization_key) {
                        meetings.push(meeting);
                    }
                }
                Err(error) => {
                    tracing::warn!(%error, "dropping malformed meeting-server record");
                }
            }
        }

        let meetings = refine::refine(meetings, ctx.constraint, ctx.refinements);
        Ok(MeetingDataSet::new(
            ctx.constraint.clone(),
            ctx.refinements.to_vec(),
            meetings,
        ))
    }
}

fn normalize(raw: RawMeeting, organization_key: &str) -> Option<Meeting> {
    if raw.weekday > 7 || raw.start_time > 86_400 {
        return None;
    }

    let physical_location = raw.physical_address.as_ref().and_then(|addr| {
        let address = PostalAddress {
            street: addr.street.clone(),
            city: addr.city.clone(),
            province: addr.province.clone(),
            postal_code: addr.postal_code.clone(),
            nation: addr.nation.clone(),
        };
        address.is_present().then(|| PhysicalLocation {
            coordinate: Coordinate::new(addr.latitude, addr.longitude),
            venue_name: addr.info.clone(),
            address,
            time_zone: addr.time_zone.as_deref().and_then(|tz| tz.parse().ok()),
        })
    });

    let virtual_location = raw.virtual_information.as_ref().and_then(|info| {
        let location = VirtualLocation {
            video: info.video.as_ref().map(venue),
            phone: info.phone.as_ref().map(venue),
            extra_info: info.info.clone(),
        };
        location.has_venue().then_some(location)
    });

    let time_zone = resolve_time_zone(
        raw.time_zone.as_deref(),
        physical_location.as_ref().map(|loc| &loc.address),
    );

    Some(Meeting {
        id: ids::compose(raw.server_id, raw.meeting_id),
        weekday_index: raw.weekday,
        next_date: raw.next_date.filter(|_| raw.weekday == 0),
        start_time: military_from_seconds(raw.start_time),
        duration_seconds: raw.duration,
        time_zone,
        name: raw.name,
        comments: raw.comments,
        formats: raw
            .formats
            .into_iter()
            .map(|f| Format {
                id: f.id,
                key: f.key,
                name: f.name,
                description: f.description,
            })
            .collect(),
        physical_location,
        virtual_location,
        distance_meters: None,
        organization_key: organization_key.to_string(),
    })
}

fn venue(raw: &RawVenue) -> VirtualVenue {
    VirtualVenue {
        description: raw.description.clone(),
        time_zone: raw.time_zone.as_deref().and_then(|tz| tz.parse().ok()),
        url: raw.url.as_deref().and_then(|u| Url::parse(u).ok()),
        meeting_id: raw.meeting_id.clone(),
        password: raw.password.clone(),
    }
}

/// Seconds since midnight to the model's military-time integer; 86400
/// becomes 2400 ("midnight tonight").
fn military_from_seconds(seconds: u32) -> u16 {
    let hours = seconds / 3600;
    let minutes = seconds % 3600 / 60;
    (hours * 100 + minutes) as u16
}
