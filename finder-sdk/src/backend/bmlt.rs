//! Backend A: the legacy BMLT aggregator protocol
//!
//! GET query string against `{root}/client_interface/json` with
//! `switcher=GetSearchResults`. The response envelope is
//! `{"meetings": [...], "formats": [...]}` where nearly every field value
//! is a string, including numeric IDs and durations, so this parser does
//! explicit fail-soft numeric coercion at the boundary. Radii are
//! expressed in kilometers; a negative width encodes "auto-expand until at
//! least N results".

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
use serde_json::Value;
use std::collections::HashMap;
use url::Url;

pub struct BmltQueryBuilder;

impl QueryBuilder for BmltQueryBuilder {
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
        url.path_segments_mut()
            .ok()?
            .pop_if_empty()
            .extend(["client_interface", "json"]);

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("switcher", "GetSearchResults");

            match constraint {
                SearchConstraint::None => {}
                SearchConstraint::FixedRadius {
                    center,
                    radius_meters,
                } => {
                    query.append_pair(
                        "geo_width_km",
                        &format_query_float(radius_meters / 1000.0),
                    );
                    query.append_pair("long_val", &center.longitude.to_string());
                    query.append_pair("lat_val", &center.latitude.to_string());
                }
                SearchConstraint::AutoRadius {
                    center,
                    minimum_results,
                    // BMLT has no cap parameter for auto-width searches
                    max_radius_meters: _,
                } => {
                    query.append_pair("geo_width_km", &format!("-{minimum_results}"));
                    query.append_pair("long_val", &center.longitude.to_string());
                    query.append_pair("lat_val", &center.latitude.to_string());
                }
                SearchConstraint::MeetingIds { ids: meeting_ids } => {
                    // BMLT roots are single-server; only the local half of
                    // the composite ID is meaningful in the query.
                    let locals: Vec<String> = meeting_ids
                        .iter()
                        .map(|id| ids::decompose(*id).1.to_string())
                        .collect();
                    query.append_pair("SearchString", &locals.join(","));
                }
            }

            for refinement in effective_refinements(refinements) {
                match refinement {
                    SearchRefinement::Weekdays(days) => {
                        for day in days {
                            query.append_pair("weekdays[]", &day.index().to_string());
                        }
                    }
                    SearchRefinement::StartTimeRange(range) => {
                        let (lower, upper) = widened_time_bounds(range);
                        query.append_pair("StartsAfterH", &(lower / 3600).to_string());
                        query.append_pair("StartsAfterM", &(lower % 3600 / 60).to_string());
                        query.append_pair("StartsBeforeH", &(upper / 3600).to_string());
                        query.append_pair("StartsBeforeM", &(upper % 3600 / 60).to_string());
                    }
                    // Not expressible in the BMLT query language; the
                    // refinement engine enforces these client-side.
                    SearchRefinement::VenueTypes(_)
                    | SearchRefinement::Text(_)
                    | SearchRefinement::DistanceFrom(_) => {}
                }
            }
        }

        Some(url)
    }
}

pub struct BmltResponseParser;

impl ResponseParser for BmltResponseParser {
    fn parse(&self, ctx: &SearchContext<'_>, raw: &[u8]) -> Result<MeetingDataSet, ParseError> {
        let envelope: Value = serde_json::from_slice(raw)
            .map_err(|e| ParseError::JsonParseFailure(e.to_string()))?;

        let formats = parse_format_table(&envelope);

        let raw_meetings = envelope
            .get("meetings")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let mut meetings = Vec::with_capacity(raw_meetings.len());
        for record in &raw_meetings {
            match parse_meeting(record, &formats, ctx.organization_key) {
                Some(meeting) => meetings.push(meeting),
                None => {
                    tracing::warn!(record = %record, "dropping malformed BMLT meeting record");
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

/// Shared format lookup table keyed by the IDs referenced from each
/// meeting's `format_shared_id_list`.
fn parse_format_table(envelope: &Value) -> HashMap<u64, Format> {
    let mut table = HashMap::new();
    let Some(raw_formats) = envelope.get("formats").and_then(Value::as_array) else {
        return table;
    };
    for record in raw_formats {
        let Some(id) = coerce_u64(record, "id") else {
            continue;
        };
        table.insert(
            id,
            Format {
                id,
                key: str_field(record, "key_string").unwrap_or_default().to_string(),
                name: str_field(record, "name_string").unwrap_or_default().to_string(),
                description: str_field(record, "description_string")
                    .unwrap_or_default()
                    .to_string(),
            },
        );
    }
    table
}

/// Normalize one raw meeting record, or `None` if a required field is
/// missing or unparseable.
fn parse_meeting(
    record: &Value,
    formats: &HashMap<u64, Format>,
    organization_key: &str,
) -> Option<Meeting> {
    let local_id = coerce_u64(record, "id_bigint")?;
    let server_id = coerce_u64(record, "root_server_id").unwrap_or(0);
    let weekday = coerce_u64(record, "weekday_tinyint").filter(|w| *w <= 7)?;
    let start_time = str_field(record, "start_time").and_then(military_time)?;
    let latitude = coerce_f64(record, "latitude")?;
    let longitude = coerce_f64(record, "longitude")?;

    let address = PostalAddress {
        street: str_field(record, "location_street").unwrap_or_default().to_string(),
        city: str_field(record, "location_municipality")
            .unwrap_or_default()
            .to_string(),
        province: str_field(record, "location_province")
            .unwrap_or_default()
            .to_string(),
        postal_code: str_field(record, "location_postal_code_1")
            .unwrap_or_default()
            .to_string(),
        nation: str_field(record, "location_nation").unwrap_or_default().to_string(),
    };

    let physical_location = address.is_present().then(|| PhysicalLocation {
        coordinate: Coordinate::new(latitude, longitude),
        venue_name: str_field(record, "location_text").unwrap_or_default().to_string(),
        address: address.clone(),
        time_zone: None,
    });

    let virtual_location = parse_virtual(record);

    let time_zone = resolve_time_zone(
        str_field(record, "time_zone"),
        address.is_present().then_some(&address),
    );

    let meeting_formats = str_field(record, "format_shared_id_list")
        .unwrap_or_default()
        .split(',')
        .filter_map(|token| token.trim().parse::<u64>().ok())
        .filter_map(|id| formats.get(&id).cloned())
        .collect();

    Some(Meeting {
        id: ids::compose(server_id, local_id),
        weekday_index: weekday as u8,
        // BMLT carries no absolute dates for one-off entries
        next_date: None,
        start_time,
        duration_seconds: str_field(record, "duration_time")
            .and_then(clock_seconds)
            .unwrap_or(0),
        time_zone,
        name: str_field(record, "meeting_name").unwrap_or_default().to_string(),
        comments: str_field(record, "comments").unwrap_or_default().to_string(),
        formats: meeting_formats,
        physical_location,
        virtual_location,
        distance_meters: None,
        organization_key: organization_key.to_string(),
    })
}

fn parse_virtual(record: &Value) -> Option<VirtualLocation> {
    let extra_info = str_field(record, "virtual_meeting_additional_info")
        .unwrap_or_default()
        .trim()
        .to_string();

    let video = str_field(record, "virtual_meeting_link")
        .map(str::trim)
        .filter(|link| !link.is_empty())
        .and_then(|link| Url::parse(link).ok())
        .map(|url| VirtualVenue {
            description: extra_info.clone(),
            time_zone: None,
            url: Some(url),
            meeting_id: None,
            password: None,
        });

    let phone = str_field(record, "phone_meeting_number")
        .map(str::trim)
        .filter(|number| !number.is_empty())
        .map(|number| VirtualVenue {
            description: extra_info.clone(),
            time_zone: None,
            url: None,
            meeting_id: Some(number.to_string()),
            password: None,
        });

    if video.is_none() && phone.is_none() {
        return None;
    }
    Some(VirtualLocation {
        video,
        phone,
        extra_info,
    })
}

fn str_field<'a>(record: &'a Value, key: &str) -> Option<&'a str> {
    record.get(key).and_then(Value::as_str)
}

/// Numeric field that may arrive as a JSON number or a numeric string.
fn coerce_u64(record: &Value, key: &str) -> Option<u64> {
    match record.get(key)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn coerce_f64(record: &Value, key: &str) -> Option<f64> {
    match record.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// "HH:MM" or "HH:MM:SS" to a military-time integer (1930 for 19:30).
fn military_time(text: &str) -> Option<u16> {
    let (hours, minutes) = clock_parts(text)?;
    Some((hours * 100 + minutes) as u16)
}

/// "HH:MM" or "HH:MM:SS" to total seconds (durations).
fn clock_seconds(text: &str) -> Option<u64> {
    let (hours, minutes) = clock_parts(text)?;
    Some(u64::from(hours) * 3600 + u64::from(minutes) * 60)
}

fn clock_parts(text: &str) -> Option<(u32, u32)> {
    let mut parts = text.trim().split(':');
    let hours: u32 = parts.next()?.parse().ok()?;
    let minutes: u32 = parts.next()?.parse().ok()?;
    if hours > 24 || minutes > 59 {
        return None;
    }
    Some((hours, minutes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MeetingType;

    const SERVER: &str = "https://example.org/main_server";

    fn context<'a>(
        constraint: &'a SearchConstraint,
        refinements: &'a [SearchRefinement],
    ) -> SearchContext<'a> {
        SearchContext {
            organization_key: "test-org",
            constraint,
            refinements,
        }
    }

    #[test]
    fn test_fixed_radius_query() {
        let constraint = SearchConstraint::FixedRadius {
            center: Coordinate::new(34.2357, -118.5637),
            radius_meters: 1000.0,
        };
        let url = BmltQueryBuilder
            .build_query(SERVER, &constraint, &[])
            .expect("valid server URL");
        assert!(url.path().ends_with("/client_interface/json"));
        let query = url.query().unwrap();
        assert!(
            query.contains("geo_width_km=1.0&long_val=-118.5637&lat_val=34.2357"),
            "query was {query}"
        );
    }

    #[test]
    fn test_auto_radius_encodes_negative_width() {
        let constraint = SearchConstraint::AutoRadius {
            center: Coordinate::new(34.2357, -118.5637),
            minimum_results: 10,
            max_radius_meters: None,
        };
        let url = BmltQueryBuilder.build_query(SERVER, &constraint, &[]).unwrap();
        assert!(url.query().unwrap().contains("geo_width_km=-10"));
    }

    #[test]
    fn test_meeting_id_lookup_uses_local_ids() {
        let composite = ids::compose(3, 2000);
        let constraint = SearchConstraint::MeetingIds {
            ids: vec![composite, ids::compose(3, 2001)],
        };
        let url = BmltQueryBuilder.build_query(SERVER, &constraint, &[]).unwrap();
        assert!(url.query().unwrap().contains("SearchString=2000%2C2001"));
    }

    #[test]
    fn test_time_range_widened_and_split() {
        use crate::search::SearchRefinement;
        // 08:00..=12:00 -> encoded 07:59 .. 12:01
        let refinements = vec![SearchRefinement::StartTimeRange(8 * 3600..=12 * 3600)];
        let url = BmltQueryBuilder
            .build_query(SERVER, &SearchConstraint::None, &refinements)
            .unwrap();
        let query = url.query().unwrap();
        assert!(query.contains("StartsAfterH=7"));
        assert!(query.contains("StartsAfterM=59"));
        assert!(query.contains("StartsBeforeH=12"));
        assert!(query.contains("StartsBeforeM=1"));
    }

    #[test]
    fn test_malformed_base_url_is_hard_failure() {
        assert!(BmltQueryBuilder
            .build_query("", &SearchConstraint::None, &[])
            .is_none());
        assert!(BmltQueryBuilder
            .build_query("not a url", &SearchConstraint::None, &[])
            .is_none());
        assert!(BmltQueryBuilder
            .build_query("ftp://example.org", &SearchConstraint::None, &[])
            .is_none());
    }

    fn sample_body() -> String {
        r#"{
            "meetings": [
                {
                    "id_bigint": "2000",
                    "root_server_id": "3",
                    "weekday_tinyint": "2",
                    "start_time": "19:30:00",
                    "duration_time": "01:30:00",
                    "latitude": "34.24",
                    "longitude": "-118.56",
                    "meeting_name": "Monday Night Group",
                    "comments": "Ring the back bell",
                    "location_text": "Community Center",
                    "location_street": "18300 Sherman Way",
                    "location_municipality": "Reseda",
                    "location_province": "CA",
                    "location_postal_code_1": "91335",
                    "location_nation": "US",
                    "format_shared_id_list": "17,42"
                },
                {
                    "id_bigint": "2001",
                    "weekday_tinyint": "4",
                    "start_time": "12:00:00",
                    "latitude": "0",
                    "longitude": "0",
                    "meeting_name": "Virtual Noon",
                    "location_street": "",
                    "virtual_meeting_link": "https://zoom.us/j/555",
                    "virtual_meeting_additional_info": "Passcode 1234"
                },
                { "id_bigint": "not-a-number", "weekday_tinyint": "1" }
            ],
            "formats": [
                { "id": "17", "key_string": "O", "name_string": "Open", "description_string": "Open meeting" },
                { "id": "42", "key_string": "WC", "name_string": "Wheelchair", "description_string": "Accessible" }
            ]
        }"#
        .to_string()
    }

    #[test]
    fn test_parse_coerces_string_numerics() {
        let constraint = SearchConstraint::None;
        let data = BmltResponseParser
            .parse(&context(&constraint, &[]), sample_body().as_bytes())
            .unwrap();
        // Malformed third record dropped, first two normalized
        assert_eq!(data.len(), 2);

        let monday = &data.meetings[0];
        assert_eq!(monday.id, ids::compose(3, 2000));
        assert_eq!(monday.weekday_index, 2);
        assert_eq!(monday.start_time, 1930);
        assert_eq!(monday.duration_seconds, 5400);
        assert_eq!(monday.meeting_type(), MeetingType::InPerson);
        assert_eq!(monday.time_zone, chrono_tz::America::Los_Angeles);
        assert_eq!(monday.formats.len(), 2);
        assert_eq!(monday.formats[0].key, "O");
        assert_eq!(monday.organization_key, "test-org");

        let noon = &data.meetings[1];
        assert_eq!(noon.meeting_type(), MeetingType::Virtual);
        assert_eq!(noon.virtual_location.as_ref().unwrap().extra_info, "Passcode 1234");
    }

    #[test]
    fn test_missing_meetings_key_is_empty_not_error() {
        let constraint = SearchConstraint::None;
        let data = BmltResponseParser
            .parse(&context(&constraint, &[]), br#"{"formats": []}"#)
            .unwrap();
        assert!(data.is_empty());
    }

    #[test]
    fn test_unparseable_body_is_json_parse_failure() {
        let constraint = SearchConstraint::None;
        let err = BmltResponseParser
            .parse(&context(&constraint, &[]), b"<html>bad gateway</html>")
            .unwrap_err();
        assert!(matches!(err, ParseError::JsonParseFailure(_)));
    }

    #[test]
    fn test_record_with_no_location_is_kept_as_invalid() {
        let body = r#"{"meetings": [{
            "id_bigint": "5",
            "weekday_tinyint": "1",
            "start_time": "10:00:00",
            "latitude": "0",
            "longitude": "0",
            "location_street": ""
        }]}"#;
        let constraint = SearchConstraint::None;
        let data = BmltResponseParser
            .parse(&context(&constraint, &[]), body.as_bytes())
            .unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data.meetings[0].meeting_type(), MeetingType::Invalid);
        // ...but validity-requiring consumers never see it
        assert_eq!(data.valid_meetings().count(), 0);
    }
}
