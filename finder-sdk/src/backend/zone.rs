//! Time-zone resolution for parsed meetings
//!
//! Priority order: explicit per-meeting zone string, then a zone inferred
//! from the physical address's locale, then UTC. Servers are wildly
//! inconsistent about zone data, so every step is fail-soft.

use crate::model::PostalAddress;
use chrono_tz::Tz;

/// Resolve a meeting's zone from what the record offers.
pub(crate) fn resolve_time_zone(explicit: Option<&str>, address: Option<&PostalAddress>) -> Tz {
    if let Some(name) = explicit {
        if let Ok(tz) = name.trim().parse::<Tz>() {
            return tz;
        }
        if !name.trim().is_empty() {
            tracing::warn!(zone = name, "unrecognized time zone string, falling back");
        }
    }
    if let Some(address) = address {
        if let Some(tz) = zone_for_locale(&address.nation, &address.province) {
            return tz;
        }
    }
    Tz::UTC
}

/// Best-effort zone from a postal locale. Covers the regions the meeting
/// registries actually serve; anything unknown falls through to UTC.
fn zone_for_locale(nation: &str, province: &str) -> Option<Tz> {
    let nation = nation.trim().to_ascii_uppercase();
    let province = province.trim().to_ascii_uppercase();
    match nation.as_str() {
        "US" | "USA" | "UNITED STATES" => zone_for_us_state(&province),
        "CA" | "CANADA" => zone_for_ca_province(&province),
        "GB" | "UK" | "UNITED KINGDOM" => Some(Tz::Europe__London),
        "IE" | "IRELAND" => Some(Tz::Europe__Dublin),
        "DE" | "GERMANY" => Some(Tz::Europe__Berlin),
        "FR" | "FRANCE" => Some(Tz::Europe__Paris),
        "ES" | "SPAIN" => Some(Tz::Europe__Madrid),
        "IT" | "ITALY" => Some(Tz::Europe__Rome),
        "SE" | "SWEDEN" => Some(Tz::Europe__Stockholm),
        "NZ" | "NEW ZEALAND" => Some(Tz::Pacific__Auckland),
        _ => None,
    }
}

fn zone_for_us_state(state: &str) -> Option<Tz> {
    match state {
        "CT" | "DE" | "FL" | "GA" | "ME" | "MD" | "MA" | "NH" | "NJ" | "NY" | "NC" | "OH"
        | "PA" | "RI" | "SC" | "VT" | "VA" | "WV" | "MI" | "IN" | "DC" => {
            Some(Tz::America__New_York)
        }
        "AL" | "AR" | "IL" | "IA" | "KS" | "KY" | "LA" | "MN" | "MS" | "MO" | "NE" | "ND"
        | "OK" | "SD" | "TN" | "TX" | "WI" => Some(Tz::America__Chicago),
        "CO" | "ID" | "MT" | "NM" | "UT" | "WY" => Some(Tz::America__Denver),
        "AZ" => Some(Tz::America__Phoenix),
        "CA" | "NV" | "OR" | "WA" => Some(Tz::America__Los_Angeles),
        "AK" => Some(Tz::America__Anchorage),
        "HI" => Some(Tz::Pacific__Honolulu),
        _ => None,
    }
}

fn zone_for_ca_province(province: &str) -> Option<Tz> {
    match province {
        "ON" | "QC" => Some(Tz::America__Toronto),
        "BC" => Some(Tz::America__Vancouver),
        "AB" => Some(Tz::America__Edmonton),
        "SK" => Some(Tz::America__Regina),
        "MB" => Some(Tz::America__Winnipeg),
        "NS" | "NB" | "PE" => Some(Tz::America__Halifax),
        "NL" => Some(Tz::America__St_Johns),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(nation: &str, province: &str) -> PostalAddress {
        PostalAddress {
            street: "1 Main St".into(),
            nation: nation.into(),
            province: province.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_explicit_zone_wins() {
        let addr = address("US", "NY");
        let tz = resolve_time_zone(Some("America/Los_Angeles"), Some(&addr));
        assert_eq!(tz, Tz::America__Los_Angeles);
    }

    #[test]
    fn test_bad_explicit_zone_falls_back_to_locale() {
        let addr = address("US", "NY");
        let tz = resolve_time_zone(Some("Not/AZone"), Some(&addr));
        assert_eq!(tz, Tz::America__New_York);
    }

    #[test]
    fn test_unknown_locale_falls_back_to_utc() {
        let addr = address("ZZ", "??");
        assert_eq!(resolve_time_zone(None, Some(&addr)), Tz::UTC);
        assert_eq!(resolve_time_zone(None, None), Tz::UTC);
    }

    #[test]
    fn test_locale_case_insensitive() {
        let addr = address("us", "ca");
        assert_eq!(resolve_time_zone(None, Some(&addr)), Tz::America__Los_Angeles);
    }
}
