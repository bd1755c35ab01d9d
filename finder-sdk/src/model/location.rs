//! Physical and virtual meeting locations

use crate::geo::Coordinate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use url::Url;

/// Structured postal address.
///
/// An address counts as "present" only when the street line is non-empty;
/// city/region alone is not enough to build a physical location from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostalAddress {
    pub street: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub nation: String,
}

impl PostalAddress {
    pub fn is_present(&self) -> bool {
        !self.street.trim().is_empty()
    }
}

/// An in-person venue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicalLocation {
    /// Venue coordinates. May be zeroed/out-of-range on sloppy servers;
    /// callers must check [`Coordinate::is_valid`] before doing geometry.
    pub coordinate: Coordinate,
    /// Free-text venue name ("St. Mark's Church, basement")
    pub venue_name: String,
    pub address: PostalAddress,
    /// Zone of the venue, when the server supplied one
    pub time_zone: Option<Tz>,
}

/// One way of joining a meeting remotely (a video link or a dial-in).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VirtualVenue {
    /// Descriptive label shown to the user
    pub description: String,
    pub time_zone: Option<Tz>,
    pub url: Option<Url>,
    /// Meeting ID for the conferencing service, if any
    pub meeting_id: Option<String>,
    pub password: Option<String>,
}

/// Remote-attendance information for a meeting.
///
/// Meaningful only when at least one of the two sub-venues is present;
/// parsers never construct an empty `VirtualLocation`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VirtualLocation {
    pub video: Option<VirtualVenue>,
    pub phone: Option<VirtualVenue>,
    /// Additional joining instructions
    pub extra_info: String,
}

impl VirtualLocation {
    pub fn has_venue(&self) -> bool {
        self.video.is_some() || self.phone.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_presence_requires_street() {
        let mut addr = PostalAddress {
            city: "Reseda".into(),
            province: "CA".into(),
            nation: "US".into(),
            ..Default::default()
        };
        assert!(!addr.is_present());
        addr.street = "18300 Sherman Way".into();
        assert!(addr.is_present());
        addr.street = "   ".into();
        assert!(!addr.is_present());
    }

    #[test]
    fn test_virtual_location_needs_a_venue() {
        let mut v = VirtualLocation::default();
        assert!(!v.has_venue());
        v.phone = Some(VirtualVenue {
            description: "Dial-in".into(),
            meeting_id: Some("555-1212".into()),
            ..Default::default()
        });
        assert!(v.has_venue());
    }
}
