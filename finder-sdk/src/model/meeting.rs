//! Canonical meeting representation
//!
//! Both backend parsers normalize their wire formats into [`Meeting`].
//! Instances are immutable after parse, except for the distance field
//! which the refinement engine fills in.

use crate::geo::Coordinate;
use crate::model::format::Format;
use crate::model::location::{PhysicalLocation, VirtualLocation};
use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Day of week, numbered the way both backends number it.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Sunday = 1,
    Monday = 2,
    Tuesday = 3,
    Wednesday = 4,
    Thursday = 5,
    Friday = 6,
    Saturday = 7,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    /// Wire index, 1 = Sunday through 7 = Saturday.
    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: u8) -> Option<Weekday> {
        Weekday::ALL.get(index.checked_sub(1)? as usize).copied()
    }
}

/// Venue classification, a pure function of location presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MeetingType {
    /// Neither a physical nor a virtual location could be built from the
    /// record. Kept in parsed output so diagnostics can see it, but never
    /// shown by validity-requiring consumers.
    Invalid,
    InPerson,
    Virtual,
    Hybrid,
}

/// A single meeting, normalized from either backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    /// Composite 64-bit ID; see [`crate::model::ids`]
    pub id: u64,
    /// 1 = Sunday .. 7 = Saturday; 0 = one-off event (see `next_date`)
    pub weekday_index: u8,
    /// Absolute occurrence date for one-off events (`weekday_index == 0`)
    pub next_date: Option<DateTime<Utc>>,
    /// Military start time, 0000..=2400. 2400 is "midnight tonight": the
    /// meeting is anchored to this weekday but fires at 00:00 of the next
    /// calendar day, distinct from 0000 ("midnight this morning").
    pub start_time: u16,
    pub duration_seconds: u64,
    /// Local zone of the meeting, resolved at parse time
    pub time_zone: Tz,
    pub name: String,
    /// Free-text comments / extra info
    pub comments: String,
    pub formats: Vec<Format>,
    pub physical_location: Option<PhysicalLocation>,
    pub virtual_location: Option<VirtualLocation>,
    /// Meters from the search point, filled in by the refinement engine.
    /// `None` means "not computed".
    pub distance_meters: Option<f64>,
    /// Key of the owning organization (resolved through the SDK's
    /// organization table, not a direct reference)
    pub organization_key: String,
}

impl Meeting {
    /// Venue classification. `Invalid` means the record had neither a
    /// usable street address nor any virtual venue.
    pub fn meeting_type(&self) -> MeetingType {
        match (&self.physical_location, &self.virtual_location) {
            (Some(_), Some(_)) => MeetingType::Hybrid,
            (Some(_), None) => MeetingType::InPerson,
            (None, Some(_)) => MeetingType::Virtual,
            (None, None) => MeetingType::Invalid,
        }
    }

    pub fn weekday(&self) -> Option<Weekday> {
        Weekday::from_index(self.weekday_index)
    }

    /// Start time as seconds since local midnight. 2400 maps to 86400,
    /// which deliberately sorts after every same-day time.
    pub fn start_time_seconds(&self) -> u32 {
        let hours = u32::from(self.start_time) / 100;
        let minutes = u32::from(self.start_time) % 100;
        hours * 3600 + minutes * 60
    }

    /// Coordinates of the physical venue, when present and valid.
    pub fn coordinate(&self) -> Option<Coordinate> {
        self.physical_location
            .as_ref()
            .map(|loc| loc.coordinate)
            .filter(Coordinate::is_valid)
    }

    /// Next occurrence of this meeting after `after`, in UTC.
    ///
    /// One-off events return their absolute date if it is still in the
    /// future. Recurring meetings are resolved in the meeting's own zone,
    /// honoring the 2400 midnight-tonight anchoring.
    pub fn next_occurrence(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if self.weekday_index == 0 {
            return self.next_date.filter(|date| *date > after);
        }
        let weekday = self.weekday()?;
        let local_after = after.with_timezone(&self.time_zone);

        // Scan up to 8 days so the 2400 next-day shift cannot fall short
        for day_offset in 0..=8i64 {
            let anchor = local_after.date_naive() + Duration::days(day_offset);
            if anchor.weekday().num_days_from_sunday() + 1 != u32::from(weekday.index()) {
                continue;
            }
            let (fire_date, seconds) = if self.start_time == 2400 {
                (anchor + Duration::days(1), 0)
            } else {
                (anchor, self.start_time_seconds())
            };
            let time = chrono::NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0)?;
            let Some(local) = self
                .time_zone
                .from_local_datetime(&fire_date.and_time(time))
                .earliest()
            else {
                continue;
            };
            let utc = local.with_timezone(&Utc);
            if utc > after {
                return Some(utc);
            }
        }
        None
    }
}
