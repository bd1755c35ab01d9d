//! Canonical meeting data model shared by both backends

pub mod format;
pub mod ids;
pub mod location;
pub mod meeting;

pub use format::Format;
pub use location::{PhysicalLocation, PostalAddress, VirtualLocation, VirtualVenue};
pub use meeting::{Meeting, MeetingType, Weekday};
