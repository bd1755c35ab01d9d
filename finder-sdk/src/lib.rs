//! # Meeting Finder SDK
//!
//! Client SDK for querying geographically-distributed meeting directory
//! servers. Two wire protocols are supported behind one interface: the
//! legacy BMLT aggregator protocol and its successor meeting-server
//! protocol.
//!
//! The pipeline: a [`search::SearchConstraint`] plus a set of
//! [`search::SearchRefinement`]s is translated into a backend-specific
//! query URL, dispatched through the network collaborator, parsed from
//! heterogeneous JSON into the canonical [`model::Meeting`] shape, and
//! post-filtered by the refinement engine so the returned set always
//! satisfies every requested refinement, whether or not the server could
//! express it.
//!
//! ```no_run
//! use finder_sdk::{
//!     BackendKind, Coordinate, MeetingSdk, OrganizationConfig, SearchConstraint,
//! };
//!
//! # async fn run() {
//! let sdk = MeetingSdk::new(OrganizationConfig {
//!     key: "example".into(),
//!     name: "Example Recovery Network".into(),
//!     description: String::new(),
//!     backend: BackendKind::Bmlt,
//!     server_url: "https://example.org/main_server".into(),
//! })
//! .expect("HTTP client");
//!
//! let outcome = sdk
//!     .search(
//!         SearchConstraint::FixedRadius {
//!             center: Coordinate::new(34.2357, -118.5637),
//!             radius_meters: 5000.0,
//!         },
//!         Vec::new(),
//!     )
//!     .await;
//!
//! if let Some(data) = outcome.data {
//!     for meeting in data.valid_meetings() {
//!         println!("{} ({:?})", meeting.name, meeting.meeting_type());
//!     }
//! }
//! # }
//! ```

pub mod backend;
pub mod config;
pub mod data_set;
pub mod error;
pub mod geo;
pub mod initiator;
pub mod model;
pub mod refine;
pub mod sdk;
pub mod search;
pub mod transport;

pub use backend::BackendKind;
pub use config::OrganizationConfig;
pub use data_set::MeetingDataSet;
pub use error::{ParseError, Result, SearchError, TransportError};
pub use geo::Coordinate;
pub use initiator::SearchOutcome;
pub use model::{Format, Meeting, MeetingType, Weekday};
pub use sdk::{MeetingSdk, Organization};
pub use search::{SearchConstraint, SearchRefinement};
pub use transport::{HttpFetcher, ReqwestFetcher};
