//! Shared test helpers: a canned-response fetcher and JSON fixtures
#![allow(dead_code)]

use async_trait::async_trait;
use finder_sdk::error::TransportError;
use finder_sdk::transport::HttpFetcher;
use finder_sdk::{BackendKind, OrganizationConfig};
use std::sync::Mutex;
use url::Url;

/// What the fake network should do.
pub enum Canned {
    Body(&'static str),
    HttpStatus(u16),
    NetworkFailure,
}

/// Fetcher that returns canned bytes and records every requested URL, so
/// tests can assert on both the query that was built and the parse that
/// followed, without a socket.
pub struct CannedFetcher {
    canned: Canned,
    pub seen: Mutex<Vec<Url>>,
}

impl CannedFetcher {
    pub fn new(canned: Canned) -> Self {
        Self {
            canned,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn requested_urls(&self) -> Vec<Url> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpFetcher for CannedFetcher {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, TransportError> {
        self.seen.lock().unwrap().push(url.clone());
        match &self.canned {
            Canned::Body(body) => Ok(body.as_bytes().to_vec()),
            Canned::HttpStatus(status) => Err(TransportError::Http {
                status: *status,
                message: String::new(),
            }),
            Canned::NetworkFailure => {
                Err(TransportError::Network("connection refused".to_string()))
            }
        }
    }
}

pub fn bmlt_config() -> OrganizationConfig {
    OrganizationConfig {
        key: "legacy".into(),
        name: "Legacy Aggregator".into(),
        description: String::new(),
        backend: BackendKind::Bmlt,
        server_url: "https://legacy.example.org/main_server".into(),
    }
}

pub fn meeting_server_config() -> OrganizationConfig {
    OrganizationConfig {
        key: "successor".into(),
        name: "Successor Server".into(),
        description: String::new(),
        backend: BackendKind::MeetingServer,
        server_url: "https://next.example.org/entrypoint".into(),
    }
}

/// Three BMLT meetings: Monday in-person, Wednesday in-person, Monday
/// virtual. Weekday values chosen so a Monday-only refinement has
/// something to drop.
pub const BMLT_BODY: &str = r#"{
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
            "location_text": "Community Center",
            "location_street": "18300 Sherman Way",
            "location_municipality": "Reseda",
            "location_province": "CA",
            "location_nation": "US",
            "format_shared_id_list": "17"
        },
        {
            "id_bigint": "2001",
            "root_server_id": "3",
            "weekday_tinyint": "4",
            "start_time": "19:00:00",
            "latitude": "34.30",
            "longitude": "-118.40",
            "meeting_name": "Wednesday Candlelight",
            "location_street": "100 Elm St",
            "location_municipality": "Van Nuys",
            "location_province": "CA",
            "location_nation": "US"
        },
        {
            "id_bigint": "2002",
            "root_server_id": "3",
            "weekday_tinyint": "2",
            "start_time": "07:00:00",
            "latitude": "0",
            "longitude": "0",
            "meeting_name": "Monday Early Risers Online",
            "location_street": "",
            "virtual_meeting_link": "https://zoom.us/j/777"
        }
    ],
    "formats": [
        { "id": "17", "key_string": "O", "name_string": "Open", "description_string": "Open meeting" }
    ]
}"#;

/// Two meeting-server meetings: a Monday hybrid and a Saturday phone-only.
pub const MEETING_SERVER_BODY: &str = r#"{
    "meetings": [
        {
            "server_id": 7,
            "meeting_id": 41,
            "weekday": 2,
            "start_time": 70200,
            "duration": 5400,
            "name": "Monday Night Group",
            "time_zone": "America/Los_Angeles",
            "formats": [ { "id": 17, "key": "O", "name": "Open", "description": "" } ],
            "physical_address": {
                "latitude": 34.24,
                "longitude": -118.56,
                "info": "Community Center",
                "street": "18300 Sherman Way",
                "city": "Reseda",
                "province": "CA",
                "nation": "US"
            },
            "virtual_information": {
                "video": { "description": "Zoom", "url": "https://zoom.us/j/555" }
            }
        },
        {
            "server_id": 7,
            "meeting_id": 42,
            "weekday": 7,
            "start_time": 36000,
            "name": "Saturday Dial-in",
            "virtual_information": {
                "phone": { "description": "Dial-in", "meeting_id": "+1-555-0100" }
            }
        }
    ]
}"#;
