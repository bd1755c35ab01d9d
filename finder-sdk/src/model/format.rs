//! Meeting format codes (open/closed, wheelchair access, language, ...)

use serde::{Deserialize, Serialize};

/// One format code attached to a meeting.
///
/// Formats carry no behavior; they are display/classification metadata
/// passed through from the backend. IDs are unique within one meeting's
/// format list but not across servers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Format {
    /// Server-scoped numeric format ID
    pub id: u64,
    /// Short display key, e.g. "O", "C", "WC"
    pub key: String,
    /// Human-readable name
    pub name: String,
    /// Longer description
    pub description: String,
}
