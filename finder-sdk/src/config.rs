//! Organization configuration loading

use crate::backend::BackendKind;
use crate::error::{Result, SearchError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Static description of one organization's directory server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationConfig {
    /// Stable key used for attribution on parsed meetings
    pub key: String,
    /// Display name
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Which wire protocol the server speaks
    pub backend: BackendKind,
    /// Root URL of the server entry point
    pub server_url: String,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    organization: Vec<OrganizationConfig>,
}

/// Load organization definitions from a TOML file of the form:
///
/// ```toml
/// [[organization]]
/// key = "example"
/// name = "Example Recovery Network"
/// backend = "bmlt"
/// server_url = "https://example.org/main_server"
/// ```
pub fn load_organizations(path: &Path) -> Result<Vec<OrganizationConfig>> {
    let content = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = toml::from_str(&content)
        .map_err(|e| SearchError::Config(format!("{}: {e}", path.display())))?;
    if parsed.organization.is_empty() {
        return Err(SearchError::Config(format!(
            "{}: no [[organization]] entries",
            path.display()
        )));
    }
    Ok(parsed.organization)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_backend_names() {
        let config = OrganizationConfig {
            key: "example".into(),
            name: "Example".into(),
            description: String::new(),
            backend: BackendKind::MeetingServer,
            server_url: "https://example.org".into(),
        };
        let text = toml::to_string(&config).unwrap();
        assert!(text.contains("backend = \"meeting-server\""));
        let back: OrganizationConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_parse_config_file_shape() {
        let text = r#"
            [[organization]]
            key = "na-legacy"
            name = "Legacy Aggregator"
            backend = "bmlt"
            server_url = "https://example.org/main_server"

            [[organization]]
            key = "na-next"
            name = "Successor Server"
            description = "Pilot deployment"
            backend = "meeting-server"
            server_url = "https://next.example.org/entrypoint"
        "#;
        let parsed: ConfigFile = toml::from_str(text).unwrap();
        assert_eq!(parsed.organization.len(), 2);
        assert_eq!(parsed.organization[0].backend, BackendKind::Bmlt);
        assert_eq!(parsed.organization[1].key, "na-next");
    }
}
