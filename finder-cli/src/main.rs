//! finder-cli - demonstration driver for the meeting finder SDK
//!
//! Exercises the single `search` entry point against a live directory
//! server (or one described in a TOML config file) and prints the refined
//! result set as text or JSON.

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use finder_sdk::{
    BackendKind, Coordinate, MeetingSdk, MeetingType, OrganizationConfig, SearchConstraint,
    SearchRefinement, Weekday,
};
use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "finder-cli", about = "Search meeting directory servers")]
struct Args {
    /// TOML file with [[organization]] entries
    #[arg(long, env = "FINDER_CONFIG")]
    config: Option<PathBuf>,

    /// Key of the organization to search (requires --config)
    #[arg(long)]
    org: Option<String>,

    /// Server root URL (alternative to --config)
    #[arg(long)]
    server_url: Option<String>,

    /// Wire protocol: bmlt or meeting-server
    #[arg(long)]
    backend: Option<BackendKind>,

    /// Search center latitude
    #[arg(long, allow_negative_numbers = true)]
    latitude: Option<f64>,

    /// Search center longitude
    #[arg(long, allow_negative_numbers = true)]
    longitude: Option<f64>,

    /// Fixed search radius in kilometers
    #[arg(long)]
    radius_km: Option<f64>,

    /// Auto-expand the radius until at least this many results are found
    #[arg(long)]
    min_results: Option<u32>,

    /// Radius cap for auto-expansion, in kilometers (no cap if omitted)
    #[arg(long)]
    max_radius_km: Option<f64>,

    /// Composite meeting IDs to look up, comma separated
    #[arg(long, value_delimiter = ',')]
    ids: Vec<u64>,

    /// Weekday filter, 1=Sunday..7=Saturday, comma separated
    #[arg(long, value_delimiter = ',')]
    weekdays: Vec<u8>,

    /// Inclusive lower start-time bound, HH:MM
    #[arg(long)]
    starts_after: Option<String>,

    /// Inclusive upper start-time bound, HH:MM
    #[arg(long)]
    starts_before: Option<String>,

    /// Free-text refinement
    #[arg(long)]
    text: Option<String>,

    /// Compute distances from this point instead of the search center,
    /// as "lat,lng"
    #[arg(long)]
    relate_to: Option<String>,

    /// Sort results by ascending distance
    #[arg(long)]
    sort_distance: bool,

    /// Emit the full data set as JSON instead of a text listing
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();
    let config = resolve_organization(&args)?;

    info!("Searching {} ({})", config.name, config.server_url);

    let constraint = build_constraint(&args)?;
    let refinements = build_refinements(&args)?;

    let sdk = MeetingSdk::new(config)?;
    let outcome = sdk.search(constraint, refinements).await;

    if let Some(error) = &outcome.error {
        // A parse failure still carries an (empty) data set; anything
        // else is fatal for a one-shot driver.
        match &outcome.data {
            Some(_) => tracing::warn!(%error, "search completed with an error"),
            None => bail!("search failed: {error}"),
        }
    }

    let mut data = outcome.data.expect("outcome with no error carries data");
    if args.sort_distance {
        data.sort_by_distance();
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }

    println!("{} meeting(s) found", data.valid_meetings().count());
    for meeting in data.valid_meetings() {
        let day = meeting
            .weekday()
            .map(|d| format!("{d:?}"))
            .unwrap_or_else(|| "One-off".to_string());
        let distance = meeting
            .distance_meters
            .map(|m| format!(" [{:.1} km]", m / 1000.0))
            .unwrap_or_default();
        println!(
            "  {:>20}  {} {:04}  {:9}  {}{}",
            meeting.id,
            day,
            meeting.start_time,
            type_label(meeting.meeting_type()),
            meeting.name,
            distance
        );
    }
    Ok(())
}

/// Priority order: explicit --server-url/--backend, then --config + --org.
fn resolve_organization(args: &Args) -> Result<OrganizationConfig> {
    if let (Some(server_url), Some(backend)) = (&args.server_url, args.backend) {
        return Ok(OrganizationConfig {
            key: "cli".into(),
            name: server_url.clone(),
            description: String::new(),
            backend,
            server_url: server_url.clone(),
        });
    }
    let path = args
        .config
        .as_ref()
        .ok_or_else(|| anyhow!("provide --server-url with --backend, or --config"))?;
    let organizations = finder_sdk::config::load_organizations(path)
        .with_context(|| format!("loading {}", path.display()))?;
    match &args.org {
        Some(key) => organizations
            .into_iter()
            .find(|o| &o.key == key)
            .ok_or_else(|| anyhow!("no organization with key '{key}' in config")),
        None if organizations.len() == 1 => Ok(organizations.into_iter().next().unwrap()),
        None => bail!("config defines several organizations; pick one with --org"),
    }
}

fn build_constraint(args: &Args) -> Result<SearchConstraint> {
    if !args.ids.is_empty() {
        return Ok(SearchConstraint::MeetingIds {
            ids: args.ids.clone(),
        });
    }
    let center = match (args.latitude, args.longitude) {
        (Some(latitude), Some(longitude)) => Some(Coordinate::new(latitude, longitude)),
        (None, None) => None,
        _ => bail!("--latitude and --longitude must be given together"),
    };
    match (center, args.radius_km, args.min_results) {
        (Some(center), Some(radius_km), None) => Ok(SearchConstraint::FixedRadius {
            center,
            radius_meters: radius_km * 1000.0,
        }),
        (Some(center), None, Some(minimum_results)) => Ok(SearchConstraint::AutoRadius {
            center,
            minimum_results,
            max_radius_meters: args.max_radius_km.map(|km| km * 1000.0),
        }),
        (Some(_), Some(_), Some(_)) => bail!("--radius-km and --min-results are exclusive"),
        (Some(_), None, None) => bail!("a center needs --radius-km or --min-results"),
        (None, _, _) => Ok(SearchConstraint::None),
    }
}

fn build_refinements(args: &Args) -> Result<Vec<SearchRefinement>> {
    let mut refinements = Vec::new();

    if !args.weekdays.is_empty() {
        let days: BTreeSet<Weekday> = args
            .weekdays
            .iter()
            .map(|index| {
                Weekday::from_index(*index)
                    .ok_or_else(|| anyhow!("weekday {index} out of range 1..=7"))
            })
            .collect::<Result<_>>()?;
        refinements.push(SearchRefinement::Weekdays(days));
    }

    match (&args.starts_after, &args.starts_before) {
        (None, None) => {}
        (after, before) => {
            let lower = after.as_deref().map(clock_seconds).transpose()?.unwrap_or(0);
            let upper = before
                .as_deref()
                .map(clock_seconds)
                .transpose()?
                .unwrap_or(86_399);
            refinements.push(SearchRefinement::StartTimeRange(lower..=upper));
        }
    }

    if let Some(text) = &args.text {
        refinements.push(SearchRefinement::Text(text.clone()));
    }

    if let Some(point) = &args.relate_to {
        let (latitude, longitude) = point
            .split_once(',')
            .ok_or_else(|| anyhow!("--relate-to expects \"lat,lng\""))?;
        refinements.push(SearchRefinement::DistanceFrom(Coordinate::new(
            latitude.trim().parse().context("latitude")?,
            longitude.trim().parse().context("longitude")?,
        )));
    }

    Ok(refinements)
}

fn clock_seconds(text: &str) -> Result<u32> {
    let (hours, minutes) = text
        .split_once(':')
        .ok_or_else(|| anyhow!("expected HH:MM, got '{text}'"))?;
    let hours: u32 = hours.parse().context("hours")?;
    let minutes: u32 = minutes.parse().context("minutes")?;
    if hours > 23 || minutes > 59 {
        bail!("'{text}' is not a valid time of day");
    }
    Ok(hours * 3600 + minutes * 60)
}

fn type_label(meeting_type: MeetingType) -> &'static str {
    match meeting_type {
        MeetingType::InPerson => "in-person",
        MeetingType::Virtual => "virtual",
        MeetingType::Hybrid => "hybrid",
        MeetingType::Invalid => "invalid",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_seconds() {
        assert_eq!(clock_seconds("08:00").unwrap(), 8 * 3600);
        assert_eq!(clock_seconds("23:59").unwrap(), 86_340);
        assert!(clock_seconds("24:00").is_err());
        assert!(clock_seconds("8").is_err());
    }

    #[test]
    fn test_constraint_selection() {
        let args = Args::parse_from([
            "finder-cli",
            "--server-url",
            "https://example.org",
            "--backend",
            "bmlt",
            "--latitude",
            "34.0",
            "--longitude",
            "-118.0",
            "--radius-km",
            "5",
        ]);
        let constraint = build_constraint(&args).unwrap();
        assert!(matches!(
            constraint,
            SearchConstraint::FixedRadius { radius_meters, .. } if radius_meters == 5000.0
        ));
    }

    #[test]
    fn test_ids_win_over_spatial_flags() {
        let args = Args::parse_from([
            "finder-cli",
            "--server-url",
            "https://example.org",
            "--backend",
            "meeting-server",
            "--ids",
            "17,42",
        ]);
        assert!(matches!(
            build_constraint(&args).unwrap(),
            SearchConstraint::MeetingIds { ids } if ids == vec![17, 42]
        ));
    }
}
