use std::path::PathBuf;

use clap::Parser;

use crate::config::{AppConfig, OriginConfig};

/// Detect sharp turns, blind spots and nearby services along driving routes
#[derive(Debug, Parser)]
#[command(name = "routehazard", version, about)]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long, default_value = "routehazard.toml")]
    pub config: PathBuf,

    /// Routes table (CSV with ID, Latitude, Longitude)
    #[arg(long)]
    pub routes: Option<PathBuf>,

    /// Directory receiving the per-route reports
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Origin of every route as "LAT,LON"
    #[arg(long, value_parser = parse_origin)]
    pub origin: Option<OriginConfig>,

    /// Only process these route IDs (repeatable)
    #[arg(long = "route", value_name = "ID")]
    pub only_routes: Vec<String>,

    /// Number of routes analyzed in parallel
    #[arg(long)]
    pub threads: Option<usize>,

    /// Skip the GeoJSON map layer
    #[arg(long)]
    pub no_map: bool,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Cli {
    /// Override file configuration with the flags that were given
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(routes) = &self.routes {
            config.batch.routes_table = routes.clone();
        }
        if let Some(output) = &self.output {
            config.batch.output_dir = output.clone();
        }
        if let Some(origin) = self.origin {
            config.batch.origin = Some(origin);
        }
        if let Some(threads) = self.threads {
            config.batch.threads = Some(threads);
        }
        if self.no_map {
            config.batch.write_map = false;
        }
    }
}

fn parse_origin(value: &str) -> Result<OriginConfig, String> {
    let (lat, lon) = value
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LON, got '{value}'"))?;
    let latitude = lat
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid latitude '{lat}': {e}"))?;
    let longitude = lon
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid longitude '{lon}': {e}"))?;
    Ok(OriginConfig {
        latitude,
        longitude,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origin() {
        let origin = parse_origin("12.97, 77.59").unwrap();
        assert_eq!(origin.latitude, 12.97);
        assert_eq!(origin.longitude, 77.59);
        assert!(parse_origin("12.97").is_err());
        assert!(parse_origin("north,77").is_err());
    }

    #[test]
    fn test_flags_override_file_values() {
        let cli = Cli::parse_from([
            "routehazard",
            "--routes",
            "fleet.csv",
            "--origin",
            "51.5,-0.12",
            "--route",
            "7",
            "--route",
            "9",
            "--no-map",
        ]);
        let mut config = AppConfig::default();
        cli.apply(&mut config);

        assert_eq!(config.batch.routes_table, PathBuf::from("fleet.csv"));
        assert_eq!(config.batch.output_dir, PathBuf::from("output"));
        assert!(!config.batch.write_map);
        assert_eq!(cli.only_routes, vec!["7", "9"]);
        assert_eq!(
            config.batch.origin,
            Some(OriginConfig {
                latitude: 51.5,
                longitude: -0.12
            })
        );
    }
}
