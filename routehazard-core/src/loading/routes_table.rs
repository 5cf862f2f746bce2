//! Routes table: one destination per route identifier

use std::fs::File;
use std::io::Read;
use std::path::Path;

use geo::Point;
use itertools::Itertools;
use log::{info, warn};
use serde::Deserialize;

use crate::{Error, model::RouteRequest};

#[derive(Debug, Deserialize)]
struct RouteRecord {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "Latitude")]
    latitude: f64,
    #[serde(rename = "Longitude")]
    longitude: f64,
}

/// Read the routes table at `path`, pairing every destination with `origin`
///
/// # Errors
///
/// Returns an error if the file cannot be opened or has no usable header
pub fn read_routes_table(path: &Path, origin: Point<f64>) -> Result<Vec<RouteRequest>, Error> {
    let file = File::open(path).map_err(|e| {
        std::io::Error::new(
            e.kind(),
            format!("Failed to open routes table '{}': {}", path.display(), e),
        )
    })?;
    let requests = parse_routes_table(file, origin)?;
    info!(
        "Loaded {} routes from {}",
        requests.len(),
        path.display()
    );
    Ok(requests)
}

/// Parse a CSV routes table with `ID`, `Latitude` and `Longitude` columns.
///
/// Unreadable rows and rows with invalid coordinates are skipped with a
/// warning; a repeated ID keeps its first row.
pub fn parse_routes_table<R: Read>(reader: R, origin: Point<f64>) -> Result<Vec<RouteRequest>, Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    for required in ["ID", "Latitude", "Longitude"] {
        if !headers.iter().any(|h| h == required) {
            return Err(Error::InvalidData(format!(
                "Routes table is missing the '{required}' column"
            )));
        }
    }

    let requests = csv_reader
        .deserialize::<RouteRecord>()
        .enumerate()
        .filter_map(|(row, record)| match record {
            Ok(record) if valid_coordinate(record.latitude, record.longitude) => {
                Some(RouteRequest::new(
                    record.id,
                    origin,
                    Point::new(record.longitude, record.latitude),
                ))
            }
            Ok(record) => {
                warn!(
                    "Skipping route {}: invalid destination ({}, {})",
                    record.id, record.latitude, record.longitude
                );
                None
            }
            Err(e) => {
                warn!("Skipping unreadable routes table row {}: {e}", row + 1);
                None
            }
        })
        .unique_by(|request| request.route_id.clone())
        .collect();

    Ok(requests)
}

fn valid_coordinate(lat: f64, lon: f64) -> bool {
    lat.is_finite() && lon.is_finite() && lat.abs() <= 90.0 && lon.abs() <= 180.0
}
