use std::io::Write;

use serde::Serialize;

use super::{ReportRow, round_to};
use crate::Error;

/// Header row of the exported spreadsheet
pub const REPORT_COLUMNS: [&str; 8] = [
    "Route ID",
    "Category",
    "Name",
    "Latitude",
    "Longitude",
    "Turn Angle",
    "Risk Type",
    "Distance to Start (km)",
];

#[derive(Serialize)]
struct CsvRow<'a> {
    route_id: &'a str,
    category: &'static str,
    name: &'a str,
    latitude: f64,
    longitude: f64,
    turn_angle: f64,
    risk_type: &'static str,
    distance_to_start_km: f64,
}

impl<'a> From<&'a ReportRow> for CsvRow<'a> {
    fn from(row: &'a ReportRow) -> Self {
        CsvRow {
            route_id: &row.route_id,
            category: row.category.label(),
            name: &row.name,
            latitude: row.latitude,
            longitude: row.longitude,
            turn_angle: round_to(row.turn_angle_degrees, 1),
            risk_type: row.risk_tier.label(),
            distance_to_start_km: row.distance_from_origin_km,
        }
    }
}

/// Write report rows as CSV, one line per row after the [`REPORT_COLUMNS`] header.
///
/// The header is written even when `rows` is empty.
pub fn write_report_csv<W: Write>(rows: &[ReportRow], writer: W) -> Result<(), Error> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer.write_record(REPORT_COLUMNS)?;
    for row in rows {
        csv_writer.serialize(CsvRow::from(row))?;
    }
    csv_writer.flush()?;
    Ok(())
}
