//! Flattening of turns and points of interest into report rows

mod to_csv;
mod to_geojson;

use std::fmt;

use geo::Point;
use serde::Serialize;

use crate::algo::geodesy::distance;
use crate::model::{PoiCategory, PointOfInterest, TurnEvent};

pub use to_csv::{REPORT_COLUMNS, write_report_csv};

/// Turns at or above this angle are high risk
pub const HIGH_RISK_ANGLE: f64 = 60.0;
/// Turns at or above this angle (and below [`HIGH_RISK_ANGLE`]) are medium risk
pub const MEDIUM_RISK_ANGLE: f64 = 35.0;

/// Coarse risk classification of a report row.
///
/// The tier boundaries are fixed and independent of the detector's
/// thresholds, so a 50° turn that is not a blind spot is still medium risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub fn from_angle(angle_degrees: f64) -> Self {
        if angle_degrees >= HIGH_RISK_ANGLE {
            RiskTier::High
        } else if angle_degrees >= MEDIUM_RISK_ANGLE {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskTier::Low => "Low Risk",
            RiskTier::Medium => "Medium Risk",
            RiskTier::High => "High Risk",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What a report row describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReportCategory {
    Turn,
    BlindSpot,
    Poi(PoiCategory),
}

impl ReportCategory {
    pub fn label(self) -> &'static str {
        match self {
            ReportCategory::Turn => "Turn",
            ReportCategory::BlindSpot => "BlindSpot",
            ReportCategory::Poi(category) => category.label(),
        }
    }
}

impl fmt::Display for ReportCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One exported record of a route report
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub route_id: String,
    pub category: ReportCategory,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Zero for point of interest rows
    pub turn_angle_degrees: f64,
    pub risk_tier: RiskTier,
    /// Great-circle distance from the route origin, rounded to 2 decimals
    pub distance_from_origin_km: f64,
}

/// Build the report rows of one route.
///
/// Turn rows come first, then point of interest rows, each group in input order.
pub fn build_report(
    route_id: &str,
    origin: Point<f64>,
    turns: &[TurnEvent],
    pois: &[PointOfInterest],
) -> Vec<ReportRow> {
    let turn_rows = turns.iter().map(|turn| {
        let category = if turn.is_blind_spot {
            ReportCategory::BlindSpot
        } else {
            ReportCategory::Turn
        };
        ReportRow {
            route_id: route_id.to_string(),
            category,
            name: format!("Turn Angle: {:.1}°", turn.angle_degrees),
            latitude: turn.latitude(),
            longitude: turn.longitude(),
            turn_angle_degrees: turn.angle_degrees,
            risk_tier: RiskTier::from_angle(turn.angle_degrees),
            distance_from_origin_km: km_from(origin, turn.point),
        }
    });

    let poi_rows = pois.iter().map(|poi| ReportRow {
        route_id: route_id.to_string(),
        category: ReportCategory::Poi(poi.category),
        name: poi.name.clone(),
        latitude: poi.location.y(),
        longitude: poi.location.x(),
        turn_angle_degrees: 0.0,
        risk_tier: RiskTier::Low,
        distance_from_origin_km: km_from(origin, poi.location),
    });

    turn_rows.chain(poi_rows).collect()
}

fn km_from(origin: Point<f64>, location: Point<f64>) -> f64 {
    round_to(distance(origin, location) / 1000.0, 2)
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
