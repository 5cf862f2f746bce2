use log::warn;
use serde::{Deserialize, Serialize};

use crate::{Error, model::PoiCategory};

/// Parameters of the sliding-window turn detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurnDetectionConfig {
    /// Minimum bearing change (degrees) for a turn
    pub min_angle: f64,
    /// Minimum distance (meters) between two reported turns
    pub min_distance_m: f64,
    /// Bearing change (degrees) from which a turn is a blind spot
    pub blind_spot_threshold: f64,
    /// Look-ahead of the outgoing bearing, in points
    pub window_size: usize,
}

impl Default for TurnDetectionConfig {
    fn default() -> Self {
        Self {
            min_angle: 35.0,
            min_distance_m: 50.0,
            blind_spot_threshold: 60.0,
            window_size: 3,
        }
    }
}

/// Places search along the route and the proximity filter applied to its results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoiSearchConfig {
    pub categories: Vec<PoiCategory>,
    /// Radius of each nearby search
    pub search_radius_m: f64,
    /// Maximum distance between a place and the route
    pub proximity_threshold_m: f64,
    /// Search around every n-th snapped point
    pub sample_stride: usize,
    /// Result cap per search
    pub max_results: usize,
}

impl Default for PoiSearchConfig {
    fn default() -> Self {
        Self {
            categories: PoiCategory::ALL.to_vec(),
            search_radius_m: 1000.0,
            proximity_threshold_m: 100.0,
            sample_stride: 10,
            max_results: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnappingConfig {
    /// Points per snapping request
    pub batch_size: usize,
    /// Ask the snapping service to interpolate along the road geometry
    pub interpolate: bool,
}

impl Default for SnappingConfig {
    fn default() -> Self {
        Self {
            batch_size: 100,
            interpolate: true,
        }
    }
}

/// Complete configuration of a route analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub turns: TurnDetectionConfig,
    pub pois: PoiSearchConfig,
    pub snapping: SnappingConfig,
}

impl AnalysisConfig {
    /// Check value ranges
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` naming the first offending field
    pub fn validate(&self) -> Result<(), Error> {
        let turns = &self.turns;
        non_negative("turns.min_angle", turns.min_angle)?;
        non_negative("turns.min_distance_m", turns.min_distance_m)?;
        non_negative("turns.blind_spot_threshold", turns.blind_spot_threshold)?;
        if turns.window_size < 2 {
            return Err(Error::InvalidConfig(format!(
                "turns.window_size must be at least 2, got {}",
                turns.window_size
            )));
        }
        if turns.blind_spot_threshold < turns.min_angle {
            warn!(
                "Blind spot threshold {}° is below the turn threshold {}°: every turn is a blind spot",
                turns.blind_spot_threshold, turns.min_angle
            );
        }

        let pois = &self.pois;
        non_negative("pois.search_radius_m", pois.search_radius_m)?;
        non_negative("pois.proximity_threshold_m", pois.proximity_threshold_m)?;
        if pois.sample_stride == 0 {
            return Err(Error::InvalidConfig(
                "pois.sample_stride must be at least 1".to_string(),
            ));
        }
        if !(1..=20).contains(&pois.max_results) {
            return Err(Error::InvalidConfig(format!(
                "pois.max_results must be between 1 and 20, got {}",
                pois.max_results
            )));
        }

        if self.snapping.batch_size == 0 {
            return Err(Error::InvalidConfig(
                "snapping.batch_size must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

fn non_negative(field: &str, value: f64) -> Result<(), Error> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidConfig(format!(
            "{field} must be a finite non-negative number, got {value}"
        )))
    }
}
