//! Points of interest and the raw place records they are built from

use std::fmt;
use std::str::FromStr;

use geo::Point;
use serde::{Deserialize, Serialize};

use crate::Error;

pub const UNNAMED_PLACE: &str = "Unnamed Place";
pub const NO_ADDRESS: &str = "No address available";

/// Kinds of places searched for along a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoiCategory {
    Hospital,
    Police,
    GasStation,
    TrainStation,
}

impl PoiCategory {
    pub const ALL: [PoiCategory; 4] = [
        PoiCategory::Hospital,
        PoiCategory::Police,
        PoiCategory::GasStation,
        PoiCategory::TrainStation,
    ];

    /// Configuration key, as accepted by [`FromStr`]
    pub fn key(self) -> &'static str {
        match self {
            PoiCategory::Hospital => "hospital",
            PoiCategory::Police => "police",
            PoiCategory::GasStation => "gas_station",
            PoiCategory::TrainStation => "train_station",
        }
    }

    /// Place type understood by the places service
    pub fn places_type(self) -> &'static str {
        match self {
            PoiCategory::Hospital => "hospital",
            PoiCategory::Police => "police_station",
            PoiCategory::GasStation => "gas_station",
            PoiCategory::TrainStation => "train_station",
        }
    }

    /// Report label
    pub fn label(self) -> &'static str {
        match self {
            PoiCategory::Hospital => "Hospital",
            PoiCategory::Police => "Police",
            PoiCategory::GasStation => "GasStation",
            PoiCategory::TrainStation => "TrainStation",
        }
    }

    pub fn marker_color(self) -> &'static str {
        match self {
            PoiCategory::Hospital => "red",
            PoiCategory::Police => "blue",
            PoiCategory::GasStation => "orange",
            PoiCategory::TrainStation => "purple",
        }
    }

    pub fn marker_symbol(self) -> &'static str {
        match self {
            PoiCategory::Hospital => "hospital",
            PoiCategory::Police => "police",
            PoiCategory::GasStation => "fuel",
            PoiCategory::TrainStation => "rail",
        }
    }
}

impl fmt::Display for PoiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PoiCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PoiCategory::ALL
            .into_iter()
            .find(|category| category.key() == s.trim())
            .ok_or_else(|| Error::InvalidData(format!("Unknown POI category '{s}'")))
    }
}

/// Place record as returned by a places lookup, before any validation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawPlace {
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
}

impl RawPlace {
    /// Location of the place, `None` if missing or not a valid WGS84 coordinate
    pub fn location(&self) -> Option<Point<f64>> {
        let (lat, lon) = (self.latitude?, self.longitude?);
        let valid = lat.is_finite()
            && lon.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lon);
        valid.then(|| Point::new(lon, lat))
    }
}

/// Raw place together with the category it was searched under
#[derive(Debug, Clone, PartialEq)]
pub struct PoiCandidate {
    pub category: PoiCategory,
    pub place: RawPlace,
}

impl PoiCandidate {
    pub fn new(category: PoiCategory, place: RawPlace) -> Self {
        Self { category, place }
    }
}

/// A place retained as lying along the route
#[derive(Debug, Clone, PartialEq)]
pub struct PointOfInterest {
    pub name: String,
    pub location: Point<f64>,
    pub category: PoiCategory,
    pub address: String,
    /// Distance to the nearest snapped route point
    pub distance_to_route_m: f64,
}
