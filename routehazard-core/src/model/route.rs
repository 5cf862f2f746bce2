//! Route geometry as delivered by a directions service

use geo::Point;

use crate::RouteId;

/// Summary of the first leg of a fetched route. Not interpreted by the
/// analysis, only carried through to the map layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteLeg {
    pub start_address: String,
    pub end_address: String,
    /// Human readable distance, e.g. "12.4 km"
    pub distance_text: String,
    pub distance_m: f64,
    /// Human readable duration, e.g. "18 mins"
    pub duration_text: String,
    pub duration_s: f64,
}

/// Raw (not yet road-snapped) route polyline plus leg metadata
#[derive(Debug, Clone, Default)]
pub struct RouteGeometry {
    pub points: Vec<Point<f64>>,
    pub leg: RouteLeg,
}

impl RouteGeometry {
    pub fn new(points: Vec<Point<f64>>, leg: RouteLeg) -> Self {
        Self { points, leg }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// One unit of batch work: analyze the driving route from `origin` to `destination`
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    pub route_id: RouteId,
    pub origin: Point<f64>,
    pub destination: Point<f64>,
}

impl RouteRequest {
    pub fn new(route_id: impl Into<RouteId>, origin: Point<f64>, destination: Point<f64>) -> Self {
        Self {
            route_id: route_id.into(),
            origin,
            destination,
        }
    }
}
