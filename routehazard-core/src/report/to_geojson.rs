use std::io::Write;

use geo::{LineString, Point};
use geojson::{Feature, FeatureCollection, Geometry, Value as GeoJsonValue};
use serde_json::{Value as JsonValue, json};

use super::{RiskTier, round_to};
use crate::{
    Error,
    model::{PointOfInterest, TurnEvent},
    pipeline::RouteAnalysis,
};

const ROUTE_COLOR: &str = "blue";
const TURN_COLOR: &str = "yellow";
const BLIND_SPOT_COLOR: &str = "red";
const START_COLOR: &str = "green";
const END_COLOR: &str = "red";

impl RouteAnalysis {
    /// Map layer for the route: the snapped line, a marker per turn and point
    /// of interest, and start/end markers carrying the leg summary.
    pub fn to_geojson(&self) -> Result<FeatureCollection, Error> {
        let mut features = Vec::with_capacity(self.turns.len() + self.pois.len() + 3);

        if self.snapped_points.len() >= 2 {
            let line: LineString<f64> = self.snapped_points.iter().copied().collect();
            features.push(to_feature(json!({
                "type": "Feature",
                "geometry": Geometry::new(GeoJsonValue::from(&line)),
                "properties": {
                    "kind": "route",
                    "route_id": self.request.route_id,
                    "stroke": ROUTE_COLOR,
                    "stroke-width": 5,
                    "stroke-opacity": 0.8,
                }
            }))?);
        }

        for turn in &self.turns {
            features.push(turn_feature(turn)?);
        }
        for poi in &self.pois {
            features.push(poi_feature(poi)?);
        }

        let leg = &self.route.leg;
        features.push(to_feature(json!({
            "type": "Feature",
            "geometry": point_geometry(self.request.origin),
            "properties": {
                "kind": "start",
                "route_id": self.request.route_id,
                "start_address": leg.start_address,
                "distance": leg.distance_text,
                "duration": leg.duration_text,
                "total_turns": self.turns.len(),
                "blind_spots": self.blind_spot_count(),
                "marker-color": START_COLOR,
                "marker-symbol": "embassy",
            }
        }))?);
        features.push(to_feature(json!({
            "type": "Feature",
            "geometry": point_geometry(self.request.destination),
            "properties": {
                "kind": "end",
                "route_id": self.request.route_id,
                "end_address": leg.end_address,
                "marker-color": END_COLOR,
                "marker-symbol": "racetrack",
            }
        }))?);

        Ok(FeatureCollection {
            features,
            bbox: None,
            foreign_members: None,
        })
    }

    pub fn to_geojson_string(&self) -> Result<String, Error> {
        serde_json::to_string(&self.to_geojson()?).map_err(|e| Error::GeoJsonError(e.to_string()))
    }

    pub fn write_geojson<W: Write>(&self, writer: W) -> Result<(), Error> {
        serde_json::to_writer_pretty(writer, &self.to_geojson()?)
            .map_err(|e| Error::GeoJsonError(e.to_string()))
    }
}

fn turn_feature(turn: &TurnEvent) -> Result<Feature, Error> {
    let (kind, color, symbol) = if turn.is_blind_spot {
        ("blind_spot", BLIND_SPOT_COLOR, "danger")
    } else {
        ("turn", TURN_COLOR, "roadblock")
    };

    to_feature(json!({
        "type": "Feature",
        "geometry": point_geometry(turn.point),
        "properties": {
            "kind": kind,
            "angle_degrees": round_to(turn.angle_degrees, 1),
            "hazard_level": RiskTier::from_angle(turn.angle_degrees).label(),
            "marker-color": color,
            "marker-symbol": symbol,
        }
    }))
}

fn poi_feature(poi: &PointOfInterest) -> Result<Feature, Error> {
    to_feature(json!({
        "type": "Feature",
        "geometry": point_geometry(poi.location),
        "properties": {
            "kind": "poi",
            "category": poi.category.label(),
            "name": poi.name,
            "address": poi.address,
            "distance_to_route_m": round_to(poi.distance_to_route_m, 1),
            "marker-color": poi.category.marker_color(),
            "marker-symbol": poi.category.marker_symbol(),
        }
    }))
}

fn point_geometry(point: Point<f64>) -> Geometry {
    Geometry::new(GeoJsonValue::from(&point))
}

fn to_feature(value: JsonValue) -> Result<Feature, Error> {
    Feature::from_json_value(value).map_err(|e| Error::GeoJsonError(e.to_string()))
}
