use geo::Point;
use routehazard_core::model::{RouteGeometry, RouteLeg};
use routehazard_core::services::{DirectionsService, ServiceError};
use serde::Deserialize;

use super::{GoogleMapsClient, read_json};

/// Precision of Google's encoded polylines
const POLYLINE_PRECISION: u32 = 5;

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Deserialize)]
struct DirectionsRoute {
    overview_polyline: EncodedPolyline,
    #[serde(default)]
    legs: Vec<DirectionsLeg>,
}

#[derive(Debug, Deserialize)]
struct EncodedPolyline {
    points: String,
}

#[derive(Debug, Deserialize)]
struct DirectionsLeg {
    #[serde(default)]
    start_address: String,
    #[serde(default)]
    end_address: String,
    #[serde(default)]
    distance: TextValue,
    #[serde(default)]
    duration: TextValue,
}

#[derive(Debug, Default, Deserialize)]
struct TextValue {
    #[serde(default)]
    text: String,
    #[serde(default)]
    value: f64,
}

impl DirectionsService for GoogleMapsClient {
    fn fetch_route(
        &self,
        origin: Point<f64>,
        destination: Point<f64>,
    ) -> Result<RouteGeometry, ServiceError> {
        let response = self
            .http
            .get(&self.directions_url)
            .query(&[
                ("origin", format!("{},{}", origin.y(), origin.x())),
                ("destination", format!("{},{}", destination.y(), destination.x())),
                ("mode", "driving".to_string()),
                ("key", self.api_key.clone()),
            ])
            .send();
        route_from_response(read_json(response)?)
    }
}

fn route_from_response(response: DirectionsResponse) -> Result<RouteGeometry, ServiceError> {
    let detail = || {
        response
            .error_message
            .clone()
            .unwrap_or_else(|| response.status.clone())
    };
    match response.status.as_str() {
        "OK" => {}
        "ZERO_RESULTS" | "NOT_FOUND" => return Err(ServiceError::NotFound(detail())),
        "OVER_QUERY_LIMIT" => return Err(ServiceError::RateLimited),
        "UNKNOWN_ERROR" => return Err(ServiceError::Transient(detail())),
        _ => return Err(ServiceError::Rejected(detail())),
    }

    let route = response
        .routes
        .into_iter()
        .next()
        .ok_or_else(|| ServiceError::NotFound("no routes in response".into()))?;
    let line = polyline::decode_polyline(&route.overview_polyline.points, POLYLINE_PRECISION)
        .map_err(|e| ServiceError::MalformedResponse(e.to_string()))?;
    let points = line.points().collect::<Vec<_>>();

    let leg = route
        .legs
        .into_iter()
        .next()
        .map(|leg| RouteLeg {
            start_address: leg.start_address,
            end_address: leg.end_address,
            distance_text: leg.distance.text,
            distance_m: leg.distance.value,
            duration_text: leg.duration.text,
            duration_s: leg.duration.value,
        })
        .unwrap_or_default();

    Ok(RouteGeometry::new(points, leg))
}
