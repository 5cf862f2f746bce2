use geo::Point;
use routehazard_core::services::{RoadSnapper, ServiceError};
use serde::Deserialize;

use super::{GoogleMapsClient, LatLng, read_json};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapResponse {
    #[serde(default)]
    snapped_points: Vec<SnappedPoint>,
}

#[derive(Debug, Deserialize)]
struct SnappedPoint {
    location: LatLng,
}

impl RoadSnapper for GoogleMapsClient {
    fn snap(&self, batch: &[Point<f64>]) -> Result<Vec<Point<f64>>, ServiceError> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }
        let path = batch
            .iter()
            .map(|p| format!("{},{}", p.y(), p.x()))
            .collect::<Vec<_>>()
            .join("|");
        let response = self
            .http
            .get(&self.roads_url)
            .query(&[
                ("path", path.as_str()),
                ("interpolate", if self.interpolate { "true" } else { "false" }),
                ("key", self.api_key.as_str()),
            ])
            .send();
        Ok(snapped_points(read_json(response)?))
    }
}

fn snapped_points(response: SnapResponse) -> Vec<Point<f64>> {
    response
        .snapped_points
        .into_iter()
        .map(|p| Point::new(p.location.longitude, p.location.latitude))
        .collect()
}
