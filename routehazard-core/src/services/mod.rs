//! Interfaces of the external collaborators (directions, road snapping,
//! places lookup) and the request-shaping helpers built on them.
//!
//! Implementations live outside this crate. Retrying belongs to those
//! implementations; [`ServiceError::is_retryable`] tells them when it is
//! worth doing.

mod places;
mod snapping;

use geo::Point;
use thiserror::Error;

use crate::model::{PoiCategory, RawPlace, RouteGeometry};

pub use places::{CandidateOutcome, gather_candidates};
pub use snapping::{SnapOutcome, snap_to_roads};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    #[error("Rate limit reached")]
    RateLimited,
    #[error("Transient failure: {0}")]
    Transient(String),
    #[error("Request rejected: {0}")]
    Rejected(String),
    #[error("Nothing found: {0}")]
    NotFound(String),
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl ServiceError {
    /// Whether repeating the same request may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, ServiceError::RateLimited | ServiceError::Transient(_))
    }
}

/// Driving directions between two points
pub trait DirectionsService: Send + Sync {
    fn fetch_route(
        &self,
        origin: Point<f64>,
        destination: Point<f64>,
    ) -> Result<RouteGeometry, ServiceError>;
}

/// Adjusts raw points onto the road network
pub trait RoadSnapper: Send + Sync {
    /// Snap one batch of consecutive points, returning snapped points in order
    fn snap(&self, batch: &[Point<f64>]) -> Result<Vec<Point<f64>>, ServiceError>;
}

/// Nearby search for places of one category
#[derive(Debug, Clone, PartialEq)]
pub struct PlacesQuery {
    pub center: Point<f64>,
    pub radius_m: f64,
    pub category: PoiCategory,
    pub max_results: usize,
}

pub trait PlacesService: Send + Sync {
    fn search_nearby(&self, query: &PlacesQuery) -> Result<Vec<RawPlace>, ServiceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(ServiceError::RateLimited.is_retryable());
        assert!(ServiceError::Transient("timeout".into()).is_retryable());
        assert!(!ServiceError::Rejected("bad key".into()).is_retryable());
        assert!(!ServiceError::NotFound("ZERO_RESULTS".into()).is_retryable());
        assert!(!ServiceError::MalformedResponse("eof".into()).is_retryable());
    }
}
