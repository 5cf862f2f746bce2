//! Data model for route hazard analysis
//!
//! Points are `geo::Point<f64>` with `x` = longitude and `y` = latitude,
//! both in degrees.

pub mod poi;
pub mod route;
pub mod turn;

pub use poi::{PoiCandidate, PoiCategory, PointOfInterest, RawPlace};
pub use route::{RouteGeometry, RouteLeg, RouteRequest};
pub use turn::TurnEvent;
