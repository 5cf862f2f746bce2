//! Route hazard analysis
//!
//! Detects sharp turns and blind spots along a driving route and correlates
//! the route with nearby points of interest. The geometric core
//! ([`algo`], [`report`]) performs no I/O; the external directions, road
//! snapping and places services are reached only through the traits in
//! [`services`].

pub mod algo;
pub mod error;
pub mod loading;
pub mod model;
pub mod pipeline;
pub mod prelude;
pub mod report;
pub mod services;

pub use error::Error;

/// Caller-assigned identifier of a route (the `ID` column of the routes table)
pub type RouteId = String;

/// Mean Earth radius used by every distance computation, in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;
