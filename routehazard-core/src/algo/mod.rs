//! Geometric hazard detection and route correlation

pub mod geodesy;
pub mod pois;
pub mod turns;
