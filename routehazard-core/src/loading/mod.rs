//! Analysis configuration and batch input loading

mod config;
mod routes_table;

pub use config::{AnalysisConfig, PoiSearchConfig, SnappingConfig, TurnDetectionConfig};
pub use routes_table::{parse_routes_table, read_routes_table};
