pub use crate::EARTH_RADIUS_M;
pub use crate::Error;
pub use crate::RouteId;

// Geometric core
pub use crate::algo::geodesy::{bearing, bearing_change, destination, distance};
pub use crate::algo::pois::correlate_pois;
pub use crate::algo::turns::detect_turns;
pub use crate::report::{ReportCategory, ReportRow, RiskTier, build_report};

// Data model and configuration
pub use crate::loading::{
    AnalysisConfig, PoiSearchConfig, SnappingConfig, TurnDetectionConfig, read_routes_table,
};
pub use crate::model::{
    PoiCandidate, PoiCategory, PointOfInterest, RawPlace, RouteGeometry, RouteLeg, RouteRequest,
    TurnEvent,
};

// External collaborators and the per-route pipeline
pub use crate::pipeline::{AnalysisDiagnostics, RouteAnalysis, Services, analyze_route};
pub use crate::services::{
    DirectionsService, PlacesQuery, PlacesService, RoadSnapper, ServiceError,
};
