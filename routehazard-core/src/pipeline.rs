//! Per-route analysis: fetch, snap, detect, correlate, report

use std::collections::BTreeMap;

use geo::Point;
use itertools::Itertools;
use log::{info, warn};
use serde::Serialize;

use crate::{
    Error,
    algo::{pois::correlate_pois, turns::detect_turns},
    loading::AnalysisConfig,
    model::{PointOfInterest, RouteGeometry, RouteRequest, TurnEvent},
    report::{ReportRow, build_report},
    services::{
        DirectionsService, PlacesService, RoadSnapper, ServiceError, gather_candidates,
        snap_to_roads,
    },
};

/// The external collaborators a route analysis talks to
#[derive(Clone, Copy)]
pub struct Services<'a> {
    pub directions: &'a dyn DirectionsService,
    pub snapper: &'a dyn RoadSnapper,
    pub places: &'a dyn PlacesService,
}

/// Counts describing partial results of the collaborators
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisDiagnostics {
    pub raw_points: usize,
    pub snapped_points: usize,
    pub snap_batches: usize,
    pub failed_snap_batches: usize,
    pub place_queries: usize,
    pub failed_place_queries: usize,
    pub candidates_seen: usize,
}

impl AnalysisDiagnostics {
    /// Whether some collaborator request failed and the report may be incomplete
    pub fn is_partial(&self) -> bool {
        self.failed_snap_batches > 0 || self.failed_place_queries > 0
    }
}

/// Everything produced for one route
#[derive(Debug, Clone)]
pub struct RouteAnalysis {
    pub request: RouteRequest,
    pub route: RouteGeometry,
    pub snapped_points: Vec<Point<f64>>,
    pub turns: Vec<TurnEvent>,
    pub pois: Vec<PointOfInterest>,
    pub rows: Vec<ReportRow>,
    pub diagnostics: AnalysisDiagnostics,
}

impl RouteAnalysis {
    pub fn blind_spot_count(&self) -> usize {
        self.turns.iter().filter(|turn| turn.is_blind_spot).count()
    }

    /// Number of report rows per category label
    pub fn category_counts(&self) -> BTreeMap<&'static str, usize> {
        self.rows
            .iter()
            .map(|row| row.category.label())
            .counts()
            .into_iter()
            .collect()
    }
}

/// Run the full pipeline for one route.
///
/// Snapping and places failures only make the result partial (see
/// [`AnalysisDiagnostics`]). A route with no turns and no places is a valid,
/// empty report.
///
/// # Errors
///
/// Returns `Error::RouteNotFound` when no route exists between origin and
/// destination, and `Error::Service` for any other directions failure.
pub fn analyze_route(
    services: &Services<'_>,
    config: &AnalysisConfig,
    request: &RouteRequest,
) -> Result<RouteAnalysis, Error> {
    let route = services
        .directions
        .fetch_route(request.origin, request.destination)
        .map_err(|e| match e {
            ServiceError::NotFound(reason) => {
                Error::RouteNotFound(format!("route {}: {reason}", request.route_id))
            }
            other => Error::Service(other),
        })?;
    if route.is_empty() {
        return Err(Error::RouteNotFound(format!(
            "route {}: directions returned no geometry",
            request.route_id
        )));
    }
    info!("Route fetched with {} points.", route.len());

    let snapped = snap_to_roads(services.snapper, &route.points, config.snapping.batch_size);
    if snapped.points.is_empty() {
        warn!(
            "Route {} has no snapped points, the report will be empty",
            request.route_id
        );
    }

    let turns = detect_turns(&snapped.points, &config.turns);
    info!(
        "Detected {} turns ({} blind spots)",
        turns.len(),
        turns.iter().filter(|t| t.is_blind_spot).count()
    );

    let candidates = gather_candidates(services.places, &snapped.points, &config.pois);
    let pois = correlate_pois(
        &snapped.points,
        &candidates.candidates,
        config.pois.proximity_threshold_m,
    );
    info!("Found {} points of interest along the route", pois.len());

    let rows = build_report(&request.route_id, request.origin, &turns, &pois);

    let diagnostics = AnalysisDiagnostics {
        raw_points: route.len(),
        snapped_points: snapped.points.len(),
        snap_batches: snapped.batches,
        failed_snap_batches: snapped.failed_batches,
        place_queries: candidates.queries,
        failed_place_queries: candidates.failed_queries,
        candidates_seen: candidates.candidates.len(),
    };

    Ok(RouteAnalysis {
        request: request.clone(),
        route,
        snapped_points: snapped.points,
        turns,
        pois,
        rows,
        diagnostics,
    })
}
