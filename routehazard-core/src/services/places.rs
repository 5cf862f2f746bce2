use geo::Point;
use log::{info, warn};

use super::{PlacesQuery, PlacesService};
use crate::{loading::PoiSearchConfig, model::PoiCandidate};

/// Candidates collected along a route
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateOutcome {
    pub candidates: Vec<PoiCandidate>,
    pub queries: usize,
    pub failed_queries: usize,
}

/// Search every configured category around every `sample_stride`-th snapped point.
///
/// A failed search contributes nothing and is counted; the others go on.
pub fn gather_candidates(
    places: &dyn PlacesService,
    snapped_points: &[Point<f64>],
    config: &PoiSearchConfig,
) -> CandidateOutcome {
    let sampled: Vec<Point<f64>> = snapped_points
        .iter()
        .step_by(config.sample_stride.max(1))
        .copied()
        .collect();
    info!(
        "Processing {} points along the snapped route...",
        sampled.len()
    );

    let mut outcome = CandidateOutcome::default();
    for (idx, center) in sampled.into_iter().enumerate() {
        for &category in &config.categories {
            let query = PlacesQuery {
                center,
                radius_m: config.search_radius_m,
                category,
                max_results: config.max_results,
            };
            outcome.queries += 1;
            match places.search_nearby(&query) {
                Ok(found) => outcome.candidates.extend(
                    found
                        .into_iter()
                        .take(config.max_results)
                        .map(|place| PoiCandidate::new(category, place)),
                ),
                Err(e) => {
                    outcome.failed_queries += 1;
                    warn!("Error fetching {category} POIs at point {idx}: {e}");
                }
            }
        }
    }
    outcome
}
