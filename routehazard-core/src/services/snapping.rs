use geo::Point;
use log::{info, warn};

use super::RoadSnapper;

/// Snapped route assembled from independently snapped batches
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapOutcome {
    pub points: Vec<Point<f64>>,
    pub batches: usize,
    pub failed_batches: usize,
}

/// Snap `points` in consecutive batches of `batch_size`.
///
/// Successful batches are concatenated in order; a failed batch is logged
/// and its points are left out.
pub fn snap_to_roads(
    snapper: &dyn RoadSnapper,
    points: &[Point<f64>],
    batch_size: usize,
) -> SnapOutcome {
    let mut outcome = SnapOutcome::default();

    for (chunk_idx, chunk) in points.chunks(batch_size.max(1)).enumerate() {
        outcome.batches += 1;
        match snapper.snap(chunk) {
            Ok(snapped) => outcome.points.extend(snapped),
            Err(e) => {
                outcome.failed_batches += 1;
                warn!("Error snapping points in chunk {}: {e}", chunk_idx + 1);
            }
        }
    }

    info!(
        "Snapped {} points to roads ({} of {} batches failed)",
        outcome.points.len(),
        outcome.failed_batches,
        outcome.batches
    );
    outcome
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::services::ServiceError;

    /// Shifts every point north by 1e-5°, failing the batches listed in `fail`
    struct ShiftingSnapper {
        fail: Vec<usize>,
        calls: Mutex<Vec<usize>>,
    }

    impl RoadSnapper for ShiftingSnapper {
        fn snap(&self, batch: &[Point<f64>]) -> Result<Vec<Point<f64>>, ServiceError> {
            let mut calls = self.calls.lock().unwrap();
            let call = calls.len();
            calls.push(batch.len());
            if self.fail.contains(&call) {
                return Err(ServiceError::Transient("boom".into()));
            }
            Ok(batch.iter().map(|p| Point::new(p.x(), p.y() + 1e-5)).collect())
        }
    }

    fn line(n: usize) -> Vec<Point<f64>> {
        (0..n).map(|i| Point::new(i as f64 * 1e-3, 0.0)).collect()
    }

    #[test]
    fn test_batches_are_chunked_and_concatenated_in_order() {
        let snapper = ShiftingSnapper {
            fail: vec![],
            calls: Mutex::new(vec![]),
        };
        let outcome = snap_to_roads(&snapper, &line(250), 100);

        assert_eq!(*snapper.calls.lock().unwrap(), vec![100, 100, 50]);
        assert_eq!(outcome.batches, 3);
        assert_eq!(outcome.failed_batches, 0);
        assert_eq!(outcome.points.len(), 250);
        assert!(outcome.points.windows(2).all(|w| w[0].x() < w[1].x()));
    }

    #[test]
    fn test_failed_batch_is_omitted() {
        let snapper = ShiftingSnapper {
            fail: vec![1],
            calls: Mutex::new(vec![]),
        };
        let points = line(25);
        let outcome = snap_to_roads(&snapper, &points, 10);

        assert_eq!(outcome.batches, 3);
        assert_eq!(outcome.failed_batches, 1);
        assert_eq!(outcome.points.len(), 15);
        assert!((outcome.points[10].x() - points[20].x()).abs() < f64::EPSILON);
    }

    #[test]
    fn test_no_points_means_no_requests() {
        let snapper = ShiftingSnapper {
            fail: vec![],
            calls: Mutex::new(vec![]),
        };
        let outcome = snap_to_roads(&snapper, &[], 100);
        assert_eq!(outcome, SnapOutcome::default());
        assert!(snapper.calls.lock().unwrap().is_empty());
    }
}
