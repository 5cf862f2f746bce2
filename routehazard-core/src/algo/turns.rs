//! Sliding-window turn and blind spot detection over a snapped route

use geo::Point;
use log::{debug, trace};

use super::geodesy::{bearing, bearing_change, distance};
use crate::{loading::TurnDetectionConfig, model::TurnEvent};

/// Segments shorter than this are treated as zero-length (bearing undefined)
pub const MIN_SEGMENT_LENGTH_M: f64 = 0.01;

/// Detect turns along an ordered sequence of snapped points.
///
/// At each interior index `i` the bearing of the segment `i-1 -> i` is
/// compared with the bearing from `i` to the point `window_size - 1`
/// positions ahead. Changes of at least `min_angle` propose a turn at `i`,
/// which is kept only if it lies at least `min_distance_m` from the
/// previously kept turn. Turns are returned in route order.
///
/// Sequences shorter than `window_size + 1` points yield no turns.
pub fn detect_turns(points: &[Point<f64>], config: &TurnDetectionConfig) -> Vec<TurnEvent> {
    let window = config.window_size;
    if window < 2 || points.len() < window + 1 {
        debug!(
            "Skipping turn detection: {} points, window size {window}",
            points.len()
        );
        return Vec::new();
    }

    (1..points.len() - window).fold(Vec::new(), |mut turns, i| {
        let Some(angle) = turn_angle_at(points, i, window) else {
            return turns;
        };
        if angle < config.min_angle {
            return turns;
        }

        let point = points[i];
        let clear_of_last = turns
            .last()
            .is_none_or(|last: &TurnEvent| distance(last.point, point) >= config.min_distance_m);

        if clear_of_last {
            turns.push(TurnEvent {
                point,
                index: i,
                angle_degrees: angle,
                is_blind_spot: angle >= config.blind_spot_threshold,
            });
        } else {
            trace!("Turn of {angle:.1}° at index {i} merged into the previous turn");
        }
        turns
    })
}

/// Bearing change at `i`, `None` when either segment is degenerate
fn turn_angle_at(points: &[Point<f64>], i: usize, window: usize) -> Option<f64> {
    let prev = points[i - 1];
    let here = points[i];
    let ahead = points[i + window - 1];

    if distance(prev, here) < MIN_SEGMENT_LENGTH_M || distance(here, ahead) < MIN_SEGMENT_LENGTH_M
    {
        trace!("Zero-length segment at index {i}, bearing undefined");
        return None;
    }

    Some(bearing_change(bearing(prev, here), bearing(here, ahead)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::geodesy::destination;

    /// Walk from `start`, one leg per `(bearing, step_m, steps)`, emitting a point per step
    fn walk(start: Point<f64>, legs: &[(f64, f64, usize)]) -> Vec<Point<f64>> {
        let mut points = vec![start];
        for &(heading, step_m, steps) in legs {
            for _ in 0..steps {
                let last = *points.last().unwrap();
                points.push(destination(last, heading, step_m));
            }
        }
        points
    }

    fn config(min_angle: f64, min_distance_m: f64, blind_spot_threshold: f64) -> TurnDetectionConfig {
        TurnDetectionConfig {
            min_angle,
            min_distance_m,
            blind_spot_threshold,
            window_size: 3,
        }
    }

    #[test]
    fn test_straight_line_has_no_turns() {
        let cfg = config(35.0, 50.0, 60.0);
        for steps in [4, 10, 50, 200] {
            let points = walk(Point::new(0.0, 0.0), &[(90.0, 30.0, steps)]);
            assert!(detect_turns(&points, &cfg).is_empty());
        }
    }

    #[test]
    fn test_short_sequences_yield_nothing() {
        let cfg = config(10.0, 0.0, 60.0);
        let zigzag = walk(
            Point::new(5.0, 45.0),
            &[(0.0, 100.0, 1), (90.0, 100.0, 1), (0.0, 100.0, 1)],
        );
        for len in 0..=cfg.window_size {
            assert!(detect_turns(&zigzag[..len], &cfg).is_empty());
        }
    }

    #[test]
    fn test_single_right_angle_turn() {
        // East for five 100 m steps, then north in 40 m steps: the turn is at index 5
        let points = walk(
            Point::new(8.55, 47.37),
            &[(90.0, 100.0, 5), (0.0, 40.0, 5)],
        );
        let turns = detect_turns(&points, &config(45.0, 50.0, 60.0));

        assert_eq!(turns.len(), 1);
        let turn = turns[0];
        assert_eq!(turn.index, 5);
        assert_eq!(turn.point, points[5]);
        assert!((turn.angle_degrees - 90.0).abs() < 1.0);
        assert!(turn.is_blind_spot);
    }

    #[test]
    fn test_change_across_north_is_measured_the_short_way() {
        let points = walk(
            Point::new(-1.5, 53.8),
            &[(350.0, 80.0, 4), (10.0, 80.0, 4)],
        );
        let turns = detect_turns(&points, &config(15.0, 50.0, 60.0));

        assert_eq!(turns.len(), 1);
        assert!((turns[0].angle_degrees - 20.0).abs() < 0.5);
        assert!(!turns[0].is_blind_spot);
    }

    #[test]
    fn test_nearby_turns_are_merged_into_the_earlier_one() {
        // A corner seen from two consecutive indices: 45° at index 3, 90° at index 4
        let points = walk(Point::new(0.0, 0.0), &[(90.0, 100.0, 4), (0.0, 100.0, 4)]);

        let spread = detect_turns(&points, &config(40.0, 50.0, 60.0));
        assert_eq!(spread.iter().map(|t| t.index).collect::<Vec<_>>(), vec![3, 4]);

        let merged = detect_turns(&points, &config(40.0, 150.0, 60.0));
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].index, 3);
        assert!((merged[0].angle_degrees - 45.0).abs() < 0.5);
        assert!(!merged[0].is_blind_spot);
    }

    #[test]
    fn test_accepted_turns_respect_min_distance() {
        // Sawtooth with 30 m teeth produces many candidate turns
        let legs: Vec<(f64, f64, usize)> = (0..20)
            .map(|k| (if k % 2 == 0 { 45.0 } else { 135.0 }, 30.0, 2))
            .collect();
        let points = walk(Point::new(4.9, 52.37), &legs);

        for min_distance_m in [0.0, 25.0, 50.0, 120.0] {
            let cfg = config(35.0, min_distance_m, 60.0);
            let turns = detect_turns(&points, &cfg);
            assert!(!turns.is_empty());
            for pair in turns.windows(2) {
                assert!(pair[0].index < pair[1].index);
                assert!(distance(pair[0].point, pair[1].point) >= min_distance_m);
            }
        }
    }

    #[test]
    fn test_blind_spot_flag_matches_threshold() {
        let legs: Vec<(f64, f64, usize)> = (0..12)
            .map(|k| (f64::from(k) * 50.0 % 360.0, 120.0, 4))
            .collect();
        let points = walk(Point::new(-0.12, 51.5), &legs);
        let cfg = config(20.0, 50.0, 60.0);
        let turns = detect_turns(&points, &cfg);

        assert!(!turns.is_empty());
        for turn in &turns {
            assert!((0.0..=180.0).contains(&turn.angle_degrees));
            assert!(turn.angle_degrees >= cfg.min_angle);
            assert_eq!(turn.is_blind_spot, turn.angle_degrees >= cfg.blind_spot_threshold);
        }
    }

    #[test]
    fn test_duplicate_points_are_skipped_without_panicking() {
        let mut points = walk(
            Point::new(8.55, 47.37),
            &[(90.0, 100.0, 5), (0.0, 40.0, 5)],
        );
        // Stutter at the start and right after the corner
        points.insert(1, points[1]);
        points.insert(7, points[7]);
        points.insert(7, points[7]);

        let turns = detect_turns(&points, &config(45.0, 50.0, 60.0));
        assert_eq!(turns.len(), 1);
        assert!((turns[0].angle_degrees - 90.0).abs() < 1.0);

        let frozen = vec![Point::new(1.0, 1.0); 10];
        assert!(detect_turns(&frozen, &config(45.0, 50.0, 60.0)).is_empty());
    }

    #[test]
    fn test_degenerate_window_yields_nothing() {
        let points = walk(Point::new(0.0, 0.0), &[(90.0, 100.0, 5), (0.0, 100.0, 5)]);
        let mut cfg = config(45.0, 50.0, 60.0);
        cfg.window_size = 1;
        assert!(detect_turns(&points, &cfg).is_empty());
        cfg.window_size = 0;
        assert!(detect_turns(&points, &cfg).is_empty());
    }
}
