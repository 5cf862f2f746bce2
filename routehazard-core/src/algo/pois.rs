//! Correlation of candidate places with a snapped route

use geo::Point;
use log::{debug, trace};

use super::geodesy::distance;
use crate::model::{
    PoiCandidate, PointOfInterest,
    poi::{NO_ADDRESS, UNNAMED_PLACE},
};

/// Keep the candidates lying within `proximity_threshold_m` of the route.
///
/// The distance to the route is the distance to the nearest point of
/// `snapped_points`. Candidates without a usable location are skipped.
/// No deduplication is done: one place found under two categories yields
/// two results. Input order is preserved.
pub fn correlate_pois(
    snapped_points: &[Point<f64>],
    candidates: &[PoiCandidate],
    proximity_threshold_m: f64,
) -> Vec<PointOfInterest> {
    let pois: Vec<PointOfInterest> = candidates
        .iter()
        .filter_map(|candidate| {
            let Some(location) = candidate.place.location() else {
                debug!(
                    "Skipping {} candidate {:?} without a valid location",
                    candidate.category, candidate.place.name
                );
                return None;
            };

            let nearest = distance_to_route(snapped_points, location)?;
            if nearest > proximity_threshold_m {
                trace!(
                    "{:?} is {nearest:.0} m from the route, beyond {proximity_threshold_m} m",
                    candidate.place.name
                );
                return None;
            }

            Some(PointOfInterest {
                name: non_blank(candidate.place.name.as_deref()).unwrap_or(UNNAMED_PLACE).to_string(),
                location,
                category: candidate.category,
                address: non_blank(candidate.place.address.as_deref()).unwrap_or(NO_ADDRESS).to_string(),
                distance_to_route_m: nearest,
            })
        })
        .collect();

    debug!(
        "{} of {} candidates lie within {proximity_threshold_m} m of the route",
        pois.len(),
        candidates.len()
    );
    pois
}

/// Distance from `location` to the nearest route point, `None` for an empty route
pub fn distance_to_route(route: &[Point<f64>], location: Point<f64>) -> Option<f64> {
    route
        .iter()
        .map(|point| distance(*point, location))
        .min_by(f64::total_cmp)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::geodesy::destination;
    use crate::model::{PoiCategory, RawPlace};

    fn route() -> Vec<Point<f64>> {
        (0..20)
            .map(|k| destination(Point::new(-3.70, 40.42), 90.0, f64::from(k) * 25.0))
            .collect()
    }

    fn candidate(category: PoiCategory, name: &str, at: Point<f64>) -> PoiCandidate {
        PoiCandidate::new(
            category,
            RawPlace {
                name: Some(name.to_string()),
                latitude: Some(at.y()),
                longitude: Some(at.x()),
                address: Some(format!("{name} street 1")),
            },
        )
    }

    #[test]
    fn test_only_nearby_candidates_are_retained() {
        let route = route();
        let near = destination(route[7], 0.0, 50.0);
        let far = destination(route[7], 0.0, 500.0);
        let candidates = vec![
            candidate(PoiCategory::Hospital, "General", near),
            candidate(PoiCategory::Hospital, "Faraway Clinic", far),
        ];

        let pois = correlate_pois(&route, &candidates, 100.0);

        assert_eq!(pois.len(), 1);
        assert_eq!(pois[0].name, "General");
        assert_eq!(pois[0].address, "General street 1");
        assert_eq!(pois[0].category, PoiCategory::Hospital);
        assert!((pois[0].distance_to_route_m - 50.0).abs() < 0.5);
    }

    #[test]
    fn test_distance_is_to_the_nearest_route_point() {
        let route = route();
        let beside_last = destination(*route.last().unwrap(), 0.0, 30.0);
        let pois = correlate_pois(
            &route,
            &[candidate(PoiCategory::Police, "Precinct", beside_last)],
            100.0,
        );
        assert_eq!(pois.len(), 1);
        assert!((pois[0].distance_to_route_m - 30.0).abs() < 0.5);
    }

    #[test]
    fn test_raising_the_threshold_never_drops_a_poi() {
        let route = route();
        let candidates: Vec<PoiCandidate> = (0..12)
            .map(|k| {
                let at = destination(route[k], 0.0, f64::from(k as u32) * 40.0);
                candidate(PoiCategory::GasStation, &format!("Pump {k}"), at)
            })
            .collect();

        let mut previous: Vec<String> = Vec::new();
        for threshold in [0.0, 50.0, 100.0, 200.0, 400.0, 1_000.0] {
            let names: Vec<String> = correlate_pois(&route, &candidates, threshold)
                .into_iter()
                .map(|poi| poi.name)
                .collect();
            assert!(previous.iter().all(|name| names.contains(name)));
            previous = names;
        }
        assert_eq!(previous.len(), candidates.len());
    }

    #[test]
    fn test_malformed_candidates_are_skipped() {
        let route = route();
        let good = destination(route[3], 180.0, 10.0);
        let mut missing = candidate(PoiCategory::Hospital, "Nowhere", good);
        missing.place.longitude = None;
        let mut broken = candidate(PoiCategory::Hospital, "Broken", good);
        broken.place.latitude = Some(f64::INFINITY);

        let pois = correlate_pois(
            &route,
            &[missing, broken, candidate(PoiCategory::Hospital, "Valid", good)],
            100.0,
        );
        assert_eq!(pois.len(), 1);
        assert_eq!(pois[0].name, "Valid");
    }

    #[test]
    fn test_same_place_under_two_categories_is_kept_twice() {
        let route = route();
        let at = destination(route[10], 0.0, 20.0);
        let pois = correlate_pois(
            &route,
            &[
                candidate(PoiCategory::TrainStation, "Central", at),
                candidate(PoiCategory::Police, "Central", at),
            ],
            100.0,
        );
        assert_eq!(pois.len(), 2);
        assert_eq!(pois[0].category, PoiCategory::TrainStation);
        assert_eq!(pois[1].category, PoiCategory::Police);
    }

    #[test]
    fn test_missing_name_and_address_get_placeholders() {
        let route = route();
        let at = route[0];
        let place = RawPlace {
            name: None,
            latitude: Some(at.y()),
            longitude: Some(at.x()),
            address: Some("   ".into()),
        };
        let pois = correlate_pois(&route, &[PoiCandidate::new(PoiCategory::Hospital, place)], 100.0);
        assert_eq!(pois[0].name, UNNAMED_PLACE);
        assert_eq!(pois[0].address, NO_ADDRESS);
    }

    #[test]
    fn test_empty_route_retains_nothing() {
        let at = Point::new(0.0, 0.0);
        assert!(correlate_pois(&[], &[candidate(PoiCategory::Hospital, "H", at)], 1e9).is_empty());
        assert!(distance_to_route(&[], at).is_none());
    }
}
