use std::thread;
use std::time::Duration;

use geo::Point;
use routehazard_core::model::{RawPlace, RouteGeometry};
use routehazard_core::services::{
    DirectionsService, PlacesQuery, PlacesService, RoadSnapper, ServiceError,
};
use tracing::warn;

/// Exponential backoff for rate-limited or transient failures
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_delay: Duration,
    backoff_factor: f64,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_delay: Duration, backoff_factor: f64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay,
            backoff_factor,
        }
    }

    /// Pause before retry number `retry` (starting at 1)
    pub fn delay_for(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1) as i32;
        self.initial_delay
            .mul_f64(self.backoff_factor.powi(exponent))
    }

    /// Run `op` until it succeeds, fails permanently, or attempts run out
    pub fn run<T>(
        &self,
        operation: &str,
        mut op: impl FnMut() -> Result<T, ServiceError>,
    ) -> Result<T, ServiceError> {
        let mut attempt = 1;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt < self.max_attempts => {
                    let delay = self.delay_for(attempt);
                    if err == ServiceError::RateLimited {
                        warn!(
                            "Rate limit reached. Pausing for {:.1} seconds before retrying {operation}",
                            delay.as_secs_f64()
                        );
                    } else {
                        warn!(
                            "{operation} failed ({err}), retrying in {:.1} seconds",
                            delay.as_secs_f64()
                        );
                    }
                    thread::sleep(delay);
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

/// Wraps a collaborator and retries its calls under a [`RetryPolicy`]
pub struct Retrying<S> {
    inner: S,
    policy: RetryPolicy,
}

impl<S> Retrying<S> {
    pub fn new(inner: S, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: DirectionsService> DirectionsService for Retrying<S> {
    fn fetch_route(
        &self,
        origin: Point<f64>,
        destination: Point<f64>,
    ) -> Result<RouteGeometry, ServiceError> {
        self.policy
            .run("directions request", || self.inner.fetch_route(origin, destination))
    }
}

impl<S: RoadSnapper> RoadSnapper for Retrying<S> {
    fn snap(&self, batch: &[Point<f64>]) -> Result<Vec<Point<f64>>, ServiceError> {
        self.policy.run("snap to roads", || self.inner.snap(batch))
    }
}

impl<S: PlacesService> PlacesService for Retrying<S> {
    fn search_nearby(&self, query: &PlacesQuery) -> Result<Vec<RawPlace>, ServiceError> {
        self.policy
            .run("nearby search", || self.inner.search_nearby(query))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    struct Flaky {
        calls: AtomicU32,
        failures: Vec<ServiceError>,
    }

    impl Flaky {
        fn new(failures: Vec<ServiceError>) -> Self {
            Self {
                calls: AtomicU32::new(0),
                failures,
            }
        }
    }

    impl RoadSnapper for Flaky {
        fn snap(&self, batch: &[Point<f64>]) -> Result<Vec<Point<f64>>, ServiceError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) as usize;
            match self.failures.get(call) {
                Some(err) => Err(err.clone()),
                None => Ok(batch.to_vec()),
            }
        }
    }

    fn no_wait(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_attempts, Duration::ZERO, 2.0)
    }

    #[test]
    fn test_backoff_grows_geometrically() {
        let policy = RetryPolicy::new(3, Duration::from_millis(2000), 2.0);
        assert_eq!(policy.delay_for(1), Duration::from_millis(2000));
        assert_eq!(policy.delay_for(2), Duration::from_millis(4000));
        assert_eq!(policy.delay_for(3), Duration::from_millis(8000));
    }

    #[test]
    fn test_rate_limit_is_retried() {
        let snapper = Retrying::new(
            Flaky::new(vec![ServiceError::RateLimited, ServiceError::Transient("reset".into())]),
            no_wait(3),
        );
        let batch = [Point::new(1.0, 2.0)];
        assert_eq!(snapper.snap(&batch).unwrap(), batch.to_vec());
        assert_eq!(snapper.inner().calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_gives_up_after_max_attempts() {
        let snapper = Retrying::new(
            Flaky::new(vec![ServiceError::RateLimited; 5]),
            no_wait(2),
        );
        assert_eq!(
            snapper.snap(&[Point::new(1.0, 2.0)]).unwrap_err(),
            ServiceError::RateLimited
        );
        assert_eq!(snapper.inner().calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_permanent_errors_are_not_retried() {
        let snapper = Retrying::new(
            Flaky::new(vec![ServiceError::Rejected("bad key".into())]),
            no_wait(3),
        );
        assert!(snapper.snap(&[Point::new(1.0, 2.0)]).is_err());
        assert_eq!(snapper.inner().calls.load(Ordering::SeqCst), 1);
    }
}
