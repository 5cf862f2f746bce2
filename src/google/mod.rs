//! Blocking clients for the Google Maps Directions, Roads and Places APIs

mod directions;
mod places;
mod retry;
mod roads;

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use routehazard_core::services::ServiceError;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::AppError;
use crate::config::GoogleConfig;

pub use retry::{RetryPolicy, Retrying};

/// One client serving all three collaborator traits
pub struct GoogleMapsClient {
    http: Client,
    api_key: String,
    directions_url: String,
    roads_url: String,
    places_url: String,
    interpolate: bool,
}

impl GoogleMapsClient {
    pub fn new(api_key: impl Into<String>, config: &GoogleConfig) -> Result<Self, AppError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("routehazard/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            api_key: api_key.into(),
            directions_url: config.directions_url.clone(),
            roads_url: config.roads_url.clone(),
            places_url: config.places_url.clone(),
            interpolate: true,
        })
    }

    /// Whether snapped paths are densified along the road geometry
    pub fn with_interpolate(mut self, interpolate: bool) -> Self {
        self.interpolate = interpolate;
        self
    }
}

/// `{"latitude": .., "longitude": ..}` as used by the Roads and Places APIs
#[derive(Debug, Clone, Copy, Deserialize)]
struct LatLng {
    latitude: f64,
    longitude: f64,
}

fn transport_error(err: reqwest::Error) -> ServiceError {
    if err.is_decode() {
        ServiceError::MalformedResponse(err.to_string())
    } else {
        ServiceError::Transient(err.to_string())
    }
}

fn status_error(status: StatusCode, body: &str) -> Option<ServiceError> {
    let detail = format!("HTTP {status}: {}", body.trim());
    if status == StatusCode::TOO_MANY_REQUESTS {
        Some(ServiceError::RateLimited)
    } else if status.is_server_error() {
        Some(ServiceError::Transient(detail))
    } else if !status.is_success() {
        Some(ServiceError::Rejected(detail))
    } else {
        None
    }
}

/// Map the HTTP status to a `ServiceError` and decode the JSON body
fn read_json<T: DeserializeOwned>(response: Result<Response, reqwest::Error>) -> Result<T, ServiceError> {
    let response = response.map_err(transport_error)?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        return Err(status_error(status, &body)
            .unwrap_or_else(|| ServiceError::Rejected(format!("HTTP {status}"))));
    }
    response.json::<T>().map_err(transport_error)
}
