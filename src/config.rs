//! Run configuration, read from a TOML file and overridden from the command line

use std::path::{Path, PathBuf};
use std::time::Duration;

use geo::Point;
use routehazard_core::loading::AnalysisConfig;
use serde::Deserialize;
use tracing::info;

use crate::AppError;
use crate::google::RetryPolicy;

pub const DEFAULT_API_KEY_ENV: &str = "GOOGLE_MAPS_API_KEY";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub batch: BatchConfig,
    pub google: GoogleConfig,
    pub retry: RetryConfig,
    pub analysis: AnalysisConfig,
}

/// Fixed origin shared by every route of the batch
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct OriginConfig {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// CSV with `ID`, `Latitude`, `Longitude` columns
    pub routes_table: PathBuf,
    pub output_dir: PathBuf,
    pub origin: Option<OriginConfig>,
    /// Also write a GeoJSON map layer per route
    pub write_map: bool,
    /// Worker threads; rayon's default when unset
    pub threads: Option<usize>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            routes_table: PathBuf::from("routes.csv"),
            output_dir: PathBuf::from("output"),
            origin: None,
            write_map: true,
            threads: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GoogleConfig {
    /// Environment variable holding the API key
    pub api_key_env: String,
    pub directions_url: String,
    pub roads_url: String,
    pub places_url: String,
    pub timeout_secs: u64,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            directions_url: "https://maps.googleapis.com/maps/api/directions/json".to_string(),
            roads_url: "https://roads.googleapis.com/v1/snapToRoads".to_string(),
            places_url: "https://places.googleapis.com/v1/places:searchNearby".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub backoff_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 2000,
            backoff_factor: 2.0,
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_attempts,
            Duration::from_millis(self.initial_delay_ms),
            self.backoff_factor,
        )
    }
}

impl AppConfig {
    /// Read the configuration file, falling back to defaults when it does not exist
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self, AppError> {
        if !path.exists() {
            info!(
                "Configuration file {} not found, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, AppError> {
        Ok(toml::from_str(text)?)
    }

    /// Origin of every route
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if no origin is configured or it is not a valid coordinate
    pub fn origin(&self) -> Result<Point<f64>, AppError> {
        let origin = self.batch.origin.ok_or_else(|| {
            AppError::Config("no origin configured: set [batch.origin] or pass --origin".into())
        })?;
        if !(origin.latitude.is_finite()
            && origin.longitude.is_finite()
            && origin.latitude.abs() <= 90.0
            && origin.longitude.abs() <= 180.0)
        {
            return Err(AppError::Config(format!(
                "invalid origin ({}, {})",
                origin.latitude, origin.longitude
            )));
        }
        Ok(Point::new(origin.longitude, origin.latitude))
    }

    /// Check everything a batch run needs, except the API key
    pub fn validate(&self) -> Result<(), AppError> {
        self.analysis.validate()?;
        self.origin()?;
        if self.retry.max_attempts == 0 {
            return Err(AppError::Config("retry.max_attempts must be at least 1".into()));
        }
        if !(self.retry.backoff_factor.is_finite() && self.retry.backoff_factor >= 1.0) {
            return Err(AppError::Config(
                "retry.backoff_factor must be a finite number >= 1".into(),
            ));
        }
        if self.batch.threads == Some(0) {
            return Err(AppError::Config("batch.threads must be at least 1".into()));
        }
        Ok(())
    }

    /// API key from the configured environment variable
    ///
    /// # Errors
    ///
    /// Returns `AppError::MissingApiKey` if the variable is unset or empty
    pub fn api_key(&self) -> Result<String, AppError> {
        std::env::var(&self.google.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AppError::MissingApiKey(self.google.api_key_env.clone()))
    }
}
