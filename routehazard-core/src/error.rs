use thiserror::Error;

use crate::services::ServiceError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("No route found: {0}")]
    RouteNotFound(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("GeoJSON error: {0}")]
    GeoJsonError(String),
}
