//! Batch driver for `routehazard_core`: configuration, Google Maps clients,
//! and the parallel per-route runner used by the `routehazard` binary.

pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod google;

pub use error::AppError;
