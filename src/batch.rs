//! Parallel batch driver: one analysis per route, each written to its own files

use std::collections::{BTreeMap, HashSet};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use routehazard_core::loading::AnalysisConfig;
use routehazard_core::model::RouteRequest;
use routehazard_core::pipeline::{AnalysisDiagnostics, RouteAnalysis, Services, analyze_route};
use routehazard_core::report::write_report_csv;
use serde::Serialize;
use tracing::{error, info, info_span, warn};

use crate::AppError;

pub const SUMMARY_FILE: &str = "summary.json";

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub output_dir: PathBuf,
    pub write_map: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RouteOutcome {
    pub route_id: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub turns: usize,
    pub blind_spots: usize,
    pub pois: usize,
    pub rows_by_category: BTreeMap<&'static str, usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<AnalysisDiagnostics>,
    pub files: Vec<PathBuf>,
}

impl RouteOutcome {
    fn failed(route_id: &str, error: String) -> Self {
        Self {
            route_id: route_id.to_string(),
            success: false,
            error: Some(error),
            turns: 0,
            blind_spots: 0,
            pois: 0,
            rows_by_category: BTreeMap::new(),
            diagnostics: None,
            files: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub generated_at: DateTime<Utc>,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub routes: Vec<RouteOutcome>,
}

impl BatchSummary {
    fn new(routes: Vec<RouteOutcome>) -> Self {
        let succeeded = routes.iter().filter(|r| r.success).count();
        Self {
            generated_at: Utc::now(),
            total: routes.len(),
            succeeded,
            failed: routes.len() - succeeded,
            routes,
        }
    }

    pub fn write(&self, path: &Path) -> Result<(), AppError> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }
}

/// Analyze every route on the current rayon pool and write `summary.json`
///
/// A route that fails is recorded in the summary and does not stop the others.
///
/// # Errors
///
/// Returns an error only if the output directory or the summary cannot be written
pub fn run_batch(
    services: &Services<'_>,
    config: &AnalysisConfig,
    requests: &[RouteRequest],
    options: &BatchOptions,
) -> Result<BatchSummary, AppError> {
    fs::create_dir_all(&options.output_dir)?;
    let start = Instant::now();
    info!(
        "Processing {} routes on {} threads",
        requests.len(),
        rayon::current_num_threads()
    );

    let stems = unique_file_stems(requests);
    let outcomes = requests
        .par_iter()
        .zip(stems.par_iter())
        .map(|(request, stem)| process_route(services, config, request, stem, options))
        .collect::<Vec<_>>();

    let summary = BatchSummary::new(outcomes);
    summary.write(&options.output_dir.join(SUMMARY_FILE))?;
    info!(
        "{} of {} routes processed successfully in {:.2?}",
        summary.succeeded,
        summary.total,
        start.elapsed()
    );
    Ok(summary)
}

fn process_route(
    services: &Services<'_>,
    config: &AnalysisConfig,
    request: &RouteRequest,
    stem: &str,
    options: &BatchOptions,
) -> RouteOutcome {
    let span = info_span!("route", route_id = %request.route_id);
    let _guard = span.enter();

    let analysis = match analyze_route(services, config, request) {
        Ok(analysis) => analysis,
        Err(err) => {
            error!("Failed to process route {}: {err}", request.route_id);
            return RouteOutcome::failed(&request.route_id, err.to_string());
        }
    };
    if analysis.diagnostics.is_partial() {
        warn!(
            "Route {} is only partially analyzed: {:?}",
            request.route_id, analysis.diagnostics
        );
    }

    match write_outputs(&analysis, stem, options) {
        Ok(files) => {
            info!(
                "Route {} processed successfully: {} turns, {} blind spots, {} POIs",
                request.route_id,
                analysis.turns.len(),
                analysis.blind_spot_count(),
                analysis.pois.len()
            );
            RouteOutcome {
                route_id: request.route_id.clone(),
                success: true,
                error: None,
                turns: analysis.turns.len(),
                blind_spots: analysis.blind_spot_count(),
                pois: analysis.pois.len(),
                rows_by_category: analysis.category_counts(),
                diagnostics: Some(analysis.diagnostics.clone()),
                files,
            }
        }
        Err(err) => {
            error!("Failed to write reports for route {}: {err}", request.route_id);
            RouteOutcome::failed(&request.route_id, err.to_string())
        }
    }
}

/// Write the route's report files, removing any already written if a later one fails
fn write_outputs(
    analysis: &RouteAnalysis,
    stem: &str,
    options: &BatchOptions,
) -> Result<Vec<PathBuf>, AppError> {
    let mut files = Vec::with_capacity(2);
    let written = write_report_files(analysis, stem, options, &mut files);
    if written.is_err() {
        for path in &files {
            if let Err(err) = fs::remove_file(path) {
                warn!("Could not remove partial report {}: {err}", path.display());
            }
        }
    }
    written.map(|()| files)
}

/// Pushes each path to `files` as soon as the file is created
fn write_report_files(
    analysis: &RouteAnalysis,
    stem: &str,
    options: &BatchOptions,
    files: &mut Vec<PathBuf>,
) -> Result<(), AppError> {
    let csv_path = options.output_dir.join(format!("{stem}.csv"));
    let file = File::create(&csv_path)?;
    files.push(csv_path);
    let mut writer = BufWriter::new(file);
    write_report_csv(&analysis.rows, &mut writer)?;
    writer.flush()?;

    if options.write_map {
        let map_path = options.output_dir.join(format!("{stem}.geojson"));
        let file = File::create(&map_path)?;
        files.push(map_path);
        let mut writer = BufWriter::new(file);
        analysis.write_geojson(&mut writer)?;
        writer.flush()?;
    }
    Ok(())
}

/// One file stem per request, suffixed with `-2`, `-3`, ... where sanitized ids collide.
///
/// Collisions are checked case-insensitively so the names stay distinct on
/// case-insensitive file systems.
pub fn unique_file_stems(requests: &[RouteRequest]) -> Vec<String> {
    let mut taken = HashSet::with_capacity(requests.len());
    requests
        .iter()
        .map(|request| {
            let base = file_stem(&request.route_id);
            let mut stem = base.clone();
            let mut n = 2;
            while !taken.insert(stem.to_ascii_lowercase()) {
                stem = format!("{base}-{n}");
                n += 1;
            }
            if stem != base {
                warn!(
                    "Route id {:?} collides with another route's file name, writing it as {stem}",
                    request.route_id
                );
            }
            stem
        })
        .collect()
}

/// Route id made safe to use as a file name
pub fn file_stem(route_id: &str) -> String {
    let stem = route_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect::<String>();
    if stem.is_empty() || stem.chars().all(|c| c == '.') {
        format!("route_{stem}")
    } else {
        stem
    }
}
