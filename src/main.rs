use std::process::ExitCode;

use clap::Parser;
use routehazard::batch::{BatchOptions, run_batch};
use routehazard::cli::Cli;
use routehazard::config::AppConfig;
use routehazard::google::{GoogleMapsClient, Retrying};
use routehazard::AppError;
use routehazard_core::loading::read_routes_table;
use routehazard_core::pipeline::Services;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), AppError> {
    let mut config = AppConfig::load(&cli.config)?;
    cli.apply(&mut config);
    config.validate()?;
    let origin = config.origin()?;
    let api_key = config.api_key()?;

    if let Some(threads) = config.batch.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .map_err(|e| AppError::Config(format!("failed to build thread pool: {e}")))?;
    }

    let mut requests = read_routes_table(&config.batch.routes_table, origin)?;
    let available = requests.len();
    if !cli.only_routes.is_empty() {
        requests.retain(|r| cli.only_routes.contains(&r.route_id));
        for id in &cli.only_routes {
            if !requests.iter().any(|r| &r.route_id == id) {
                warn!("Route {id} is not in {}", config.batch.routes_table.display());
            }
        }
        info!("Processing {} of {} routes", requests.len(), available);
    }

    let client = Retrying::new(
        GoogleMapsClient::new(api_key, &config.google)?
            .with_interpolate(config.analysis.snapping.interpolate),
        config.retry.policy(),
    );
    let services = Services {
        directions: &client,
        snapper: &client,
        places: &client,
    };
    let options = BatchOptions {
        output_dir: config.batch.output_dir.clone(),
        write_map: config.batch.write_map,
    };

    let summary = run_batch(&services, &config.analysis, &requests, &options)?;
    info!(
        "Reports written to {} ({} failed)",
        options.output_dir.display(),
        summary.failed
    );
    Ok(())
}
