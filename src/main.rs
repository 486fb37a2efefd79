mod cli;
mod output;

use std::process::ExitCode;

use clap::Parser;
use raptor_core::prelude::*;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cli::{AppError, Args, Settings};

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so journeys on stdout stay machine readable
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> Result<(), AppError> {
    let settings = Settings::from_args(args)?;
    let network = create_transit_network(&settings.network)?;
    info!(
        "Network ready: {} stops, {} routes, {} trips",
        network.stop_count(),
        network.route_count(),
        network.trip_count()
    );

    let query = settings.query(args);
    let journeys = find_journeys(&network, &query, &settings.routing)?;
    println!("{}", output::render(&network, &journeys, args.format)?);
    Ok(())
}
