//! Sales Forecast - Main Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use cli::{init_logging, load_points, load_scenario, run_with_timeout, write_report, Cli};
use engine::{EngineConfig, ForecastSession};
use tracing::info;

fn main() -> Result<()> {
    let args = Cli::parse();

    init_logging(args.log_level, args.json_logs)?;
    info!("=== Sales Forecast v{} ===", env!("CARGO_PKG_VERSION"));

    let config = EngineConfig::load(args.config.as_deref()).context("invalid configuration")?;
    let points = load_points(&args.data)?;
    let scenario = load_scenario(args.scenario.as_deref())?;
    let session = ForecastSession::new(config, points).context("invalid input series")?;

    let runtime = tokio::runtime::Runtime::new().context("failed to start runtime")?;
    let result = runtime.block_on(run_with_timeout(session, scenario, args.time_limit()));
    // A timed-out worker may still be running; do not wait for it
    runtime.shutdown_background();

    let report = result.context("forecast session failed")?;
    write_report(&report, args.output.as_deref())
}
