//! Sales Forecast Runner
//!
//! Reads a JSON series, runs one forecasting session on a blocking worker
//! under a time limit and writes the JSON report.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use engine::{EngineError, ForecastSession, Scenario, SessionReport, TimeSeriesPoint};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Default wall-clock limit for one session
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Clone, PartialEq, Parser)]
#[command(name = "sales-forecast", version)]
#[command(about = "Weekly sales forecasting with gradient boosted trees", long_about = None)]
#[command(after_help = "Configuration values can be overridden with SALES_FORECAST__<KEY> variables,\n\
e.g. SALES_FORECAST__FORECAST_HORIZON=12 or SALES_FORECAST__HYPERPARAMETERS__TREE_COUNT=300.")]
pub struct Cli {
    /// Series file (JSON array of periods)
    pub data: PathBuf,

    /// Engine configuration (TOML, JSON or YAML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Future covariate overrides (JSON)
    #[arg(short, long)]
    pub scenario: Option<PathBuf>,

    /// Write the report here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Session time limit in seconds
    #[arg(short, long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// trace, debug, info, warn or error
    #[arg(short, long, default_value = "info")]
    pub log_level: Level,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}

impl Cli {
    pub fn time_limit(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

/// Initialize logging to stderr; stdout carries the report
pub fn init_logging(level: Level, json: bool) -> Result<()> {
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    }
    .context("failed to set tracing subscriber")
}

/// Read a JSON array of periods
pub fn load_points(path: &Path) -> Result<Vec<TimeSeriesPoint>> {
    let raw = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let points: Vec<TimeSeriesPoint> =
        serde_json::from_str(&raw).with_context(|| format!("{} is not a JSON array of periods", path.display()))?;
    info!("Loaded {} periods from {}", points.len(), path.display());
    Ok(points)
}

/// Read a scenario file, or the baseline scenario when none is given
pub fn load_scenario(path: Option<&Path>) -> Result<Scenario> {
    match path {
        Some(path) => {
            let raw = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str(&raw).with_context(|| format!("{} is not a valid scenario", path.display()))
        }
        None => Ok(Scenario::baseline()),
    }
}

/// Run a session on the blocking pool, giving up after `limit`
///
/// On expiry the partial result is discarded; the worker itself is not
/// interrupted.
pub async fn run_with_timeout(session: ForecastSession, scenario: Scenario, limit: Duration) -> Result<SessionReport> {
    let worker = tokio::task::spawn_blocking(move || session.run(&scenario));
    match tokio::time::timeout(limit, worker).await {
        Ok(joined) => {
            let report = joined.context("forecast worker panicked")??;
            Ok(report)
        }
        Err(_) => Err(EngineError::TrainingTimeout {
            stage: "session",
            limit_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
        }
        .into()),
    }
}

/// Serialize the report to `output`, or stdout
pub fn write_report(report: &SessionReport, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("failed to serialize report")?;
    match output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
            info!("Report written to {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}
