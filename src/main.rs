//! CLI entry point for the transit friction preprocessor.
//!
//! Loads barrier, stop, and route tables, joins barriers onto nearby stops,
//! and writes the per-stop, per-neighborhood, and per-route JSON artifacts.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use transit_friction::config::PipelineConfig;
use transit_friction::fetch::{BasicClient, read_source};
use transit_friction::loader::{load_barriers, load_routes, load_stops};
use transit_friction::output::write_artifacts;
use transit_friction::pipeline;

#[derive(Parser)]
#[command(name = "transit_friction")]
#[command(about = "Profile transit stops by the accessibility barriers around them", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Pipeline settings; flags override values from `--config`.
#[derive(Args, Debug)]
struct ConfigArgs {
    /// JSON file with grid_size, threshold, min_severity, threads
    #[arg(long, value_name = "FILE")]
    config: Option<String>,

    /// Grid cell size in degrees
    #[arg(long)]
    grid_size: Option<f64>,

    /// Per-axis match distance in degrees (at most half the grid size)
    #[arg(long)]
    threshold: Option<f64>,

    /// Lowest severity counted by the neighborhood and route rollups
    #[arg(long)]
    min_severity: Option<u8>,

    /// Worker threads for the join (defaults to one per core)
    #[arg(long)]
    threads: Option<usize>,
}

impl ConfigArgs {
    fn resolve(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::load(path)?,
            None => PipelineConfig::default(),
        };
        if let Some(grid_size) = self.grid_size {
            config.grid_size = grid_size;
        }
        if let Some(threshold) = self.threshold {
            config.threshold = threshold;
        }
        if let Some(min_severity) = self.min_severity {
            config.min_severity = min_severity;
        }
        if self.threads.is_some() {
            config.threads = self.threads;
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Join barriers onto stops and write the JSON artifacts
    Run {
        /// Barrier table (path or URL)
        #[arg(long, value_name = "FILE_OR_URL")]
        barriers: String,

        /// Stop locations table (path or URL)
        #[arg(long, value_name = "FILE_OR_URL")]
        stops: String,

        /// Stop-to-route membership table (path or URL)
        #[arg(long, value_name = "FILE_OR_URL")]
        routes: String,

        /// Directory to write stops.json, neighborhoods.json and routes.json into
        #[arg(short, long, default_value = "data")]
        output_dir: PathBuf,

        /// Gzip compress the artifacts (.json.gz)
        #[arg(long, default_value_t = false)]
        gzip: bool,

        #[command(flatten)]
        settings: ConfigArgs,
    },
    /// Validate the effective configuration without running
    CheckConfig {
        #[command(flatten)]
        settings: ConfigArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/transit_friction.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("transit_friction.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            barriers,
            stops,
            routes,
            output_dir,
            gzip,
            settings,
        } => {
            let config = settings.resolve()?;
            run(config, &barriers, &stops, &routes, output_dir, gzip).await?;
        }
        Commands::CheckConfig { settings } => {
            let config = settings.resolve()?;
            info!(config = %serde_json::to_string(&config)?, "Configuration is valid");
        }
    }

    Ok(())
}

/// Fetches the three tables concurrently, then runs the batch off the async runtime.
#[tracing::instrument(skip(config, output_dir), fields(output_dir = %output_dir.display()))]
async fn run(
    config: PipelineConfig,
    barriers: &str,
    stops: &str,
    routes: &str,
    output_dir: PathBuf,
    gzip: bool,
) -> Result<()> {
    let client = BasicClient::new()?;
    let (barrier_bytes, stop_bytes, route_bytes) = tokio::try_join!(
        read_source(&client, barriers),
        read_source(&client, stops),
        read_source(&client, routes),
    )?;

    tokio::task::spawn_blocking(move || -> Result<()> {
        let barriers = load_barriers(&barrier_bytes)?;
        let (route_map, route_report) = load_routes(&route_bytes)?;
        let stops = load_stops(&stop_bytes, &route_map)?;

        let artifacts = pipeline::run(&config, &barriers.records, &stops.records)?;
        let written = write_artifacts(&output_dir, &artifacts, gzip)?;

        info!(
            files = written.len(),
            barriers_skipped = barriers.report.skipped,
            stops_skipped = stops.report.skipped,
            routes_skipped = route_report.skipped,
            "Done"
        );
        Ok(())
    })
    .await?
}
