//! Travel-time contour generator.
//!
//! Queries the Distance Matrix service for travel durations from an
//! origin to every point of a sampling grid, then writes:
//! - `<name>.csv`: the raw samples
//! - `<name>.kml`: iso-duration contours, blue (short) to red (long)

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use iso_common::{BoundingBox, Coordinate, RunConfig};
use isochrone::credentials::{
    CredentialProvider, EnvKeyProvider, KeyFileProvider, DEFAULT_KEY_FILE,
};
use isochrone::distance_matrix::{DistanceMatrixClient, DistanceMatrixConfig, DEFAULT_ENDPOINT};
use isochrone::Pipeline;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "isochrone")]
#[command(about = "Generate travel-time contours as KML")]
struct Args {
    /// YAML run configuration (missing keys take defaults)
    #[arg(short, long, env = "ISOCHRONE_CONFIG")]
    config: Option<PathBuf>,

    /// Origin as "lon,lat"
    #[arg(long, allow_hyphen_values = true)]
    origin: Option<Coordinate>,

    /// Region as "minx,miny,maxx,maxy"
    #[arg(long, allow_hyphen_values = true)]
    bbox: Option<BoundingBox>,

    /// Target number of grid points to query
    #[arg(short, long)]
    budget: Option<usize>,

    /// Evaluation mesh step in degrees
    #[arg(long)]
    mesh_step: Option<f64>,

    /// Travel mode (driving, walking, bicycling, transit)
    #[arg(long)]
    mode: Option<String>,

    /// Base name of the output files
    #[arg(short, long)]
    name: Option<String>,

    /// Directory for the output files
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Contour an existing sample table instead of querying the service
    #[arg(long)]
    from_csv: Option<PathBuf>,

    /// Key file, used when DISTANCE_MATRIX_API_KEY is not set
    #[arg(long, env = "DISTANCE_MATRIX_KEY_FILE", default_value = DEFAULT_KEY_FILE)]
    key_file: PathBuf,

    /// Distance Matrix endpoint
    #[arg(long, env = "DISTANCE_MATRIX_URL", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "30")]
    request_timeout: u64,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

impl Args {
    /// Configuration file (or defaults) with command line overrides applied.
    fn run_config(&self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_yaml_file(path)
                .with_context(|| format!("Failed to load {}", path.display()))?,
            None => RunConfig::default(),
        };

        if let Some(origin) = self.origin {
            config.origin = origin;
        }
        if let Some(bbox) = self.bbox {
            config.bbox = bbox;
        }
        if let Some(budget) = self.budget {
            config.sample_budget = budget;
        }
        if let Some(step) = self.mesh_step {
            config.mesh_step = step;
        }
        if let Some(mode) = &self.mode {
            config.travel_mode = mode.clone();
        }
        if let Some(name) = &self.name {
            config.name = name.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        Ok(config)
    }

    fn credentials(&self) -> Box<dyn CredentialProvider> {
        let env = EnvKeyProvider::new();
        if env.is_available() {
            Box::new(env)
        } else {
            Box::new(KeyFileProvider::new(&self.key_file))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);
    if args.log_json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }

    let config = args.run_config()?;
    let pipeline = Pipeline::new(config)?;
    let config = pipeline.config();
    info!(
        name = %config.name,
        origin = %config.origin,
        bbox = %config.bbox,
        budget = config.sample_budget,
        "Starting travel-time contour run"
    );

    let summary = match &args.from_csv {
        Some(samples) => pipeline.run_from_samples(samples)?,
        None => {
            let client = DistanceMatrixClient::new(
                DistanceMatrixConfig {
                    endpoint: args.endpoint.clone(),
                    travel_mode: config.travel_mode.clone(),
                    request_timeout: Duration::from_secs(args.request_timeout),
                },
                args.credentials().as_ref(),
            )?;
            pipeline.run(&client).await?
        }
    };

    println!("{}", summary.document_path.display());
    Ok(())
}
