//! Housecast price prediction CLI.
//!
//! Prints the `ECONOMIC_INDICATORS:` diagnostic line followed by the predicted
//! price on stdout. Logs go to stderr so stdout stays machine-readable.
//!
//! # Usage
//! ```sh
//! predict <region> <year> <quarter> <size> [market_type]
//! predict Warsaw 2022 1 "do 40 m²" "primary market"
//! ```
//!
//! # Environment Variables
//! - `MODELS_DIR` - Directory holding the artifacts (default: models)
//! - `MODEL_BACKEND` - `onnx` or `smartcore` (default: onnx)
//! - `MODEL_FILE`, `PREPROCESSOR_FILE`, `SCALER_FILE`, `INDICATORS_FILE` - Artifact file names
//! - `RUST_LOG` - Log filter (default: info)

use anyhow::{Context, Result};
use clap::Parser;
use clap::error::ErrorKind;
use housecast::application::prediction_service::PricePrediction;
use housecast::config::PredictorConfig;
use housecast::domain::request::PredictionRequest;
use housecast::infrastructure::ModelArtifacts;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::prelude::*;

const USAGE: &str = "Usage: predict <region> <year> <quarter> <size> [market_type]";

#[derive(Parser, Debug)]
#[command(author, version, about = "Predict a real-estate price per square meter", long_about = None)]
struct Args {
    /// Region (voivodeship or powiat)
    #[arg(allow_hyphen_values = true)]
    region: String,

    /// Year, 2010-2025
    #[arg(allow_hyphen_values = true)]
    year: String,

    /// Quarter, 1-4
    #[arg(allow_hyphen_values = true)]
    quarter: String,

    /// Size bracket: "do 40 m²", "od 40.1 do 60 m²", "od 60.1 do 80 m²" or "od 80.1 m²"
    #[arg(allow_hyphen_values = true)]
    size: String,

    /// "primary market" or "secondary market"
    #[arg(default_value = "primary market", allow_hyphen_values = true)]
    market_type: String,

    /// Anything after the market type is ignored
    #[arg(hide = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
    extra: Vec<String>,

    /// Directory holding the model artifacts (overrides MODELS_DIR)
    #[arg(long)]
    models_dir: Option<PathBuf>,
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(stderr_layer)
        .init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(_) => {
            println!("{}", USAGE);
            return ExitCode::FAILURE;
        }
    };

    match run(args) {
        Ok(prediction) => {
            println!("{}", prediction.indicators);
            println!("{:?}", prediction.price);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Error: {:#}", e);
            println!("ERROR: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<PricePrediction> {
    if !args.extra.is_empty() {
        debug!("Ignoring extra arguments: {:?}", args.extra);
    }
    info!(
        "Predicting for region={}, year={}, quarter={}, size={}, market={}",
        args.region, args.year, args.quarter, args.size, args.market_type
    );

    // Reject bad input before touching any artifact
    let request = PredictionRequest::parse(
        &args.region,
        &args.size,
        &args.year,
        &args.quarter,
        &args.market_type,
    )?;

    let mut config = PredictorConfig::from_env()?;
    if let Some(dir) = args.models_dir {
        config = config.with_models_dir(dir);
    }
    info!(
        "Loading {} artifacts from {:?}",
        config.artifacts.backend, config.artifacts.models_dir
    );

    let service = ModelArtifacts::load(&config.artifacts)
        .context("Failed to load model artifacts")?
        .into_service();

    Ok(service.predict(&request)?)
}
