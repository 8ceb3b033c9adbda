//! # airq
//!
//! Command-line interface for the air quality forecast engine.

use std::fs::File;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use airquality_facade::{
    format_timestamp, AirQualityEngine, CsvRecordSource, EngineConfig, QueryOutcome,
};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

type CliResult<T> = std::result::Result<T, String>;

#[derive(Parser)]
#[command(name = "airq")]
#[command(about = "Air quality lookup and forecast CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a timestamp to a reading, a forecast, or nothing
    Query {
        /// Input CSV with date and pollutant columns
        #[arg(short, long)]
        input: PathBuf,

        /// Timestamp to resolve (YYYY-MM-DD HH:MM)
        #[arg(short, long)]
        at: String,

        /// Forecast steps requested from each model
        #[arg(long)]
        horizon: Option<usize>,

        /// TOML engine configuration
        #[arg(short, long, env = "AIRQ_CONFIG")]
        config: Option<PathBuf>,

        /// Output file (optional)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print every reading with its AQI
    Data {
        /// Input CSV with date and pollutant columns
        #[arg(short, long)]
        input: PathBuf,

        /// Output file (optional)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the effective model order table
    Orders {
        /// TOML engine configuration
        #[arg(short, long, env = "AIRQ_CONFIG")]
        config: Option<PathBuf>,
    },
}

fn load_config(path: Option<&Path>) -> CliResult<EngineConfig> {
    match path {
        Some(path) => EngineConfig::from_file(path).map_err(|e| e.to_string()),
        None => Ok(EngineConfig::default()),
    }
}

/// Write JSON to file or stdout
fn write_json<T: Serialize>(value: &T, output: Option<&PathBuf>) -> CliResult<()> {
    if let Some(path) = output {
        let mut file = File::create(path).map_err(|e| format!("Failed to create output: {}", e))?;
        serde_json::to_writer_pretty(&mut file, value)
            .map_err(|e| format!("Failed to write JSON: {}", e))?;
        eprintln!("Results written to {:?}", path);
    } else {
        let json = serde_json::to_string_pretty(value)
            .map_err(|e| format!("Failed to encode JSON: {}", e))?;
        println!("{}", json);
    }
    Ok(())
}

/// Run query command
fn run_query(
    input: PathBuf,
    at: String,
    horizon: Option<usize>,
    config: Option<PathBuf>,
    output: Option<PathBuf>,
) -> CliResult<()> {
    let mut config = load_config(config.as_deref())?;
    if let Some(h) = horizon {
        config.horizon = NonZeroUsize::new(h).ok_or("horizon must be positive")?;
    }

    let engine = AirQualityEngine::new(config);
    let context = engine
        .start(&CsvRecordSource::from_path(&input))
        .map_err(|e| e.to_string())?;
    eprintln!(
        "Loaded {} readings from {:?}",
        context.dataset().len(),
        input.file_name().unwrap_or_default()
    );

    let outcome = context.resolve(&at).map_err(|e| e.to_string())?;
    write_json(&outcome, output.as_ref())?;

    match outcome {
        QueryOutcome::Unavailable { reason } => {
            Err(format!("No answer for '{}': {:?}", at, reason))
        }
        _ => Ok(()),
    }
}

/// Run data command
fn run_data(input: PathBuf, output: Option<PathBuf>) -> CliResult<()> {
    let engine = AirQualityEngine::with_defaults();
    let dataset = engine
        .load(&CsvRecordSource::from_path(&input))
        .map_err(|e| e.to_string())?;

    if let (Some(first), Some(last)) = (dataset.earliest_timestamp(), dataset.latest_timestamp()) {
        eprintln!(
            "{} readings from {} to {}",
            dataset.len(),
            format_timestamp(&first),
            format_timestamp(&last)
        );
    }
    write_json(&dataset.readings(), output.as_ref())
}

/// Run orders command
fn run_orders(config: Option<PathBuf>) -> CliResult<()> {
    let config = load_config(config.as_deref())?;
    write_json(&config.orders, None)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Query {
            input,
            at,
            horizon,
            config,
            output,
        } => run_query(input, at, horizon, config, output),

        Commands::Data { input, output } => run_data(input, output),

        Commands::Orders { config } => run_orders(config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_query() {
        let cli = Cli::try_parse_from([
            "airq",
            "query",
            "--input",
            "delhi.csv",
            "--at",
            "2023-01-24 05:00",
            "--horizon",
            "6",
        ])
        .unwrap();

        match cli.command {
            Commands::Query { at, horizon, .. } => {
                assert_eq!(at, "2023-01-24 05:00");
                assert_eq!(horizon, Some(6));
            }
            _ => panic!("expected query"),
        }
    }

    #[test]
    fn test_query_requires_timestamp() {
        assert!(Cli::try_parse_from(["airq", "query", "--input", "delhi.csv"]).is_err());
    }

    #[test]
    fn test_zero_horizon_rejected() {
        let err = run_query(
            PathBuf::from("/nonexistent.csv"),
            "2023-01-24 05:00".to_string(),
            Some(0),
            None,
            None,
        )
        .unwrap_err();
        assert!(err.contains("horizon"));
    }

    #[test]
    fn test_missing_config_file() {
        assert!(load_config(Some(Path::new("/nonexistent/airq.toml"))).is_err());
        assert_eq!(load_config(None).unwrap(), EngineConfig::default());
    }
}
