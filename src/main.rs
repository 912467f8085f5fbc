//! Binary entry point for forecasts.
//!
//! This binary provides the CLI and the HTML UI for the forecast store.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use forecasts::cli::{self, OutputFormat};
use forecasts::config::ForecastsConfig;
use forecasts::observability;
use forecasts::services::ForecastService;
use forecasts::storage::factory_from_config;
use std::io;
use std::path::Path;
use std::process::ExitCode;

/// Forecasts - weather forecast store with a server-rendered UI.
#[derive(Parser)]
#[command(name = "forecasts")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Serve the HTML UI.
    Serve {
        /// Interface to bind (overrides config).
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (overrides config).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Create the backing store.
    Init,

    /// List forecasts in date order.
    List {
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Show one forecast.
    Get {
        /// Forecast id.
        id: String,

        /// Print JSON.
        #[arg(long)]
        json: bool,
    },

    /// Add a forecast.
    Add {
        /// Date as YYYY-MM-DD.
        #[arg(short, long)]
        date: String,

        /// Temperature in degrees Celsius.
        #[arg(short, long, allow_hyphen_values = true)]
        temp: String,

        /// Short summary, e.g. "Mild".
        #[arg(short, long)]
        summary: Option<String>,

        /// Print JSON.
        #[arg(long)]
        json: bool,
    },

    /// Replace every field of a forecast.
    Update {
        /// Forecast id.
        id: String,

        /// Date as YYYY-MM-DD.
        #[arg(short, long)]
        date: String,

        /// Temperature in degrees Celsius.
        #[arg(short, long, allow_hyphen_values = true)]
        temp: String,

        /// Short summary; omit to clear it.
        #[arg(short, long)]
        summary: Option<String>,

        /// Print JSON.
        #[arg(long)]
        json: bool,
    },

    /// Delete a forecast.
    Delete {
        /// Forecast id.
        id: String,
    },

    /// List suggested summary labels.
    Summaries,

    /// Show the effective configuration.
    Config,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config.with_env_overrides(),
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    if let Err(e) = observability::init(&config.logging, cli.verbose) {
        eprintln!("Failed to initialize observability: {e}");
        return ExitCode::FAILURE;
    }

    match run_command(cli.command, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command.
async fn run_command(command: Commands, config: ForecastsConfig) -> forecasts::Result<()> {
    let mut stdout = io::stdout().lock();

    match command {
        Commands::Config => return cli::cmd_config(&config, &mut stdout),
        Commands::Summaries => return cli::cmd_summaries(&mut stdout),
        _ => {},
    }

    let factory = factory_from_config(&config);
    if matches!(command, Commands::Init) {
        return cli::cmd_init(factory.as_ref(), &mut stdout);
    }
    factory.ensure_created()?;
    tracing::debug!(
        backend = factory.backend_name(),
        location = %factory.location(),
        "Store ready"
    );

    let service = ForecastService::new(factory);

    match command {
        Commands::Serve { host, port } => {
            drop(stdout);
            cli::cmd_serve(service, &config.server, host, port).await
        },
        Commands::List { json } => {
            cli::cmd_list(&service, OutputFormat::from_flag(json), &mut stdout).await
        },
        Commands::Get { id, json } => {
            cli::cmd_get(&service, &id, OutputFormat::from_flag(json), &mut stdout).await
        },
        Commands::Add {
            date,
            temp,
            summary,
            json,
        } => {
            cli::cmd_add(
                &service,
                &date,
                &temp,
                summary.as_deref(),
                OutputFormat::from_flag(json),
                &mut stdout,
            )
            .await
        },
        Commands::Update {
            id,
            date,
            temp,
            summary,
            json,
        } => {
            cli::cmd_update(
                &service,
                &id,
                &date,
                &temp,
                summary.as_deref(),
                OutputFormat::from_flag(json),
                &mut stdout,
            )
            .await
        },
        Commands::Delete { id } => cli::cmd_delete(&service, &id, &mut stdout).await,
        Commands::Init | Commands::Summaries | Commands::Config => Ok(()),
    }
}

/// Loads configuration from `--config`, `FORECASTS_CONFIG_PATH`, or the
/// default location.
fn load_config(path: Option<&str>) -> forecasts::Result<ForecastsConfig> {
    if let Some(config_path) = path {
        return ForecastsConfig::load_from_file(Path::new(config_path));
    }

    if let Ok(config_path) = std::env::var("FORECASTS_CONFIG_PATH") {
        if !config_path.trim().is_empty() {
            return ForecastsConfig::load_from_file(Path::new(&config_path));
        }
    }

    ForecastsConfig::load_default()
}
