//! wellprofile - drilling depth-profile calculator
//!
//! # Usage
//!
//! ```bash
//! # Every model with the configured defaults
//! wellprofile evaluate
//!
//! # Regression hole-cleaning strategy as CSV for charting
//! wellprofile hole-cleaning --model regression --rpm 90 --format csv > profile.csv
//!
//! # Summarise a survey workbook
//! wellprofile survey surveys/F-9A.xlsx --preview 10
//!
//! # HTTP API
//! wellprofile serve --addr 0.0.0.0:8080
//! ```
//!
//! # Environment Variables
//!
//! - `WELLPROFILE_CONFIG`: Path to a profile_config.toml
//! - `WELLPROFILE_LOG_FORMAT`: Set to "json" for JSON log lines
//! - `RUST_LOG`: Logging level (default: info)

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{info, warn};

use wellprofile::api::{create_app, ApiState};
use wellprofile::config::{defaults, validation, ProfileConfig};
use wellprofile::physics_engine::{HoleCleaningModelKind, ProfileModel};
use wellprofile::report;
use wellprofile::survey::Survey;
use wellprofile::types::{DrillingParameters, ParameterOverrides};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "wellprofile")]
#[command(about = "Hole cleaning, bottom hole pressure and effective WOB profiles")]
#[command(version)]
struct CliArgs {
    /// Path to a profile_config.toml (takes precedence over WELLPROFILE_CONFIG)
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: SubCommand,
}

#[derive(Subcommand, Debug)]
enum SubCommand {
    /// Cuttings concentration and bed height vs depth
    HoleCleaning(ModelArgs),
    /// Bottom hole pressure vs depth
    Pressure(ModelArgs),
    /// Effective weight on bit vs inclination
    Wob(ModelArgs),
    /// Run every model and list all recommendations
    Evaluate(ModelArgs),
    /// Load a directional survey (.csv, .tsv, .txt or .xlsx)
    Survey {
        file: PathBuf,
        /// Number of stations to print in text mode
        #[arg(long, value_name = "ROWS")]
        preview: Option<usize>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Print the resolved configuration as TOML
    Config {
        /// Only validate and report warnings
        #[arg(long)]
        validate: bool,
    },
    /// Serve the HTTP API
    Serve {
        /// Override the server address from [server].addr
        #[arg(short, long)]
        addr: Option<String>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Csv,
}

#[derive(Args, Debug)]
struct ModelArgs {
    #[command(flatten)]
    params: ParameterOverrides,

    /// Hole-cleaning strategy: exponential or regression
    #[arg(long)]
    model: Option<HoleCleaningModelKind>,

    /// Samples per domain
    #[arg(long)]
    samples: Option<usize>,

    /// Bottom of the depth domain, in the strategy's depth unit
    #[arg(long, value_name = "DEPTH")]
    depth_end: Option<f64>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Copy, Clone, Debug)]
enum Output {
    HoleCleaning,
    Pressure,
    Wob,
    Evaluate,
}

// ============================================================================
// Commands
// ============================================================================

fn load_config(path: Option<&Path>) -> Result<ProfileConfig> {
    match path {
        Some(p) => {
            let config = ProfileConfig::load_from_file(p)
                .with_context(|| format!("Failed to load config {}", p.display()))?;
            info!(path = %p.display(), well = %config.well.name, "Loaded profile config");
            Ok(config)
        }
        None => Ok(ProfileConfig::load()),
    }
}

/// Layer CLI overrides over the config and reject impossible inputs.
fn resolve(config: &ProfileConfig, args: &ModelArgs) -> Result<(ProfileModel, DrillingParameters)> {
    let params = args.params.apply(config.parameters);
    let (errors, warnings) = validation::validate_parameters(&params);
    for w in &warnings {
        warn!("{}", w);
    }
    if !errors.is_empty() {
        anyhow::bail!("Invalid drilling parameters:\n  - {}", errors.join("\n  - "));
    }

    let mut model = ProfileModel::from_config(config);
    if let Some(kind) = args.model {
        model = model.with_model(kind);
    }
    if let Some(samples) = args.samples {
        if samples > defaults::MAX_SAMPLES {
            anyhow::bail!("--samples {samples} exceeds the maximum of {}", defaults::MAX_SAMPLES);
        }
        model = model.with_samples(samples);
    }
    if let Some(end) = args.depth_end {
        if !end.is_finite() || end < 0.0 {
            anyhow::bail!("--depth-end must be a finite, non-negative depth (got {end})");
        }
        model = model.with_depth_end(Some(end));
    }
    Ok((model, params))
}

/// Write `value` to `out` in the requested format.
fn emit<T, W>(
    mut out: W,
    format: OutputFormat,
    value: &T,
    text: impl FnOnce(&T) -> String,
    csv: impl FnOnce(&mut W, &T) -> io::Result<()>,
) -> Result<()>
where
    T: Serialize,
    W: Write,
{
    match format {
        OutputFormat::Text => out.write_all(text(value).as_bytes())?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, value)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => csv(&mut out, value)?,
    }
    out.flush()?;
    Ok(())
}

fn run_model(config: &ProfileConfig, args: &ModelArgs, output: Output) -> Result<()> {
    let (model, params) = resolve(config, args)?;
    let out = io::stdout().lock();

    match output {
        Output::HoleCleaning => {
            let profile = model.hole_cleaning(&params);
            emit(out, args.format, &profile, report::render_hole_cleaning, |w, p| {
                report::write_hole_cleaning_csv(w, p)
            })
        }
        Output::Pressure => {
            let profile = model.pressure_profile(&params);
            emit(out, args.format, &profile, report::render_pressure, |w, p| {
                report::write_pressure_csv(w, p)
            })
        }
        Output::Wob => {
            let profile = model.effective_wob(&params);
            emit(out, args.format, &profile, report::render_wob, |w, p| {
                report::write_wob_csv(w, p)
            })
        }
        Output::Evaluate => {
            let result = model.evaluate(&params);
            for rec in result.recommendations().into_iter().filter(|r| r.is_low()) {
                info!(topic = %rec.topic, critical_samples = rec.critical_samples, "{}", rec.message);
            }
            emit(out, args.format, &result, report::render_result, |w, r| {
                report::write_result_csv(w, r)
            })
        }
    }
}

fn run_survey(path: &Path, preview: Option<usize>, format: OutputFormat) -> Result<()> {
    let survey = Survey::load(path)
        .with_context(|| format!("Failed to load survey {}", path.display()))?;
    let out = io::stdout().lock();
    emit(
        out,
        format,
        &survey,
        |s| report::render_survey(s, preview),
        |w, s| report::write_survey_csv(w, s),
    )
}

fn run_config(config: &ProfileConfig, validate_only: bool) -> Result<()> {
    config.validate().context("Configuration is invalid")?;
    let (_, warnings) = validation::validate_physical_ranges(config);

    if validate_only {
        println!("Configuration is valid ({} warning(s))", warnings.len());
        for w in &warnings {
            println!("  - {}", w);
        }
        return Ok(());
    }

    print!("{}", config.to_toml().context("Failed to serialize configuration")?);
    Ok(())
}

async fn serve(config: ProfileConfig, addr: Option<String>) -> Result<()> {
    let addr = addr.unwrap_or_else(|| config.server.addr.clone());
    info!(
        well = %config.well.name,
        model = %config.hole_cleaning.model,
        "Starting profile API"
    );

    let app = create_app(ApiState::new(config));
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!(address = %addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr);

    let json = std::env::var(defaults::LOG_FORMAT_ENV_VAR)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let args = CliArgs::parse();
    let config = load_config(args.config.as_deref())?;

    match args.command {
        SubCommand::HoleCleaning(m) => run_model(&config, &m, Output::HoleCleaning),
        SubCommand::Pressure(m) => run_model(&config, &m, Output::Pressure),
        SubCommand::Wob(m) => run_model(&config, &m, Output::Wob),
        SubCommand::Evaluate(m) => run_model(&config, &m, Output::Evaluate),
        SubCommand::Survey {
            file,
            preview,
            format,
        } => run_survey(&file, preview, format),
        SubCommand::Config { validate } => run_config(&config, validate),
        SubCommand::Serve { addr } => serve(config, addr).await,
    }
}
