//! Scenario Charts - chart-ready series from epidemiological projections
//!
//! The `scenario-charts` command reads a raw projection bundle and prints
//! chart payloads, predicted outcomes, or zone lookups.
//!
//! ## Commands
//!
//! - `charts`: Derive the three chart payloads for one scenario
//! - `outcomes`: Predicted outcomes for every scenario at a horizon
//! - `classify`: Zone label for a value on a chart
//! - `ticks`: Zone-aligned tick values for a y-domain

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::{info, Level};

use scenario_charts_core::{
    build_charts, compute_ticks, outcomes_table, render_outcomes_md, write_charts_json,
    write_outcomes_md, Availability, ChartConfig, ChartKind, ChartReport, InterventionKind,
    InterventionScenarioSet, LocationSpan, RawBundle, ScenarioSlot,
};

#[derive(Parser, Debug)]
#[command(name = "scenario-charts")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Chart-ready series from intervention scenario projections", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// Chart configuration file (JSON); builtin tables when omitted
    #[arg(long, global = true, env = "SCENARIO_CHARTS_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Derive chart payloads for one scenario
    Charts {
        /// Raw projection bundle (JSON)
        #[arg(short, long)]
        bundle: PathBuf,

        /// Scenario slot: baseline, weak_distancing, strict_distancing, contain
        #[arg(short, long, default_value = "baseline", value_parser = parse_name::<ScenarioSlot>)]
        scenario: ScenarioSlot,

        /// Output path (default: stdout)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Predicted outcomes for every scenario
    Outcomes {
        /// Raw projection bundle (JSON)
        #[arg(short, long)]
        bundle: PathBuf,

        /// Days from projection start (default: from config)
        #[arg(long)]
        horizon: Option<i64>,

        /// The location's current intervention
        #[arg(long, value_parser = parse_name::<InterventionKind>)]
        current: Option<InterventionKind>,

        /// Render as a markdown table instead of JSON
        #[arg(long)]
        markdown: bool,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Zone label for a value
    Classify {
        /// Chart: rt, positive_tests, icu_utilization
        #[arg(long, value_parser = parse_name::<ChartKind>)]
        chart: ChartKind,

        #[arg(long, allow_hyphen_values = true)]
        value: f64,
    },

    /// Zone-aligned ticks for a y-domain
    Ticks {
        /// Chart: rt, positive_tests, icu_utilization
        #[arg(long, value_parser = parse_name::<ChartKind>)]
        chart: ChartKind,

        #[arg(long, allow_hyphen_values = true)]
        min: f64,

        #[arg(long, allow_hyphen_values = true)]
        max: f64,
    },
}

/// Parse a snake_case name into any enum that deserializes from one.
fn parse_name<T: DeserializeOwned>(raw: &str) -> std::result::Result<T, String> {
    serde_json::from_value(serde_json::Value::String(raw.to_string()))
        .map_err(|_| format!("unknown name: {}", raw))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    scenario_charts_core::init_tracing(cli.json, level);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Charts {
            bundle,
            scenario,
            out,
        } => {
            let report = cmd_charts(&config, &bundle, scenario)?;
            match out {
                Some(path) => {
                    write_charts_json(&path, &report)?;
                    info!(event = "charts.written", path = %path.display());
                }
                None => println!(
                    "{}",
                    serde_json::to_string_pretty(&report).context("serialize chart report")?
                ),
            }
            Ok(())
        }
        Commands::Outcomes {
            bundle,
            horizon,
            current,
            markdown,
            out,
        } => cmd_outcomes(
            &config,
            &bundle,
            horizon.unwrap_or(config.horizon_days),
            current,
            markdown,
            out.as_deref(),
        ),
        Commands::Classify { chart, value } => {
            let label = config.zones_for(chart).classify(value)?;
            println!("{}", label);
            Ok(())
        }
        Commands::Ticks { chart, min, max } => {
            let ticks = compute_ticks(min, max, config.zones_for(chart))?;
            println!("{}", serde_json::to_string(&ticks)?);
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<ChartConfig> {
    match path {
        Some(path) => ChartConfig::load(path)
            .with_context(|| format!("Failed to load config {:?}", path)),
        None => Ok(ChartConfig::default()),
    }
}

/// A `null` bundle file means the projections are not available.
fn read_bundle(path: &Path) -> Result<Option<RawBundle>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read bundle {:?}", path))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse bundle {:?}", path))
}

fn build_set(config: &ChartConfig, bundle: &Path) -> Result<Availability<InterventionScenarioSet>> {
    let raw = read_bundle(bundle)?;
    Ok(InterventionScenarioSet::build_with_policy(
        raw.as_ref(),
        &config.policies,
    ))
}

fn location_of(bundle: &Path) -> String {
    bundle
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unknown".to_string())
}

fn cmd_charts(config: &ChartConfig, bundle: &Path, scenario: ScenarioSlot) -> Result<ChartReport> {
    let _span = LocationSpan::enter(&location_of(bundle));
    let set = build_set(config, bundle)?;
    let model = set.as_ref().map(|s| s.model(scenario));

    let digest = match model.clone() {
        Availability::Available(m) => Some(m.projection_digest()?),
        Availability::Unavailable => None,
    };
    let charts = build_charts(model, config)?;
    Ok(ChartReport::new(scenario, digest, charts))
}

fn cmd_outcomes(
    config: &ChartConfig,
    bundle: &Path,
    horizon_days: i64,
    current: Option<InterventionKind>,
    markdown: bool,
    out: Option<&Path>,
) -> Result<()> {
    let _span = LocationSpan::enter(&location_of(bundle));
    let Availability::Available(set) = build_set(config, bundle)? else {
        println!("No projection data available for {:?}", bundle);
        return Ok(());
    };

    let rows = outcomes_table(&set, horizon_days, current)?;
    match (out, markdown) {
        (Some(path), true) => write_outcomes_md(path, &rows, horizon_days)?,
        (Some(path), false) => {
            let content = serde_json::to_string_pretty(&rows).context("serialize outcomes")?;
            std::fs::write(path, content).with_context(|| format!("write {:?}", path))?;
        }
        (None, true) => print!("{}", render_outcomes_md(&rows, horizon_days)),
        (None, false) => println!("{}", serde_json::to_string_pretty(&rows)?),
    }
    Ok(())
}
