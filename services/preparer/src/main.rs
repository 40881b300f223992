//! Timeline data preparation driver.
//!
//! Walks per-year tile and vector exports for the selected regions,
//! stitches mosaics, normalizes network layers, and writes the
//! metadata documents the map client loads.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{CommandFactory, Parser};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use preparer::config::PrepareConfig;
use preparer::pipeline;

#[derive(Parser, Debug)]
#[command(name = "preparer")]
#[command(about = "Prepare timeline tile and network data for the map client")]
struct Args {
    /// Configuration file path (built-in defaults when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Root directory of the per-year source exports
    #[arg(long, default_value = "sidewalk_data")]
    base_dir: PathBuf,

    /// Output data directory for the client
    #[arg(long, default_value = "public/data")]
    output_dir: PathBuf,

    /// Process a single region by id
    #[arg(short, long)]
    region: Option<String>,

    /// Process all configured regions
    #[arg(long)]
    all: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // no selector means nothing to do: show usage and leave quietly
    if !args.all && args.region.is_none() {
        Args::command().print_help()?;
        println!();
        return Ok(());
    }

    let mut config = match &args.config {
        Some(path) => PrepareConfig::from_yaml(path)?,
        None => PrepareConfig::builtin(args.base_dir.clone(), args.output_dir.clone()),
    };
    if args.config.is_some() {
        // explicit CLI paths win over the file
        if args.base_dir != PathBuf::from("sidewalk_data") {
            config.base_dir = args.base_dir.clone();
        }
        if args.output_dir != PathBuf::from("public/data") {
            config.output_dir = args.output_dir.clone();
        }
    }

    info!(
        base_dir = %config.base_dir.display(),
        output_dir = %config.output_dir.display(),
        regions = config.regions.len(),
        years = config.years.len(),
        "starting data preparation"
    );

    let selected: Vec<_> = match &args.region {
        Some(id) => match config.region(id) {
            Some(region) => vec![region.clone()],
            None => bail!("unknown region: {id}"),
        },
        None => config.regions.clone(),
    };

    std::fs::create_dir_all(&config.output_dir)?;

    let mut reports = Vec::new();
    for region in &selected {
        match pipeline::process_region(&config, region) {
            Ok(report) => reports.push(report),
            Err(e) => {
                // scaffolding failures for one region leave the rest alone
                warn!(region = %region.id, error = %format!("{e:#}"), "region processing failed");
            }
        }
    }

    let indexed = pipeline::write_region_index(&config.output_dir)?;
    pipeline::write_run_report(&config.output_dir, &reports)?;

    for report in &reports {
        let failed = report.failed_years();
        if !failed.is_empty() {
            warn!(
                region = %report.region_id,
                years = ?failed,
                "years with no output"
            );
        }
    }
    info!(
        regions_processed = reports.len(),
        regions_indexed = indexed,
        "data preparation complete"
    );

    Ok(())
}
