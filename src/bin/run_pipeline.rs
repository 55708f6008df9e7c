//! Run the enrolment analytics pipeline over a CSV dataset
//!
//! Prints a data-check summary, every insight and the recommendations, and
//! optionally writes the full report as JSON for the presentation layer.

use anyhow::{Context, Result};
use clap::Parser;
use enrolment_analytics::{PipelineConfig, pipeline};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Parser)]
#[command(name = "run_pipeline", about = "Enrolment trend and district risk analytics")]
struct Args {
    /// Enrolment dataset (CSV)
    #[arg(short, long)]
    input: PathBuf,

    /// State to analyse; overrides the config file
    #[arg(short, long)]
    state: Option<String>,

    /// JSON file with pipeline parameters
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the full report as JSON
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    if let Some(state) = args.state {
        config.state_filter = state;
    }

    let start = Instant::now();
    let report = pipeline::run_from_path(&args.input, &config)
        .with_context(|| format!("Failed to process {}", args.input.display()))?;

    println!("State: {}", report.state);
    println!("Loaded rows: {}", report.profile.rows);
    println!("Monthly points: {}", report.profile.monthly_points);
    println!("Districts: {}", report.profile.districts);
    println!("Pincodes: {}", report.profile.pincodes);
    println!(
        "Skipped: {} out of scope, {} missing date/district/pincode",
        report.load_summary.out_of_scope, report.load_summary.dropped_missing_key
    );

    for insight in &report.insights {
        println!("\n[{}]", insight.topic);
        println!("What: {}", insight.what);
        println!("Findings: {}", insight.findings);
        println!("Why: {}", insight.why);
    }

    println!("\nRecommendations:");
    for rec in &report.recommendations {
        println!("- {}", rec);
    }

    if let Some(path) = &args.output {
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &report)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        println!("\nReport written to {}", path.display());
    }

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
