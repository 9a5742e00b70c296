#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line entry point for the blotter pipeline.
//!
//! Consumes bulletin text already rendered to lines by the upstream
//! document collaborator (one file per source document), augments the
//! combined batch, and writes the tab-separated table to a file or
//! stdout.

use std::fs;
use std::io;
use std::path::PathBuf;

use blotter_geocoder::GeocodeResolver;
use blotter_geocoder::google::GoogleGeocoder;
use blotter_weather::OpenMeteoClient;
use clap::Parser;

/// Augments daily police-blotter text into an analysis-ready table.
#[derive(Parser)]
#[command(name = "blotter", version, about)]
struct Args {
    /// Bulletin text file(s), one per source document. Repeatable.
    #[arg(long = "input", required = true)]
    inputs: Vec<PathBuf>,

    /// Geocoding API key.
    #[arg(long, env = "GEOCODE_API_KEY", default_value = "", hide_env_values = true)]
    api_key: String,

    /// Output path for the TSV table. Writes to stdout when omitted.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Bound on concurrent geocode and weather lookups.
    #[arg(long, default_value_t = blotter_ingest::DEFAULT_CONCURRENCY)]
    concurrency: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let args = Args::parse();

    // Records from every input share one batch so the rank columns
    // reflect the combined frequency distribution.
    let mut records = Vec::new();
    for path in &args.inputs {
        let text = fs::read_to_string(path)?;
        let lines: Vec<String> = text.lines().map(str::to_string).collect();
        let batch = blotter_extract::extract_incidents(&lines)?;
        log::info!("{}: extracted {} records", path.display(), batch.len());
        records.extend(batch);
    }

    let http = reqwest::Client::new();
    let resolver = GeocodeResolver::new(GoogleGeocoder::new(http.clone(), &args.api_key));
    let weather = OpenMeteoClient::new(http);

    let augmented =
        blotter_ingest::augment_batch(records, &resolver, &weather, args.concurrency).await?;
    log::info!("augmented {} records", augmented.len());

    match &args.output {
        Some(path) => {
            let file = fs::File::create(path)?;
            blotter_ingest::table::write_tsv(file, &augmented)?;
        }
        None => {
            blotter_ingest::table::write_tsv(io::stdout().lock(), &augmented)?;
        }
    }

    Ok(())
}
