#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Batch augmentation pipeline.
//!
//! Sequences the enrichment stages over one extracted batch: temporal
//! derivation, geocoding through the shared single-flight cache, sector
//! classification, weather lookup, frequency ranking, and EMSSTAT
//! propagation, then assembles the output records.
//!
//! Geocode and weather lookups run on a bounded worker pool — they are
//! pure functions of (record, external service) with no ordering
//! dependency between records. Ranking and flag propagation are
//! whole-batch computations and run strictly after per-record enrichment.

pub mod table;

use blotter_analytics::{emsstat, rank};
use blotter_extract::temporal;
use blotter_geocoder::{GeocodeProvider, GeocodeResolver};
use blotter_incident_models::{AugmentedRecord, Coordinates, IncidentRecord, SideOfTown};
use blotter_weather::WeatherProvider;
use futures::stream::{self, StreamExt as _};
use thiserror::Error;

/// Default bound on concurrent geocode and weather lookups.
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Errors that abort a batch.
///
/// Geocode and weather failures never appear here — they are row-local
/// and leave the corresponding fields unset.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Record extraction violated its schema invariant.
    #[error(transparent)]
    Extract(#[from] blotter_extract::ExtractError),

    /// A record's timestamp failed strict parsing.
    #[error(transparent)]
    Temporal(#[from] temporal::TemporalError),

    /// Output serialization failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error writing output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Augments one extracted batch.
///
/// Both ranks are functions of this batch's frequency distribution; when
/// several documents should rank together, concatenate their records
/// before calling this.
///
/// # Errors
///
/// Returns [`PipelineError::Temporal`] if any record's timestamp fails
/// strict parsing — a malformed timestamp corrupts both temporal columns,
/// so it halts the batch before any network work starts.
pub async fn augment_batch<G, W>(
    records: Vec<IncidentRecord>,
    resolver: &GeocodeResolver<G>,
    weather: &W,
    concurrency: usize,
) -> Result<Vec<AugmentedRecord>, PipelineError>
where
    G: GeocodeProvider,
    W: WeatherProvider,
{
    let concurrency = concurrency.max(1);

    let mut temporals = Vec::with_capacity(records.len());
    for record in &records {
        let day = temporal::day_of_week(&record.timestamp_raw)?;
        let hour = temporal::hour_of_day(&record.timestamp_raw)?;
        let date = temporal::calendar_date(&record.timestamp_raw)?;
        temporals.push((day, hour, date));
    }

    // Bounded concurrent geocoding; the resolver's single-flight cache
    // collapses duplicate locations to one provider call.
    let coordinates: Vec<Option<Coordinates>> = stream::iter(
        records
            .iter()
            .map(|record| resolver.resolve(&record.location_raw)),
    )
    .buffered(concurrency)
    .collect()
    .await;

    let resolved = coordinates.iter().flatten().count();
    log::info!(
        "geocoded {resolved}/{} records ({} distinct locations)",
        records.len(),
        resolver.cached_keys(),
    );

    let sides: Vec<SideOfTown> = records
        .iter()
        .zip(&coordinates)
        .map(|(record, coords)| blotter_spatial::classify(*coords, &record.location_raw))
        .collect();

    // Weather needs resolved coordinates plus the derived date and hour.
    let weather_codes: Vec<Option<i64>> = stream::iter(
        coordinates
            .iter()
            .zip(&temporals)
            .map(|(coords, &(_, hour, date))| {
                let coords = *coords;
                async move {
                    let point = coords?;
                    blotter_weather::weather_code_at(
                        weather,
                        point.latitude,
                        point.longitude,
                        date,
                        hour,
                    )
                    .await
                }
            }),
    )
    .buffered(concurrency)
    .collect()
    .await;

    let locations: Vec<&str> = records.iter().map(|r| r.location_raw.as_str()).collect();
    let location_ranks = rank::rank_rows(&locations);

    let natures: Vec<&str> = records.iter().map(|r| r.nature.as_str()).collect();
    let incident_ranks = rank::rank_rows(&natures);

    let ems_flags = emsstat::propagate_flags(&records);

    let augmented = records
        .into_iter()
        .enumerate()
        .map(|(i, incident)| {
            let (day_of_week, hour_of_day, _) = temporals[i];
            AugmentedRecord {
                incident,
                day_of_week,
                hour_of_day,
                coordinates: coordinates[i],
                side_of_town: sides[i],
                weather_code: weather_codes[i],
                location_rank: location_ranks[i],
                incident_rank: incident_ranks[i],
                ems_flag: ems_flags[i],
            }
        })
        .collect();

    Ok(augmented)
}
