#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident record types shared across the blotter pipeline.
//!
//! A daily bulletin yields a batch of [`IncidentRecord`]s; the augmentation
//! pipeline enriches each into an [`AugmentedRecord`]. Both are plain data —
//! all derivation logic lives in the pipeline crates.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// One parsed entry from a daily incident summary.
///
/// Every field is taken verbatim from the source text. The empty string is
/// the explicit "missing" sentinel — a record always carries all five
/// fields, never fewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentRecord {
    /// Raw timestamp in `MM/DD/YYYY HH:MM` form. May be malformed; strict
    /// parsing happens during augmentation, not extraction.
    pub timestamp_raw: String,
    /// Agency case number (e.g., "2024-00012345").
    pub incident_number: String,
    /// Free-text location: a street address, an intersection, or a
    /// `lat;lon` coordinate literal.
    pub location_raw: String,
    /// Incident nature (e.g., "Traffic Stop", "Welfare Check").
    pub nature: String,
    /// Originating agency identifier (e.g., "OK0140200", "EMSSTAT").
    pub incident_ori: String,
}

/// WGS84 coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

/// Compass sector of an incident relative to the town center.
///
/// `Unknown` is the "Could not determine" sentinel: neither resolved
/// coordinates nor the location text yielded a direction.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum SideOfTown {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
    /// Neither bearing nor location text produced a sector.
    #[serde(rename = "Could not determine")]
    #[strum(serialize = "Could not determine")]
    Unknown,
}

/// An [`IncidentRecord`] plus everything the augmentation pipeline derives.
///
/// `location_rank` and `incident_rank` are functions of the whole batch's
/// frequency distribution — adding or removing any record can change other
/// records' ranks, so they are only meaningful alongside the batch they
/// were computed for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AugmentedRecord {
    /// The extracted record this row was derived from.
    #[serde(flatten)]
    pub incident: IncidentRecord,
    /// Day of week, 1 (Sunday) through 7 (Saturday).
    pub day_of_week: u8,
    /// Hour of day, 0-23.
    pub hour_of_day: u8,
    /// Resolved coordinates. `None` when geocoding failed.
    pub coordinates: Option<Coordinates>,
    /// Compass sector relative to the town center.
    pub side_of_town: SideOfTown,
    /// WMO weather code at the incident's hour. `None` when the lookup
    /// failed.
    pub weather_code: Option<i64>,
    /// Dense frequency rank of the location within the batch.
    pub location_rank: u32,
    /// Dense frequency rank of the nature within the batch.
    pub incident_rank: u32,
    /// True for EMSSTAT rows and rows sharing their exact
    /// (timestamp, location) pair with one.
    pub ems_flag: bool,
}
