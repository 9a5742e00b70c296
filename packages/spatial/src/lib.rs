#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Compass-sector classification relative to the town center.
//!
//! Buckets each incident into one of eight 45-degree sides of town from
//! the great-circle bearing between a fixed reference point and the
//! incident's resolved coordinates. Incidents without coordinates fall
//! back to a whole-word cardinal token in the raw location text.
//!
//! The eight sector ranges are half-open and together cover `[0, 360)`
//! exactly once — an earlier revision of this table had an overlapping
//! arm that made one sector unreachable, so the partition is covered by a
//! sweep test rather than trusted by inspection.

use blotter_incident_models::{Coordinates, SideOfTown};
use regex::Regex;

/// Reference point bearings are measured from: downtown Norman, OK.
pub const TOWN_CENTER: Coordinates = Coordinates {
    latitude: 35.220833,
    longitude: -97.443611,
};

/// Initial great-circle bearing from `from` to `to`, in degrees `[0, 360)`.
///
/// Standard forward-azimuth formula: `atan2` of the east and north
/// components of the unit vector toward `to`.
#[must_use]
pub fn compass_bearing(from: Coordinates, to: Coordinates) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let delta_lon = (to.longitude - from.longitude).to_radians();

    let east = delta_lon.sin() * lat2.cos();
    let north = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lon.cos();

    (east.atan2(north).to_degrees() + 360.0) % 360.0
}

/// Buckets a bearing into one of the eight sectors.
///
/// N is centered on the 0/360 seam and spans `[337.5, 360) ∪ [0, 22.5)`;
/// each remaining sector is the next half-open 45-degree range. Bearings
/// outside `[0, 360)` (including NaN) yield `Unknown`.
#[must_use]
pub fn sector_for_bearing(bearing: f64) -> SideOfTown {
    match bearing {
        b if !(0.0..360.0).contains(&b) => SideOfTown::Unknown,
        b if b < 22.5 || b >= 337.5 => SideOfTown::N,
        b if b < 67.5 => SideOfTown::NE,
        b if b < 112.5 => SideOfTown::E,
        b if b < 157.5 => SideOfTown::SE,
        b if b < 202.5 => SideOfTown::S,
        b if b < 247.5 => SideOfTown::SW,
        b if b < 292.5 => SideOfTown::W,
        _ => SideOfTown::NW,
    }
}

/// Scans location text for a whole-word cardinal token.
///
/// Bulletin addresses carry directionals as separate tokens
/// ("1600 W LINDSEY ST", "NW 36TH AVE"); the first token wins.
#[must_use]
pub fn direction_from_text(location: &str) -> Option<SideOfTown> {
    let re = Regex::new(r"\b(NE|NW|SE|SW|N|S|E|W)\b").unwrap_or_else(|_| unreachable!());
    re.find(location)?.as_str().parse().ok()
}

/// Classifies a record's side of town.
///
/// Prefers the bearing from [`TOWN_CENTER`] when coordinates resolved;
/// falls back to [`direction_from_text`] over the raw location; returns
/// [`SideOfTown::Unknown`] when neither path yields a sector.
#[must_use]
pub fn classify(coordinates: Option<Coordinates>, location_text: &str) -> SideOfTown {
    if let Some(point) = coordinates {
        let sector = sector_for_bearing(compass_bearing(TOWN_CENTER, point));
        if sector != SideOfTown::Unknown {
            return sector;
        }
    }
    direction_from_text(location_text).unwrap_or(SideOfTown::Unknown)
}
