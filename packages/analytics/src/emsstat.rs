//! EMSSTAT flag propagation across (timestamp, location) groups.
//!
//! EMS-dispatched incidents appear in the bulletin twice: once under the
//! police ORI and once under the literal `EMSSTAT` ORI, sharing the same
//! timestamp and location. The flag marks both rows of such a pair.

use std::collections::HashSet;

use blotter_incident_models::IncidentRecord;

/// ORI literal that marks an EMS-dispatched record.
pub const EMSSTAT_ORI: &str = "EMSSTAT";

/// Computes the EMSSTAT flag for every record in batch order.
///
/// A record is flagged when its ORI is exactly [`EMSSTAT_ORI`], or when
/// some flagged record shares its exact `(timestamp_raw, location_raw)`
/// pair. Pairs are compared byte-for-byte — no case or whitespace
/// normalization.
#[must_use]
pub fn propagate_flags(records: &[IncidentRecord]) -> Vec<bool> {
    let flagged_groups: HashSet<(&str, &str)> = records
        .iter()
        .filter(|record| record.incident_ori == EMSSTAT_ORI)
        .map(|record| (record.timestamp_raw.as_str(), record.location_raw.as_str()))
        .collect();

    records
        .iter()
        .map(|record| {
            record.incident_ori == EMSSTAT_ORI
                || flagged_groups
                    .contains(&(record.timestamp_raw.as_str(), record.location_raw.as_str()))
        })
        .collect()
}
