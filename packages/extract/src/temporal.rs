//! Strict timestamp derivation for bulletin records.
//!
//! Timestamps must match `MM/DD/YYYY HH:MM` exactly — a malformed value
//! corrupts both the day-of-week and hour columns, so parsing is strict
//! and the error is surfaced per record rather than silently defaulted.

use chrono::{Datelike as _, NaiveDate, NaiveDateTime, Timelike as _};
use thiserror::Error;

/// Format of the bulletin date/time column.
const TIMESTAMP_FORMAT: &str = "%m/%d/%Y %H:%M";

/// Errors from timestamp derivation.
#[derive(Debug, Error)]
pub enum TemporalError {
    /// The timestamp did not match the expected pattern.
    #[error("malformed timestamp {value:?}: expected MM/DD/YYYY HH:MM")]
    MalformedTimestamp {
        /// The raw value that failed to parse.
        value: String,
    },
}

fn parse(raw: &str) -> Result<NaiveDateTime, TemporalError> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).map_err(|_| {
        TemporalError::MalformedTimestamp {
            value: raw.to_string(),
        }
    })
}

/// Day-of-week code, 1 (Sunday) through 7 (Saturday).
///
/// # Errors
///
/// Returns [`TemporalError::MalformedTimestamp`] if the value does not
/// match the expected pattern.
#[allow(clippy::cast_possible_truncation)]
pub fn day_of_week(raw: &str) -> Result<u8, TemporalError> {
    let monday_zero = parse(raw)?.weekday().num_days_from_monday() as u8;
    Ok((monday_zero + 1) % 7 + 1)
}

/// Hour of day, 0-23.
///
/// # Errors
///
/// Returns [`TemporalError::MalformedTimestamp`] if the value does not
/// match the expected pattern.
#[allow(clippy::cast_possible_truncation)]
pub fn hour_of_day(raw: &str) -> Result<u8, TemporalError> {
    Ok(parse(raw)?.hour() as u8)
}

/// Calendar date of the timestamp, for the weather archive request.
///
/// # Errors
///
/// Returns [`TemporalError::MalformedTimestamp`] if the value does not
/// match the expected pattern.
pub fn calendar_date(raw: &str) -> Result<NaiveDate, TemporalError> {
    Ok(parse(raw)?.date())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saturday_maps_to_seven() {
        // 03/02/2024 was a Saturday.
        assert_eq!(day_of_week("03/02/2024 01:30").unwrap(), 7);
        assert_eq!(hour_of_day("03/02/2024 01:30").unwrap(), 1);
    }

    #[test]
    fn sunday_maps_to_one() {
        assert_eq!(day_of_week("03/03/2024 23:59").unwrap(), 1);
        assert_eq!(hour_of_day("03/03/2024 23:59").unwrap(), 23);
    }

    #[test]
    fn calendar_date_is_iso_ready() {
        let date = calendar_date("03/02/2024 01:30").unwrap();
        assert_eq!(date.to_string(), "2024-03-02");
    }

    #[test]
    fn rejects_malformed_timestamps() {
        for bad in ["", "not a date", "2024-03-02 01:30", "03/02/2024", "03/02/2024 25:00"] {
            let err = day_of_week(bad).unwrap_err();
            assert!(matches!(err, TemporalError::MalformedTimestamp { .. }));
        }
    }
}
