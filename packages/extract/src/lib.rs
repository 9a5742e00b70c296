#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Recovers fixed-schema incident records from rendered bulletin text.
//!
//! Daily incident summaries render to a flat stream of lines: a timestamp
//! line followed by four field lines (incident number, location, nature,
//! incident ORI), repeated per record, with page headers and footers
//! interleaved. The renderer is an external collaborator — this crate only
//! assumes line-splittable text.
//!
//! The scanner is an explicit state walk over an indexed line list with a
//! one-line peek: a line containing both `/` and `:` opens a record (only
//! timestamps contain both), and each of the four trailing fields consumes
//! the next line unless that line itself opens a new record — in which case
//! the field is recorded as the empty-string sentinel and the cursor stays
//! put, realigning the capture at the next timestamp.

pub mod temporal;

use blotter_incident_models::IncidentRecord;
use thiserror::Error;

/// Errors from record extraction.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// A capture closed with fewer trailing fields than the schema
    /// requires. This is a scanner invariant violation, not bad input —
    /// the field loop always pushes exactly one value per schema field.
    #[error(
        "schema mismatch: captured {got} of {expected} fields for timestamp {timestamp:?}"
    )]
    SchemaMismatch {
        /// Timestamp line that opened the failed capture.
        timestamp: String,
        /// Number of trailing fields actually captured.
        got: usize,
        /// Number of trailing fields the schema requires.
        expected: usize,
    },
}

/// Trailing fields per record: incident number, location, nature, ORI.
const FIELDS_PER_RECORD: usize = 4;

/// Index of the nature field within the trailing-field order.
const NATURE_FIELD: usize = 2;

/// Literal token the renderer sometimes emits in place of the nature line,
/// pushing the real value one line down.
const RAMP_TOKEN: &str = "RAMP";

/// Returns `true` if the line opens a record. Timestamps are the only
/// bulletin lines containing both `/` and `:`.
fn is_record_start(line: &str) -> bool {
    line.contains('/') && line.contains(':')
}

/// Scanner state: seeking the next timestamp, or capturing trailing field
/// `n` of an open record.
#[derive(Debug, Clone, Copy)]
enum State {
    SeekStart,
    CaptureField(usize),
}

/// Cursor over the line list with a non-consuming peek.
struct Scanner<'a> {
    lines: &'a [String],
    pos: usize,
}

impl<'a> Scanner<'a> {
    const fn new(lines: &'a [String]) -> Self {
        Self { lines, pos: 0 }
    }

    fn peek(&self) -> Option<&'a str> {
        self.lines.get(self.pos).map(String::as_str)
    }

    fn bump(&mut self) -> Option<&'a str> {
        let line = self.peek();
        if line.is_some() {
            self.pos += 1;
        }
        line
    }
}

/// Extracts incident records from an ordered sequence of bulletin lines.
///
/// Lines preceding the first timestamp are discarded. The capture opened
/// by the final timestamp is always dropped: the format guarantees no data
/// follows the true final record, so a trailing capture is an artifact of
/// reaching end of text. A document with zero timestamps yields an empty
/// batch, not an error.
///
/// # Errors
///
/// Returns [`ExtractError::SchemaMismatch`] if a capture closes with the
/// wrong number of trailing fields (unreachable by construction; treated
/// as an assertion).
pub fn extract_incidents(lines: &[String]) -> Result<Vec<IncidentRecord>, ExtractError> {
    let mut scanner = Scanner::new(lines);
    let mut state = State::SeekStart;
    let mut records = Vec::new();

    let mut timestamp = String::new();
    let mut fields: Vec<String> = Vec::with_capacity(FIELDS_PER_RECORD);

    loop {
        match state {
            State::SeekStart => match scanner.bump() {
                None => break,
                Some(line) if is_record_start(line) => {
                    timestamp = line.trim().to_string();
                    fields.clear();
                    state = State::CaptureField(0);
                }
                Some(_) => {}
            },
            State::CaptureField(n) if n == FIELDS_PER_RECORD => {
                records.push(close_record(&timestamp, &mut fields)?);
                state = State::SeekStart;
            }
            State::CaptureField(n) => {
                match scanner.peek() {
                    // A new timestamp (or end of text) while a field is
                    // still owed: record the missing sentinel without
                    // advancing, so the scan realigns on that timestamp.
                    None => fields.push(String::new()),
                    Some(line) if is_record_start(line) => fields.push(String::new()),
                    Some(line) if n == NATURE_FIELD && line == RAMP_TOKEN => {
                        scanner.bump();
                        let value = scanner.bump().map(str::trim).unwrap_or_default();
                        fields.push(value.to_string());
                    }
                    Some(line) => {
                        scanner.bump();
                        fields.push(line.trim().to_string());
                    }
                }
                state = State::CaptureField(n + 1);
            }
        }
    }

    let dropped = records.pop();
    if let Some(trailing) = dropped {
        log::debug!(
            "dropped trailing capture opened by {:?}; {} records extracted",
            trailing.timestamp_raw,
            records.len()
        );
    }

    Ok(records)
}

/// Closes an open capture into an [`IncidentRecord`].
fn close_record(
    timestamp: &str,
    fields: &mut Vec<String>,
) -> Result<IncidentRecord, ExtractError> {
    let [incident_number, location_raw, nature, incident_ori]: [String; FIELDS_PER_RECORD] =
        std::mem::take(fields)
            .try_into()
            .map_err(|captured: Vec<String>| ExtractError::SchemaMismatch {
                timestamp: timestamp.to_string(),
                got: captured.len(),
                expected: FIELDS_PER_RECORD,
            })?;

    Ok(IncidentRecord {
        timestamp_raw: timestamp.to_string(),
        incident_number,
        location_raw,
        nature,
        incident_ori,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn extracts_records_and_drops_trailing_capture() {
        let input = lines(&[
            "NORMAN POLICE DEPARTMENT",
            "Daily Incident Summary (Public)",
            "3/1/2024 0:04",
            "2024-00015000",
            "1600 W LINDSEY ST",
            "Traffic Stop",
            "OK0140200",
            "3/1/2024 0:13",
            "2024-00015001",
            "300 E MAIN ST",
            "Welfare Check",
            "OK0140200",
            "3/1/2024 0:47",
            "2024-00015002",
            "2000 ANN BRANDEN BLVD",
            "Transfer/Interfacility",
            "EMSSTAT",
        ]);

        let records = extract_incidents(&input).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].timestamp_raw, "3/1/2024 0:04");
        assert_eq!(records[0].incident_number, "2024-00015000");
        assert_eq!(records[0].location_raw, "1600 W LINDSEY ST");
        assert_eq!(records[0].nature, "Traffic Stop");
        assert_eq!(records[0].incident_ori, "OK0140200");
        assert_eq!(records[1].nature, "Welfare Check");
    }

    #[test]
    fn k_timestamps_yield_k_minus_one_records() {
        let mut input = Vec::new();
        for i in 0..5 {
            input.push(format!("3/1/2024 0:{i:02}"));
            input.push(format!("2024-0001500{i}"));
            input.push("100 MAIN ST".to_string());
            input.push("Traffic Stop".to_string());
            input.push("OK0140200".to_string());
        }
        assert_eq!(extract_incidents(&input).unwrap().len(), 4);
    }

    #[test]
    fn zero_timestamps_yield_empty_batch() {
        let input = lines(&["NORMAN POLICE DEPARTMENT", "Daily Incident Summary"]);
        assert!(extract_incidents(&input).unwrap().is_empty());
    }

    #[test]
    fn empty_input_yields_empty_batch() {
        assert!(extract_incidents(&[]).unwrap().is_empty());
    }

    #[test]
    fn short_capture_realigns_at_next_timestamp() {
        let input = lines(&[
            "3/1/2024 0:04",
            "2024-00015000",
            "3/1/2024 0:13",
            "2024-00015001",
            "300 E MAIN ST",
            "Welfare Check",
            "OK0140200",
            "3/1/2024 0:47",
        ]);

        let records = extract_incidents(&input).unwrap();
        assert_eq!(records.len(), 2);
        // Missing fields become the empty-string sentinel, never absent.
        assert_eq!(records[0].incident_number, "2024-00015000");
        assert_eq!(records[0].location_raw, "");
        assert_eq!(records[0].nature, "");
        assert_eq!(records[0].incident_ori, "");
        // The capture stalled on the second timestamp, not past it.
        assert_eq!(records[1].timestamp_raw, "3/1/2024 0:13");
        assert_eq!(records[1].incident_ori, "OK0140200");
    }

    #[test]
    fn ramp_token_is_replaced_by_following_line() {
        let input = lines(&[
            "3/1/2024 8:30",
            "2024-00015003",
            "I-35 NB MM 110",
            "RAMP",
            "Motorist Assist",
            "OK0140200",
            "3/1/2024 9:00",
            "2024-00015004",
            "200 S PORTER AVE",
            "Larceny",
            "OK0140200",
        ]);

        let records = extract_incidents(&input).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].nature, "Motorist Assist");
        assert_eq!(records[0].incident_ori, "OK0140200");
    }

    #[test]
    fn blank_field_lines_become_empty_sentinels() {
        let input = lines(&[
            "3/1/2024 0:04",
            "2024-00015000",
            "   ",
            "Traffic Stop",
            "OK0140200",
            "3/1/2024 0:13",
        ]);

        let records = extract_incidents(&input).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].location_raw, "");
    }
}
