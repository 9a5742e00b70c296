//! Tab-delimited output table.
//!
//! One header row, then one row per augmented record, in the column order
//! the downstream consumers were built against. Absent weather codes
//! render as an empty field.

use std::io::Write;

use blotter_incident_models::AugmentedRecord;

use crate::PipelineError;

/// Output column headers, in order.
pub const COLUMNS: [&str; 8] = [
    "Day of the Week",
    "Time of Day",
    "Weather",
    "Location Rank",
    "Side of Town",
    "Incident Rank",
    "Nature",
    "EMSSTAT",
];

/// Writes the augmented batch as tab-separated text with one header row.
///
/// # Errors
///
/// Returns [`PipelineError`] if serialization or the underlying writer
/// fails.
pub fn write_tsv<W: Write>(out: W, records: &[AugmentedRecord]) -> Result<(), PipelineError> {
    let mut writer = csv::WriterBuilder::new().delimiter(b'\t').from_writer(out);

    writer.write_record(COLUMNS)?;
    for record in records {
        writer.write_record([
            record.day_of_week.to_string(),
            record.hour_of_day.to_string(),
            record
                .weather_code
                .map(|code| code.to_string())
                .unwrap_or_default(),
            record.location_rank.to_string(),
            record.side_of_town.to_string(),
            record.incident_rank.to_string(),
            record.incident.nature.clone(),
            record.ems_flag.to_string(),
        ])?;
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use blotter_incident_models::{Coordinates, IncidentRecord, SideOfTown};

    use super::*;

    fn augmented(nature: &str, weather_code: Option<i64>) -> AugmentedRecord {
        AugmentedRecord {
            incident: IncidentRecord {
                timestamp_raw: "03/02/2024 01:30".to_string(),
                incident_number: "2024-00015000".to_string(),
                location_raw: "1600 W LINDSEY ST".to_string(),
                nature: nature.to_string(),
                incident_ori: "OK0140200".to_string(),
            },
            day_of_week: 7,
            hour_of_day: 1,
            coordinates: Some(Coordinates {
                latitude: 35.2,
                longitude: -97.46,
            }),
            side_of_town: SideOfTown::W,
            weather_code,
            location_rank: 1,
            incident_rank: 2,
            ems_flag: false,
        }
    }

    #[test]
    fn writes_header_and_rows() {
        let mut out = Vec::new();
        write_tsv(&mut out, &[augmented("Traffic Stop", Some(61))]).unwrap();

        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Day of the Week\tTime of Day\tWeather\tLocation Rank\t\
             Side of Town\tIncident Rank\tNature\tEMSSTAT"
        );
        assert_eq!(
            lines.next().unwrap(),
            "7\t1\t61\t1\tW\t2\tTraffic Stop\tfalse"
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn absent_weather_renders_empty() {
        let mut out = Vec::new();
        write_tsv(&mut out, &[augmented("Welfare Check", None)]).unwrap();

        let text = String::from_utf8(out).unwrap();
        let row = text.lines().nth(1).unwrap();
        assert_eq!(row, "7\t1\t\t1\tW\t2\tWelfare Check\tfalse");
    }

    #[test]
    fn empty_batch_writes_only_the_header() {
        let mut out = Vec::new();
        write_tsv(&mut out, &[]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 1);
    }
}
