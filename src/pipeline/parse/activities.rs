use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::AggregateError;
use crate::types::activity::ActivityRecord;

const ACTIVITY_ID: &str = "Activity ID";
const ACTIVITY_DATE: &str = "Activity Date";
const ACTIVITY_NAME: &str = "Activity Name";
const ACTIVITY_TYPE: &str = "Activity Type";
const MAX_HEART_RATE: &str = "Max Heart Rate";
const RELATIVE_EFFORT: &str = "Relative Effort";
const FILENAME: &str = "Filename";
const MOVING_TIME: &str = "Moving Time";
// The export carries two "Distance" columns; the second one is in metres.
const DISTANCE_M: &str = "Distance.1";
const ELEVATION_GAIN: &str = "Elevation Gain";
const AVERAGE_HEART_RATE: &str = "Average Heart Rate";

const DATETIME_FORMATS: [&str; 5] = [
    "%b %d, %Y, %I:%M:%S %p",
    "%d %b %Y, %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

struct Columns {
    id: usize,
    date: usize,
    name: usize,
    activity_type: usize,
    max_heart_rate: usize,
    relative_effort: usize,
    filename: usize,
    moving_time: usize,
    distance: usize,
    elevation_gain: usize,
    average_heart_rate: usize,
}

impl Columns {
    fn locate(headers: &[String]) -> Result<Self, AggregateError> {
        let index: HashMap<&str, usize> = headers
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.as_str(), idx))
            .collect();
        let find = |name: &str| {
            index
                .get(name)
                .copied()
                .ok_or_else(|| AggregateError::MissingColumn(name.to_string()))
        };

        Ok(Self {
            id: find(ACTIVITY_ID)?,
            date: find(ACTIVITY_DATE)?,
            name: find(ACTIVITY_NAME)?,
            activity_type: find(ACTIVITY_TYPE)?,
            max_heart_rate: find(MAX_HEART_RATE)?,
            relative_effort: find(RELATIVE_EFFORT)?,
            filename: find(FILENAME)?,
            moving_time: find(MOVING_TIME)?,
            distance: find(DISTANCE_M)?,
            elevation_gain: find(ELEVATION_GAIN)?,
            average_heart_rate: find(AVERAGE_HEART_RATE)?,
        })
    }
}

/// Loads the activity summaries of a Strava `activities.csv` export.
///
/// Any missing column, unparseable date or malformed number aborts the whole load.
pub fn parse_activities(bytes: &[u8]) -> Result<Vec<ActivityRecord>, AggregateError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers = dedupe_headers(reader.headers()?.iter());
    let columns = Columns::locate(&headers)?;

    let mut records = Vec::new();
    for (idx, row) in reader.records().enumerate() {
        let row = row?;
        let row_number = idx + 1;
        let cell = |column: usize| row.get(column).unwrap_or("").trim();
        let number = |column: usize, name: &'static str| parse_number(row_number, name, cell(column));

        let date_text = cell(columns.date);
        let date = parse_date(date_text).ok_or_else(|| AggregateError::DateParse {
            row: row_number,
            value: date_text.to_string(),
        })?;

        let filename = cell(columns.filename);

        records.push(ActivityRecord {
            id: cell(columns.id).to_string(),
            date,
            name: cell(columns.name).to_string(),
            activity_type: cell(columns.activity_type).to_string(),
            moving_time_s: number(columns.moving_time, MOVING_TIME)?,
            distance_m: number(columns.distance, DISTANCE_M)?,
            elevation_gain_m: number(columns.elevation_gain, ELEVATION_GAIN)?,
            max_heart_rate: number(columns.max_heart_rate, MAX_HEART_RATE)?,
            average_heart_rate: number(columns.average_heart_rate, AVERAGE_HEART_RATE)?,
            relative_effort: number(columns.relative_effort, RELATIVE_EFFORT)?,
            filename: (!filename.is_empty()).then(|| filename.to_string()),
        });
    }

    tracing::debug!("Loaded {} activities", records.len());
    Ok(records)
}

/// Repeated header names get a `.n` suffix on their n-th repeat.
fn dedupe_headers<'a>(headers: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    headers
        .enumerate()
        .map(|(idx, raw)| {
            let name = if idx == 0 {
                raw.trim_start_matches('\u{feff}').trim()
            } else {
                raw.trim()
            };
            let repeats = seen.entry(name.to_string()).or_insert(0);
            let unique = if *repeats == 0 {
                name.to_string()
            } else {
                format!("{}.{}", name, repeats)
            };
            *repeats += 1;
            unique
        })
        .collect()
}

fn parse_date(value: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

fn parse_number(row: usize, column: &'static str, value: &str) -> Result<Option<f64>, AggregateError> {
    if value.is_empty() {
        return Ok(None);
    }

    match value.parse::<f64>() {
        Ok(number) if number.is_finite() && number >= 0.0 => Ok(Some(number)),
        _ => Err(AggregateError::InvalidNumber {
            row,
            column,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Activity ID,Activity Date,Activity Name,Activity Type,Activity Description,Elapsed Time,Distance,Max Heart Rate,Relative Effort,Commute,Filename,Moving Time,Distance,Elevation Gain,Average Heart Rate";

    #[test]
    fn reads_strava_export_rows() {
        let csv = format!(
            "{HEADER}\n\
             101,\"Jan 5, 2023, 7:12:33 AM\",Morning Run,Run,\"easy, with\nnewline\",1900,5.01,171,40,false,activities/101.fit.gz,1800,5012.5,35,150\n\
             102,\"Jan 6, 2023, 6:00:00 PM\",Evening Ride,Ride,,3700,,,,false,,3600,,,\n"
        );

        let records = parse_activities(csv.as_bytes()).expect("valid csv");
        assert_eq!(records.len(), 2);

        let run = &records[0];
        assert_eq!(run.id, "101");
        assert_eq!(run.activity_type, "Run");
        assert_eq!(run.date.to_string(), "2023-01-05 07:12:33");
        assert_eq!(run.distance_m, Some(5012.5));
        assert_eq!(run.moving_time_s, Some(1800.0));
        assert_eq!(run.filename.as_deref(), Some("activities/101.fit.gz"));

        let ride = &records[1];
        assert_eq!(ride.date.to_string(), "2023-01-06 18:00:00");
        assert_eq!(ride.distance_m, None);
        assert_eq!(ride.filename, None);
    }

    #[test]
    fn missing_column_is_named() {
        let csv = "Activity ID,Activity Date,Activity Name,Activity Type,Distance\n1,2023-01-01,a,Run,5\n";
        let err = parse_activities(csv.as_bytes()).expect_err("schema error");
        assert!(matches!(err, AggregateError::MissingColumn(ref name) if name == MAX_HEART_RATE));
    }

    #[test]
    fn single_distance_column_is_not_metres() {
        let header = HEADER.replacen(",Distance,Elevation", ",Elevation", 1);
        let csv = format!("{header}\n");
        let err = parse_activities(csv.as_bytes()).expect_err("schema error");
        assert!(matches!(err, AggregateError::MissingColumn(ref name) if name == DISTANCE_M));
    }

    #[test]
    fn bad_date_aborts() {
        let csv = format!(
            "{HEADER}\n\
             1,2023-01-01,a,Run,,1,1,,,false,,60,1000,,\n\
             2,yesterday,b,Run,,1,1,,,false,,60,1000,,\n"
        );
        let err = parse_activities(csv.as_bytes()).expect_err("date error");
        assert!(matches!(err, AggregateError::DateParse { row: 2, ref value } if value == "yesterday"));
    }

    #[test]
    fn bad_number_aborts() {
        let csv = format!("{HEADER}\n1,2023-01-01,a,Run,,1,1,,,false,,sixty,1000,,\n");
        let err = parse_activities(csv.as_bytes()).expect_err("number error");
        assert!(matches!(err, AggregateError::InvalidNumber { column: MOVING_TIME, .. }));
    }

    #[test]
    fn accepts_iso_dates() {
        for (text, expected) in [
            ("2023-03-04 05:06:07", "2023-03-04 05:06:07"),
            ("2023-03-04T05:06:07", "2023-03-04 05:06:07"),
            ("2023-03-04T05:06:07Z", "2023-03-04 05:06:07"),
            ("2023-03-04", "2023-03-04 00:00:00"),
        ] {
            assert_eq!(parse_date(text).expect(text).to_string(), expected);
        }
        assert_eq!(parse_date("04/03"), None);
    }

    #[test]
    fn duplicate_headers_are_numbered() {
        let headers = dedupe_headers(["\u{feff}Id", "Distance", "Distance", "Distance"].into_iter());
        assert_eq!(headers, vec!["Id", "Distance", "Distance.1", "Distance.2"]);
    }
}
