use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;

/// First timestamped position found in an activity stream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Fix {
    pub timestamp: DateTime<Utc>,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoordinateRecord {
    /// Archive path without the compression suffix.
    pub filename: String,
    pub timestamp: DateTime<Utc>,
    pub lat: f64,
    pub lon: f64,
}

impl CoordinateRecord {
    pub fn new(filename: impl Into<String>, fix: Fix) -> Self {
        Self {
            filename: filename.into(),
            timestamp: fix.timestamp,
            lat: fix.lat,
            lon: fix.lon,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    Located { coordinate: CoordinateRecord },
    NoCoordinate,
    DecodeFailed { reason: String },
    Missing,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileReport {
    pub filename: String,
    #[serde(flatten)]
    pub outcome: FileOutcome,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractionReport {
    pub files: Vec<FileReport>,
    pub located: usize,
    pub no_coordinate: usize,
    pub failed: usize,
    pub missing: usize,
}

impl ExtractionReport {
    pub fn from_files(files: Vec<FileReport>) -> Self {
        let mut report = Self::default();
        for file in &files {
            match file.outcome {
                FileOutcome::Located { .. } => report.located += 1,
                FileOutcome::NoCoordinate => report.no_coordinate += 1,
                FileOutcome::DecodeFailed { .. } => report.failed += 1,
                FileOutcome::Missing => report.missing += 1,
            }
        }
        report.files = files;
        report
    }

    pub fn coordinates(&self) -> impl Iterator<Item = &CoordinateRecord> {
        self.files.iter().filter_map(|file| match &file.outcome {
            FileOutcome::Located { coordinate } => Some(coordinate),
            _ => None,
        })
    }
}

/// An activity joined with the coordinate of its activity file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MappedActivity {
    pub id: String,
    pub name: String,
    pub activity_type: String,
    pub date: NaiveDateTime,
    pub distance_km: Option<f64>,
    pub average_speed_kmh: Option<f64>,
    pub elevation_gain_m: Option<f64>,
    pub filename: String,
    pub timestamp: DateTime<Utc>,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocationReport {
    pub report: ExtractionReport,
    pub mapped: Vec<MappedActivity>,
    pub message: Option<String>,
}
