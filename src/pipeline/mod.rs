pub mod aggregate;
pub mod derive;
pub mod extract;
pub mod join;
pub mod parse;

use serde::Serialize;

use crate::error::AppError;
use crate::types::activity::{DerivedActivity, Period};
use crate::types::aggregate::{DateRange, DistanceReport, DurationReport};
use crate::types::geo::LocationReport;

#[derive(Debug, Clone, Copy)]
pub struct AnalysisOptions {
    pub period: Period,
    pub min_total_km: f64,
    /// Largest decompressed activity file read from the archive.
    pub max_stream_bytes: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub activity_count: usize,
    pub date_range: Option<DateRange>,
    pub activities: Vec<DerivedActivity>,
    pub distance: DistanceReport,
    pub duration: DurationReport,
    pub locations: LocationReport,
}

/// Runs the whole Strava export pipeline: load, derive, aggregate, locate, join.
pub fn analyze(csv: &[u8], archive: &[u8], options: AnalysisOptions) -> Result<Analysis, AppError> {
    let records = parse::parse_activities(csv)?;
    let activities = derive::derive(records);

    let distance = aggregate::distance_report(&activities, options.period, options.min_total_km);
    let duration = aggregate::duration_report(&activities, options.period);

    let report = extract::extract_coordinates(archive, &activities, options.max_stream_bytes)?;
    let mapped = join::join_locations(&activities, report.coordinates());
    let message = mapped
        .is_empty()
        .then(|| "No locations found".to_string());

    Ok(Analysis {
        activity_count: activities.len(),
        date_range: derive::date_range(&activities),
        distance,
        duration,
        locations: LocationReport {
            report,
            mapped,
            message,
        },
        activities,
    })
}
