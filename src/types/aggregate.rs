use chrono::NaiveDate;
use serde::Serialize;

use crate::types::activity::{Bucket, Period};

/// Summary statistics for one (period, activity type) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateRow {
    pub period: Bucket,
    pub activity_type: String,
    pub count: usize,
    pub total: f64,
    pub mean: f64,
}

impl AggregateRow {
    pub fn zero(period: Bucket, activity_type: String) -> Self {
        Self {
            period,
            activity_type,
            count: 0,
            total: 0.0,
            mean: 0.0,
        }
    }
}

/// An aggregate row carrying the running distance total of its activity type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CumulativeRow {
    #[serde(flatten)]
    pub row: AggregateRow,
    pub cumulative_km: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DistanceReport {
    pub period: Period,
    pub total_km: i64,
    pub rows: Vec<AggregateRow>,
    pub cumulative: Vec<CumulativeRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DurationReport {
    pub period: Period,
    pub total_hours: i64,
    pub rows: Vec<AggregateRow>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct DateRange {
    pub first: NaiveDate,
    pub last: NaiveDate,
}
