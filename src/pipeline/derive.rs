use crate::types::activity::{ActivityRecord, DerivedActivity, Period};
use crate::types::aggregate::DateRange;

pub fn derive(records: Vec<ActivityRecord>) -> Vec<DerivedActivity> {
    records.into_iter().map(derive_one).collect()
}

fn derive_one(record: ActivityRecord) -> DerivedActivity {
    let date = record.date.date();
    let distance_km = record.distance_m.map(|m| m / 1000.0);
    let moving_time_hr = record.moving_time_s.map(|s| s / 3600.0);

    DerivedActivity {
        day: Period::Day.bucket(date),
        week: Period::Week.bucket(date),
        month: Period::Month.bucket(date),
        quarter: Period::Quarter.bucket(date),
        year: Period::Year.bucket(date),
        distance_km,
        moving_time_hr,
        average_speed_kmh: average_speed(distance_km, moving_time_hr),
        record,
    }
}

/// Undefined without both inputs or with zero moving time.
fn average_speed(distance_km: Option<f64>, moving_time_hr: Option<f64>) -> Option<f64> {
    match (distance_km, moving_time_hr) {
        (Some(km), Some(hr)) if hr > 0.0 => Some(km / hr),
        _ => None,
    }
}

pub fn date_range(activities: &[DerivedActivity]) -> Option<DateRange> {
    let first = activities.iter().map(|a| a.day.start).min()?;
    let last = activities.iter().map(|a| a.day.start).max()?;
    Some(DateRange { first, last })
}
