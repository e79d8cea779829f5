use std::collections::{BTreeMap, BTreeSet};

use crate::types::activity::{Bucket, DerivedActivity, Period};
use crate::types::aggregate::{AggregateRow, CumulativeRow, DistanceReport, DurationReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    DistanceKm,
    MovingTimeHr,
}

impl Metric {
    fn value(self, activity: &DerivedActivity) -> Option<f64> {
        match self {
            Metric::DistanceKm => activity.distance_km,
            Metric::MovingTimeHr => activity.moving_time_hr,
        }
    }
}

#[derive(Default)]
struct Accumulator {
    count: usize,
    total: f64,
}

/// Groups by (bucket, activity type) and gap-fills the cross product of every
/// bucket and type seen. Rows are ordered by bucket, then type.
///
/// `count` and `mean` only consider activities where the metric is present.
pub fn group(activities: &[DerivedActivity], period: Period, metric: Metric) -> Vec<AggregateRow> {
    let mut groups: BTreeMap<(Bucket, String), Accumulator> = BTreeMap::new();
    for activity in activities {
        let key = (
            activity.bucket(period).clone(),
            activity.record.activity_type.clone(),
        );
        let acc = groups.entry(key).or_default();
        if let Some(value) = metric.value(activity) {
            acc.count += 1;
            acc.total += value;
        }
    }

    let buckets: BTreeSet<Bucket> = groups.keys().map(|(bucket, _)| bucket.clone()).collect();
    let types: BTreeSet<String> = groups.keys().map(|(_, kind)| kind.clone()).collect();

    let mut rows = Vec::with_capacity(buckets.len() * types.len());
    for bucket in &buckets {
        for kind in &types {
            let row = match groups.remove(&(bucket.clone(), kind.clone())) {
                Some(acc) => AggregateRow {
                    period: bucket.clone(),
                    activity_type: kind.clone(),
                    count: acc.count,
                    total: acc.total,
                    mean: if acc.count > 0 {
                        acc.total / acc.count as f64
                    } else {
                        0.0
                    },
                },
                None => AggregateRow::zero(bucket.clone(), kind.clone()),
            };
            rows.push(row);
        }
    }
    rows
}

/// Running distance total per activity type, skipping types whose overall
/// total does not exceed `min_total_km`. Rows come grouped by type in name
/// order, chronological within each type.
pub fn cumulative(rows: &[AggregateRow], min_total_km: f64) -> Vec<CumulativeRow> {
    let mut by_type: BTreeMap<&str, Vec<&AggregateRow>> = BTreeMap::new();
    for row in rows {
        by_type.entry(row.activity_type.as_str()).or_default().push(row);
    }

    let mut series = Vec::with_capacity(rows.len());
    for (kind, mut type_rows) in by_type {
        let total: f64 = type_rows.iter().map(|row| row.total).sum();
        if total <= min_total_km {
            tracing::debug!("Dropping {} from cumulative series ({:.2} km total)", kind, total);
            continue;
        }

        type_rows.sort_by(|a, b| a.period.cmp(&b.period));
        let mut running = 0.0;
        for row in type_rows {
            running += row.total;
            series.push(CumulativeRow {
                row: row.clone(),
                cumulative_km: running,
            });
        }
    }
    series
}

pub fn distance_report(
    activities: &[DerivedActivity],
    period: Period,
    min_total_km: f64,
) -> DistanceReport {
    let rows = group(activities, period, Metric::DistanceKm);
    let cumulative = cumulative(&rows, min_total_km);
    DistanceReport {
        period,
        total_km: rows.iter().map(|row| row.total).sum::<f64>().round() as i64,
        rows,
        cumulative,
    }
}

pub fn duration_report(activities: &[DerivedActivity], period: Period) -> DurationReport {
    let rows = group(activities, period, Metric::MovingTimeHr);
    DurationReport {
        period,
        total_hours: rows.iter().map(|row| row.total).sum::<f64>().round() as i64,
        rows,
    }
}
