//! Running pace and split arithmetic.
//!
//! Paces are minutes per kilometre as `f64`; textual paces are `mm:ss` with
//! seconds truncated, never rounded.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::CalcError;

static DURATION_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\d{2}:\d{2}:\d{2}$").ok());

/// Absorbs float representation error so that e.g. `4 + 11/60` truncates to 11 seconds, not 10.
const SECOND_EPSILON: f64 = 1e-6;

/// Longest split table a single request may produce.
pub const MAX_SPLITS: u32 = 10_000;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplitRow {
    pub index: usize,
    pub distance_m: u32,
    pub elapsed_seconds: u64,
    pub time: String,
}

/// Pace in minutes per kilometre for `distance_km` covered in `duration` (`hh:mm:ss`).
pub fn pace(distance_km: f64, duration: &str) -> Result<f64, CalcError> {
    let matches = DURATION_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(duration));
    if !matches {
        return Err(CalcError::InvalidFormat(format!(
            "time {:?} must be hh:mm:ss",
            duration
        )));
    }
    if !distance_km.is_finite() || distance_km <= 0.0 {
        return Err(CalcError::NonPositiveDistance);
    }

    let mut parts = duration.split(':').map(|part| part.parse::<u32>());
    let (Some(Ok(hours)), Some(Ok(minutes)), Some(Ok(seconds))) =
        (parts.next(), parts.next(), parts.next())
    else {
        return Err(CalcError::InvalidFormat(format!(
            "time {:?} must be hh:mm:ss",
            duration
        )));
    };

    let total_minutes = (hours * 60 + minutes) as f64 + seconds as f64 / 60.0;
    if total_minutes <= 0.0 {
        return Err(CalcError::ZeroDuration);
    }

    Ok(total_minutes / distance_km)
}

pub fn format_pace(minutes_per_km: f64) -> String {
    let total_seconds = whole_seconds(minutes_per_km);
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// Parses `m:ss` / `mm:ss` into minutes per kilometre.
pub fn parse_pace(pace: &str) -> Result<f64, CalcError> {
    let invalid = || CalcError::InvalidFormat(format!("pace {:?} must be mm:ss", pace));

    let (minutes, seconds) = pace.trim().split_once(':').ok_or_else(invalid)?;
    let minutes: u32 = minutes.parse().map_err(|_| invalid())?;
    let seconds: u32 = seconds.parse().map_err(|_| invalid())?;

    Ok(minutes as f64 + seconds as f64 / 60.0)
}

/// Elapsed time at every `split_m` checkpoint up to and including `total_m`.
pub fn splits(total_m: u32, split_m: u32, pace: &str) -> Result<Vec<SplitRow>, CalcError> {
    if split_m == 0 {
        return Err(CalcError::InvalidSplit(
            "split length must be greater than zero".to_string(),
        ));
    }
    if total_m == 0 {
        return Err(CalcError::InvalidSplit(
            "total distance must be greater than zero".to_string(),
        ));
    }

    let rows = total_m.div_ceil(split_m);
    if rows > MAX_SPLITS {
        return Err(CalcError::InvalidSplit(format!(
            "{} splits requested, at most {} allowed",
            rows, MAX_SPLITS
        )));
    }

    let minutes_per_km = parse_pace(pace)?;

    let mut checkpoints: Vec<u32> = (split_m..total_m).step_by(split_m as usize).collect();
    checkpoints.push(total_m);

    Ok(checkpoints
        .into_iter()
        .enumerate()
        .map(|(idx, distance_m)| {
            let minutes = distance_m as f64 / 1000.0 * minutes_per_km;
            SplitRow {
                index: idx + 1,
                distance_m,
                elapsed_seconds: whole_seconds(minutes),
                time: format_pace(minutes),
            }
        })
        .collect())
}

fn whole_seconds(minutes: f64) -> u64 {
    if !minutes.is_finite() || minutes <= 0.0 {
        return 0;
    }
    (minutes * 60.0 + SECOND_EPSILON).floor() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn truncate_to_second(minutes: f64) -> f64 {
        (minutes * 60.0 + SECOND_EPSILON).floor() / 60.0
    }

    #[test]
    fn pace_for_ten_km_in_forty_minutes() {
        let p = pace(10.0, "00:40:00").expect("pace");
        assert!((p - 4.0).abs() < 1e-12);
        assert_eq!(format_pace(p), "04:00");
    }

    #[test]
    fn pace_halves_when_distance_doubles() {
        for time in ["00:25:13", "01:02:03", "03:59:59"] {
            let short = pace(5.0, time).expect("pace");
            let long = pace(10.0, time).expect("pace");
            assert!(short > 0.0 && long > 0.0);
            assert!((short / 2.0 - long).abs() < 1e-12);
        }
    }

    #[test]
    fn pace_rejects_loose_time_formats() {
        for time in ["0:40:00", "00:40", "00-40-00", "00:40:00 ", "aa:bb:cc", ""] {
            assert!(matches!(pace(10.0, time), Err(CalcError::InvalidFormat(_))), "{time}");
        }
    }

    #[test]
    fn pace_rejects_zero_inputs() {
        assert!(matches!(pace(0.0, "00:40:00"), Err(CalcError::NonPositiveDistance)));
        assert!(matches!(pace(-1.0, "00:40:00"), Err(CalcError::NonPositiveDistance)));
        assert!(matches!(pace(f64::NAN, "00:40:00"), Err(CalcError::NonPositiveDistance)));
        assert!(matches!(pace(5.0, "00:00:00"), Err(CalcError::ZeroDuration)));
    }

    #[test]
    fn format_truncates_seconds() {
        assert_eq!(format_pace(4.0 + 11.0 / 60.0), "04:11");
        assert_eq!(format_pace(4.0 + 11.9 / 60.0), "04:11");
        assert_eq!(format_pace(12.5), "12:30");
        assert_eq!(format_pace(0.0), "00:00");
        assert_eq!(format_pace(-3.0), "00:00");
    }

    #[test]
    fn parse_accepts_single_digit_minutes() {
        assert!((parse_pace("4:11").expect("pace") - (4.0 + 11.0 / 60.0)).abs() < 1e-12);
        assert!((parse_pace("04:11").expect("pace") - (4.0 + 11.0 / 60.0)).abs() < 1e-12);
        assert!(parse_pace("4.11").is_err());
        assert!(parse_pace("4:xx").is_err());
    }

    #[test]
    fn parse_format_round_trip_truncates_to_whole_seconds() {
        let mut p = 0.01;
        while p < 60.0 {
            let round_trip = parse_pace(&format_pace(p)).expect("round trip");
            assert!(
                (round_trip - truncate_to_second(p)).abs() < 1e-9,
                "p = {p}, got {round_trip}"
            );
            p += 0.137;
        }
    }

    #[test]
    fn ten_km_in_one_km_splits() {
        let rows = splits(10_000, 1_000, "4:11").expect("splits");
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[0].index, 1);
        assert_eq!(rows[0].time, "04:11");
        let last = rows.last().expect("last split");
        assert_eq!(last.distance_m, 10_000);
        assert_eq!(last.time, "41:50");
        assert!(rows
            .windows(2)
            .all(|pair| pair[1].elapsed_seconds > pair[0].elapsed_seconds));
    }

    #[test]
    fn uneven_total_appends_final_checkpoint() {
        let rows = splits(21_097, 5_000, "5:00").expect("splits");
        let distances: Vec<u32> = rows.iter().map(|row| row.distance_m).collect();
        assert_eq!(distances, vec![5_000, 10_000, 15_000, 20_000, 21_097]);
    }

    #[test]
    fn split_longer_than_total_yields_single_row() {
        let rows = splits(800, 1_000, "4:00").expect("splits");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].distance_m, 800);
        assert_eq!(rows[0].time, "03:12");
    }

    #[test]
    fn zero_split_inputs_are_rejected() {
        assert!(matches!(splits(10_000, 0, "4:11"), Err(CalcError::InvalidSplit(_))));
        assert!(matches!(splits(0, 1_000, "4:11"), Err(CalcError::InvalidSplit(_))));
        assert!(matches!(splits(10_000, 1_000, "fast"), Err(CalcError::InvalidFormat(_))));
    }

    #[test]
    fn split_table_is_capped() {
        let rows = splits(MAX_SPLITS * 100, 100, "4:00").expect("at the cap");
        assert_eq!(rows.len(), MAX_SPLITS as usize);
        assert!(matches!(
            splits(MAX_SPLITS * 100 + 1, 100, "4:00"),
            Err(CalcError::InvalidSplit(_))
        ));
        assert!(matches!(splits(u32::MAX, 1, "4:00"), Err(CalcError::InvalidSplit(_))));
    }
}
