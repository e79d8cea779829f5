use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::InvalidPeriod;

/// One row of the Strava `activities.csv` export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub id: String,
    pub date: NaiveDateTime,
    pub name: String,
    pub activity_type: String,
    pub moving_time_s: Option<f64>,
    pub distance_m: Option<f64>,
    pub elevation_gain_m: Option<f64>,
    pub max_heart_rate: Option<f64>,
    pub average_heart_rate: Option<f64>,
    pub relative_effort: Option<f64>,
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Day,
    Week,
    #[default]
    Month,
    Quarter,
    Year,
}

impl FromStr for Period {
    type Err = InvalidPeriod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" | "d" => Ok(Period::Day),
            "week" | "w" => Ok(Period::Week),
            "month" | "m" => Ok(Period::Month),
            "quarter" | "q" => Ok(Period::Quarter),
            "year" | "y" => Ok(Period::Year),
            _ => Err(InvalidPeriod(s.to_string())),
        }
    }
}

impl Period {
    pub fn as_str(self) -> &'static str {
        match self {
            Period::Day => "day",
            Period::Week => "week",
            Period::Month => "month",
            Period::Quarter => "quarter",
            Period::Year => "year",
        }
    }

    /// Calendar bucket containing `date`. Weeks run Monday to Sunday.
    pub fn bucket(self, date: NaiveDate) -> Bucket {
        match self {
            Period::Day => Bucket {
                start: date,
                label: date.format("%Y-%m-%d").to_string(),
            },
            Period::Week => {
                let start = date - Duration::days(date.weekday().num_days_from_monday() as i64);
                let end = start + Duration::days(6);
                Bucket {
                    start,
                    label: format!("{}/{}", start.format("%Y-%m-%d"), end.format("%Y-%m-%d")),
                }
            }
            Period::Month => Bucket {
                start: date.with_day(1).unwrap_or(date),
                label: date.format("%Y-%m").to_string(),
            },
            Period::Quarter => {
                let quarter = date.month0() / 3 + 1;
                let start = NaiveDate::from_ymd_opt(date.year(), (quarter - 1) * 3 + 1, 1)
                    .unwrap_or(date);
                Bucket {
                    start,
                    label: format!("{}Q{}", date.year(), quarter),
                }
            }
            Period::Year => Bucket {
                start: NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date),
                label: date.year().to_string(),
            },
        }
    }
}

/// A period bucket. Orders chronologically by its first day and serializes as its label.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Bucket {
    pub start: NaiveDate,
    pub label: String,
}

impl Serialize for Bucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label)
    }
}

/// An activity with its derived buckets and unit conversions appended.
#[derive(Debug, Clone, Serialize)]
pub struct DerivedActivity {
    #[serde(flatten)]
    pub record: ActivityRecord,
    pub day: Bucket,
    pub week: Bucket,
    pub month: Bucket,
    pub quarter: Bucket,
    pub year: Bucket,
    pub distance_km: Option<f64>,
    pub moving_time_hr: Option<f64>,
    pub average_speed_kmh: Option<f64>,
}

impl DerivedActivity {
    pub fn bucket(&self, period: Period) -> &Bucket {
        match period {
            Period::Day => &self.day,
            Period::Week => &self.week,
            Period::Month => &self.month,
            Period::Quarter => &self.quarter,
            Period::Year => &self.year,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileFormat {
    Gpx,
    Fit,
}

impl FileFormat {
    /// Detects the stream format, looking through a trailing `.gz`.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let ext = decompressed_name(filename).rsplit('.').next()?.to_lowercase();
        match ext.as_str() {
            "gpx" => Some(FileFormat::Gpx),
            "fit" => Some(FileFormat::Fit),
            _ => None,
        }
    }
}

pub fn is_gzip(filename: &str) -> bool {
    filename.to_lowercase().ends_with(".gz")
}

/// Filename with the compression suffix removed; the key activities and coordinates join on.
pub fn decompressed_name(filename: &str) -> &str {
    if is_gzip(filename) {
        &filename[..filename.len() - 3]
    } else {
        filename
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn period_parses_names_and_initials() {
        assert_eq!("week".parse::<Period>(), Ok(Period::Week));
        assert_eq!(" Q ".parse::<Period>(), Ok(Period::Quarter));
        assert_eq!("YEAR".parse::<Period>(), Ok(Period::Year));
        assert_eq!(
            "fortnight".parse::<Period>(),
            Err(InvalidPeriod("fortnight".to_string()))
        );
        for period in [Period::Day, Period::Week, Period::Month, Period::Quarter, Period::Year] {
            assert_eq!(period.as_str().parse::<Period>(), Ok(period));
        }
    }

    #[test]
    fn week_bucket_starts_on_monday() {
        // 2023-01-05 is a Thursday.
        let bucket = Period::Week.bucket(date(2023, 1, 5));
        assert_eq!(bucket.start, date(2023, 1, 2));
        assert_eq!(bucket.label, "2023-01-02/2023-01-08");
    }

    #[test]
    fn week_bucket_spans_year_boundary() {
        let bucket = Period::Week.bucket(date(2023, 1, 1));
        assert_eq!(bucket.label, "2022-12-26/2023-01-01");
    }

    #[test]
    fn calendar_labels() {
        let d = date(2023, 8, 17);
        assert_eq!(Period::Day.bucket(d).label, "2023-08-17");
        assert_eq!(Period::Month.bucket(d).label, "2023-08");
        assert_eq!(Period::Quarter.bucket(d).label, "2023Q3");
        assert_eq!(Period::Quarter.bucket(d).start, date(2023, 7, 1));
        assert_eq!(Period::Year.bucket(d).label, "2023");
    }

    #[test]
    fn buckets_order_chronologically() {
        let dec = Period::Month.bucket(date(2022, 12, 31));
        let jan = Period::Month.bucket(date(2023, 1, 1));
        assert!(dec < jan);
    }

    #[test]
    fn format_detection_looks_through_gzip() {
        assert_eq!(FileFormat::from_filename("activities/1.fit.gz"), Some(FileFormat::Fit));
        assert_eq!(FileFormat::from_filename("activities/1.GPX"), Some(FileFormat::Gpx));
        assert_eq!(FileFormat::from_filename("activities/1.tcx.gz"), None);
        assert_eq!(decompressed_name("activities/1.fit.gz"), "activities/1.fit");
        assert_eq!(decompressed_name("activities/1.fit"), "activities/1.fit");
    }
}
