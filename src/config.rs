use crate::types::activity::Period;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub max_file_size: usize,
    pub min_total_distance_km: f64,
    pub default_period: Period,
}

impl Config {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let max_file_size_mb = std::env::var("MAX_FILE_SIZE_MB")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(100);

        let min_total_distance_km = std::env::var("MIN_TOTAL_DISTANCE_KM")
            .ok()
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|km| km.is_finite())
            .unwrap_or(1.0);

        let default_period = std::env::var("DEFAULT_PERIOD")
            .ok()
            .and_then(|s| s.parse::<Period>().ok())
            .unwrap_or_default();

        Self {
            port,
            max_file_size: max_file_size_mb * 1024 * 1024,
            min_total_distance_km,
            default_period,
        }
    }
}
