mod activities;
mod fit;
mod gpx;

use crate::error::ParseError;
use crate::types::activity::FileFormat;
use crate::types::geo::Fix;

pub use activities::parse_activities;
pub use fit::SEMICIRCLES_PER_DEGREE;

/// Scans a decoded activity stream for its first timestamped position.
pub trait FixReader {
    fn first_fix(&self, bytes: &[u8]) -> Result<Option<Fix>, ParseError>;
}

pub fn first_fix(bytes: &[u8], format: FileFormat) -> Result<Option<Fix>, ParseError> {
    match format {
        FileFormat::Gpx => gpx::GpxReader.first_fix(bytes),
        FileFormat::Fit => fit::FitReader.first_fix(bytes),
    }
}
