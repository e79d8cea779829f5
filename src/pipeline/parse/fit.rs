use chrono::Utc;
use fitparser::de::{DecodeOption, FitObject, FitStreamProcessor};
use fitparser::profile::MesgNum;
use fitparser::FitDataRecord;

use crate::error::ParseError;
use crate::pipeline::parse::FixReader;
use crate::types::geo::Fix;

/// FIT positions are semicircles: 2^31 units per 180 degrees.
pub const SEMICIRCLES_PER_DEGREE: f64 = 11_930_465.0;

pub struct FitReader;

impl FixReader for FitReader {
    /// Streams messages until the first complete fix. Bytes after it, including
    /// a damaged tail or a bad trailing checksum, are never read.
    fn first_fix(&self, bytes: &[u8]) -> Result<Option<Fix>, ParseError> {
        let mut processor = FitStreamProcessor::new();
        processor.add_option(DecodeOption::SkipDataCrcValidation);

        let mut input = bytes;
        while !input.is_empty() {
            let (rest, object) = processor
                .deserialize_next(input)
                .map_err(|e| ParseError::InvalidFit(format!("Failed to parse FIT file: {}", e)))?;
            input = rest;

            match object {
                FitObject::DataMessage(message) => {
                    let record = processor.decode_message(message).map_err(|e| {
                        ParseError::InvalidFit(format!("Failed to decode FIT message: {}", e))
                    })?;
                    if let Some(fix) = record_fix(&record) {
                        return Ok(Some(fix));
                    }
                }
                // Chained files restart their definitions after each checksum.
                FitObject::Crc(..) => processor.reset(),
                FitObject::Header(..) | FitObject::DefinitionMessage(..) => {}
            }
        }

        Ok(None)
    }
}

fn record_fix(record: &FitDataRecord) -> Option<Fix> {
    if record.kind() != MesgNum::Record {
        return None;
    }

    let mut lat = None;
    let mut lon = None;
    let mut timestamp = None;

    for field in record.fields() {
        match field.name() {
            "position_lat" => {
                if let fitparser::Value::SInt32(val) = field.value() {
                    lat = position(*val);
                }
            }
            "position_long" => {
                if let fitparser::Value::SInt32(val) = field.value() {
                    lon = position(*val);
                }
            }
            "timestamp" => {
                if let fitparser::Value::Timestamp(val) = field.value() {
                    timestamp = Some(val.with_timezone(&Utc));
                }
            }
            _ => {}
        }
    }

    Some(Fix {
        timestamp: timestamp?,
        lat: lat?,
        lon: lon?,
    })
}

/// `i32::MAX` is the FIT "invalid" marker for a position without a fix.
fn position(semicircles: i32) -> Option<f64> {
    (semicircles != i32::MAX).then(|| semicircles_to_degrees(semicircles))
}

fn semicircles_to_degrees(semicircles: i32) -> f64 {
    semicircles as f64 / SEMICIRCLES_PER_DEGREE
}
