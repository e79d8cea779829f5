use chrono::{DateTime, Utc};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::ParseError;
use crate::pipeline::parse::FixReader;
use crate::types::geo::Fix;

pub struct GpxReader;

impl FixReader for GpxReader {
    fn first_fix(&self, bytes: &[u8]) -> Result<Option<Fix>, ParseError> {
        let mut reader = Reader::from_reader(bytes);
        reader.trim_text(true);

        let mut position: Option<(f64, f64)> = None;
        let mut time: Option<DateTime<Utc>> = None;
        let mut in_trkpt = false;
        let mut current_element = String::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    let name = element_name(&e)?;
                    if name == "trkpt" {
                        in_trkpt = true;
                        position = trkpt_position(&e)?;
                        time = None;
                    } else if in_trkpt {
                        current_element = name;
                    }
                }
                Ok(Event::Text(e)) => {
                    if in_trkpt && current_element == "time" {
                        let text = e
                            .unescape()
                            .map_err(|e| ParseError::InvalidGpx(e.to_string()))?;
                        time = text.parse::<DateTime<Utc>>().ok();
                    }
                }
                Ok(Event::End(e)) => {
                    let name = e.name();
                    let name_str = std::str::from_utf8(name.as_ref())
                        .map_err(|e| ParseError::InvalidGpx(e.to_string()))?;

                    if name_str == "trkpt" {
                        if let (Some((lat, lon)), Some(timestamp)) = (position, time) {
                            return Ok(Some(Fix { timestamp, lat, lon }));
                        }
                        in_trkpt = false;
                    }
                    current_element.clear();
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(ParseError::InvalidGpx(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(None)
    }
}

fn element_name(e: &BytesStart<'_>) -> Result<String, ParseError> {
    let name = e.name();
    std::str::from_utf8(name.as_ref())
        .map(str::to_string)
        .map_err(|e| ParseError::InvalidGpx(e.to_string()))
}

fn trkpt_position(e: &BytesStart<'_>) -> Result<Option<(f64, f64)>, ParseError> {
    let mut lat = None;
    let mut lon = None;

    for attr in e.attributes() {
        let attr = attr.map_err(|e| ParseError::InvalidGpx(e.to_string()))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| ParseError::InvalidGpx(e.to_string()))?;
        let value = std::str::from_utf8(&attr.value)
            .map_err(|e| ParseError::InvalidGpx(e.to_string()))?;

        match key {
            "lat" => lat = value.parse::<f64>().ok(),
            "lon" => lon = value.parse::<f64>().ok(),
            _ => {}
        }
    }

    Ok(lat.zip(lon))
}
