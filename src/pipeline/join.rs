use std::collections::HashMap;

use crate::types::activity::{decompressed_name, DerivedActivity};
use crate::types::geo::{CoordinateRecord, MappedActivity};

/// Inner join on the decompressed filename. Activities without a located file are dropped.
pub fn join_locations<'a>(
    activities: &[DerivedActivity],
    coordinates: impl IntoIterator<Item = &'a CoordinateRecord>,
) -> Vec<MappedActivity> {
    let by_file: HashMap<&str, &CoordinateRecord> = coordinates
        .into_iter()
        .map(|coordinate| (coordinate.filename.as_str(), coordinate))
        .collect();

    activities
        .iter()
        .filter_map(|activity| {
            let filename = decompressed_name(activity.record.filename.as_deref()?);
            let coordinate = by_file.get(filename)?;
            Some(MappedActivity {
                id: activity.record.id.clone(),
                name: activity.record.name.clone(),
                activity_type: activity.record.activity_type.clone(),
                date: activity.record.date,
                distance_km: activity.distance_km,
                average_speed_kmh: activity.average_speed_kmh,
                elevation_gain_m: activity.record.elevation_gain_m,
                filename: coordinate.filename.clone(),
                timestamp: coordinate.timestamp,
                lat: coordinate.lat,
                lon: coordinate.lon,
            })
        })
        .collect()
}
