use crate::types::volume::HourlyVolumeRecord;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Hourly records per sensor, accumulated window by window.
///
/// A sensor only has an entry once some window returned data for it. Records are appended
/// as they arrive and never deduplicated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorVolumeSeries {
    records: HashMap<String, Vec<HourlyVolumeRecord>>,
}

impl SensorVolumeSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `records` to the series of `sensor_id`, creating it if needed.
    pub fn accumulate(&mut self, sensor_id: &str, records: Vec<HourlyVolumeRecord>) {
        match self.records.entry(sensor_id.to_string()) {
            Entry::Occupied(mut entry) => entry.get_mut().extend(records),
            Entry::Vacant(entry) => {
                entry.insert(records);
            }
        }
    }

    pub fn get(&self, sensor_id: &str) -> Option<&[HourlyVolumeRecord]> {
        self.records.get(sensor_id).map(Vec::as_slice)
    }

    pub fn contains(&self, sensor_id: &str) -> bool {
        self.records.contains_key(sensor_id)
    }

    /// Number of sensors with an entry.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total number of records across all sensors.
    pub fn record_count(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[HourlyVolumeRecord])> {
        self.records
            .iter()
            .map(|(id, records)| (id.as_str(), records.as_slice()))
    }
}
