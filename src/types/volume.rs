use chrono::{DateTime, FixedOffset};
use serde::Serialize;

/// One hour of traffic counted at one sensor.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct HourlyVolumeRecord {
    pub start: DateTime<FixedOffset>,
    pub stop: DateTime<FixedOffset>,
    /// Vehicles (or bicycles) counted. `None` when the service reported the hour without a
    /// count, which is not the same as a count of zero.
    pub volume: Option<u64>,
    /// Percentage of the hour the sensor was actively reporting.
    pub coverage: Option<f64>,
}

/// Outcome of normalizing a single sensor/window volume response.
#[derive(Debug, PartialEq, Clone)]
pub enum VolumeData {
    /// The response carried an hourly edge list (possibly empty).
    Present(Vec<HourlyVolumeRecord>),
    /// The service had no usable volume data for the sensor in the window.
    Absent,
}

impl VolumeData {
    pub fn is_absent(&self) -> bool {
        matches!(self, VolumeData::Absent)
    }

    /// The records if present, `None` if the data was absent.
    pub fn into_records(self) -> Option<Vec<HourlyVolumeRecord>> {
        match self {
            VolumeData::Present(records) => Some(records),
            VolumeData::Absent => None,
        }
    }
}
