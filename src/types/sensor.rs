//! Defines the road sensor (traffic registration point) metadata returned by the
//! sensor search query.

use serde::{Deserialize, Serialize};

/// A traffic registration point: a fixed roadside location counting vehicles or bicycles.
///
/// The service nests coordinates under `location.coordinates.latLon`; this struct holds the
/// flattened form. Sensors are fetched once per run and never modified afterwards.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Sensor {
    /// The unique sensor identifier (e.g., "44656V72812").
    pub id: String,
    /// Human readable name, usually the road or junction the sensor sits on.
    pub name: String,
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lon: f64,
}

impl Sensor {
    pub fn new(id: impl Into<String>, name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            lat,
            lon,
        }
    }
}
