//! Turns raw service responses into [`Sensor`]s and [`HourlyVolumeRecord`]s.

use crate::normalize::error::NormalizeError;
use crate::normalize::response::{Edge, Envelope, SensorSearchData, VolumeQueryData};
use crate::types::sensor::Sensor;
use crate::types::volume::{HourlyVolumeRecord, VolumeData};
use crate::utils::parse_service_time;
use log::debug;
use serde_json::Value;

/// Parses a sensor search response, flattening each sensor's nested coordinates.
///
/// # Errors
///
/// * [`NormalizeError::Json`] if the body is not JSON or a sensor entry is incomplete.
/// * [`NormalizeError::MissingSensors`] if the response carries no sensor list, with any
///   messages the service reported.
pub fn normalize_sensors(raw: &str) -> Result<Vec<Sensor>, NormalizeError> {
    let envelope: Envelope<SensorSearchData> = serde_json::from_str(raw)?;
    let messages = envelope.error_messages();
    let entries = envelope
        .data
        .and_then(|data| data.traffic_registration_points)
        .ok_or(NormalizeError::MissingSensors { messages })?;

    Ok(entries
        .into_iter()
        .map(|entry| Sensor {
            id: entry.id,
            name: entry.name,
            lat: entry.location.coordinates.lat_lon.lat,
            lon: entry.location.coordinates.lat_lon.lon,
        })
        .collect())
}

/// Parses an hourly volume response for one sensor and window.
///
/// A response without a usable edge list (null `trafficData`, missing `byHour`, an edge
/// lacking its timestamps or totals, ...) is [`VolumeData::Absent`], not an error. An
/// edge whose count is null becomes a record with `volume: None`.
///
/// # Errors
///
/// Returns [`NormalizeError::Json`] only if the body is not JSON at all.
pub fn normalize_volume_edges(raw: &str) -> Result<VolumeData, NormalizeError> {
    let value: Value = serde_json::from_str(raw)?;
    let envelope = match serde_json::from_value::<Envelope<VolumeQueryData>>(value) {
        Ok(envelope) => envelope,
        Err(e) => {
            debug!("Volume response has an unexpected shape: {}", e);
            return Ok(VolumeData::Absent);
        }
    };
    if !envelope.errors.is_empty() {
        debug!(
            "Service reported errors for volume query: {}",
            envelope.error_messages().join("; ")
        );
    }

    let Some(edges) = envelope
        .data
        .and_then(|data| data.traffic_data)
        .and_then(|traffic| traffic.volume)
        .and_then(|volume| volume.by_hour)
        .and_then(|by_hour| by_hour.edges)
    else {
        return Ok(VolumeData::Absent);
    };

    let records: Option<Vec<HourlyVolumeRecord>> = edges.into_iter().map(edge_to_record).collect();
    Ok(records.map_or(VolumeData::Absent, VolumeData::Present))
}

fn edge_to_record(edge: Edge) -> Option<HourlyVolumeRecord> {
    let node = edge.node?;
    let total = node.total?;
    Some(HourlyVolumeRecord {
        start: parse_service_time(&node.from?)?,
        stop: parse_service_time(&node.to?)?,
        volume: total.volume_numbers.and_then(|numbers| numbers.volume),
        coverage: total.coverage.and_then(|coverage| coverage.percentage),
    })
}
