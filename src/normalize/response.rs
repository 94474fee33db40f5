//! Wire shapes of the service's GraphQL responses. Everything the service may leave out
//! or null is an `Option` so that absence can be told apart from a parse failure.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlError {
    pub message: String,
}

impl<T> Envelope<T> {
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.message.clone()).collect()
    }
}

// --- Sensor search ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SensorSearchData {
    pub traffic_registration_points: Option<Vec<SensorEntry>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SensorEntry {
    pub id: String,
    pub name: String,
    pub location: SensorLocation,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SensorLocation {
    pub coordinates: Coordinates,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Coordinates {
    pub lat_lon: LatLon,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

// --- Hourly volume ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VolumeQueryData {
    pub traffic_data: Option<TrafficData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TrafficData {
    pub volume: Option<Volume>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Volume {
    pub by_hour: Option<ByHour>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ByHour {
    pub edges: Option<Vec<Edge>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Edge {
    pub node: Option<Node>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Node {
    pub from: Option<String>,
    pub to: Option<String>,
    pub total: Option<Total>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Total {
    pub volume_numbers: Option<VolumeNumbers>,
    pub coverage: Option<Coverage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VolumeNumbers {
    pub volume: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Coverage {
    pub percentage: Option<f64>,
}
