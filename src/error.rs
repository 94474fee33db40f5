use crate::aggregate::error::AggregateError;
use crate::normalize::error::NormalizeError;
use crate::transport::error::TransportError;
use crate::types::window::TimeWindow;
use crate::window::error::WindowError;
use chrono::{DateTime, FixedOffset};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrafficError {
    #[error("Sensor search request failed")]
    SensorSearch(#[source] TransportError),

    #[error("Failed to read sensor search response")]
    SensorDecode(#[source] NormalizeError),

    #[error("Volume request failed for sensor '{sensor}' in window {window}")]
    VolumeFetch {
        sensor: String,
        window: TimeWindow,
        #[source]
        source: TransportError,
    },

    #[error("Failed to read volume response for sensor '{sensor}' in window {window}")]
    VolumeDecode {
        sensor: String,
        window: TimeWindow,
        #[source]
        source: NormalizeError,
    },

    #[error("Could not align {0} to a whole hour")]
    HourAlignment(DateTime<FixedOffset>),

    #[error(transparent)]
    Window(#[from] WindowError),

    #[error(transparent)]
    Aggregate(#[from] AggregateError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}
