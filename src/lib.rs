//! Fetch hourly traffic volumes from Norwegian road sensors (the Statens vegvesen
//! trafikkdata GraphQL API) and assemble them into a dense, hour-indexed grid.
//!
//! The pipeline: [`partition`] splits the requested range into windows the service accepts,
//! [`build_search_query`] and [`build_volume_query`] produce the requests, a [`Transport`]
//! executes them with bounded retry, [`normalize_sensors`] and [`normalize_volume_edges`]
//! parse the responses, and [`build_time_index`] reindexes the accumulated
//! [`SensorVolumeSeries`] into a [`TimeIndexedAggregate`]. [`TrafficClient`] runs it all.

mod aggregate;
mod error;
mod normalize;
mod progress;
mod query;
mod traffic;
mod transport;
mod types;
mod utils;
mod window;

pub use error::TrafficError;
pub use traffic::*;

pub use aggregate::error::AggregateError;
pub use aggregate::series::SensorVolumeSeries;
pub use aggregate::time_index::{build_time_index, HourFrame, PointVolume, TimeIndexedAggregate};

pub use normalize::error::NormalizeError;
pub use normalize::normalizer::{normalize_sensors, normalize_volume_edges};

pub use progress::{LogProgress, Progress, ProgressObserver};

pub use query::builder::{build_search_query, build_volume_query};
pub use query::request::GraphQlRequest;

pub use transport::error::TransportError;
pub use transport::http::{HttpTransport, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT};
pub use transport::retry::{with_retry, Retried, RetryPolicy, DEFAULT_MAX_ATTEMPTS};
pub use transport::{RawResponse, Transport};

pub use types::filter::{
    ParseFilterError, RegistrationFrequency, RoadCategory, SearchFilter, TrafficType,
};
pub use types::into_service_time::IntoServiceDateTime;
pub use types::sensor::Sensor;
pub use types::volume::{HourlyVolumeRecord, VolumeData};
pub use types::window::TimeWindow;

pub use utils::{format_service_time, parse_service_time, service_offset};

pub use window::error::WindowError;
pub use window::partition::{partition, MAX_QUERY_SPAN};
