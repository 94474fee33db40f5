//! This module provides the main entry point for fetching traffic data: finding sensors
//! and collecting their hourly volumes over an arbitrary time range.

use crate::aggregate::series::SensorVolumeSeries;
use crate::aggregate::time_index::{build_time_index, TimeIndexedAggregate};
use crate::error::TrafficError;
use crate::normalize::normalizer::{normalize_sensors, normalize_volume_edges};
use crate::progress::{ProgressObserver, ProgressTracker};
use crate::query::builder::{build_search_query, build_volume_query};
use crate::transport::http::HttpTransport;
use crate::transport::Transport;
use crate::types::filter::SearchFilter;
use crate::types::into_service_time::IntoServiceDateTime;
use crate::types::sensor::Sensor;
use crate::types::volume::VolumeData;
use crate::types::window::TimeWindow;
use crate::utils::truncate_to_hour;
use crate::window::partition::{partition, MAX_QUERY_SPAN};
use bon::bon;
use chrono::{DateTime, FixedOffset, TimeDelta};
use log::{debug, info};
use std::time::Duration;

/// Everything a renderer needs: the sensors, their hourly volumes, and the largest volume.
#[derive(Debug, Clone)]
pub struct TrafficSnapshot {
    pub sensors: Vec<Sensor>,
    pub aggregate: TimeIndexedAggregate,
    pub max_volume: u64,
}

/// The client for the traffic data service.
///
/// Requests go out one at a time through a [`Transport`]; by default that is an
/// [`HttpTransport`] talking to the public API.
///
/// # Examples
///
/// ```no_run
/// use chrono::NaiveDate;
/// use trafikkdata::{LogProgress, SearchFilter, TrafficClient, TrafficError, TrafficType};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), TrafficError> {
/// let client = TrafficClient::builder().build()?;
/// let filter = SearchFilter::builder()
///     .traffic_type(TrafficType::Vehicle)
///     .county_numbers([3].into())
///     .build();
/// let start = NaiveDate::from_ymd_opt(2019, 10, 24).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let stop = NaiveDate::from_ymd_opt(2019, 10, 31).unwrap().and_hms_opt(0, 0, 0).unwrap();
///
/// let snapshot = client
///     .fetch_traffic(&filter, start, stop, &mut LogProgress)
///     .await?;
/// println!("{} hours, max volume {}", snapshot.aggregate.len(), snapshot.max_volume);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TrafficClient<T = HttpTransport> {
    transport: T,
    max_span: TimeDelta,
}

#[bon]
impl TrafficClient<HttpTransport> {
    /// Creates a client talking to the traffic service over HTTP.
    ///
    /// # Arguments
    ///
    /// * `.endpoint(String)`: Optional. The GraphQL endpoint. Defaults to the public API.
    /// * `.timeout(Duration)`: Optional. Per-attempt timeout, defaults to 5 seconds.
    /// * `.max_attempts(u32)`: Optional. Attempts per request when they time out, defaults to 10.
    /// * `.max_span(TimeDelta)`: Optional. Longest range per volume query, defaults to 99 hours.
    ///
    /// # Errors
    ///
    /// Returns [`TrafficError::Transport`] if the HTTP client cannot be created.
    #[builder]
    pub fn new(
        #[builder(into)] endpoint: Option<String>,
        timeout: Option<Duration>,
        max_attempts: Option<u32>,
        max_span: Option<TimeDelta>,
    ) -> Result<Self, TrafficError> {
        let transport = HttpTransport::builder()
            .maybe_endpoint(endpoint)
            .maybe_timeout(timeout)
            .maybe_max_attempts(max_attempts)
            .build()?;
        Ok(Self {
            transport,
            max_span: max_span.unwrap_or(MAX_QUERY_SPAN),
        })
    }
}

impl<T: Transport> TrafficClient<T> {
    /// Creates a client on top of any [`Transport`].
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            max_span: MAX_QUERY_SPAN,
        }
    }

    /// Sets the longest range a single volume query may cover.
    pub fn with_max_span(mut self, max_span: TimeDelta) -> Self {
        self.max_span = max_span;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Finds the sensors matching `filter`.
    ///
    /// # Errors
    ///
    /// * [`TrafficError::SensorSearch`] if the request fails.
    /// * [`TrafficError::SensorDecode`] if the response has no sensor list.
    pub async fn find_sensors(&self, filter: &SearchFilter) -> Result<Vec<Sensor>, TrafficError> {
        let request = build_search_query(filter);
        let raw = self
            .transport
            .execute(&request)
            .await
            .map_err(TrafficError::SensorSearch)?;
        let sensors = normalize_sensors(&raw).map_err(TrafficError::SensorDecode)?;
        info!("Found {} sensors", sensors.len());
        Ok(sensors)
    }

    /// Fetches the hourly volumes of every sensor in every window.
    ///
    /// Windows are visited in order and, within each, sensors in order; one request is in
    /// flight at a time. Sensor/window pairs without data are skipped. `progress` sees the
    /// share of pairs handled so far.
    ///
    /// # Errors
    ///
    /// The first failed request or unreadable response aborts the run with
    /// [`TrafficError::VolumeFetch`] or [`TrafficError::VolumeDecode`], naming the sensor
    /// and window.
    pub async fn fetch_volume_series<P>(
        &self,
        sensors: &[Sensor],
        windows: &[TimeWindow],
        progress: &mut P,
    ) -> Result<SensorVolumeSeries, TrafficError>
    where
        P: ProgressObserver + ?Sized,
    {
        let mut series = SensorVolumeSeries::new();
        let mut tracker = ProgressTracker::new(progress, windows.len() * sensors.len());
        tracker.start();

        for window in windows {
            debug!("Fetching volumes for {} sensors in {}", sensors.len(), window);
            for sensor in sensors {
                let request = build_volume_query(&sensor.id, window);
                let raw = self.transport.execute(&request).await.map_err(|source| {
                    TrafficError::VolumeFetch {
                        sensor: sensor.id.clone(),
                        window: *window,
                        source,
                    }
                })?;
                let data = normalize_volume_edges(&raw).map_err(|source| {
                    TrafficError::VolumeDecode {
                        sensor: sensor.id.clone(),
                        window: *window,
                        source,
                    }
                })?;
                match data {
                    VolumeData::Present(records) => series.accumulate(&sensor.id, records),
                    VolumeData::Absent => {
                        debug!("No volume data for sensor {} in {}", sensor.id, window)
                    }
                }
                tracker.advance();
            }
        }

        Ok(series)
    }

    /// Collects the hourly volumes of `sensors` between `start` and `stop`, both truncated
    /// to the hour, and indexes them by hour.
    ///
    /// Returns the dense hourly grid and the largest volume in it.
    pub async fn traffic_volume_by_hour<P>(
        &self,
        sensors: &[Sensor],
        start: impl IntoServiceDateTime,
        stop: impl IntoServiceDateTime,
        progress: &mut P,
    ) -> Result<(TimeIndexedAggregate, u64), TrafficError>
    where
        P: ProgressObserver + ?Sized,
    {
        let start = align_to_hour(start.into_service_time())?;
        let stop = align_to_hour(stop.into_service_time())?;
        let windows = partition(start, stop, self.max_span)?;
        info!(
            "Fetching {} sensors over {} windows",
            sensors.len(),
            windows.len()
        );

        let series = self
            .fetch_volume_series(sensors, &windows, progress)
            .await?;
        let (aggregate, max_volume) = build_time_index(sensors, &series, start, stop)?;
        info!(
            "Indexed {} records into {} hours, max volume {}",
            series.record_count(),
            aggregate.len(),
            max_volume
        );
        Ok((aggregate, max_volume))
    }

    /// Finds the sensors matching `filter` and collects their hourly volumes.
    pub async fn fetch_traffic<P>(
        &self,
        filter: &SearchFilter,
        start: impl IntoServiceDateTime,
        stop: impl IntoServiceDateTime,
        progress: &mut P,
    ) -> Result<TrafficSnapshot, TrafficError>
    where
        P: ProgressObserver + ?Sized,
    {
        let sensors = self.find_sensors(filter).await?;
        let (aggregate, max_volume) = self
            .traffic_volume_by_hour(&sensors, start, stop, progress)
            .await?;
        Ok(TrafficSnapshot {
            sensors,
            aggregate,
            max_volume,
        })
    }
}

fn align_to_hour(datetime: DateTime<FixedOffset>) -> Result<DateTime<FixedOffset>, TrafficError> {
    truncate_to_hour(datetime).ok_or(TrafficError::HourAlignment(datetime))
}
