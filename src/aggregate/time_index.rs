//! Reindexes per-sensor series into a dense hour-by-hour grid with coordinates attached,
//! the structure a renderer steps through frame by frame.

use crate::aggregate::error::AggregateError;
use crate::aggregate::series::SensorVolumeSeries;
use crate::types::sensor::Sensor;
use crate::types::window::TimeWindow;
use crate::utils::one_hour;
use chrono::{DateTime, FixedOffset, TimeDelta};
use log::{debug, warn};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// The volume counted at one sensor in one hour, with the sensor's position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PointVolume {
    pub volume: u64,
    pub lat: f64,
    pub lon: f64,
}

/// All readings for one hour, keyed by sensor id. May be empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourFrame {
    pub hour: DateTime<FixedOffset>,
    pub readings: BTreeMap<String, PointVolume>,
}

/// A dense, chronologically ordered grid of hourly frames covering `[start, stop)`.
///
/// Every hour of the range has a frame, including hours in which no sensor reported.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeIndexedAggregate {
    frames: Vec<HourFrame>,
}

impl TimeIndexedAggregate {
    fn empty_grid(start: DateTime<FixedOffset>, stop: DateTime<FixedOffset>) -> Self {
        let mut frames = Vec::new();
        let mut hour = start;
        while hour < stop {
            frames.push(HourFrame {
                hour,
                readings: BTreeMap::new(),
            });
            hour += one_hour();
        }
        Self { frames }
    }

    /// Position of `hour` in the grid, if it is one of the grid's hours.
    fn slot(&self, hour: &DateTime<FixedOffset>) -> Option<usize> {
        let first = self.frames.first()?.hour;
        let offset = *hour - first;
        if offset < TimeDelta::zero()
            || offset.subsec_nanos() != 0
            || offset.num_seconds() % one_hour().num_seconds() != 0
        {
            return None;
        }
        let index = usize::try_from(offset.num_hours()).ok()?;
        (index < self.frames.len()).then_some(index)
    }

    /// Readings for `hour`, or `None` if the hour is not on the grid.
    pub fn get(&self, hour: &DateTime<FixedOffset>) -> Option<&BTreeMap<String, PointVolume>> {
        self.slot(hour).map(|index| &self.frames[index].readings)
    }

    pub fn frames(&self) -> &[HourFrame] {
        &self.frames
    }

    pub fn iter(&self) -> impl Iterator<Item = &HourFrame> {
        self.frames.iter()
    }

    pub fn hours(&self) -> impl Iterator<Item = DateTime<FixedOffset>> + '_ {
        self.frames.iter().map(|frame| frame.hour)
    }

    /// Number of hours on the grid.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Builds the hourly grid over `[start, stop)` and fills it from `series`, returning it with
/// the largest volume inserted (0 if nothing was).
///
/// Only records with a concrete volume are inserted, at the hour they start. Coordinates
/// come from `sensors`; series entries for unknown sensor ids are ignored, as are records
/// that fall outside the grid. If two records claim the same sensor and hour, the first one
/// is kept and the conflict is logged.
///
/// Runs in time linear in the number of records plus the number of hours.
///
/// # Errors
///
/// Returns [`AggregateError::InvalidRange`] if `start > stop`.
pub fn build_time_index(
    sensors: &[Sensor],
    series: &SensorVolumeSeries,
    start: DateTime<FixedOffset>,
    stop: DateTime<FixedOffset>,
) -> Result<(TimeIndexedAggregate, u64), AggregateError> {
    if start > stop {
        return Err(AggregateError::InvalidRange { start, stop });
    }

    let range = TimeWindow::new(start, stop);
    let mut aggregate = TimeIndexedAggregate::empty_grid(start, stop);
    let sensors_by_id: HashMap<&str, &Sensor> = sensors
        .iter()
        .map(|sensor| (sensor.id.as_str(), sensor))
        .collect();
    let mut max_volume = 0;

    for (sensor_id, records) in series.iter() {
        let Some(sensor) = sensors_by_id.get(sensor_id) else {
            debug!("Ignoring volume data for unknown sensor {}", sensor_id);
            continue;
        };
        for record in records {
            let Some(volume) = record.volume else {
                continue;
            };
            if !range.contains(&record.start) {
                warn!(
                    "Skipping record for sensor {} at {}: outside {}",
                    sensor_id, record.start, range
                );
                continue;
            }
            let Some(index) = aggregate.slot(&record.start) else {
                warn!(
                    "Skipping record for sensor {} at {}: not on the hourly grid",
                    sensor_id, record.start
                );
                continue;
            };
            let readings = &mut aggregate.frames[index].readings;
            if readings.contains_key(sensor_id) {
                warn!(
                    "Duplicate record for sensor {} at {}, keeping the first",
                    sensor_id, record.start
                );
                continue;
            }
            readings.insert(
                sensor_id.to_string(),
                PointVolume {
                    volume,
                    lat: sensor.lat,
                    lon: sensor.lon,
                },
            );
            max_volume = max_volume.max(volume);
        }
    }

    Ok((aggregate, max_volume))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::volume::HourlyVolumeRecord;
    use crate::utils::service_offset;
    use chrono::TimeZone;

    fn hour(h: i64) -> DateTime<FixedOffset> {
        service_offset()
            .with_ymd_and_hms(2019, 10, 24, 0, 0, 0)
            .unwrap()
            + TimeDelta::hours(h)
    }

    fn record(h: i64, volume: Option<u64>) -> HourlyVolumeRecord {
        HourlyVolumeRecord {
            start: hour(h),
            stop: hour(h + 1),
            volume,
            coverage: Some(100.0),
        }
    }

    fn sensors() -> Vec<Sensor> {
        vec![
            Sensor::new("A", "Alpha", 10.0, 10.0),
            Sensor::new("B", "Bravo", 20.0, 20.0),
            Sensor::new("C", "Charlie", 30.0, 30.0),
        ]
    }

    #[test]
    fn grid_is_dense_even_without_data() {
        let (aggregate, max) =
            build_time_index(&sensors(), &SensorVolumeSeries::new(), hour(0), hour(5)).unwrap();

        assert_eq!(max, 0);
        assert_eq!(aggregate.len(), 5);
        let hours: Vec<_> = aggregate.hours().collect();
        assert_eq!(hours, (0..5).map(hour).collect::<Vec<_>>());
        assert!(aggregate.iter().all(|frame| frame.readings.is_empty()));
    }

    #[test]
    fn empty_range_gives_empty_grid_and_reversed_range_fails() {
        let (aggregate, _) =
            build_time_index(&sensors(), &SensorVolumeSeries::new(), hour(3), hour(3)).unwrap();
        assert!(aggregate.is_empty());

        let err = build_time_index(&sensors(), &SensorVolumeSeries::new(), hour(3), hour(1))
            .unwrap_err();
        assert!(matches!(err, AggregateError::InvalidRange { .. }));
    }

    #[test]
    fn readings_carry_sensor_coordinates_and_track_the_max() {
        let mut series = SensorVolumeSeries::new();
        series.accumulate("A", vec![record(0, Some(5)), record(1, Some(42))]);
        series.accumulate("B", vec![record(0, Some(10))]);

        let (aggregate, max) = build_time_index(&sensors(), &series, hour(0), hour(3)).unwrap();

        assert_eq!(max, 42);
        let first = aggregate.get(&hour(0)).unwrap();
        assert_eq!(
            first.get("A"),
            Some(&PointVolume {
                volume: 5,
                lat: 10.0,
                lon: 10.0
            })
        );
        assert_eq!(first.get("B").map(|p| (p.volume, p.lat)), Some((10, 20.0)));
        assert!(!first.contains_key("C"));
        assert_eq!(aggregate.get(&hour(1)).unwrap().len(), 1);
        assert!(aggregate.get(&hour(2)).unwrap().is_empty());
        assert!(aggregate.get(&hour(3)).is_none());
    }

    #[test]
    fn absent_volumes_are_not_inserted() {
        let mut series = SensorVolumeSeries::new();
        series.accumulate("A", vec![record(0, None), record(1, Some(0))]);

        let (aggregate, max) = build_time_index(&sensors(), &series, hour(0), hour(2)).unwrap();

        assert_eq!(max, 0);
        assert!(aggregate.get(&hour(0)).unwrap().is_empty());
        assert_eq!(aggregate.get(&hour(1)).unwrap()["A"].volume, 0);
    }

    #[test]
    fn unknown_sensors_and_off_grid_records_are_skipped() {
        let mut series = SensorVolumeSeries::new();
        series.accumulate("Z", vec![record(0, Some(99))]);
        series.accumulate(
            "A",
            vec![
                record(-1, Some(50)),
                record(4, Some(60)),
                HourlyVolumeRecord {
                    start: hour(1) + TimeDelta::minutes(30),
                    ..record(1, Some(70))
                },
            ],
        );

        let (aggregate, max) = build_time_index(&sensors(), &series, hour(0), hour(4)).unwrap();

        assert_eq!(max, 0);
        assert!(aggregate.iter().all(|frame| frame.readings.is_empty()));
    }

    #[test]
    fn duplicates_keep_the_first_record() {
        let mut series = SensorVolumeSeries::new();
        series.accumulate("A", vec![record(0, Some(3)), record(0, Some(8))]);

        let (aggregate, max) = build_time_index(&sensors(), &series, hour(0), hour(1)).unwrap();

        assert_eq!(aggregate.get(&hour(0)).unwrap()["A"].volume, 3);
        assert_eq!(max, 3);
    }

    #[test]
    fn output_does_not_depend_on_insertion_order() {
        let chunks: Vec<(&str, Vec<HourlyVolumeRecord>)> = vec![
            ("A", vec![record(0, Some(5)), record(1, Some(6))]),
            ("B", vec![record(0, Some(10))]),
            ("A", vec![record(2, Some(7)), record(3, None)]),
            ("C", vec![record(3, Some(1))]),
            ("B", vec![record(2, Some(11)), record(3, Some(12))]),
        ];
        let orders: [&[usize]; 4] = [
            &[0, 1, 2, 3, 4],
            &[4, 3, 2, 1, 0],
            &[2, 0, 4, 1, 3],
            &[3, 4, 0, 2, 1],
        ];

        let mut results = orders.iter().map(|order| {
            let mut series = SensorVolumeSeries::new();
            for &i in order.iter() {
                let (id, records) = &chunks[i];
                series.accumulate(id, records.clone());
            }
            build_time_index(&sensors(), &series, hour(0), hour(4)).unwrap()
        });

        let first = results.next().unwrap();
        assert_eq!(first.1, 12);
        for other in results {
            assert_eq!(other, first);
        }
    }

    #[test]
    fn serializes_for_renderers() {
        let mut series = SensorVolumeSeries::new();
        series.accumulate("A", vec![record(0, Some(5))]);
        let (aggregate, _) = build_time_index(&sensors(), &series, hour(0), hour(1)).unwrap();

        let json = serde_json::to_value(&aggregate).unwrap();

        assert_eq!(json["frames"][0]["hour"], "2019-10-24T00:00:00+02:00");
        assert_eq!(json["frames"][0]["readings"]["A"]["volume"], 5);
    }
}
