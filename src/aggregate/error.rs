use chrono::{DateTime, FixedOffset};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AggregateError {
    #[error("Time range start {start} is after stop {stop}")]
    InvalidRange {
        start: DateTime<FixedOffset>,
        stop: DateTime<FixedOffset>,
    },
}
