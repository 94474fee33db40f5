use chrono::{DateTime, FixedOffset, TimeDelta};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WindowError {
    #[error("Time range start {start} is after stop {stop}")]
    InvalidRange {
        start: DateTime<FixedOffset>,
        stop: DateTime<FixedOffset>,
    },

    #[error("Maximum query span must be positive, got {0}")]
    InvalidSpan(TimeDelta),
}
