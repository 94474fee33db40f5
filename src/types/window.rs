use crate::utils::format_service_time;
use chrono::{DateTime, FixedOffset, TimeDelta};
use std::fmt;
use std::fmt::{Display, Formatter};

/// A half-open time range `[start, stop)` small enough for a single volume query.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TimeWindow {
    pub start: DateTime<FixedOffset>,
    pub stop: DateTime<FixedOffset>,
}

impl TimeWindow {
    pub fn new(start: DateTime<FixedOffset>, stop: DateTime<FixedOffset>) -> Self {
        Self { start, stop }
    }

    pub fn span(&self) -> TimeDelta {
        self.stop - self.start
    }

    pub fn contains(&self, instant: &DateTime<FixedOffset>) -> bool {
        self.start <= *instant && *instant < self.stop
    }
}

impl Display for TimeWindow {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {})",
            format_service_time(&self.start),
            format_service_time(&self.stop)
        )
    }
}
