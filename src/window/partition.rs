//! Splits a query range into windows the volume endpoint accepts.
//!
//! The `byHour` connection returns at most 100 edges per page, so a single query may not
//! span more than 99 hours.

use crate::types::window::TimeWindow;
use crate::utils::one_hour;
use crate::window::error::WindowError;
use chrono::{DateTime, FixedOffset, TimeDelta};

/// Longest range a single hourly volume query may cover.
pub const MAX_QUERY_SPAN: TimeDelta = TimeDelta::hours(99);

/// Partitions `[start, stop)` into ordered, contiguous, non-overlapping windows of at most
/// `max_span` each.
///
/// The range is walked in one-hour steps. A window is closed as soon as the accumulated
/// span reaches `max_span`, and the remainder (if any) forms the last, possibly shorter,
/// window. Consecutive windows share their boundary instant, and the spans add up to
/// exactly `stop - start`.
///
/// # Errors
///
/// * [`WindowError::InvalidRange`] if `start > stop`.
/// * [`WindowError::InvalidSpan`] if `max_span` is zero or negative.
///
/// # Examples
///
/// ```
/// use chrono::{FixedOffset, TimeDelta, TimeZone};
/// use trafikkdata::{partition, MAX_QUERY_SPAN};
///
/// let tz = FixedOffset::east_opt(7200).unwrap();
/// let start = tz.with_ymd_and_hms(2019, 10, 24, 0, 0, 0).unwrap();
/// let stop = start + TimeDelta::hours(150);
/// let windows = partition(start, stop, MAX_QUERY_SPAN).unwrap();
/// assert_eq!(windows.len(), 2);
/// assert_eq!(windows[0].span(), TimeDelta::hours(99));
/// assert_eq!(windows[1].span(), TimeDelta::hours(51));
/// ```
pub fn partition(
    start: DateTime<FixedOffset>,
    stop: DateTime<FixedOffset>,
    max_span: TimeDelta,
) -> Result<Vec<TimeWindow>, WindowError> {
    if start > stop {
        return Err(WindowError::InvalidRange { start, stop });
    }
    if max_span <= TimeDelta::zero() {
        return Err(WindowError::InvalidSpan(max_span));
    }

    // Largest whole number of hours that still fits within `max_span`.
    let whole_hours = if max_span < one_hour() {
        max_span
    } else {
        TimeDelta::try_hours(max_span.num_hours()).unwrap_or(max_span)
    };
    let window_span = whole_hours.min(stop - start);

    let mut windows = Vec::new();
    let mut window_start = start;
    while window_start < stop {
        let window_stop = window_start
            .checked_add_signed(window_span)
            .map_or(stop, |end| end.min(stop));
        windows.push(TimeWindow::new(window_start, window_stop));
        window_start = window_stop;
    }
    Ok(windows)
}
