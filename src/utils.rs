use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, TimeDelta, Timelike, Utc};

/// The traffic service reads and writes every timestamp at UTC+02:00.
const SERVICE_OFFSET_SECONDS: i32 = 2 * 60 * 60;
const SERVICE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";
const NAIVE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub fn service_offset() -> FixedOffset {
    FixedOffset::east_opt(SERVICE_OFFSET_SECONDS).unwrap_or_else(|| Utc.fix())
}

pub fn one_hour() -> TimeDelta {
    TimeDelta::hours(1)
}

/// Formats an instant the way the service expects it, e.g. `2019-10-24T00:00:00+02:00`.
pub fn format_service_time(datetime: &DateTime<FixedOffset>) -> String {
    datetime
        .with_timezone(&service_offset())
        .format(SERVICE_TIME_FORMAT)
        .to_string()
}

/// Parses a timestamp returned by the service. Offset-less values are read at UTC+02:00.
pub fn parse_service_time(value: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&service_offset()));
    }
    let naive = NaiveDateTime::parse_from_str(value, NAIVE_TIME_FORMAT).ok()?;
    naive.and_local_timezone(service_offset()).single()
}

/// Drops minutes, seconds and sub-seconds, keeping the hour in the service offset.
pub fn truncate_to_hour(datetime: DateTime<FixedOffset>) -> Option<DateTime<FixedOffset>> {
    datetime
        .with_timezone(&service_offset())
        .with_minute(0)?
        .with_second(0)?
        .with_nanosecond(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn formats_with_service_offset() {
        let dt = service_offset()
            .with_ymd_and_hms(2019, 10, 24, 5, 0, 0)
            .unwrap();
        assert_eq!(format_service_time(&dt), "2019-10-24T05:00:00+02:00");
    }

    #[test]
    fn parses_offset_and_naive_timestamps_to_the_same_instant() {
        let with_offset = parse_service_time("2019-10-24T05:00:00+02:00").unwrap();
        let naive = parse_service_time("2019-10-24T05:00:00").unwrap();
        let in_utc = parse_service_time("2019-10-24T03:00:00Z").unwrap();
        assert_eq!(with_offset, naive);
        assert_eq!(with_offset, in_utc);
        assert_eq!(in_utc.offset(), &service_offset());
        assert!(parse_service_time("yesterday").is_none());
    }

    #[test]
    fn truncates_to_the_hour() {
        let dt = service_offset()
            .with_ymd_and_hms(2019, 10, 24, 5, 42, 17)
            .unwrap();
        let truncated = truncate_to_hour(dt).unwrap();
        assert_eq!(format_service_time(&truncated), "2019-10-24T05:00:00+02:00");
    }
}
