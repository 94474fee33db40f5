use crate::utils::service_offset;
use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, Utc};

/// Converts a caller-supplied instant into the fixed offset the traffic service speaks.
///
/// Naive datetimes carry no offset and are read as wall-clock time in that offset.
pub trait IntoServiceDateTime {
    fn into_service_time(self) -> DateTime<FixedOffset>;
}

impl IntoServiceDateTime for NaiveDateTime {
    fn into_service_time(self) -> DateTime<FixedOffset> {
        let offset = service_offset();
        // Only fails at the edges of the representable range.
        self.and_local_timezone(offset)
            .single()
            .unwrap_or_else(|| self.and_utc().with_timezone(&offset))
    }
}

impl IntoServiceDateTime for DateTime<Local> {
    fn into_service_time(self) -> DateTime<FixedOffset> {
        self.with_timezone(&service_offset())
    }
}

impl IntoServiceDateTime for DateTime<Utc> {
    fn into_service_time(self) -> DateTime<FixedOffset> {
        self.with_timezone(&service_offset())
    }
}

impl IntoServiceDateTime for DateTime<FixedOffset> {
    fn into_service_time(self) -> DateTime<FixedOffset> {
        self.with_timezone(&service_offset())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    #[test]
    fn naive_datetime_is_read_in_service_offset() {
        let naive = NaiveDate::from_ymd_opt(2019, 10, 24)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let converted = naive.into_service_time();
        assert_eq!(converted.to_rfc3339(), "2019-10-24T00:00:00+02:00");
    }

    #[test]
    fn naive_datetime_at_the_range_edges_does_not_panic() {
        let earliest = NaiveDateTime::MIN.into_service_time();
        assert_eq!(earliest.offset(), &service_offset());
        let latest = NaiveDateTime::MAX.into_service_time();
        assert_eq!(latest.offset(), &service_offset());
        assert!(earliest < latest);
    }

    #[test]
    fn utc_is_shifted_into_service_offset() {
        let utc = Utc.with_ymd_and_hms(2019, 10, 23, 22, 0, 0).unwrap();
        let converted = utc.into_service_time();
        assert_eq!(converted.to_rfc3339(), "2019-10-24T00:00:00+02:00");
        assert_eq!(converted, utc);
    }
}
