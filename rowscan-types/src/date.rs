//! Calendar helpers shared by value conversions and cursors.

use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime};

/// Julian day number of 1970-01-01.
const UNIX_EPOCH_JULIAN_DAY: i32 = 2_440_588;

/// Converts days since the Unix epoch into a calendar date.
pub fn date_from_days(days: i32) -> Option<Date> {
    let julian = UNIX_EPOCH_JULIAN_DAY.checked_add(days)?;
    Date::from_julian_day(julian).ok()
}

/// Converts microseconds since the Unix epoch into a UTC date-time.
pub fn datetime_from_micros(micros: i64) -> Option<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(micros) * 1_000).ok()
}

pub fn format_date(date: Date) -> String {
    let (year, month, day) = date.to_calendar_date();
    format!("{:04}-{:02}-{:02}", year, month as u8, day)
}

pub fn format_datetime(dt: PrimitiveDateTime) -> String {
    format!(
        "{} {:02}:{:02}:{:02}.{:06}",
        format_date(dt.date()),
        dt.hour(),
        dt.minute(),
        dt.second(),
        dt.microsecond()
    )
}

pub fn parse_date(text: &str) -> Option<Date> {
    Date::parse(text.trim(), format_description!("[year]-[month]-[day]")).ok()
}

/// Parses `YYYY-MM-DD HH:MM:SS[.ffffff]`, with either a space or `T` separator.
pub fn parse_datetime(text: &str) -> Option<PrimitiveDateTime> {
    let normalized = text.trim().replacen('T', " ", 1);
    PrimitiveDateTime::parse(
        &normalized,
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second][optional [.[subsecond]]]"),
    )
    .ok()
    .or_else(|| parse_date(&normalized).map(|date| date.midnight()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_offsets_map_to_dates() {
        let date = date_from_days(19_000).unwrap();
        assert_eq!(format_date(date), "2022-01-08");
        assert_eq!(format_date(date_from_days(-1).unwrap()), "1969-12-31");
        assert!(date_from_days(i32::MAX).is_none());
    }

    #[test]
    fn parses_timestamps_with_fraction() {
        let dt = parse_datetime("2024-02-29T13:45:01.250000").unwrap();
        assert_eq!(dt.millisecond(), 250);
        assert_eq!(format_datetime(dt), "2024-02-29 13:45:01.250000");
        assert_eq!(parse_datetime("2024-02-29").unwrap().hour(), 0);
    }
}
