//! Wall-clock time helpers.
//!
//! Everything here works on naive local date-times: all parties of a booking
//! share one local time zone, so no offsets are carried around.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// Parses an office-hours or slot token such as `"9"`, `"09:30"`, `"7pm"` or
/// `"10:00 AM"` and places it on `base`.
///
/// Returns `None` when the hour is not numeric or the result is not a valid
/// time of day. Callers skip the entry in that case.
pub fn parse_time_on_date(base: NaiveDate, time_str: &str) -> Option<NaiveDateTime> {
    let lowered = time_str.trim().to_ascii_lowercase();
    let (clock, meridiem) = if let Some(rest) = lowered.strip_suffix("am") {
        (rest.trim_end(), Some(false))
    } else if let Some(rest) = lowered.strip_suffix("pm") {
        (rest.trim_end(), Some(true))
    } else {
        (lowered.as_str(), None)
    };

    let mut parts = clock.splitn(2, ':');
    let hour_part = parts.next()?.trim();
    if hour_part.is_empty() || !hour_part.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let mut hour: u32 = hour_part.parse().ok()?;

    let minute: u32 = match parts.next().map(str::trim) {
        None | Some("") => 0,
        // "09:30:00" style tokens: only the minutes matter
        Some(rest) => rest.split(':').next()?.trim().parse().ok()?,
    };

    match meridiem {
        Some(true) if hour < 12 => hour += 12,
        Some(false) if hour == 12 => hour = 0,
        Some(_) if hour > 12 => return None,
        _ => {}
    }

    NaiveTime::from_hms_opt(hour, minute, 0).map(|t| base.and_time(t))
}

/// Formats the time of day as zero-padded 24-hour `"HH:MM"`.
pub fn format_time_label(dt: NaiveDateTime) -> String {
    dt.format("%H:%M").to_string()
}

/// Canonical `"YYYY-MM-DD"` key for a calendar date.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parses a date key. Anything after the first ten characters (for example
/// the time part of an ISO timestamp) is ignored.
pub fn parse_date_key(key: &str) -> Option<NaiveDate> {
    let key = key.trim();
    let prefix = key.get(..10).unwrap_or(key);
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}

/// Minutes elapsed since midnight of the date-time's own calendar day.
pub fn minutes_since_midnight(dt: NaiveDateTime) -> u32 {
    dt.hour() * 60 + dt.minute()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
    }

    fn at(h: u32, m: u32) -> Option<NaiveDateTime> {
        Some(day().and_hms_opt(h, m, 0).unwrap())
    }

    #[test]
    fn test_parse_24_hour_tokens() {
        assert_eq!(parse_time_on_date(day(), "09:00"), at(9, 0));
        assert_eq!(parse_time_on_date(day(), "9"), at(9, 0));
        assert_eq!(parse_time_on_date(day(), " 18:45 "), at(18, 45));
        assert_eq!(parse_time_on_date(day(), "00:00"), at(0, 0));
        assert_eq!(parse_time_on_date(day(), "10:30:00"), at(10, 30));
    }

    #[test]
    fn test_parse_meridiem_tokens() {
        assert_eq!(parse_time_on_date(day(), "7pm"), at(19, 0));
        assert_eq!(parse_time_on_date(day(), "7:15PM"), at(19, 15));
        assert_eq!(parse_time_on_date(day(), "10:00 AM"), at(10, 0));
        assert_eq!(parse_time_on_date(day(), "12am"), at(0, 0));
        assert_eq!(parse_time_on_date(day(), "12:30pm"), at(12, 30));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_time_on_date(day(), ""), None);
        assert_eq!(parse_time_on_date(day(), "noon"), None);
        assert_eq!(parse_time_on_date(day(), "ab:30"), None);
        assert_eq!(parse_time_on_date(day(), "25:00"), None);
        assert_eq!(parse_time_on_date(day(), "10:75"), None);
        assert_eq!(parse_time_on_date(day(), "13pm"), None);
        assert_eq!(parse_time_on_date(day(), "-1:00"), None);
    }

    #[test]
    fn test_format_and_keys() {
        let dt = day().and_hms_opt(7, 5, 0).unwrap();
        assert_eq!(format_time_label(dt), "07:05");
        assert_eq!(date_key(day()), "2025-06-02");
        assert_eq!(parse_date_key("2025-06-02"), Some(day()));
        assert_eq!(parse_date_key("2025-06-02T00:00:00.000Z"), Some(day()));
        assert_eq!(parse_date_key("02/06/2025"), None);
        assert_eq!(minutes_since_midnight(dt), 425);
    }
}
