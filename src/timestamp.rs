//! Timestamp display formatting.
//!
//! Turns epoch milliseconds into the timeline's human-readable label, e.g.
//! `"4:23 am Wed, 3rd Jul 19"`. Locale tables and the 12/24-hour preference
//! come from the hosting application's UI configuration; nothing here is
//! hardcoded to a process-wide locale.

use chrono::{Datelike, FixedOffset, LocalResult, TimeZone, Timelike, Utc};

/// Placeholder returned for timestamps outside the supported calendar range.
pub const INVALID_DATE: &str = "<invalid date>";

/// Locale/formatting configuration supplied by the hosting application.
#[derive(Clone, Debug)]
pub struct FormatConfig {
    /// Abbreviated weekday names, Sunday first.
    pub weekdays: [String; 7],
    /// Abbreviated month names, January first.
    pub months: [String; 12],
    /// 12-hour clock with lowercase meridiem when true, 24-hour otherwise.
    pub twelve_hour: bool,
    /// Fixed UTC offset of the display timezone, in seconds east.
    pub utc_offset_secs: i32,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            weekdays: ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"].map(String::from),
            months: [
                "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov",
                "Dec",
            ]
            .map(String::from),
            twelve_hour: true,
            utc_offset_secs: 0,
        }
    }
}

/// Format epoch milliseconds for display.
///
/// Never panics: timestamps outside the representable calendar range (and a
/// nonsensical UTC offset) yield [`INVALID_DATE`] instead.
pub fn format_timestamp(millis: i64, config: &FormatConfig) -> String {
    let Some(offset) = FixedOffset::east_opt(config.utc_offset_secs) else {
        return INVALID_DATE.to_string();
    };
    let utc = match Utc.timestamp_millis_opt(millis) {
        LocalResult::Single(dt) => dt,
        _ => return INVALID_DATE.to_string(),
    };
    let local = utc.with_timezone(&offset);

    let weekday = &config.weekdays[local.weekday().num_days_from_sunday() as usize];
    let month = &config.months[local.month0() as usize];
    let day = local.day();
    let year = local.year().rem_euclid(100);
    let minute = local.minute();

    if config.twelve_hour {
        let (is_pm, hour) = local.hour12();
        let meridiem = if is_pm { "pm" } else { "am" };
        format!(
            "{}:{:02} {} {}, {}{} {} {:02}",
            hour,
            minute,
            meridiem,
            weekday,
            day,
            ordinal_suffix(day),
            month,
            year
        )
    } else {
        format!(
            "{:02}:{:02} {}, {}{} {} {:02}",
            local.hour(),
            minute,
            weekday,
            day,
            ordinal_suffix(day),
            month,
            year
        )
    }
}

/// English ordinal suffix for a day of month (1st, 2nd, 3rd, 4th, ...,
/// with the 11th/12th/13th irregulars).
fn ordinal_suffix(day: u32) -> &'static str {
    match day % 100 {
        11 | 12 | 13 => "th",
        _ => match day % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn millis(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> i64 {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0)
            .unwrap()
            .timestamp_millis()
    }

    #[test]
    fn test_reference_format() {
        let config = FormatConfig::default();
        assert_eq!(
            format_timestamp(millis(2019, 7, 3, 4, 23), &config),
            "4:23 am Wed, 3rd Jul 19"
        );
        assert_eq!(
            format_timestamp(millis(2019, 7, 3, 4, 31), &config),
            "4:31 am Wed, 3rd Jul 19"
        );
    }

    #[test]
    fn test_meridiem_and_noon_midnight() {
        let config = FormatConfig::default();
        assert_eq!(
            format_timestamp(millis(2019, 7, 3, 16, 5), &config),
            "4:05 pm Wed, 3rd Jul 19"
        );
        assert_eq!(
            format_timestamp(millis(2019, 7, 3, 0, 0), &config),
            "12:00 am Wed, 3rd Jul 19"
        );
        assert_eq!(
            format_timestamp(millis(2019, 7, 3, 12, 0), &config),
            "12:00 pm Wed, 3rd Jul 19"
        );
    }

    #[test]
    fn test_twenty_four_hour_preference() {
        let config = FormatConfig {
            twelve_hour: false,
            ..FormatConfig::default()
        };
        assert_eq!(
            format_timestamp(millis(2019, 7, 3, 4, 23), &config),
            "04:23 Wed, 3rd Jul 19"
        );
        assert_eq!(
            format_timestamp(millis(2019, 7, 3, 16, 5), &config),
            "16:05 Wed, 3rd Jul 19"
        );
    }

    #[test]
    fn test_utc_offset_applied() {
        // 04:23 UTC viewed from UTC+2 is 06:23
        let config = FormatConfig {
            utc_offset_secs: 2 * 3600,
            ..FormatConfig::default()
        };
        assert_eq!(
            format_timestamp(millis(2019, 7, 3, 4, 23), &config),
            "6:23 am Wed, 3rd Jul 19"
        );
    }

    #[test]
    fn test_ordinal_suffixes() {
        assert_eq!(ordinal_suffix(1), "st");
        assert_eq!(ordinal_suffix(2), "nd");
        assert_eq!(ordinal_suffix(3), "rd");
        assert_eq!(ordinal_suffix(4), "th");
        assert_eq!(ordinal_suffix(11), "th");
        assert_eq!(ordinal_suffix(12), "th");
        assert_eq!(ordinal_suffix(13), "th");
        assert_eq!(ordinal_suffix(21), "st");
        assert_eq!(ordinal_suffix(22), "nd");
        assert_eq!(ordinal_suffix(23), "rd");
        assert_eq!(ordinal_suffix(31), "st");
    }

    #[test]
    fn test_ordinal_in_rendered_label() {
        let config = FormatConfig::default();
        assert_eq!(
            format_timestamp(millis(2019, 7, 1, 9, 0), &config),
            "9:00 am Mon, 1st Jul 19"
        );
        assert_eq!(
            format_timestamp(millis(2019, 7, 22, 9, 0), &config),
            "9:00 am Mon, 22nd Jul 19"
        );
    }

    #[test]
    fn test_out_of_range_returns_placeholder() {
        let config = FormatConfig::default();
        assert_eq!(format_timestamp(i64::MAX, &config), INVALID_DATE);
        assert_eq!(format_timestamp(i64::MIN, &config), INVALID_DATE);
    }

    #[test]
    fn test_epoch_zero_formats() {
        // The malformed-record fallback timestamp still renders something
        let config = FormatConfig::default();
        assert_eq!(
            format_timestamp(0, &config),
            "12:00 am Thu, 1st Jan 70"
        );
    }
}
