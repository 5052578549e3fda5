//! Expiry bounds
//!
//! The range a link is allowed to expire in, and the expiry it starts with

use core::fmt;

use chrono::Months;
use chrono::NaiveDateTime;
use chrono::Timelike;

/// Format of a `datetime-local` value, minute precision
const DATETIME_LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Longer `datetime-local` format, accepted when parsing user input
const DATETIME_LOCAL_SECONDS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Bounds errors
#[derive(Debug)]
pub enum Error {
    /// Adding a month or a year leaves the supported calendar
    OutOfRange(NaiveDateTime),
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::OutOfRange(now) => write!(f, "No expiry bounds possible from {now}"),
        }
    }
}

/// Allowed expiry range with its default
///
/// All values have minute precision, `min <= default <= max`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExpiryBounds {
    /// Earliest allowed expiry, the moment the page loaded
    pub min: NaiveDateTime,

    /// Initial expiry, a calendar month after `min`
    pub default: NaiveDateTime,

    /// Latest allowed expiry, a calendar year after `min`
    pub max: NaiveDateTime,
}

/// Compute the expiry bounds for a page loaded at `now`
///
/// Month arithmetic follows the calendar: December rolls over into January
/// of the next year, and a day that does not exist in the target month is
/// clamped to the last day of that month (Jan 31 becomes Feb 28 or 29).
pub fn compute_bounds(now: NaiveDateTime) -> Result<ExpiryBounds, Error> {
    let min = truncate_to_minute(now).ok_or(Error::OutOfRange(now))?;

    let default = min
        .checked_add_months(Months::new(1))
        .ok_or(Error::OutOfRange(now))?;

    let max = min
        .checked_add_months(Months::new(12))
        .ok_or(Error::OutOfRange(now))?;

    Ok(ExpiryBounds { min, default, max })
}

fn truncate_to_minute(value: NaiveDateTime) -> Option<NaiveDateTime> {
    value.with_second(0)?.with_nanosecond(0)
}

/// Serialize as a `datetime-local` value: `2024-03-10T12:00`
pub fn format_datetime_local(value: &NaiveDateTime) -> String {
    value.format(DATETIME_LOCAL_FORMAT).to_string()
}

/// Parse a `datetime-local` value, seconds are optional
pub fn parse_datetime_local(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, DATETIME_LOCAL_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, DATETIME_LOCAL_SECONDS_FORMAT))
        .ok()
}

#[cfg(test)]
mod tests {
    use chrono::Datelike;
    use chrono::Duration;
    use chrono::NaiveDate;

    use super::*;

    fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn test_december_rolls_into_january() {
        let bounds = compute_bounds(at(2024, 12, 15, 10, 0)).unwrap();

        assert_eq!(at(2025, 1, 15, 10, 0), bounds.default);
        assert_eq!(at(2025, 12, 15, 10, 0), bounds.max);
    }

    #[test]
    fn test_max_is_one_year_later() {
        let bounds = compute_bounds(at(2024, 3, 10, 0, 0)).unwrap();

        assert_eq!(at(2025, 3, 10, 0, 0), bounds.max);
        assert_eq!(at(2024, 4, 10, 0, 0), bounds.default);
    }

    #[test]
    fn test_day_overflow_is_clamped() {
        let bounds = compute_bounds(at(2023, 1, 31, 8, 30)).unwrap();
        assert_eq!(at(2023, 2, 28, 8, 30), bounds.default);

        let bounds = compute_bounds(at(2024, 1, 31, 8, 30)).unwrap();
        assert_eq!(at(2024, 2, 29, 8, 30), bounds.default);

        // leap day has no counterpart next year
        let bounds = compute_bounds(at(2024, 2, 29, 8, 30)).unwrap();
        assert_eq!(at(2025, 2, 28, 8, 30), bounds.max);
    }

    #[test]
    fn test_min_is_truncated_to_minutes() {
        let now = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_milli_opt(13, 37, 42, 999)
            .unwrap();

        let bounds = compute_bounds(now).unwrap();

        assert_eq!(at(2024, 6, 1, 13, 37), bounds.min);
        assert_eq!(0, bounds.default.second());
        assert_eq!(0, bounds.max.nanosecond());
    }

    #[test]
    fn test_bounds_are_ordered() {
        let mut now = at(2023, 1, 1, 0, 0) + Duration::seconds(59);

        while now.year() < 2026 {
            let bounds = compute_bounds(now).unwrap();

            assert!(bounds.min <= bounds.default, "{now}");
            assert!(bounds.default <= bounds.max, "{now}");
            assert!(
                format_datetime_local(&bounds.min) <= format_datetime_local(&bounds.default),
                "{now}"
            );

            now += Duration::hours(7);
        }
    }

    #[test]
    fn test_out_of_range() {
        assert!(compute_bounds(NaiveDateTime::MAX).is_err());
    }

    #[test]
    fn test_datetime_local() {
        let value = at(2024, 12, 15, 10, 0);
        assert_eq!("2024-12-15T10:00", format_datetime_local(&value));

        assert_eq!(Some(value), parse_datetime_local("2024-12-15T10:00"));
        assert_eq!(Some(value), parse_datetime_local("2024-12-15T10:00:00"));
        assert_eq!(None, parse_datetime_local("2024-12-15"));
        assert_eq!(None, parse_datetime_local("next tuesday"));
    }
}
