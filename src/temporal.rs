/// Temporal normalization for mooring observations.
///
/// The archive's `Date` column uses both `YYYY/mm/dd` and `YYYY-mm-dd`
/// forms; the `Time` column is `HH:MM:SS`. This module canonicalizes the
/// separator and combines the pair into one `NaiveDateTime` per observation,
/// and provides the day-of-year convention used by the climatology.
///
/// # Day-of-year convention
/// Climatology slots run 1..=365 with no leap-day slot. The slot for a
/// timestamp is its ordinal position within its calendar year, so the same
/// calendar date after February maps to different slots in leap and non-leap
/// years, and December 31 of a leap year (ordinal 366) maps to no slot at
/// all. This is the long-standing behavior of the record and is preserved
/// deliberately.

use chrono::{Datelike, NaiveDateTime};

/// Number of climatology slots per year. Ordinal 366 has no slot.
pub const CLIM_DAYS: usize = 365;

/// Replace the locale-ambiguous `/` date separator with `-` so the field
/// conforms to the ISO-like `YYYY-mm-dd` form before parsing.
pub fn normalize_date_separators(date: &str) -> String {
    date.replace('/', "-")
}

/// Combine a date field and a time field into one canonical timestamp.
///
/// The date is separator-normalized first. Returns an error message naming
/// the offending value when the pair does not conform after normalization;
/// callers exclude the row and count it rather than aborting.
pub fn parse_timestamp(date: &str, time: &str) -> Result<NaiveDateTime, String> {
    let normalized = normalize_date_separators(date.trim());
    let combined = format!("{} {}", normalized, time.trim());
    NaiveDateTime::parse_from_str(&combined, "%Y-%m-%d %H:%M:%S")
        .map_err(|e| format!("unparseable timestamp '{}': {}", combined, e))
}

/// Climatology slot (1..=365) for a timestamp, or `None` for ordinal day
/// 366 (December 31 of a leap year), which is excluded from the climatology
/// by construction.
pub fn clim_day_of_year(ts: NaiveDateTime) -> Option<u16> {
    let ordinal = ts.ordinal() as usize;
    if ordinal <= CLIM_DAYS {
        Some(ordinal as u16)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    #[test]
    fn test_slash_separated_date_is_normalized_and_parsed() {
        let ts = parse_timestamp("2000/01/05", "10:30:00").expect("should parse after normalization");
        assert_eq!(ts.date(), NaiveDate::from_ymd_opt(2000, 1, 5).unwrap());
        assert_eq!(ts.hour(), 10);
        assert_eq!(ts.minute(), 30);
    }

    #[test]
    fn test_dash_separated_date_parses_unchanged() {
        let ts = parse_timestamp("1990-12-31", "00:00:00").expect("ISO form should parse");
        assert_eq!(ts.date(), NaiveDate::from_ymd_opt(1990, 12, 31).unwrap());
    }

    #[test]
    fn test_malformed_date_reports_the_offending_value() {
        let err = parse_timestamp("not-a-date", "10:00:00").unwrap_err();
        assert!(
            err.contains("not-a-date"),
            "error should name the bad value, got: {}",
            err
        );
    }

    #[test]
    fn test_malformed_time_is_an_error_not_midnight() {
        assert!(parse_timestamp("2000-01-05", "25:99:00").is_err());
        assert!(parse_timestamp("2000-01-05", "").is_err());
    }

    #[test]
    fn test_day_of_year_is_ordinal_within_the_year() {
        // March 1 is day 60 in a non-leap year, day 61 in a leap year.
        let non_leap = NaiveDate::from_ymd_opt(2015, 3, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let leap = NaiveDate::from_ymd_opt(2016, 3, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        assert_eq!(clim_day_of_year(non_leap), Some(60));
        assert_eq!(clim_day_of_year(leap), Some(61));
    }

    #[test]
    fn test_leap_year_december_31_has_no_slot() {
        let dec31_leap = NaiveDate::from_ymd_opt(2016, 12, 31).unwrap().and_hms_opt(12, 0, 0).unwrap();
        let dec31_plain = NaiveDate::from_ymd_opt(2015, 12, 31).unwrap().and_hms_opt(12, 0, 0).unwrap();
        assert_eq!(clim_day_of_year(dec31_leap), None, "ordinal 366 must map to no slot");
        assert_eq!(clim_day_of_year(dec31_plain), Some(365));
    }

    #[test]
    fn test_january_first_is_slot_one() {
        let jan1 = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        assert_eq!(clim_day_of_year(jan1), Some(1));
    }
}
