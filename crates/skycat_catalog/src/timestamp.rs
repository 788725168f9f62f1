//! Timestamp resolution for extracted filename fields
//!
//! Missing fields default to their minimum (month 1, day 1, midnight). A `day`
//! field without a `month` field is a day-of-year.

use crate::error::{CatalogError, Result};
use crate::types::FieldValues;
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};

/// Resolve extracted fields into a single calendar timestamp.
pub fn resolve(values: &FieldValues) -> Result<NaiveDateTime> {
    resolve_fields(values).map_err(|message| CatalogError::invalid_date(&values.to_string(), message))
}

fn resolve_fields(values: &FieldValues) -> std::result::Result<NaiveDateTime, String> {
    let year = values.year.ok_or_else(|| "no year field".to_string())?;
    let year = i32::try_from(year).map_err(|_| format!("year {} is out of range", year))?;

    let date = match (values.month, values.day) {
        (None, Some(doy)) => NaiveDate::from_yo_opt(year, doy).ok_or_else(|| {
            format!(
                "day-of-year {} is out of range for {} ({} days)",
                doy,
                year,
                days_in_year(year)
            )
        })?,
        (month, day) => {
            let month = month.unwrap_or(1);
            let day = day.unwrap_or(1);
            NaiveDate::from_ymd_opt(year, month, day)
                .ok_or_else(|| format!("{:04}-{:02}-{:02} is not a calendar date", year, month, day))?
        }
    };

    let hour = values.hour.unwrap_or(0);
    let min = values.min.unwrap_or(0);
    let sec = values.sec.unwrap_or(0);
    date.and_hms_opt(hour, min, sec)
        .ok_or_else(|| format!("time {:02}:{:02}:{:02} is out of range", hour, min, sec))
}

/// Proleptic Gregorian leap-year test
pub fn is_leap_year(year: i32) -> bool {
    NaiveDate::from_ymd_opt(year, 2, 29).is_some()
}

pub fn days_in_year(year: i32) -> u32 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

/// Split a date into `(year, day-of-year)`
pub fn year_doy(date: NaiveDate) -> (i32, u32) {
    (date.year(), date.ordinal())
}

/// Every instant from `start` to `stop` inclusive, `step` apart.
///
/// A non-positive step yields an empty range.
pub fn date_range(start: NaiveDateTime, stop: NaiveDateTime, step: Duration) -> Vec<NaiveDateTime> {
    let mut out = Vec::new();
    if step <= Duration::zero() {
        return out;
    }
    let mut current = start;
    while current <= stop {
        out.push(current);
        current = match current.checked_add_signed(step) {
            Some(next) => next,
            None => break,
        };
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldKind;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    fn year_day(year: u32, day: u32) -> FieldValues {
        FieldValues::default()
            .with(FieldKind::Year, year)
            .with(FieldKind::Day, day)
    }

    #[test]
    fn day_of_year_without_month() {
        assert_eq!(resolve(&year_day(2009, 1)).unwrap(), ymd(2009, 1, 1));
        assert_eq!(resolve(&year_day(2009, 32)).unwrap(), ymd(2009, 2, 1));
        assert_eq!(resolve(&year_day(2008, 60)).unwrap(), ymd(2008, 2, 29));
        assert_eq!(resolve(&year_day(2009, 60)).unwrap(), ymd(2009, 3, 1));
    }

    #[test]
    fn day_366_only_in_leap_years() {
        for year in 1999..=2024u32 {
            let result = resolve(&year_day(year, 366));
            if is_leap_year(year as i32) {
                assert_eq!(result.unwrap(), ymd(year as i32, 12, 31), "year {}", year);
            } else {
                assert!(
                    matches!(result, Err(CatalogError::InvalidDate { .. })),
                    "year {} should reject day 366",
                    year
                );
            }
        }
    }

    #[test]
    fn century_leap_rules() {
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(1900));
        assert!(is_leap_year(2008));
        assert!(!is_leap_year(2009));
        assert_eq!(days_in_year(2100), 365);
    }

    #[test]
    fn day_zero_is_invalid() {
        assert!(resolve(&year_day(2009, 0)).is_err());
    }

    #[test]
    fn month_and_day_are_calendar_fields() {
        let values = FieldValues::default()
            .with(FieldKind::Year, 2008)
            .with(FieldKind::Month, 12)
            .with(FieldKind::Day, 31)
            .with(FieldKind::Hour, 23)
            .with(FieldKind::Min, 20)
            .with(FieldKind::Sec, 5);
        let expected = NaiveDate::from_ymd_opt(2008, 12, 31)
            .unwrap()
            .and_hms_opt(23, 20, 5)
            .unwrap();
        assert_eq!(resolve(&values).unwrap(), expected);
    }

    #[test]
    fn year_month_defaults_to_first_of_month() {
        let values = FieldValues::default()
            .with(FieldKind::Year, 2009)
            .with(FieldKind::Month, 12);
        assert_eq!(resolve(&values).unwrap(), ymd(2009, 12, 1));
    }

    #[test]
    fn impossible_dates_and_times_are_rejected() {
        let feb_30 = FieldValues::default()
            .with(FieldKind::Year, 2009)
            .with(FieldKind::Month, 2)
            .with(FieldKind::Day, 30);
        let err = resolve(&feb_30).unwrap_err();
        assert!(err.to_string().contains("year=2009 month=2 day=30"), "{}", err);

        let hour_24 = year_day(2009, 1).with(FieldKind::Hour, 24);
        assert!(resolve(&hour_24).is_err());

        let min_60 = year_day(2009, 1).with(FieldKind::Min, 60);
        assert!(resolve(&min_60).is_err());
    }

    #[test]
    fn missing_year_is_invalid() {
        let values = FieldValues::default().with(FieldKind::Day, 1);
        assert!(resolve(&values).is_err());
    }

    #[test]
    fn year_doy_matches_resolver() {
        assert_eq!(year_doy(NaiveDate::from_ymd_opt(2009, 1, 1).unwrap()), (2009, 1));
        assert_eq!(year_doy(NaiveDate::from_ymd_opt(2008, 12, 31).unwrap()), (2008, 366));
    }

    #[test]
    fn date_range_is_inclusive() {
        let days = date_range(ymd(2008, 1, 1), ymd(2009, 12, 31), Duration::days(1));
        assert_eq!(days.len(), 731);
        assert_eq!(days[365], ymd(2008, 12, 31));

        let steps = date_range(ymd(2008, 1, 11), ymd(2008, 1, 12), Duration::minutes(100));
        assert_eq!(steps.len(), 15);
        assert_eq!(*steps.last().unwrap(), ymd(2008, 1, 11) + Duration::minutes(1400));

        assert!(date_range(ymd(2008, 1, 2), ymd(2008, 1, 1), Duration::days(1)).is_empty());
        assert!(date_range(ymd(2008, 1, 1), ymd(2008, 1, 2), Duration::zero()).is_empty());
    }
}
