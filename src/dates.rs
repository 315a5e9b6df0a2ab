//! Calendar helpers shared by the surfaces, models and solvers.
//!
//! Dates are `chrono::NaiveDate`; the numeric axes work in whole days counted from the POSIX
//! epoch (dates) or from birth (ages).

use chrono::{Datelike, Months, NaiveDate, TimeDelta};

/// Average calendar year, used to convert between day and year quanta.
pub const DAYS_PER_YEAR: f64 = 365.25;

pub const FIRST_YEAR: i32 = 1950;
pub const LAST_YEAR: i32 = 2100;

/// Oldest age (in days) any query may reach.
pub const MAX_AGE_DAYS: i64 = 36_500;

pub const EPOCH: NaiveDate = date(1970, 1, 1);
pub const DATA_START: NaiveDate = date(FIRST_YEAR, 1, 1);
pub const DATA_END: NaiveDate = date(LAST_YEAR, 12, 31);
pub const EARLIEST_BIRTHDATE: NaiveDate = date(1920, 1, 1);

const fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(d) => d,
        None => panic!("invalid calendar date"),
    }
}

pub fn epoch_days(d: NaiveDate) -> i64 {
    (d - EPOCH).num_days()
}

pub fn from_epoch_days(days: i64) -> Option<NaiveDate> {
    EPOCH.checked_add_signed(TimeDelta::try_days(days)?)
}

pub fn add_days(d: NaiveDate, days: i64) -> Option<NaiveDate> {
    d.checked_add_signed(TimeDelta::try_days(days)?)
}

/// Same calendar day `years` later (Feb 29 falls back to Feb 28).
pub fn add_years(d: NaiveDate, years: u32) -> Option<NaiveDate> {
    d.checked_add_months(Months::new(years.checked_mul(12)?))
}

pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// July 1: the representative instant of an annual snapshot.
pub fn snapshot_date(year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 7, 1)
}

pub fn snapshot_epoch_days(year: i32) -> i64 {
    // July 1 exists for every year chrono can represent in our range.
    snapshot_date(year).map(epoch_days).unwrap_or_default()
}

/// Locate `d` between two consecutive mid-year snapshots.
///
/// Returns `(year, frac)` with `July 1 (year) <= d < July 1 (year + 1)` and `frac` in [0, 1).
pub fn midyear_position(d: NaiveDate) -> (i32, f64) {
    let year = if d.ordinal() >= snapshot_ordinal(d.year()) { d.year() } else { d.year() - 1 };
    let lo = snapshot_epoch_days(year);
    let hi = snapshot_epoch_days(year + 1);
    let frac = (epoch_days(d) - lo) as f64 / (hi - lo) as f64;
    (year, frac)
}

fn snapshot_ordinal(year: i32) -> u32 {
    snapshot_date(year).map(|d| d.ordinal()).unwrap_or(182)
}

/// First day of the `years`-th year of life, in days since birth.
pub fn age_from_years(years: i64) -> i64 {
    (years as f64 * DAYS_PER_YEAR).ceil() as i64
}

/// Completed years of life at `age_days`.
pub fn whole_years(age_days: i64) -> i64 {
    (age_days as f64 / DAYS_PER_YEAR).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn midyear_position_brackets_snapshots() {
        let (y, f) = midyear_position(date(2014, 1, 1));
        assert_eq!(y, 2013);
        assert!(f > 0.49 && f < 0.51);

        let (y, f) = midyear_position(date(2014, 7, 1));
        assert_eq!((y, f), (2014, 0.0));

        let (y, _) = midyear_position(date(1950, 3, 1));
        assert_eq!(y, 1949);
    }

    #[test]
    fn year_boundaries_round_trip() {
        for y in 0..=101 {
            assert_eq!(whole_years(age_from_years(y)), y);
            assert_eq!(whole_years(age_from_years(y) - 1), y - 1);
        }
    }

    #[test]
    fn add_years_clamps_leap_day() {
        assert_eq!(add_years(date(2000, 2, 29), 1), Some(date(2001, 2, 28)));
        assert_eq!(epoch_days(EPOCH), 0);
        assert_eq!(from_epoch_days(365), Some(date(1971, 1, 1)));
    }
}
