//! Population models: one capability interface, three backings.
//!
//! - [`AnnualModel`]: the raw grid, one-year quanta.
//! - [`SurfaceModel`]: a continuous surface (spline by default), one-day quanta.
//! - [`DailyModel`]: one-day quanta bilinearly interpolated from an [`AnnualModel`] it wraps,
//!   delegating whole-year spans of its integrals back to it.
//!
//! Ages are whole days since birth and age ranges are half-open, so integrals over adjacent
//! ranges add up.

pub mod annual;
pub mod daily;
pub mod surface;

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates::{add_days, add_years, age_from_years, whole_years, DATA_END, DATA_START};
use crate::error::{PopRankError, Result};
use crate::integrate;

pub use annual::AnnualModel;
pub use daily::DailyModel;
pub use surface::SurfaceModel;

/// Native granularity of a model axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quantum {
    Day,
    Year,
}

impl Quantum {
    /// First quantum boundary at or after `age_days`.
    pub fn ceil_age(self, age_days: i64) -> i64 {
        match self {
            Quantum::Day => age_days,
            Quantum::Year => {
                let start = age_from_years(whole_years(age_days));
                if start == age_days {
                    age_days
                } else {
                    age_from_years(whole_years(age_days) + 1)
                }
            }
        }
    }

    /// Last quantum boundary at or before `age_days`.
    pub fn floor_age(self, age_days: i64) -> i64 {
        match self {
            Quantum::Day => age_days,
            Quantum::Year => age_from_years(whole_years(age_days)),
        }
    }

    pub fn next_age(self, age_days: i64) -> i64 {
        match self {
            Quantum::Day => age_days + 1,
            Quantum::Year => age_from_years(whole_years(age_days) + 1),
        }
    }

    pub fn next_date(self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            Quantum::Day => add_days(date, 1),
            Quantum::Year => add_years(date, 1),
        }
    }

    /// Whether `[lower, upper]` is at most one quantum wide.
    pub fn spans_at_most_one(self, lower: NaiveDate, upper: NaiveDate) -> bool {
        self.next_date(lower).map_or(true, |next| upper <= next)
    }
}

/// Which model a cohort query runs against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    #[default]
    Annual,
    Daily,
    Surface,
}

impl FromStr for ModelKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "annual" => Ok(ModelKind::Annual),
            "daily" => Ok(ModelKind::Daily),
            "surface" => Ok(ModelKind::Surface),
            other => anyhow::bail!("unknown model '{}' (expected annual, daily or surface)", other),
        }
    }
}

/// Capability interface shared by every population model of one (region, sex).
pub trait PopulationModel {
    fn age_quantum(&self) -> Quantum;

    fn date_quantum(&self) -> Quantum;

    /// Supported ages, half-open, in days.
    fn age_range(&self) -> (i64, i64);

    /// Supported dates, inclusive.
    fn date_range(&self) -> (NaiveDate, NaiveDate) {
        (DATA_START, DATA_END)
    }

    /// Persons in the age quantum starting at `age_days`, on `date`. Ages outside
    /// `age_range` hold nobody.
    fn pop_age(&self, date: NaiveDate, age_days: i64) -> Result<f64>;

    /// Persons aged within `[age_from, age_to)` days on `date`; missing bounds default to
    /// the model's age range.
    fn integrate_age(&self, date: NaiveDate, age_from: Option<i64>, age_to: Option<i64>) -> Result<f64> {
        check_model_date(self.date_range(), date)?;
        let (from, to) = integrate::age_bounds(self.age_range(), age_from, age_to);
        integrate::step_ages(self, date, from, to)
    }

    /// Persons born within `[dob_from, dob_to)` and alive on `date`.
    fn integrate_dob(&self, date: NaiveDate, dob_from: Option<NaiveDate>, dob_to: Option<NaiveDate>) -> Result<f64> {
        let (age_from, age_to) = integrate::dob_to_age_bounds(date, dob_from, dob_to);
        self.integrate_age(date, age_from, age_to)
    }
}

pub(crate) fn check_model_date(range: (NaiveDate, NaiveDate), date: NaiveDate) -> Result<()> {
    if date < range.0 || date > range.1 {
        return Err(PopRankError::RangeExceeded(format!(
            "date {} outside model range [{}, {}]",
            date, range.0, range.1
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_quantum_boundaries() {
        let q = Quantum::Year;
        assert_eq!(q.ceil_age(0), 0);
        assert_eq!(q.ceil_age(1), 366);
        assert_eq!(q.floor_age(400), 366);
        assert_eq!(q.next_age(0), 366);
        assert_eq!(q.next_age(366), 731);
        assert_eq!(Quantum::Day.ceil_age(17), 17);
    }

    #[test]
    fn quantum_span() {
        let d = |y, m, dd| NaiveDate::from_ymd_opt(y, m, dd).unwrap();
        assert!(Quantum::Day.spans_at_most_one(d(2000, 1, 1), d(2000, 1, 2)));
        assert!(!Quantum::Day.spans_at_most_one(d(2000, 1, 1), d(2000, 1, 3)));
        assert!(Quantum::Year.spans_at_most_one(d(2000, 1, 1), d(2000, 12, 31)));
        assert!(!Quantum::Year.spans_at_most_one(d(2000, 1, 1), d(2001, 1, 2)));
    }
}
