//! Integration loops shared by the population models.

use chrono::NaiveDate;

use crate::dates::days_between;
use crate::error::Result;
use crate::model::{PopulationModel, Quantum};

/// Clamp optional `[from, to)` age bounds to a model's range.
pub fn age_bounds(range: (i64, i64), age_from: Option<i64>, age_to: Option<i64>) -> (i64, i64) {
    let from = age_from.map_or(range.0, |a| a.max(range.0));
    let to = age_to.map_or(range.1, |a| a.min(range.1));
    (from, to)
}

/// Birth dates in `[dob_from, dob_to)` are ages in `[date - dob_to + 1, date - dob_from + 1)`.
pub fn dob_to_age_bounds(
    date: NaiveDate,
    dob_from: Option<NaiveDate>,
    dob_to: Option<NaiveDate>,
) -> (Option<i64>, Option<i64>) {
    let age_from = dob_to.map(|d| days_between(d, date) + 1);
    let age_to = dob_from.map(|d| days_between(d, date) + 1);
    (age_from, age_to)
}

/// Sum `pop_age` over every age quantum that starts within `[from, to)`.
pub fn step_ages<M: PopulationModel + ?Sized>(model: &M, date: NaiveDate, from: i64, to: i64) -> Result<f64> {
    let quantum = model.age_quantum();
    let mut total = 0.0;
    let mut age = quantum.ceil_age(from);
    while age < to {
        total += model.pop_age(date, age)?;
        age = quantum.next_age(age);
    }
    Ok(total)
}

/// Integrate `[from, to)` with a fine model for the fractional years at either end and
/// `coarse` for the whole years in between.
///
/// `coarse(a, b)` receives year-aligned bounds only. Ranges that contain no whole year are
/// stepped finely throughout.
pub fn split_by_years<M, F>(fine: &M, date: NaiveDate, from: i64, to: i64, coarse: F) -> Result<f64>
where
    M: PopulationModel + ?Sized,
    F: FnOnce(i64, i64) -> Result<f64>,
{
    if from >= to {
        return Ok(0.0);
    }
    let first_full = Quantum::Year.ceil_age(from);
    let last_full = Quantum::Year.floor_age(to);
    if first_full >= last_full {
        return step_ages(fine, date, from, to);
    }

    let leading = step_ages(fine, date, from, first_full)?;
    let middle = coarse(first_full, last_full)?;
    let trailing = step_ages(fine, date, last_full, to)?;
    Ok(leading + middle + trailing)
}
