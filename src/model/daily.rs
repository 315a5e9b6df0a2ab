use chrono::NaiveDate;

use super::{check_model_date, AnnualModel, PopulationModel, Quantum};
use crate::dates::{age_from_years, midyear_position, snapshot_date, DAYS_PER_YEAR, FIRST_YEAR, LAST_YEAR};
use crate::error::{PopRankError, Result};
use crate::integrate;
use crate::surface::grid::INTERPOLATED_AGE_BUCKETS;

const LAST_BUCKET: i64 = INTERPOLATED_AGE_BUCKETS as i64 - 1;

/// Day-resolution model wrapped around an [`AnnualModel`].
///
/// A point query interpolates the four surrounding grid cells, with snapshots at July 1 and
/// buckets centred half a year into their age; cells beyond the grid repeat the edge. Whole
/// years inside an integral go to the base model instead of being stepped day by day.
#[derive(Debug, Clone)]
pub struct DailyModel {
    base: AnnualModel,
}

impl DailyModel {
    pub fn new(base: AnnualModel) -> Self {
        Self { base }
    }

    pub fn base(&self) -> &AnnualModel {
        &self.base
    }

    /// Base-model integral over year-aligned `[from, to)`, interpolated in time between the
    /// snapshots either side of `date`.
    fn base_span(&self, date: NaiveDate, from: i64, to: i64) -> Result<f64> {
        let (year, frac) = midyear_position(date);
        let before = self.snapshot_integral(year, from, to)?;
        let after = self.snapshot_integral(year + 1, from, to)?;
        Ok(lerp(before, after, frac))
    }

    fn snapshot_integral(&self, year: i32, from: i64, to: i64) -> Result<f64> {
        let year = year.clamp(FIRST_YEAR, LAST_YEAR);
        let date = snapshot_date(year)
            .ok_or_else(|| PopRankError::RangeExceeded(format!("no snapshot for year {}", year)))?;
        self.base.integrate_age(date, Some(from), Some(to))
    }
}

impl PopulationModel for DailyModel {
    fn age_quantum(&self) -> Quantum {
        Quantum::Day
    }

    fn date_quantum(&self) -> Quantum {
        Quantum::Day
    }

    fn age_range(&self) -> (i64, i64) {
        (0, age_from_years(INTERPOLATED_AGE_BUCKETS as i64))
    }

    fn pop_age(&self, date: NaiveDate, age_days: i64) -> Result<f64> {
        check_model_date(self.date_range(), date)?;
        let (min_age, max_age) = self.age_range();
        if age_days < min_age || age_days >= max_age {
            return Ok(0.0);
        }

        let (year, tfrac) = midyear_position(date);
        let pos = age_days as f64 / DAYS_PER_YEAR - 0.5;
        let lower = pos.floor();
        let afrac = pos - lower;
        let lower = lower as i64;

        let cell = |y: i32, a: i64| self.base.bucket(y, a.clamp(0, LAST_BUCKET));
        let low_age = lerp(cell(year, lower), cell(year + 1, lower), tfrac);
        let high_age = lerp(cell(year, lower + 1), cell(year + 1, lower + 1), tfrac);
        Ok(lerp(low_age, high_age, afrac) / DAYS_PER_YEAR)
    }

    /// Whole years come from the base model and the fractional ends are stepped by day. The
    /// two disagree slightly, so integrals only add up exactly when adjacent ranges meet on a
    /// year boundary; a split inside a year is off by a few parts in 100 000.
    fn integrate_age(&self, date: NaiveDate, age_from: Option<i64>, age_to: Option<i64>) -> Result<f64> {
        check_model_date(self.date_range(), date)?;
        let (from, to) = integrate::age_bounds(self.age_range(), age_from, age_to);
        integrate::split_by_years(self, date, from, to, |a, b| self.base_span(date, a, b))
    }
}

fn lerp(a: f64, b: f64, f: f64) -> f64 {
    a * (1.0 - f) + b * f
}
