use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDate;

use super::grid::INTERPOLATED_AGE_BUCKETS;
use super::{check_date, check_point, node_ages, ContinuousSurface, PopulationSurface};
use crate::dates::{epoch_days, snapshot_epoch_days, MAX_AGE_DAYS};
use crate::error::Result;
use crate::math::spline::CubicSpline;

/// Two-pass spline surface.
///
/// One time spline per age bucket is fitted up front (this is the expensive part the cache
/// exists for). A query date evaluates every time spline, fits an age spline through the
/// resulting cross-section and evaluates that.
#[derive(Debug)]
pub struct SplineSurface {
    grid: Arc<PopulationSurface>,
    by_age: Vec<CubicSpline>,
    ages: Vec<f64>,
}

impl SplineSurface {
    pub fn fit(grid: Arc<PopulationSurface>) -> anyhow::Result<Self> {
        let times: Vec<f64> = grid.years().map(|y| snapshot_epoch_days(y) as f64).collect();
        let mut by_age = Vec::with_capacity(INTERPOLATED_AGE_BUCKETS);
        for age in 0..INTERPOLATED_AGE_BUCKETS {
            let series = grid
                .age_series(age)
                .with_context(|| format!("no series for age {}", age))?;
            let spline = CubicSpline::not_a_knot(&times, series)
                .with_context(|| format!("time spline failed for {} age {}", grid.key(), age))?;
            by_age.push(spline);
        }
        Ok(Self { grid, by_age, ages: node_ages(INTERPOLATED_AGE_BUCKETS) })
    }

    fn age_spline(&self, date: NaiveDate) -> Result<CubicSpline> {
        let t = epoch_days(date) as f64;
        let section: Vec<f64> = self.by_age.iter().map(|s| s.eval(t)).collect();
        let spline = CubicSpline::not_a_knot(&self.ages, &section)
            .with_context(|| format!("age spline failed for {} on {}", self.grid.key(), date))?;
        Ok(spline)
    }
}

impl ContinuousSurface for SplineSurface {
    fn grid(&self) -> &PopulationSurface {
        &self.grid
    }

    fn population_at(&self, age_days: f64, date: NaiveDate) -> Result<f64> {
        check_point(age_days, date)?;
        Ok(self.age_spline(date)?.eval(age_days).max(0.0))
    }

    fn daily_profile(&self, date: NaiveDate) -> Result<Vec<f64>> {
        check_date(date)?;
        let spline = self.age_spline(date)?;
        Ok((0..=MAX_AGE_DAYS).map(|age| spline.eval(age as f64).max(0.0)).collect())
    }
}
