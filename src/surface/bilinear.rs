use std::sync::Arc;

use chrono::NaiveDate;

use super::grid::INTERPOLATED_AGE_BUCKETS;
use super::{check_point, node_ages, ContinuousSurface, PopulationSurface};
use crate::dates::{epoch_days, snapshot_epoch_days};
use crate::error::Result;

/// Bilinear interpolation over the four grid nodes around (age, date).
///
/// Past the outermost nodes the edge cell is extended linearly and the result clamped at 0.
#[derive(Debug)]
pub struct BilinearSurface {
    grid: Arc<PopulationSurface>,
    times: Vec<f64>,
    ages: Vec<f64>,
}

impl BilinearSurface {
    pub fn new(grid: Arc<PopulationSurface>) -> Self {
        let times = grid.years().map(|y| snapshot_epoch_days(y) as f64).collect();
        Self { grid, times, ages: node_ages(INTERPOLATED_AGE_BUCKETS) }
    }
}

impl ContinuousSurface for BilinearSurface {
    fn grid(&self) -> &PopulationSurface {
        &self.grid
    }

    fn population_at(&self, age_days: f64, date: NaiveDate) -> Result<f64> {
        check_point(age_days, date)?;
        let (j, tf) = locate(&self.times, epoch_days(date) as f64);
        let (i, af) = locate(&self.ages, age_days);
        let z = |age: usize, year: usize| self.grid.at(year, age);

        let low_age = lerp(z(i, j), z(i, j + 1), tf);
        let high_age = lerp(z(i + 1, j), z(i + 1, j + 1), tf);
        Ok(lerp(low_age, high_age, af).max(0.0))
    }
}

/// Segment `k` with `vs[k] <= v < vs[k+1]` (clamped to the end segments) and the
/// unclamped fractional position of `v` within it.
fn locate(vs: &[f64], v: f64) -> (usize, f64) {
    let n = vs.len();
    let k = vs.partition_point(|x| *x <= v).clamp(1, n - 1) - 1;
    (k, (v - vs[k]) / (vs[k + 1] - vs[k]))
}

// Exact at both ends: f == 0 gives a, f == 1 gives b.
fn lerp(a: f64, b: f64, f: f64) -> f64 {
    a * (1.0 - f) + b * f
}
