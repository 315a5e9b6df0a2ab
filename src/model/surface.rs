use std::sync::Arc;

use chrono::NaiveDate;

use super::{check_model_date, PopulationModel, Quantum};
use crate::dates::MAX_AGE_DAYS;
use crate::error::Result;
use crate::integrate;
use crate::rank::{CumulativeDistribution, RANK_SCALE};
use crate::surface::{ContinuousSurface, SURFACE_DAYS_PER_YEAR};

/// Day-resolution model read straight off a continuous surface.
///
/// Integrals build the date's cumulative distribution once instead of stepping every day.
#[derive(Clone)]
pub struct SurfaceModel {
    surface: Arc<dyn ContinuousSurface>,
}

impl SurfaceModel {
    pub fn new(surface: Arc<dyn ContinuousSurface>) -> Self {
        Self { surface }
    }
}

impl PopulationModel for SurfaceModel {
    fn age_quantum(&self) -> Quantum {
        Quantum::Day
    }

    fn date_quantum(&self) -> Quantum {
        Quantum::Day
    }

    fn age_range(&self) -> (i64, i64) {
        (0, MAX_AGE_DAYS + 1)
    }

    fn pop_age(&self, date: NaiveDate, age_days: i64) -> Result<f64> {
        check_model_date(self.date_range(), date)?;
        let (min_age, max_age) = self.age_range();
        if age_days < min_age || age_days >= max_age {
            return Ok(0.0);
        }
        let density = self.surface.population_at(age_days as f64, date)?;
        Ok(density * RANK_SCALE / SURFACE_DAYS_PER_YEAR)
    }

    fn integrate_age(&self, date: NaiveDate, age_from: Option<i64>, age_to: Option<i64>) -> Result<f64> {
        check_model_date(self.date_range(), date)?;
        let (from, to) = integrate::age_bounds(self.age_range(), age_from, age_to);
        if from >= to {
            return Ok(0.0);
        }
        let distribution = CumulativeDistribution::build(self.surface.as_ref(), date)?;
        Ok(distribution.between(from, to) * RANK_SCALE)
    }
}
