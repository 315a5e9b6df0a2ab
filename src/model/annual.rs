use std::sync::Arc;

use chrono::{Datelike, NaiveDate};

use super::{check_model_date, PopulationModel, Quantum};
use crate::dates::{age_from_years, whole_years, FIRST_YEAR, LAST_YEAR};
use crate::error::Result;
use crate::surface::grid::AGE_BUCKETS;
use crate::surface::PopulationSurface;

/// The grid as-is: a date means its calendar year's mid-year snapshot and an age means its
/// completed-years bucket. Counts are persons.
#[derive(Debug, Clone)]
pub struct AnnualModel {
    surface: Arc<PopulationSurface>,
}

impl AnnualModel {
    pub fn new(surface: Arc<PopulationSurface>) -> Self {
        Self { surface }
    }

    pub fn surface(&self) -> &PopulationSurface {
        &self.surface
    }

    /// Persons in bucket `age_years` of the `year` snapshot, both axes clamped to the grid.
    pub fn bucket(&self, year: i32, age_years: i64) -> f64 {
        let year_idx = (year.clamp(FIRST_YEAR, LAST_YEAR) - FIRST_YEAR) as usize;
        let age = age_years.clamp(0, AGE_BUCKETS as i64 - 1) as usize;
        persons(self.surface.at(year_idx, age))
    }
}

impl PopulationModel for AnnualModel {
    fn age_quantum(&self) -> Quantum {
        Quantum::Year
    }

    fn date_quantum(&self) -> Quantum {
        Quantum::Year
    }

    fn age_range(&self) -> (i64, i64) {
        (0, age_from_years(AGE_BUCKETS as i64))
    }

    fn pop_age(&self, date: NaiveDate, age_days: i64) -> Result<f64> {
        check_model_date(self.date_range(), date)?;
        let years = whole_years(age_days);
        if years < 0 || years >= AGE_BUCKETS as i64 {
            return Ok(0.0);
        }
        Ok(self.bucket(date.year(), years))
    }
}

fn persons(thousands: f64) -> f64 {
    (thousands * 1000.0).round()
}
