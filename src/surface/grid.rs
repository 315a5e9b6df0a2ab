use std::ops::RangeInclusive;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use super::SurfaceKey;
use crate::dates::{FIRST_YEAR, LAST_YEAR};

/// Single-year age buckets 0..=100; bucket 100 is the open-ended "100+" group.
pub const AGE_BUCKETS: usize = 101;
/// Buckets that take part in interpolation (the open 100+ bucket does not).
pub const INTERPOLATED_AGE_BUCKETS: usize = 100;
pub const YEAR_BUCKETS: usize = (LAST_YEAR - FIRST_YEAR + 1) as usize;

/// One raw cell of an annual single-age table. `population` is in thousands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnualRecord {
    pub year: i32,
    pub age: u32,
    pub population: f64,
}

/// Dense annual population grid for one (region, sex).
///
/// Stored age-major so each age's time series is one contiguous slice.
#[derive(Debug, Clone)]
pub struct PopulationSurface {
    key: SurfaceKey,
    values: Vec<f64>,
}

impl PopulationSurface {
    /// Build the grid from raw records. Years outside 1950..=2100 and ages above 100 are
    /// ignored; every remaining cell must be present exactly once.
    pub fn from_records(key: SurfaceKey, records: &[AnnualRecord]) -> anyhow::Result<Self> {
        let mut values = vec![f64::NAN; AGE_BUCKETS * YEAR_BUCKETS];
        for r in records {
            if !(FIRST_YEAR..=LAST_YEAR).contains(&r.year) || r.age as usize >= AGE_BUCKETS {
                continue;
            }
            anyhow::ensure!(
                r.population.is_finite() && r.population >= 0.0,
                "invalid population {} for {} year={} age={}",
                r.population,
                key,
                r.year,
                r.age
            );
            let idx = index(r.year, r.age as usize);
            anyhow::ensure!(values[idx].is_nan(), "duplicate cell for {} year={} age={}", key, r.year, r.age);
            values[idx] = r.population;
        }

        if let Some(idx) = values.iter().position(|v| v.is_nan()) {
            let age = idx / YEAR_BUCKETS;
            let year = FIRST_YEAR + (idx % YEAR_BUCKETS) as i32;
            return Err(anyhow::anyhow!("missing cell year={} age={}", year, age))
                .with_context(|| format!("incomplete population table for {}", key));
        }

        Ok(Self { key, values })
    }

    pub fn key(&self) -> &SurfaceKey {
        &self.key
    }

    pub fn years(&self) -> RangeInclusive<i32> {
        FIRST_YEAR..=LAST_YEAR
    }

    pub fn value(&self, year: i32, age: u32) -> Option<f64> {
        if !(FIRST_YEAR..=LAST_YEAR).contains(&year) || age as usize >= AGE_BUCKETS {
            return None;
        }
        Some(self.values[index(year, age as usize)])
    }

    /// Value by grid position, both axes clamped to the grid.
    pub(crate) fn at(&self, year_idx: usize, age: usize) -> f64 {
        let year_idx = year_idx.min(YEAR_BUCKETS - 1);
        let age = age.min(AGE_BUCKETS - 1);
        self.values[age * YEAR_BUCKETS + year_idx]
    }

    /// The 1950..=2100 series for one age bucket.
    pub fn age_series(&self, age: usize) -> Option<&[f64]> {
        if age >= AGE_BUCKETS {
            return None;
        }
        let start = age * YEAR_BUCKETS;
        Some(&self.values[start..start + YEAR_BUCKETS])
    }

    /// Sum over all buckets (including 100+) for one year.
    pub fn total(&self, year: i32) -> Option<f64> {
        if !(FIRST_YEAR..=LAST_YEAR).contains(&year) {
            return None;
        }
        Some((0..AGE_BUCKETS).map(|age| self.values[index(year, age)]).sum())
    }
}

fn index(year: i32, age: usize) -> usize {
    age * YEAR_BUCKETS + (year - FIRST_YEAR) as usize
}
