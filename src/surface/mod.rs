//! Population surfaces: the discrete annual grid and its continuous age x date views.
//!
//! Grid nodes sit at each bucket's representative instant: July 1 of the snapshot year, and
//! `bucket * 365 + 183` days of age. Both interpolation strategies reproduce the grid exactly
//! at those nodes and never return negative densities.

pub mod bilinear;
pub mod cache;
pub mod grid;
pub mod spline;

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates::{DATA_END, DATA_START, MAX_AGE_DAYS};
use crate::error::{PopRankError, Result};

pub use bilinear::BilinearSurface;
pub use cache::{CachedSurface, SurfaceCache};
pub use grid::{AnnualRecord, PopulationSurface};
pub use spline::SplineSurface;

/// Length of one year on the surfaces' age axis.
pub const SURFACE_DAYS_PER_YEAR: f64 = 365.0;
const NODE_AGE_STRIDE_DAYS: i64 = 365;
const NODE_AGE_OFFSET_DAYS: i64 = 183;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
    Unisex,
}

impl Sex {
    pub const ALL: [Sex; 3] = [Sex::Male, Sex::Female, Sex::Unisex];

    pub fn as_str(self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
            Sex::Unisex => "unisex",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sex {
    type Err = PopRankError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "male" => Ok(Sex::Male),
            "female" => Ok(Sex::Female),
            "unisex" => Ok(Sex::Unisex),
            other => Err(PopRankError::InvalidSex(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceKey {
    pub region: String,
    pub sex: Sex,
}

impl SurfaceKey {
    pub fn new(region: impl Into<String>, sex: Sex) -> Self {
        Self { region: region.into(), sex }
    }
}

impl fmt::Display for SurfaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.region, self.sex)
    }
}

/// Which continuous view the cache builds on top of each grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    #[default]
    Spline,
    Bilinear,
}

impl FromStr for Interpolation {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "spline" => Ok(Interpolation::Spline),
            "bilinear" => Ok(Interpolation::Bilinear),
            other => anyhow::bail!("unknown interpolation '{}' (expected spline or bilinear)", other),
        }
    }
}

/// Continuous population density over (age, date) for one (region, sex).
pub trait ContinuousSurface: Send + Sync {
    fn grid(&self) -> &PopulationSurface;

    /// Density at `age_days` on `date`, in bucket units (thousands per year of age).
    fn population_at(&self, age_days: f64, date: NaiveDate) -> Result<f64>;

    /// Density at every whole day of age `0..=MAX_AGE_DAYS` on `date`.
    fn daily_profile(&self, date: NaiveDate) -> Result<Vec<f64>> {
        check_date(date)?;
        (0..=MAX_AGE_DAYS).map(|age| self.population_at(age as f64, date)).collect()
    }
}

/// Age (days) at which bucket `bucket` is represented.
pub fn node_age_days(bucket: usize) -> f64 {
    (bucket as i64 * NODE_AGE_STRIDE_DAYS + NODE_AGE_OFFSET_DAYS) as f64
}

pub(crate) fn node_ages(buckets: usize) -> Vec<f64> {
    (0..buckets).map(node_age_days).collect()
}

pub(crate) fn check_date(date: NaiveDate) -> Result<()> {
    if date < DATA_START || date > DATA_END {
        return Err(PopRankError::RangeExceeded(format!(
            "date {} outside [{}, {}]",
            date, DATA_START, DATA_END
        )));
    }
    Ok(())
}

pub(crate) fn check_point(age_days: f64, date: NaiveDate) -> Result<()> {
    if !(0.0..=MAX_AGE_DAYS as f64).contains(&age_days) {
        return Err(PopRankError::RangeExceeded(format!(
            "age {} days outside [0, {}]",
            age_days, MAX_AGE_DAYS
        )));
    }
    check_date(date)
}
