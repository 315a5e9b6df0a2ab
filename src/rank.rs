//! Cumulative population by age and the rank derived from it.

use chrono::NaiveDate;

use crate::dates::days_between;
use crate::error::{PopRankError, Result};
use crate::surface::{ContinuousSurface, SURFACE_DAYS_PER_YEAR};

/// Ranks are reported in persons: the cumulative sum is in thousands.
pub const RANK_SCALE: f64 = 1000.0;

/// Running total of the population by whole day of age (0..=36500) on one date.
///
/// Index `a` holds everyone aged at most `a` days, in thousands. Non-decreasing because the
/// surfaces never return negative densities.
#[derive(Debug, Clone)]
pub struct CumulativeDistribution {
    date: NaiveDate,
    cumulative: Vec<f64>,
}

impl CumulativeDistribution {
    pub fn build(surface: &dyn ContinuousSurface, date: NaiveDate) -> Result<Self> {
        let profile = surface.daily_profile(date)?;
        let mut running = 0.0;
        let cumulative = profile
            .into_iter()
            .map(|density| {
                running += density / SURFACE_DAYS_PER_YEAR;
                running
            })
            .collect();
        Ok(Self { date, cumulative })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn len(&self) -> usize {
        self.cumulative.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cumulative.is_empty()
    }

    /// `(age_days, cumulative)` pairs in age order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, f64)> + '_ {
        self.cumulative.iter().enumerate().map(|(age, c)| (age as i64, *c))
    }

    pub fn cumulative_at(&self, age_days: i64) -> Option<f64> {
        usize::try_from(age_days).ok().and_then(|a| self.cumulative.get(a)).copied()
    }

    pub fn total(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Population aged within `[from, to)` days, clamped to the distribution.
    pub fn between(&self, from: i64, to: i64) -> f64 {
        let len = self.cumulative.len() as i64;
        let (from, to) = (from.clamp(0, len), to.clamp(0, len));
        if from >= to {
            return 0.0;
        }
        let below = |end: i64| if end == 0 { 0.0 } else { self.cumulative[(end - 1) as usize] };
        below(to) - below(from)
    }

    /// Rank (thousands) of someone `age_days` old: the mean of the cumulative sum over the
    /// whole-day ages in `[age_days - 1, age_days]`.
    pub fn rank_at(&self, age_days: i64) -> Result<f64> {
        let window: Vec<f64> = ((age_days - 1)..=age_days)
            .filter_map(|a| self.cumulative_at(a))
            .collect();
        let rank = if window.is_empty() {
            f64::NAN
        } else {
            window.iter().sum::<f64>() / window.len() as f64
        };
        if !(rank > 0.0) || !rank.is_finite() {
            return Err(PopRankError::RankCalculationFailed { rank, age_days });
        }
        Ok(rank)
    }
}

/// Unscaled rank (thousands) of someone born on `dob`, evaluated on `date`.
pub fn rank_value(surface: &dyn ContinuousSurface, dob: NaiveDate, date: NaiveDate) -> Result<f64> {
    CumulativeDistribution::build(surface, date)?.rank_at(days_between(dob, date))
}

/// Persons, truncated.
pub fn scale_rank(rank: f64) -> i64 {
    (rank * RANK_SCALE) as i64
}
