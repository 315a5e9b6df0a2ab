use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::Serialize;

use crate::dates::{add_years, days_between, DATA_END, DATA_START, MAX_AGE_DAYS};
use crate::error::{PopRankError, Result};
use crate::model::{AnnualModel, DailyModel, ModelKind, PopulationModel, SurfaceModel};
use crate::query::{check_birthdate, InverseQuery, RankQuery};
use crate::rank::{rank_value, scale_rank, CumulativeDistribution, RANK_SCALE};
use crate::solve::{self, RankDate};
use crate::source::{PopulationCount, PopulationSource};
use crate::surface::{CachedSurface, Interpolation, Sex, SurfaceCache, SurfaceKey};

/// One point of a rank path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RankPoint {
    pub date: NaiveDate,
    pub age_days: i64,
    pub rank: i64,
}

/// Entry point: a population source plus the surfaces built from it.
pub struct PopRank<S> {
    source: S,
    cache: SurfaceCache,
}

impl<S: PopulationSource> PopRank<S> {
    pub fn new(source: S, interpolation: Interpolation) -> Self {
        Self { source, cache: SurfaceCache::new(interpolation) }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn cache(&self) -> &SurfaceCache {
        &self.cache
    }

    pub fn regions(&self) -> Vec<String> {
        self.source.regions()
    }

    /// The cached surface for (region, sex), built on first use.
    pub fn surface(&self, region: &str, sex: Sex) -> Result<Arc<CachedSurface>> {
        self.check_region(region)?;
        let key = SurfaceKey::new(region, sex);
        self.cache.get_or_build(&key, || self.source.annual_table(region, sex))
    }

    /// Interpolated population density (thousands per year of age) at an arbitrary point.
    pub fn population_at(&self, region: &str, sex: Sex, age_days: f64, date: NaiveDate) -> Result<f64> {
        self.surface(region, sex)?.continuous.population_at(age_days, date)
    }

    pub fn distribution(&self, region: &str, sex: Sex, date: NaiveDate) -> Result<CumulativeDistribution> {
        CumulativeDistribution::build(self.surface(region, sex)?.continuous.as_ref(), date)
    }

    /// Number of people in `region` younger than someone born on `dob`, on `date`.
    pub fn rank(&self, sex: &str, region: &str, dob: NaiveDate, date: NaiveDate) -> Result<i64> {
        self.rank_as_of(today(), sex, region, dob, date)
    }

    /// [`rank`](Self::rank) with an explicit "today" for the birthdate check.
    pub fn rank_as_of(&self, today: NaiveDate, sex: &str, region: &str, dob: NaiveDate, date: NaiveDate) -> Result<i64> {
        let query = RankQuery::parse(sex, region, dob, date)?;
        self.check_region(&query.region)?;
        query.validate(today)?;

        let surface = self.surface(&query.region, query.sex)?;
        let rank = rank_value(surface.continuous.as_ref(), query.dob, query.date)?;
        Ok(scale_rank(rank))
    }

    /// When someone born on `dob` reaches `target_rank`; `None` if not within the data.
    pub fn date_for_rank(&self, sex: &str, region: &str, dob: NaiveDate, target_rank: i64) -> Result<Option<RankDate>> {
        self.date_for_rank_as_of(today(), sex, region, dob, target_rank)
    }

    pub fn date_for_rank_as_of(
        &self,
        today: NaiveDate,
        sex: &str,
        region: &str,
        dob: NaiveDate,
        target_rank: i64,
    ) -> Result<Option<RankDate>> {
        let query = InverseQuery::parse(sex, region, dob, target_rank)?;
        self.check_region(&query.region)?;
        query.validate(today)?;

        let surface = self.surface(&query.region, query.sex)?;
        solve::date_for_rank(surface.continuous.as_ref(), query.dob, query.target as f64 / RANK_SCALE)
    }

    /// Ranks every `step_years` from birth (or from 1950 for earlier births) while the data
    /// and the 100-year age limit allow.
    pub fn rank_path(&self, sex: &str, region: &str, dob: NaiveDate, step_years: u32) -> Result<Vec<RankPoint>> {
        self.rank_path_as_of(today(), sex, region, dob, step_years)
    }

    pub fn rank_path_as_of(
        &self,
        today: NaiveDate,
        sex: &str,
        region: &str,
        dob: NaiveDate,
        step_years: u32,
    ) -> Result<Vec<RankPoint>> {
        let query = RankQuery::parse(sex, region, dob, dob)?;
        self.check_region(&query.region)?;
        check_birthdate(query.dob, today)?;
        if step_years == 0 {
            return Err(PopRankError::InvalidStep(step_years));
        }
        let surface = self.surface(&query.region, query.sex)?;

        let mut points = Vec::new();
        let mut years = 0;
        while let Some(date) = add_years(dob, years) {
            let age_days = days_between(dob, date);
            if date > DATA_END || age_days > MAX_AGE_DAYS {
                break;
            }
            if date >= DATA_START {
                let rank = scale_rank(rank_value(surface.continuous.as_ref(), dob, date)?);
                points.push(RankPoint { date, age_days, rank });
            }
            years += step_years;
        }
        Ok(points)
    }

    pub fn annual_model(&self, region: &str, sex: Sex) -> Result<AnnualModel> {
        Ok(AnnualModel::new(Arc::clone(&self.surface(region, sex)?.grid)))
    }

    pub fn daily_model(&self, region: &str, sex: Sex) -> Result<DailyModel> {
        Ok(DailyModel::new(self.annual_model(region, sex)?))
    }

    pub fn surface_model(&self, region: &str, sex: Sex) -> Result<SurfaceModel> {
        Ok(SurfaceModel::new(Arc::clone(&self.surface(region, sex)?.continuous)))
    }

    pub fn model(&self, region: &str, sex: Sex, kind: ModelKind) -> Result<Box<dyn PopulationModel>> {
        Ok(match kind {
            ModelKind::Annual => Box::new(self.annual_model(region, sex)?),
            ModelKind::Daily => Box::new(self.daily_model(region, sex)?),
            ModelKind::Surface => Box::new(self.surface_model(region, sex)?),
        })
    }

    /// When the population born on or after `dob_from` reaches `target` persons.
    pub fn date_for_cohort_count(
        &self,
        region: &str,
        sex: Sex,
        kind: ModelKind,
        dob_from: NaiveDate,
        target: f64,
    ) -> Result<Option<NaiveDate>> {
        if !(target > 0.0) {
            return Err(PopRankError::InvalidTarget(target as i64));
        }
        let model = self.model(region, sex, kind)?;
        solve::date_for_cohort_count(model.as_ref(), dob_from, target)
    }

    /// Raw male/female/total counts for one age, straight from the source.
    pub fn population_count(&self, region: &str, age: u32, year: Option<i32>) -> Result<Vec<PopulationCount>> {
        self.check_region(region)?;
        Ok(self.source.population_counts(region, age, year)?)
    }

    fn check_region(&self, region: &str) -> Result<()> {
        if !self.source.has_region(region) {
            return Err(PopRankError::InvalidRegion(region.to_string()));
        }
        Ok(())
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}
