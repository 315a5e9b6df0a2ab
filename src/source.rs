//! Raw annual population tables, as the engine consumes them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::surface::{AnnualRecord, Sex};

/// Where raw annual single-age tables come from.
pub trait PopulationSource: Send + Sync {
    fn regions(&self) -> Vec<String>;

    fn has_region(&self, region: &str) -> bool {
        self.regions().iter().any(|r| r == region)
    }

    /// Every (year, age) cell for one region and sex, in thousands.
    fn annual_table(&self, region: &str, sex: Sex) -> anyhow::Result<Vec<AnnualRecord>>;

    /// Raw counts for one age, optionally restricted to a single year, in year order.
    fn population_counts(&self, region: &str, age: u32, year: Option<i32>) -> anyhow::Result<Vec<PopulationCount>>;
}

/// One row of a UN World Population Prospects single-age table (thousands).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WppRow {
    pub location: String,
    pub year: i32,
    pub age: u32,
    pub pop_male: f64,
    pub pop_female: f64,
    pub pop_total: Option<f64>,
}

impl WppRow {
    pub fn population(&self, sex: Sex) -> f64 {
        match sex {
            Sex::Male => self.pop_male,
            Sex::Female => self.pop_female,
            Sex::Unisex => self.total(),
        }
    }

    /// The table's own total when it has one, else male + female.
    pub fn total(&self) -> f64 {
        self.pop_total.unwrap_or(self.pop_male + self.pop_female)
    }
}

/// Persons (not thousands) for one year and age.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationCount {
    pub year: i32,
    pub male: i64,
    pub female: i64,
    pub total: i64,
}

/// In-memory WPP table grouped by region.
#[derive(Debug, Clone, Default)]
pub struct WppTable {
    by_region: BTreeMap<String, Vec<WppRow>>,
}

impl WppTable {
    pub fn from_rows(rows: impl IntoIterator<Item = WppRow>) -> Self {
        let mut by_region: BTreeMap<String, Vec<WppRow>> = BTreeMap::new();
        for row in rows {
            by_region.entry(row.location.clone()).or_default().push(row);
        }
        for rows in by_region.values_mut() {
            rows.sort_by_key(|r| (r.year, r.age));
        }
        Self { by_region }
    }

    pub fn len(&self) -> usize {
        self.by_region.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_region.is_empty()
    }

    pub fn rows(&self, region: &str) -> Option<&[WppRow]> {
        self.by_region.get(region).map(Vec::as_slice)
    }
}

impl PopulationSource for WppTable {
    fn regions(&self) -> Vec<String> {
        self.by_region.keys().cloned().collect()
    }

    fn has_region(&self, region: &str) -> bool {
        self.by_region.contains_key(region)
    }

    fn annual_table(&self, region: &str, sex: Sex) -> anyhow::Result<Vec<AnnualRecord>> {
        let rows = self
            .rows(region)
            .ok_or_else(|| anyhow::anyhow!("no population rows for region '{}'", region))?;
        Ok(rows
            .iter()
            .map(|r| AnnualRecord { year: r.year, age: r.age, population: r.population(sex) })
            .collect())
    }

    fn population_counts(&self, region: &str, age: u32, year: Option<i32>) -> anyhow::Result<Vec<PopulationCount>> {
        let rows = self
            .rows(region)
            .ok_or_else(|| anyhow::anyhow!("no population rows for region '{}'", region))?;
        Ok(rows
            .iter()
            .filter(|r| r.age == age && year.map_or(true, |y| r.year == y))
            .map(|r| PopulationCount {
                year: r.year,
                male: persons(r.pop_male),
                female: persons(r.pop_female),
                total: persons(r.total()),
            })
            .collect())
    }
}

fn persons(thousands: f64) -> i64 {
    (thousands * 1000.0).round() as i64
}
