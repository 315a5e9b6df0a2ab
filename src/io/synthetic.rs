use crate::source::{WppRow, WppTable};

/// Synthetic WPP table generator for testing.
///
/// This is NOT meant to be realistic, only to exercise the engine end to end without the
/// UN dataset. Every cell of 1950..=2100 x ages 0..=100 is filled, so surfaces always build.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticPyramid {
    /// Thousands per sex at age 0 in 1950.
    pub base: f64,
    /// Thousands lost per year of age.
    pub age_slope: f64,
    /// Compound growth per calendar year.
    pub annual_growth: f64,
}

impl SyntheticPyramid {
    /// Same population in every cell.
    pub fn flat(per_sex: f64) -> Self {
        Self { base: per_sex, age_slope: 0.0, annual_growth: 0.0 }
    }

    /// Per-sex population (thousands) for one cell, never negative.
    pub fn value(&self, year: i32, age: u32) -> f64 {
        let growth = (1.0 + self.annual_growth).powi(year - 1950);
        ((self.base - self.age_slope * age as f64) * growth).max(0.0)
    }

    pub fn rows(&self, region: &str) -> Vec<WppRow> {
        let mut out = Vec::with_capacity(151 * 101);
        for year in 1950..=2100 {
            for age in 0..=100 {
                let v = self.value(year, age);
                out.push(WppRow {
                    location: region.to_string(),
                    year,
                    age,
                    pop_male: v,
                    pop_female: v,
                    pop_total: Some(2.0 * v),
                });
            }
        }
        out
    }

    pub fn table(&self, regions: &[&str]) -> WppTable {
        WppTable::from_rows(regions.iter().flat_map(|r| self.rows(r)))
    }
}
