#![allow(dead_code)]

use chrono::NaiveDate;

use poprank::io::synthetic::SyntheticPyramid;
use poprank::{Interpolation, PopRank, WppTable};

/// Fixed "today" so birthdate validation does not depend on the clock.
pub const TODAY: NaiveDate = match NaiveDate::from_ymd_opt(2025, 1, 1) {
    Some(d) => d,
    None => panic!("bad date"),
};

/// Growing, age-declining pyramid.
pub const TESTLAND: SyntheticPyramid = SyntheticPyramid { base: 1000.0, age_slope: 5.0, annual_growth: 0.01 };

/// 0.4745 thousand per year of age (unisex), i.e. 1.3 persons per day of age.
pub const FLATLAND: SyntheticPyramid = SyntheticPyramid { base: 0.23725, age_slope: 0.0, annual_growth: 0.0 };

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

pub fn table() -> WppTable {
    let mut rows = TESTLAND.rows("Testland");
    rows.extend(FLATLAND.rows("Flatland"));
    WppTable::from_rows(rows)
}

pub fn engine(interpolation: Interpolation) -> PopRank<WppTable> {
    PopRank::new(table(), interpolation)
}
