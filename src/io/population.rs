use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::source::{WppRow, WppTable};

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Location")]
    location: String,
    #[serde(rename = "Time")]
    time: i32,
    #[serde(rename = "Age", alias = "AgeGrp")]
    age: String,
    #[serde(rename = "PopMale")]
    pop_male: f64,
    #[serde(rename = "PopFemale")]
    pop_female: f64,
    #[serde(rename = "PopTotal", default)]
    pop_total: Option<f64>,
}

/// Load a WPP single-age population CSV (values in thousands).
///
/// Needs the columns `Location, Time, Age (or AgeGrp), PopMale, PopFemale`; `PopTotal` is
/// optional and any other columns are ignored. Ages such as `100+` are read as 100.
pub fn load_wpp_csv(path: impl AsRef<Path>) -> anyhow::Result<WppTable> {
    let path = path.as_ref();
    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open population CSV: {}", path.display()))?;

    let mut rows = Vec::new();
    for (line, result) in rdr.deserialize::<CsvRow>().enumerate() {
        let row = result.with_context(|| format!("bad population row {} in {}", line + 1, path.display()))?;
        let age = parse_age(&row.age).with_context(|| format!("bad age '{}' on row {}", row.age, line + 1))?;
        rows.push(WppRow {
            location: row.location,
            year: row.time,
            age,
            pop_male: row.pop_male.max(0.0),
            pop_female: row.pop_female.max(0.0),
            pop_total: row.pop_total.map(|v| v.max(0.0)),
        });
    }
    anyhow::ensure!(!rows.is_empty(), "population CSV {} has no rows", path.display());

    let table = WppTable::from_rows(rows);
    tracing::info!(path = %path.display(), rows = table.len(), "loaded population table");
    Ok(table)
}

fn parse_age(s: &str) -> anyhow::Result<u32> {
    Ok(s.trim().trim_end_matches('+').parse()?)
}
