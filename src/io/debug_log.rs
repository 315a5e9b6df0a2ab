use anyhow::Context;
use chrono::NaiveDate;

use crate::engine::RankPoint;
use crate::surface::Sex;

/// Write a rank path as `key=value` header lines, a blank line, then `date,age_days,rank` CSV.
pub fn write_rank_path_log(
    out_dir: impl AsRef<std::path::Path>,
    run_id: &str,
    region: &str,
    sex: Sex,
    dob: NaiveDate,
    points: &[RankPoint],
) -> anyhow::Result<std::path::PathBuf> {
    use std::io::Write;

    std::fs::create_dir_all(out_dir.as_ref()).context("create logs dir failed")?;
    let path = out_dir.as_ref().join(format!("rank_path_{}.txt", run_id));
    let mut f = std::fs::File::create(&path)
        .with_context(|| format!("create rank path log failed (path={:?})", path))?;

    writeln!(f, "run_id={}", run_id)?;
    writeln!(f, "region={}", region)?;
    writeln!(f, "sex={}", sex)?;
    writeln!(f, "dob={}", dob)?;
    writeln!(f, "points={}", points.len())?;
    writeln!(f)?;
    writeln!(f, "date,age_days,rank")?;

    let mut prev: Option<NaiveDate> = None;
    for p in points {
        anyhow::ensure!(prev.map_or(true, |d| d < p.date), "rank path dates not increasing at {}", p.date);
        writeln!(f, "{},{},{}", p.date, p.age_days, p.rank)?;
        prev = Some(p.date);
    }

    Ok(path)
}
