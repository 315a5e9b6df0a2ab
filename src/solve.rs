//! Inverse searches: the date a rank is reached, and the date a cohort reaches a count.
//!
//! Both keep an explicit bracket whose lower end is below the target and whose upper end is
//! at or above it, and both have a hard bound on the number of evaluations. Running out of
//! supported dates before the target is met is an ordinary answer (`Ok(None)`), not an
//! error.

use chrono::NaiveDate;
use serde::Serialize;

use crate::dates::{add_days, add_years, days_between, DATA_END, DATA_START, MAX_AGE_DAYS};
use crate::error::Result;
use crate::model::PopulationModel;
use crate::rank::{rank_value, scale_rank, RANK_SCALE};
use crate::surface::ContinuousSurface;

const DECADE_DAYS: i64 = 3650;
const MAX_DECADES: i64 = MAX_AGE_DAYS / DECADE_DAYS;
const MAX_BISECTIONS: u32 = 64;

/// Date a rank is reached, with the fractional age (days) it was interpolated from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankDate {
    pub date: NaiveDate,
    pub exact_age_days: f64,
}

#[derive(Debug, Clone, Copy)]
struct Probe {
    date: NaiveDate,
    rank: f64,
}

/// `lo.rank < target <= hi.rank`, `lo.date < hi.date`.
#[derive(Debug, Clone, Copy)]
struct Bracket {
    lo: Probe,
    hi: Probe,
}

/// Find when someone born on `dob` reaches `target` (unscaled, thousands).
///
/// Decades from birth bracket the target, birthday anniversaries narrow it to a year, and
/// the rank is taken as linear in age within that year.
pub fn date_for_rank(surface: &dyn ContinuousSurface, dob: NaiveDate, target: f64) -> Result<Option<RankDate>> {
    let probe = |date: NaiveDate| -> Result<Probe> { Ok(Probe { date, rank: rank_value(surface, dob, date)? }) };

    let start_date = dob.max(DATA_START);
    if start_date > DATA_END || days_between(dob, start_date) > MAX_AGE_DAYS {
        return Ok(None);
    }
    let start = probe(start_date)?;
    if start.rank >= target {
        // Reached at birth, or already before the data begins.
        if start_date == dob {
            return Ok(Some(RankDate { date: dob, exact_age_days: 0.0 }));
        }
        // Ranks are reported truncated, so a target equal to the first reported rank is
        // reached that day.
        if scale_rank(start.rank) <= (target * RANK_SCALE).round() as i64 {
            let exact_age_days = days_between(dob, start_date) as f64;
            return Ok(Some(RankDate { date: start_date, exact_age_days }));
        }
        tracing::debug!(%dob, target_rank = target, "target already passed when data begins");
        return Ok(None);
    }

    let Some(bracket) = decade_bracket(&probe, dob, start, target)? else {
        tracing::debug!(%dob, target_rank = target, "target not reached within the supported span");
        return Ok(None);
    };
    tracing::debug!(lo = %bracket.lo.date, hi = %bracket.hi.date, "decade bracket");

    let bracket = year_bracket(&probe, dob, bracket, target)?;
    tracing::debug!(lo = %bracket.lo.date, hi = %bracket.hi.date, "year bracket");

    Ok(Some(interpolate(dob, &bracket, target)))
}

fn decade_bracket<P>(probe: &P, dob: NaiveDate, start: Probe, target: f64) -> Result<Option<Bracket>>
where
    P: Fn(NaiveDate) -> Result<Probe>,
{
    // Last date the search may look at: the end of the data or the age limit.
    let last = add_days(dob, MAX_AGE_DAYS).map_or(DATA_END, |d| d.min(DATA_END));
    let mut lo = start;
    for decade in 1..=MAX_DECADES {
        let date = add_days(dob, decade * DECADE_DAYS).map_or(last, |d| d.min(last));
        if date > lo.date {
            let p = probe(date)?;
            if p.rank >= target {
                return Ok(Some(Bracket { lo, hi: p }));
            }
            lo = p;
        }
        if date == last {
            break;
        }
    }
    Ok(None)
}

fn year_bracket<P>(probe: &P, dob: NaiveDate, mut bracket: Bracket, target: f64) -> Result<Bracket>
where
    P: Fn(NaiveDate) -> Result<Probe>,
{
    let mut years = bracket.lo.date.years_since(dob).unwrap_or(0) + 1;
    while let Some(date) = add_years(dob, years) {
        if date >= bracket.hi.date {
            break;
        }
        let p = probe(date)?;
        if p.rank >= target {
            bracket.hi = p;
            break;
        }
        bracket.lo = p;
        years += 1;
    }
    Ok(bracket)
}

fn interpolate(dob: NaiveDate, bracket: &Bracket, target: f64) -> RankDate {
    let (lo, hi) = (bracket.lo, bracket.hi);
    let age_lo = days_between(dob, lo.date) as f64;
    let age_hi = days_between(dob, hi.date) as f64;
    let exact = (age_lo + (target - lo.rank) * (age_hi - age_lo) / (hi.rank - lo.rank)).clamp(age_lo, age_hi);
    let date = add_days(dob, exact.floor() as i64).unwrap_or(hi.date);
    RankDate { date, exact_age_days: exact }
}

/// Find when the population born on or after `dob_from` first reaches `target` persons.
///
/// Bisects the model's date range. Returns the last date probed below the target, which is
/// within one date quantum of the crossing.
pub fn date_for_cohort_count<M>(model: &M, dob_from: NaiveDate, target: f64) -> Result<Option<NaiveDate>>
where
    M: PopulationModel + ?Sized,
{
    let (range_start, range_end) = model.date_range();
    let mut lower = dob_from.max(range_start);
    let mut upper = range_end;
    if lower > upper {
        return Ok(None);
    }

    let count = |date: NaiveDate| model.integrate_dob(date, Some(dob_from), None);
    if count(upper)? < target {
        return Ok(None);
    }
    if count(lower)? >= target {
        return Ok(Some(lower));
    }

    let quantum = model.date_quantum();
    for _ in 0..MAX_BISECTIONS {
        if quantum.spans_at_most_one(lower, upper) {
            return Ok(Some(lower));
        }
        let Some(mid) = add_days(lower, days_between(lower, upper) / 2) else { break };
        if count(mid)? < target {
            lower = mid;
        } else {
            upper = mid;
        }
    }
    tracing::warn!(%lower, %upper, "cohort search stopped at the bisection limit");
    Ok(Some(lower))
}
