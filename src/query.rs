//! Validated forward and inverse rank queries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates::{days_between, DATA_START, EARLIEST_BIRTHDATE, MAX_AGE_DAYS};
use crate::error::{PopRankError, Result};
use crate::surface::Sex;

/// (sex, region, dob, date) -> rank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankQuery {
    pub sex: Sex,
    pub region: String,
    pub dob: NaiveDate,
    pub date: NaiveDate,
}

impl RankQuery {
    pub fn parse(sex: &str, region: &str, dob: NaiveDate, date: NaiveDate) -> Result<Self> {
        Ok(Self { sex: sex.parse()?, region: region.to_string(), dob, date })
    }

    /// Date checks, in the order they are reported. Region membership is the engine's job.
    pub fn validate(&self, today: NaiveDate) -> Result<()> {
        check_birthdate(self.dob, today)?;
        if self.date < DATA_START || self.date < self.dob {
            return Err(PopRankError::CalculationDateOutOfRange(self.date));
        }
        if days_between(self.dob, self.date) > MAX_AGE_DAYS {
            return Err(PopRankError::CalculationTooWide(self.date));
        }
        Ok(())
    }
}

/// (sex, region, dob, target rank) -> date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InverseQuery {
    pub sex: Sex,
    pub region: String,
    pub dob: NaiveDate,
    pub target: i64,
}

impl InverseQuery {
    pub fn parse(sex: &str, region: &str, dob: NaiveDate, target: i64) -> Result<Self> {
        Ok(Self { sex: sex.parse()?, region: region.to_string(), dob, target })
    }

    pub fn validate(&self, today: NaiveDate) -> Result<()> {
        check_birthdate(self.dob, today)?;
        if self.target <= 0 {
            return Err(PopRankError::InvalidTarget(self.target));
        }
        Ok(())
    }
}

pub(crate) fn check_birthdate(dob: NaiveDate, today: NaiveDate) -> Result<()> {
    if dob < EARLIEST_BIRTHDATE || dob > today {
        return Err(PopRankError::BirthdateOutOfRange(dob));
    }
    Ok(())
}
