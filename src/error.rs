use chrono::NaiveDate;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PopRankError>;

/// Every failure the engine can report.
///
/// Input errors are the caller's fault and are never retried. `RankCalculationFailed` means
/// validation let something through that the numerics cannot handle. Unreachable search
/// targets are not errors at all: the inverse operations return `Ok(None)` for those.
#[derive(Debug, Error)]
pub enum PopRankError {
    #[error("invalid sex '{0}' (expected male, female or unisex)")]
    InvalidSex(String),

    #[error("unknown region '{0}'")]
    InvalidRegion(String),

    #[error("birthdate {0} is outside the supported range [1920-01-01, today]")]
    BirthdateOutOfRange(NaiveDate),

    #[error("calculation date {0} is before 1950-01-01 or before the birthdate")]
    CalculationDateOutOfRange(NaiveDate),

    #[error("calculation date {0} is more than 36500 days after the birthdate")]
    CalculationTooWide(NaiveDate),

    #[error("invalid target {0} (must be positive)")]
    InvalidTarget(i64),

    #[error("rank path step must be at least one year, got {0}")]
    InvalidStep(u32),

    #[error("query outside the supported surface: {0}")]
    RangeExceeded(String),

    #[error("rank calculation failed (rank={rank}, age_days={age_days})")]
    RankCalculationFailed { rank: f64, age_days: i64 },

    #[error(transparent)]
    Source(#[from] anyhow::Error),
}

impl PopRankError {
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            PopRankError::InvalidSex(_)
                | PopRankError::InvalidRegion(_)
                | PopRankError::BirthdateOutOfRange(_)
                | PopRankError::CalculationDateOutOfRange(_)
                | PopRankError::CalculationTooWide(_)
                | PopRankError::InvalidTarget(_)
                | PopRankError::InvalidStep(_)
                | PopRankError::RangeExceeded(_)
        )
    }
}
