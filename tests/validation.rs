mod common;

use common::{d, engine, TODAY};
use poprank::surface::Interpolation;
use poprank::PopRankError;

#[test]
fn each_bad_input_maps_to_its_own_error() {
    let engine = engine(Interpolation::Bilinear);
    let rank = |sex: &str, region: &str, dob, date| engine.rank_as_of(TODAY, sex, region, dob, date);

    let err = rank("other", "Testland", d(1990, 1, 1), d(2000, 1, 1)).unwrap_err();
    assert!(matches!(err, PopRankError::InvalidSex(ref s) if s == "other"), "{}", err);

    let err = rank("male", "Atlantis", d(1990, 1, 1), d(2000, 1, 1)).unwrap_err();
    assert!(matches!(err, PopRankError::InvalidRegion(ref r) if r == "Atlantis"), "{}", err);

    let err = rank("male", "Testland", d(1919, 12, 31), d(2000, 1, 1)).unwrap_err();
    assert!(matches!(err, PopRankError::BirthdateOutOfRange(_)), "{}", err);

    let err = rank("male", "Testland", d(2025, 1, 2), d(2030, 1, 1)).unwrap_err();
    assert!(matches!(err, PopRankError::BirthdateOutOfRange(_)), "{}", err);

    let err = rank("male", "Testland", d(1940, 1, 1), d(1949, 12, 31)).unwrap_err();
    assert!(matches!(err, PopRankError::CalculationDateOutOfRange(_)), "{}", err);

    let err = rank("male", "Testland", d(1990, 1, 1), d(1989, 12, 31)).unwrap_err();
    assert!(matches!(err, PopRankError::CalculationDateOutOfRange(_)), "{}", err);

    let err = rank("male", "Testland", d(1925, 1, 1), d(2030, 1, 1)).unwrap_err();
    assert!(matches!(err, PopRankError::CalculationTooWide(_)), "{}", err);

    let err = engine.date_for_rank_as_of(TODAY, "female", "Testland", d(1990, 1, 1), 0).unwrap_err();
    assert!(matches!(err, PopRankError::InvalidTarget(0)), "{}", err);

    for err in [
        rank("x", "Testland", d(1990, 1, 1), d(2000, 1, 1)).unwrap_err(),
        rank("male", "Testland", d(1925, 1, 1), d(2030, 1, 1)).unwrap_err(),
    ] {
        assert!(err.is_input_error());
    }
}

#[test]
fn sex_is_checked_before_region_and_region_before_dates() {
    let engine = engine(Interpolation::Bilinear);
    let err = engine.rank_as_of(TODAY, "robot", "Atlantis", d(1800, 1, 1), d(1700, 1, 1)).unwrap_err();
    assert!(matches!(err, PopRankError::InvalidSex(_)));
    let err = engine.rank_as_of(TODAY, "female", "Atlantis", d(1800, 1, 1), d(1700, 1, 1)).unwrap_err();
    assert!(matches!(err, PopRankError::InvalidRegion(_)));
    assert_eq!(engine.cache().built(), 0);
}

#[test]
fn last_supported_day_of_life() {
    let engine = engine(Interpolation::Spline);
    let dob = d(1950, 1, 1);
    let last = d(2049, 12, 7);
    assert_eq!((last - dob).num_days(), 36_500);
    assert!(engine.rank_as_of(TODAY, "male", "Testland", dob, last).is_ok());
    let err = engine.rank_as_of(TODAY, "male", "Testland", dob, d(2049, 12, 8)).unwrap_err();
    assert!(matches!(err, PopRankError::CalculationTooWide(_)));
}

#[test]
fn rank_path_checks_birthdate_and_step() {
    let engine = engine(Interpolation::Bilinear);
    let err = engine.rank_path_as_of(TODAY, "male", "Testland", d(1800, 1, 1), 1).unwrap_err();
    assert!(matches!(err, PopRankError::BirthdateOutOfRange(_)), "{}", err);

    let err = engine.rank_path_as_of(TODAY, "male", "Testland", d(2025, 6, 1), 1).unwrap_err();
    assert!(matches!(err, PopRankError::BirthdateOutOfRange(_)), "{}", err);

    let err = engine.rank_path_as_of(TODAY, "male", "Testland", d(1990, 1, 1), 0).unwrap_err();
    assert!(matches!(err, PopRankError::InvalidStep(0)), "{}", err);
    assert!(err.is_input_error());

    assert!(!engine.rank_path_as_of(TODAY, "male", "Testland", d(1920, 1, 1), 1).unwrap().is_empty());
    assert_eq!(engine.cache().built(), 1);
}
