mod common;

use approx::assert_relative_eq;

use common::{d, engine, TODAY};
use poprank::dates::{add_days, MAX_AGE_DAYS};
use poprank::io::debug_log::write_rank_path_log;
use poprank::surface::{Interpolation, Sex};

#[test]
fn rank_grows_with_the_calculation_date() {
    for interpolation in [Interpolation::Spline, Interpolation::Bilinear] {
        let engine = engine(interpolation);
        let dob = d(1962, 8, 9);
        let mut prev = 0;
        for year in 1963..=2060 {
            let rank = engine.rank_as_of(TODAY, "male", "Testland", dob, d(year, 2, 1)).unwrap();
            assert!(rank >= prev, "{} dropped from {} to {}", year, prev, rank);
            prev = rank;
        }
    }
}

#[test]
fn rank_is_near_zero_at_birth_and_near_total_at_one_hundred() {
    let engine = engine(Interpolation::Spline);
    let dob = d(1990, 1, 1);

    let at_birth = engine.rank_as_of(TODAY, "unisex", "Flatland", dob, dob).unwrap();
    assert_eq!(at_birth, 1);

    let last = add_days(dob, MAX_AGE_DAYS).unwrap();
    let at_hundred = engine.rank_as_of(TODAY, "unisex", "Flatland", dob, last).unwrap();
    // 1.3 persons per day of age.
    assert_eq!(at_hundred, 47_450);

    let dist = engine.distribution("Flatland", Sex::Unisex, last).unwrap();
    assert_relative_eq!(at_hundred as f64, dist.total() * 1000.0, max_relative = 1e-4);
}

#[test]
fn rank_is_the_smoothed_cumulative_count() {
    let engine = engine(Interpolation::Bilinear);
    let date = d(2030, 6, 15);
    let dist = engine.distribution("Testland", Sex::Female, date).unwrap();
    let dob = d(1999, 12, 24);
    let age = (date - dob).num_days();

    let want = (dist.cumulative_at(age - 1).unwrap() + dist.cumulative_at(age).unwrap()) / 2.0;
    let got = engine.rank_as_of(TODAY, "female", "Testland", dob, date).unwrap();
    assert_eq!(got, (want * 1000.0) as i64);
    assert_relative_eq!(dist.between(0, age + 1), dist.cumulative_at(age).unwrap(), max_relative = 1e-12);
}

#[test]
fn distribution_covers_every_day_of_age() {
    let engine = engine(Interpolation::Spline);
    let date = d(2000, 7, 1);
    let dist = engine.distribution("Flatland", Sex::Unisex, date).unwrap();
    assert_eq!(dist.date(), date);
    assert!(!dist.is_empty());
    assert_eq!(dist.len(), MAX_AGE_DAYS as usize + 1);

    let points: Vec<(i64, f64)> = dist.iter().collect();
    assert_eq!(points.len(), dist.len());
    assert_eq!(points[0].0, 0);
    assert_eq!(points.last().map(|p| p.0), Some(MAX_AGE_DAYS));
    assert!(points.windows(2).all(|w| w[0].1 <= w[1].1));
    // 1.3 persons per day of age.
    assert_relative_eq!(points[0].1 * 1000.0, 1.3, max_relative = 1e-9);
    assert_relative_eq!(points[3652].1 * 1000.0, 3653.0 * 1.3, max_relative = 1e-9);
}

#[test]
fn rank_path_log_snapshot() {
    let engine = engine(Interpolation::Spline);
    let dob = d(2000, 3, 15);
    let points = engine.rank_path("unisex", "Flatland", dob, 10).unwrap();
    assert_eq!(points.len(), 10);

    let tmp = tempfile::tempdir().expect("tempdir");
    let path = write_rank_path_log(tmp.path(), "TEST-FLAT", "Flatland", Sex::Unisex, dob, &points)
        .expect("write rank path log");

    let s = std::fs::read_to_string(path).expect("read rank path log");
    insta::assert_snapshot!(s, @r###"
    run_id=TEST-FLAT
    region=Flatland
    sex=unisex
    dob=2000-03-15
    points=10

    date,age_days,rank
    2000-03-15,0,1
    2010-03-15,3652,4748
    2020-03-15,7305,9497
    2030-03-15,10957,14244
    2040-03-15,14610,18993
    2050-03-15,18262,23741
    2060-03-15,21915,28490
    2070-03-15,25567,33237
    2080-03-15,29220,37986
    2090-03-15,32872,42734
    "###);
}

#[test]
fn rank_path_starts_at_first_supported_date() {
    let engine = engine(Interpolation::Bilinear);
    let points = engine.rank_path("male", "Testland", d(1931, 5, 2), 5).unwrap();
    let first = points.first().unwrap();
    assert_eq!(first.date, d(1951, 5, 2));
    assert!(points.iter().all(|p| p.age_days <= MAX_AGE_DAYS));
    assert!(points.windows(2).all(|w| w[0].rank <= w[1].rank));
}
