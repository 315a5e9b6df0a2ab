mod common;

use std::collections::HashMap;
use std::io::Write;

use common::engine;
use poprank::io::population::load_wpp_csv;
use poprank::surface::{Interpolation, Sex};
use poprank::{EngineConfig, PopulationSource, WppTable};

fn write_tmp(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut f = std::fs::File::create(&path).expect("create");
    f.write_all(contents.as_bytes()).expect("write");
    path
}

#[test]
fn loads_wpp_csv_with_open_age_group_and_extra_columns() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let path = write_tmp(
        &tmp,
        "wpp.csv",
        "LocID,Location,VarID,Variant,Time,MidPeriod,AgeGrp,AgeGrpStart,PopMale,PopFemale,PopTotal\n\
         36,Australia,2,Medium,2014,2014.5,2,2,155.1234,147.0006,302.1240\n\
         36,Australia,2,Medium,2014,2014.5,100+,100,1.2,3.4,4.6\n\
         554,New Zealand,2,Medium,2014,2014.5,2,2,31.5,29.9,61.4\n",
    );

    let table = load_wpp_csv(&path).unwrap();
    assert!(!table.is_empty());
    assert_eq!(table.len(), 3);
    assert_eq!(table.regions(), vec!["Australia".to_string(), "New Zealand".to_string()]);

    let rows = table.rows("Australia").unwrap();
    assert_eq!(rows[1].age, 100);
    assert_eq!(rows[1].pop_total, Some(4.6));

    let counts = table.population_counts("Australia", 2, Some(2014)).unwrap();
    assert_eq!(counts.len(), 1);
    assert_eq!((counts[0].male, counts[0].female, counts[0].total), (155_123, 147_001, 302_124));
}

#[test]
fn missing_total_column_sums_the_sexes() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let path = write_tmp(&tmp, "no_total.csv", "Location,Time,Age,PopMale,PopFemale\nX,2000,0,1.5,2.25\n");
    let table = load_wpp_csv(&path).unwrap();
    let records = table.annual_table("X", Sex::Unisex).unwrap();
    assert_eq!(records[0].population, 3.75);
    assert_eq!(table.population_counts("X", 0, None).unwrap()[0].total, 3750);
}

#[test]
fn bad_csv_rows_are_errors() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let bad_age = write_tmp(&tmp, "bad_age.csv", "Location,Time,Age,PopMale,PopFemale\nX,2000,ten,1,1\n");
    let err = load_wpp_csv(&bad_age).unwrap_err();
    assert!(format!("{:#}", err).contains("bad age 'ten'"), "{:#}", err);

    let empty = write_tmp(&tmp, "empty.csv", "Location,Time,Age,PopMale,PopFemale\n");
    assert!(load_wpp_csv(&empty).is_err());
    assert!(WppTable::from_rows(Vec::new()).is_empty());
    assert!(load_wpp_csv(tmp.path().join("missing.csv")).is_err());
}

#[test]
fn population_count_snapshot() {
    let engine = engine(Interpolation::Spline);
    let mut out = String::new();
    for year in [1950, 2014, 2100] {
        for c in engine.population_count("Testland", 2, Some(year)).unwrap() {
            out.push_str(&format!("{},{},{},{}\n", c.year, c.male, c.female, c.total));
        }
    }
    insta::assert_snapshot!(out, @r###"
    1950,990000,990000,1980000
    2014,1871557,1871557,3743115
    2100,4403939,4403939,8807877
    "###);

    assert_eq!(engine.population_count("Testland", 2, None).unwrap().len(), 151);
    assert!(engine.population_count("Atlantis", 2, None).is_err());
}

#[test]
fn config_from_vars() {
    let vars: HashMap<&str, &str> =
        HashMap::from([("POPRANK_DATA_CSV", "/data/wpp.csv"), ("POPRANK_INTERPOLATION", "Bilinear")]);
    let cfg = EngineConfig::from_vars(|k| vars.get(k).map(|v| v.to_string())).unwrap();
    assert_eq!(cfg.interpolation, Interpolation::Bilinear);
    assert_eq!(cfg.data_csv.as_deref(), Some(std::path::Path::new("/data/wpp.csv")));
    assert_eq!(cfg.pg_conn_str, None);

    // Nothing to load from.
    assert!(EngineConfig::from_vars(|_| None).is_err());

    let bad = HashMap::from([("POPRANK_PG_CONN_STR", "host=db"), ("POPRANK_INTERPOLATION", "cubic")]);
    assert!(EngineConfig::from_vars(|k| bad.get(k).map(|v| v.to_string())).is_err());
}

#[test]
fn config_from_json_file() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let path = write_tmp(&tmp, "poprank.json", r#"{ "pg_conn_str": "host=db user=u password=p" }"#);

    let cfg = EngineConfig::from_json_file(&path).unwrap();
    assert_eq!(cfg.interpolation, Interpolation::Spline);
    assert_eq!(cfg.pg_conn_str.as_deref(), Some("host=db user=u password=p"));

    let path_str = path.to_string_lossy().into_owned();
    let via_env = EngineConfig::from_vars(|k| (k == "POPRANK_CONFIG").then(|| path_str.clone())).unwrap();
    assert_eq!(via_env, cfg);

    let csv = write_tmp(&tmp, "data.csv", "Location,Time,Age,PopMale,PopFemale\nX,2000,0,1,1\n");
    let cfg = EngineConfig { data_csv: Some(csv), ..cfg };
    // The CSV wins over Postgres, so this never tries to connect.
    assert_eq!(cfg.load_source().unwrap().len(), 1);
}
