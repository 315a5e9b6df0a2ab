mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use common::{d, table};
use poprank::source::PopulationCount;
use poprank::surface::{AnnualRecord, Interpolation, Sex, SurfaceKey};
use poprank::{PopRank, PopulationSource, WppTable};

/// Counts how often a surface's raw table is requested.
struct CountingSource {
    inner: WppTable,
    loads: AtomicUsize,
}

impl PopulationSource for CountingSource {
    fn regions(&self) -> Vec<String> {
        self.inner.regions()
    }

    fn annual_table(&self, region: &str, sex: Sex) -> anyhow::Result<Vec<AnnualRecord>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        // Widen the window in which other threads can pile up on the same key.
        std::thread::sleep(std::time::Duration::from_millis(20));
        self.inner.annual_table(region, sex)
    }

    fn population_counts(&self, region: &str, age: u32, year: Option<i32>) -> anyhow::Result<Vec<PopulationCount>> {
        self.inner.population_counts(region, age, year)
    }
}

fn counting_engine() -> PopRank<CountingSource> {
    let source = CountingSource { inner: table(), loads: AtomicUsize::new(0) };
    PopRank::new(source, Interpolation::Spline)
}

#[test]
fn concurrent_first_access_builds_once() {
    let engine = counting_engine();

    let surfaces: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| s.spawn(|| engine.surface("Testland", Sex::Female).map_err(|e| e.to_string())))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap().unwrap()).collect()
    });

    assert_eq!(engine.source().loads.load(Ordering::SeqCst), 1);
    assert!(surfaces.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    assert_eq!(engine.cache().built(), 1);
}

#[test]
fn keys_are_built_independently_and_reused() {
    let engine = counting_engine();
    engine.surface("Testland", Sex::Male).unwrap();
    engine.surface("Testland", Sex::Male).unwrap();
    engine.surface("Flatland", Sex::Male).unwrap();
    engine.rank("male", "Testland", d(1990, 1, 1), d(2000, 1, 1)).unwrap();

    assert_eq!(engine.source().loads.load(Ordering::SeqCst), 2);
    assert_eq!(engine.cache().built(), 2);
    assert!(engine.cache().contains(&SurfaceKey::new("Flatland", Sex::Male)));
    assert!(!engine.cache().contains(&SurfaceKey::new("Flatland", Sex::Female)));
    assert_eq!(engine.cache().interpolation(), Interpolation::Spline);
}

#[test]
fn unknown_region_never_reaches_the_source() {
    let engine = counting_engine();
    assert!(engine.surface("Atlantis", Sex::Male).is_err());
    assert_eq!(engine.source().loads.load(Ordering::SeqCst), 0);
    assert_eq!(engine.regions(), vec!["Flatland".to_string(), "Testland".to_string()]);
}
