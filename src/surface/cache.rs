use std::sync::Arc;
use std::time::Instant;

use dashmap::DashMap;
use once_cell::sync::OnceCell;

use super::{AnnualRecord, BilinearSurface, ContinuousSurface, Interpolation, PopulationSurface, SplineSurface, SurfaceKey};
use crate::error::Result;

/// A built (region, sex) entry: the raw grid plus its continuous view.
pub struct CachedSurface {
    pub grid: Arc<PopulationSurface>,
    pub continuous: Arc<dyn ContinuousSurface>,
}

/// Build-once cache of surfaces keyed by (region, sex).
///
/// Every key owns a `OnceCell`; concurrent callers asking for the same missing key block on
/// that cell while a single build runs, then share its result. The map lock is only held
/// long enough to fetch the cell. A failed build leaves the cell empty, so the next caller
/// retries.
pub struct SurfaceCache {
    interpolation: Interpolation,
    cells: DashMap<SurfaceKey, Arc<OnceCell<Arc<CachedSurface>>>>,
}

impl SurfaceCache {
    pub fn new(interpolation: Interpolation) -> Self {
        Self { interpolation, cells: DashMap::new() }
    }

    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    pub fn get_or_build<F>(&self, key: &SurfaceKey, load: F) -> Result<Arc<CachedSurface>>
    where
        F: FnOnce() -> anyhow::Result<Vec<AnnualRecord>>,
    {
        let cell = self.cells.entry(key.clone()).or_default().value().clone();
        let entry = cell.get_or_try_init(|| self.build(key, load))?;
        Ok(Arc::clone(entry))
    }

    /// Number of keys whose surface has been built.
    pub fn built(&self) -> usize {
        self.cells.iter().filter(|c| c.value().get().is_some()).count()
    }

    pub fn contains(&self, key: &SurfaceKey) -> bool {
        self.cells.get(key).map_or(false, |c| c.value().get().is_some())
    }

    fn build<F>(&self, key: &SurfaceKey, load: F) -> Result<Arc<CachedSurface>>
    where
        F: FnOnce() -> anyhow::Result<Vec<AnnualRecord>>,
    {
        let started = Instant::now();
        tracing::info!(surface = %key, interpolation = ?self.interpolation, "building population surface");

        let records = load()?;
        let grid = Arc::new(PopulationSurface::from_records(key.clone(), &records)?);
        let continuous: Arc<dyn ContinuousSurface> = match self.interpolation {
            Interpolation::Spline => Arc::new(SplineSurface::fit(Arc::clone(&grid))?),
            Interpolation::Bilinear => Arc::new(BilinearSurface::new(Arc::clone(&grid))),
        };

        tracing::info!(
            surface = %key,
            records = records.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "population surface ready"
        );
        Ok(Arc::new(CachedSurface { grid, continuous }))
    }
}
