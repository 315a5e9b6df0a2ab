use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::io::population::load_wpp_csv;
use crate::io::population_pg::load_wpp_pg;
use crate::source::WppTable;
use crate::surface::Interpolation;

/// Engine settings: which data to load and how to interpolate it.
///
/// Read from a JSON file named by `POPRANK_CONFIG`, or else from `POPRANK_DATA_CSV`,
/// `POPRANK_PG_CONN_STR` and `POPRANK_INTERPOLATION`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub interpolation: Interpolation,
    pub data_csv: Option<PathBuf>,
    pub pg_conn_str: Option<String>,
}

impl EngineConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        if let Some(path) = var("POPRANK_CONFIG") {
            return Self::from_json_file(path);
        }
        let interpolation = match var("POPRANK_INTERPOLATION") {
            Some(v) => v.parse().context("invalid POPRANK_INTERPOLATION")?,
            None => Interpolation::default(),
        };
        let cfg = Self {
            interpolation,
            data_csv: var("POPRANK_DATA_CSV").map(PathBuf::from),
            pg_conn_str: var("POPRANK_PG_CONN_STR"),
        };
        cfg.check()?;
        Ok(cfg)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let cfg: Self = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        cfg.check()?;
        Ok(cfg)
    }

    pub fn check(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.data_csv.is_some() || self.pg_conn_str.is_some(),
            "no population data configured (set data_csv or pg_conn_str)"
        );
        Ok(())
    }

    /// Load the configured table; a CSV file wins over Postgres when both are set.
    pub fn load_source(&self) -> anyhow::Result<WppTable> {
        match (&self.data_csv, &self.pg_conn_str) {
            (Some(path), _) => load_wpp_csv(path),
            (None, Some(conn)) => load_wpp_pg(conn),
            (None, None) => anyhow::bail!("no population data configured"),
        }
    }
}
