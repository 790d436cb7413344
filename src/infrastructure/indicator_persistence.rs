//! Reads the macroeconomic indicator table from disk.
//!
//! The file is a JSON object keyed by `"{year}_{quarter}"`. Absence of the file
//! is not an error: the resulting store answers every lookup with defaults.
//! Entries with a bad key or an incomplete record are skipped one by one.

use crate::domain::indicators::{EconomicIndicators, IndicatorPeriod, IndicatorStore};
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

pub struct IndicatorPersistence {
    file_path: PathBuf,
}

impl IndicatorPersistence {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    /// Loads the raw table; `Ok(None)` when the file does not exist.
    pub fn load(&self) -> Result<Option<BTreeMap<IndicatorPeriod, EconomicIndicators>>> {
        if !self.file_path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.file_path)
            .context("Failed to read economic indicators file")?;
        let raw: BTreeMap<String, serde_json::Value> = serde_json::from_str(&content)
            .context("Failed to parse economic indicators JSON")?;

        let mut table = BTreeMap::new();
        for (key, value) in raw {
            let period = match key.parse::<IndicatorPeriod>() {
                Ok(period) => period,
                Err(e) => {
                    warn!("Skipping indicator entry: {}", e);
                    continue;
                }
            };
            match serde_json::from_value::<EconomicIndicators>(value) {
                Ok(indicators) => {
                    table.insert(period, indicators);
                }
                Err(e) => warn!("Skipping indicator record '{}': {}", key, e),
            }
        }

        info!(
            "Loaded {} economic indicator periods from {:?}",
            table.len(),
            self.file_path
        );
        Ok(Some(table))
    }

    /// Builds the store, degrading to an unavailable store instead of failing.
    pub fn load_store(&self) -> IndicatorStore {
        match self.load() {
            Ok(Some(table)) => IndicatorStore::new(table),
            Ok(None) => {
                warn!("Economic indicators file not found: {:?}", self.file_path);
                IndicatorStore::unavailable()
            }
            Err(e) => {
                warn!(
                    "Economic indicators file {:?} is unusable, using defaults: {:#}",
                    self.file_path, e
                );
                IndicatorStore::unavailable()
            }
        }
    }
}
