//! Record store: the immutable, ordered corpus.
//!
//! RULE: Nothing mutates the store after construction.
//! The records live behind an `Arc<[Record]>`, so filtered views and
//! published bundles share them without copying.

use crate::{
    error::DashResult,
    record::Record,
    types::{Month, Year, MONTHS},
};
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct RecordStore {
    records: Arc<[Record]>,
}

impl RecordStore {
    /// Wrap an already-validated record collection, keeping its order.
    pub fn from_records(records: Vec<Record>) -> Self {
        Self { records: records.into() }
    }

    /// Bulk-load a JSON array of records and validate each one.
    pub fn load_json(path: impl AsRef<Path>) -> DashResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let records: Vec<Record> = serde_json::from_str(&content)?;
        for record in &records {
            record
                .validate()
                .inspect_err(|e| log::warn!("store: rejecting {}: {e}", path.display()))?;
        }
        log::info!("store: loaded {} records from {}", records.len(), path.display());
        Ok(Self::from_records(records))
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Shared handle to the backing slice.
    pub fn shared(&self) -> Arc<[Record]> {
        Arc::clone(&self.records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Dropdown option lists. The "All" entry is implicit.
    pub fn filter_options(&self) -> FilterOptions {
        let mut years: Vec<Year> = self.records.iter().map(|r| r.year).collect();
        years.sort_unstable();
        years.dedup();

        FilterOptions {
            years,
            months:   MONTHS.to_vec(),
            products: distinct_in_order(self.records.iter().map(|r| r.product.as_str())),
            cities:   distinct_in_order(self.records.iter().map(|r| r.city.as_str())),
        }
    }
}

/// Values offered by the four dropdowns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    /// Ascending.
    pub years:    Vec<Year>,
    /// Always 1 through 12.
    pub months:   Vec<Month>,
    /// First-seen order.
    pub products: Vec<String>,
    /// First-seen order.
    pub cities:   Vec<String>,
}

fn distinct_in_order<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}
