//! Per-dimension abandonment breakdowns.
//!
//! Partitions come from each dimension's fixed enumeration, so a category
//! with no matching record still gets a 0% row. Only the channel table is
//! sorted; the monthly series always lists months 1–12 in order.

use crate::{
    filter::FilteredView,
    metrics::CartCounts,
    record::{AcquisitionChannel, ClientType, DeviceType, Record},
    types::{Month, MONTHS},
};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BreakdownRow<K> {
    pub key:       K,
    pub abandoned: u64,
    pub recovered: u64,
    /// abandoned / (abandoned + recovered) × 100, unrounded; 0 when empty.
    pub rate:      f64,
}

pub type MonthlyRate = BreakdownRow<Month>;

fn partition<K, F>(view: &FilteredView, keys: &[K], key_of: F) -> Vec<BreakdownRow<K>>
where
    K: Copy + PartialEq,
    F: Fn(&Record) -> K,
{
    let mut tallies: Vec<CartCounts> = vec![CartCounts::default(); keys.len()];
    for record in view.iter() {
        let key = key_of(record);
        // Keys outside the enumeration are a loader precondition violation.
        if let Some(slot) = keys.iter().position(|k| *k == key) {
            tallies[slot].add(record);
        }
    }

    keys.iter()
        .zip(tallies)
        .map(|(&key, counts)| BreakdownRow {
            key,
            abandoned: counts.abandoned,
            recovered: counts.recovered,
            rate:      counts.abandonment_rate(),
        })
        .collect()
}

pub fn by_device(view: &FilteredView) -> Vec<BreakdownRow<DeviceType>> {
    partition(view, &DeviceType::ALL, |r| r.device_type)
}

pub fn by_client_type(view: &FilteredView) -> Vec<BreakdownRow<ClientType>> {
    partition(view, &ClientType::ALL, |r| r.client_type)
}

/// Sorted by rate, highest first; ties keep enumeration order.
pub fn by_channel(view: &FilteredView) -> Vec<BreakdownRow<AcquisitionChannel>> {
    let mut rows = partition(view, &AcquisitionChannel::ALL, |r| r.acquisition_channel);
    // sort_by is stable, so equal rates stay in ALL order.
    rows.sort_by(|a, b| b.rate.total_cmp(&a.rate));
    rows
}

pub fn monthly(view: &FilteredView) -> Vec<MonthlyRate> {
    partition(view, &MONTHS, |r| r.month)
}
