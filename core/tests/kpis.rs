//! KPI summary and funnel tests.

use cartdash_core::{
    filter::{apply_filters, FilterState, Selection},
    funnel::funnel,
    metrics::{kpi_summary, CartCounts, KpiUnit},
    record::{AcquisitionChannel, CartStatus, ClientType, DeviceType, MarketingAction, Record},
    store::RecordStore,
};
use std::sync::Arc;

const TOTAL_VISITS: u64 = 300_000;

// ── Helpers ──────────────────────────────────────────────────────────────────

fn record(i: usize, status: CartStatus, price: f64) -> Record {
    Record {
        order_number:        format!("K-{i:04}"),
        product:             "Sérum hydratant".into(),
        client:              format!("client{i}@example.com"),
        country:             "Belgique".into(),
        city:                "Lille".into(),
        price,
        status,
        actions:             None,
        acquisition_channel: AcquisitionChannel::Direct,
        device_type:         DeviceType::Desktop,
        client_type:         ClientType::ReturningClient,
        year:                2023,
        month:               6,
        day:                 15,
        hour:                "18:30".into(),
    }
}

fn shared(records: Vec<Record>) -> Arc<[Record]> {
    RecordStore::from_records(records).shared()
}

/// 30 Recovered (Σ 3000), 20 Abandoned (Σ 2500), 50 Pending.
fn end_to_end_corpus() -> Arc<[Record]> {
    let mut records = Vec::new();
    for i in 0..30 {
        records.push(record(i, CartStatus::Recovered, 100.0));
    }
    for i in 30..50 {
        records.push(record(i, CartStatus::Abandoned, 125.0));
    }
    for i in 50..100 {
        records.push(record(i, CartStatus::Pending, 80.0));
    }
    shared(records)
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[test]
fn end_to_end_kpis() {
    let records = end_to_end_corpus();
    let view = apply_filters(&records, &FilterState::default());
    assert_eq!(view.len(), 100);

    let kpis = kpi_summary(&view, TOTAL_VISITS);

    assert_eq!(kpis.conversion_rate.number(), "0.0");
    assert_eq!(kpis.conversion_rate.unit, KpiUnit::Percent);
    assert_eq!(kpis.average_cart_value.value, 100.0);
    assert_eq!(kpis.average_cart_value.unit, KpiUnit::Euro);
    assert_eq!(kpis.abandonment_rate.value, 40.0);
    assert_eq!(kpis.abandonment_rate.to_string(), "40.0 %");
    assert_eq!(kpis.sales_potential.value, 2500.0);
    assert_eq!(kpis.sales_potential.to_string(), "€ 2500");
    assert_eq!(kpis.recovery_rate.value, 0.0, "no relaunch actions in corpus");
}

/// No carts at all: every ratio falls back to zero.
#[test]
fn zero_denominators_resolve_to_zero() {
    let records = shared((0..5).map(|i| record(i, CartStatus::Pending, 40.0)).collect());
    let view = apply_filters(&records, &FilterState::default());
    let kpis = kpi_summary(&view, TOTAL_VISITS);

    assert_eq!(kpis.abandonment_rate.value, 0.0);
    assert_eq!(kpis.recovery_rate.value, 0.0);
    assert_eq!(kpis.average_cart_value.value, 0.0);
    assert_eq!(kpis.sales_potential.value, 0.0);
    assert_eq!(kpis.conversion_rate.value, 0.0);
}

/// An empty view is not an error either.
#[test]
fn empty_view_has_zero_kpis() {
    let records = end_to_end_corpus();
    let state = FilterState {
        city: Selection::Only("Nowhere".into()),
        ..FilterState::default()
    };
    let view = apply_filters(&records, &state);
    let kpis = kpi_summary(&view, TOTAL_VISITS);

    assert!(view.is_empty());
    assert!(!kpis.abandonment_rate.value.is_nan());
    assert_eq!(kpis.average_cart_value.to_string(), "€ 0");
    assert_eq!(kpis.abandonment_rate.to_string(), "0.0 %");
}

/// Recovery-after-marketing divides by the abandoned pool, and only
/// relaunch actions count; a checkout discount does not.
#[test]
fn recovery_rate_uses_abandoned_denominator() {
    let mut records = Vec::new();
    let actions = [
        Some(MarketingAction::EmailFollowUp),
        Some(MarketingAction::Retargeting),
        Some(MarketingAction::SpecialOffer),
        Some(MarketingAction::DiscountApplied),
        None,
    ];
    for (i, action) in actions.into_iter().enumerate() {
        records.push(Record {
            actions: action,
            ..record(i, CartStatus::Recovered, 60.0)
        });
    }
    for i in 5..13 {
        records.push(record(i, CartStatus::Abandoned, 60.0));
    }

    let records = shared(records);
    let view = apply_filters(&records, &FilterState::default());
    let kpis = kpi_summary(&view, TOTAL_VISITS);

    // 3 relaunch-recovered / 8 abandoned = 37.5%
    assert_eq!(kpis.recovery_rate.value, 37.5);
    // 8 / 13 = 61.538…%
    assert_eq!(kpis.abandonment_rate.value, 61.5);
}

/// The average cart value rounds to whole euros.
#[test]
fn average_cart_value_is_rounded() {
    let records = shared(vec![
        record(0, CartStatus::Recovered, 10.0),
        record(1, CartStatus::Recovered, 11.0),
        record(2, CartStatus::Recovered, 11.0),
    ]);
    let view = apply_filters(&records, &FilterState::default());
    // 32 / 3 = 10.67
    assert_eq!(kpi_summary(&view, TOTAL_VISITS).average_cart_value.value, 11.0);
}

#[test]
fn funnel_counts_and_rates() {
    let records = end_to_end_corpus();
    let view = apply_filters(&records, &FilterState::default());
    let counts = CartCounts::tally(view.iter());
    let f = funnel(&counts, TOTAL_VISITS);

    assert_eq!(f.visits.count, TOTAL_VISITS);
    assert_eq!(f.carts.count, 50);
    assert_eq!(f.purchases.count, 30);

    // 50 / 300000 = 0.0167% → 0.02
    assert_eq!(f.carts.from_previous, 0.02);
    assert_eq!(f.carts.from_visits, 0.02);
    // 30 / 50 = 60%
    assert_eq!(f.purchases.from_previous, 60.0);
    // 30 / 300000 = 0.01%
    assert_eq!(f.purchases.from_visits, 0.01);
}

/// With no carts, purchase-to-cart conversion is 0, not NaN.
#[test]
fn funnel_without_carts_has_zero_purchase_rate() {
    let counts = CartCounts::default();
    let f = funnel(&counts, TOTAL_VISITS);

    assert_eq!(f.carts.count, 0);
    assert_eq!(f.purchases.from_previous, 0.0);
    assert_eq!(f.purchases.from_visits, 0.0);
}
