//! The derived metrics bundle: one atomic snapshot per filter state.
//!
//! A bundle is built in one pass from a single filter state and is never
//! mutated afterwards. Consumers receive it behind an `Arc`, so no reader
//! can observe KPIs from one state next to a funnel from another.

use crate::{
    breakdown::{self, BreakdownRow, MonthlyRate},
    filter::{apply_filters, FilterState, FilteredView},
    funnel::{self, Funnel},
    metrics::{self, CartCounts, CartsValue, KpiSummary},
    record::{AcquisitionChannel, ClientType, DeviceType, Record},
    types::Revision,
};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct DerivedBundle {
    pub revision:       Revision,
    pub filters:        FilterState,
    pub view:           FilteredView,
    pub kpis:           KpiSummary,
    pub funnel:         Funnel,
    pub carts_value:    CartsValue,
    pub by_client_type: Vec<BreakdownRow<ClientType>>,
    pub by_device:      Vec<BreakdownRow<DeviceType>>,
    pub by_channel:     Vec<BreakdownRow<AcquisitionChannel>>,
    pub monthly:        Vec<MonthlyRate>,
}

impl DerivedBundle {
    /// Run the filter engine, then every calculator, against `filters`.
    pub fn compute(
        revision: Revision,
        records: &Arc<[Record]>,
        filters: &FilterState,
        total_visits: u64,
    ) -> Self {
        let view = apply_filters(records, filters);
        let counts = CartCounts::tally(view.iter());

        Self {
            revision,
            filters:        filters.clone(),
            kpis:           metrics::kpi_summary_from_counts(&counts, total_visits),
            funnel:         funnel::funnel(&counts, total_visits),
            carts_value:    metrics::carts_value(&counts),
            by_client_type: breakdown::by_client_type(&view),
            by_device:      breakdown::by_device(&view),
            by_channel:     breakdown::by_channel(&view),
            monthly:        breakdown::monthly(&view),
            view,
        }
    }

    /// Nothing survived the filters; displays render a "no data" marker.
    pub fn is_empty(&self) -> bool {
        self.view.is_empty()
    }
}
