//! Three-stage conversion funnel: visits → carts created → confirmed purchases.
//!
//! Visits is the configured traffic baseline, not derived from records.

use crate::{
    filter::FunnelStage,
    metrics::{percent, round_to, CartCounts},
};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FunnelStep {
    pub stage:          FunnelStage,
    pub count:          u64,
    /// count / previous stage count × 100, 2 decimals.
    pub from_previous:  f64,
    /// count / visits × 100, 2 decimals.
    pub from_visits:    f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Funnel {
    pub visits:    FunnelStep,
    pub carts:     FunnelStep,
    pub purchases: FunnelStep,
}

impl Funnel {
    pub fn steps(&self) -> [FunnelStep; 3] {
        [self.visits, self.carts, self.purchases]
    }

    pub fn step(&self, stage: FunnelStage) -> FunnelStep {
        match stage {
            FunnelStage::Visits    => self.visits,
            FunnelStage::Carts     => self.carts,
            FunnelStage::Purchases => self.purchases,
        }
    }
}

pub fn funnel(counts: &CartCounts, total_visits: u64) -> Funnel {
    let visits = total_visits as f64;
    let carts = counts.carts();
    let purchases = counts.recovered;

    Funnel {
        visits: FunnelStep {
            stage:         FunnelStage::Visits,
            count:         total_visits,
            from_previous: round_to(percent(visits, visits), 2),
            from_visits:   round_to(percent(visits, visits), 2),
        },
        carts: FunnelStep {
            stage:         FunnelStage::Carts,
            count:         carts,
            from_previous: round_to(percent(carts as f64, visits), 2),
            from_visits:   round_to(percent(carts as f64, visits), 2),
        },
        purchases: FunnelStep {
            stage:         FunnelStage::Purchases,
            count:         purchases,
            from_previous: round_to(percent(purchases as f64, carts as f64), 2),
            from_visits:   round_to(percent(purchases as f64, visits), 2),
        },
    }
}
