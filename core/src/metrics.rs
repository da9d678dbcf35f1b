//! Top-line KPI calculators.
//!
//! All calculators are pure functions over a filtered view.
//! Pending records never count towards a rate: only carts that ended
//! Abandoned or Recovered enter a numerator or a denominator.
//!
//! Zero denominators resolve to 0, never to NaN or an error.

use crate::{filter::FilteredView, record::Record};
use serde::Serialize;
use std::fmt;

// ── Shared arithmetic ────────────────────────────────────────────────────────

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// `numerator / denominator * 100`, or 0 when the denominator is 0.
pub fn percent(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator * 100.0
    } else {
        0.0
    }
}

/// Abandoned/recovered tallies over a set of records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CartCounts {
    pub abandoned:                 u64,
    pub recovered:                 u64,
    pub recovered_after_marketing: u64,
    pub abandoned_value:           f64,
    pub recovered_value:           f64,
}

impl CartCounts {
    pub fn tally<'a>(records: impl IntoIterator<Item = &'a Record>) -> Self {
        let mut counts = Self::default();
        for record in records {
            counts.add(record);
        }
        counts
    }

    pub fn add(&mut self, record: &Record) {
        if record.is_abandoned() {
            self.abandoned += 1;
            self.abandoned_value += record.price;
        } else if record.is_recovered() {
            self.recovered += 1;
            self.recovered_value += record.price;
            if record.recovered_after_marketing() {
                self.recovered_after_marketing += 1;
            }
        }
    }

    pub fn carts(&self) -> u64 {
        self.abandoned + self.recovered
    }

    /// abandoned / (abandoned + recovered) × 100, unrounded.
    pub fn abandonment_rate(&self) -> f64 {
        percent(self.abandoned as f64, self.carts() as f64)
    }
}

// ── KPI values ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KpiUnit {
    Percent,
    Euro,
}

/// A rounded number with its unit, rendered the way the KPI cards show it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KpiValue {
    pub value:    f64,
    pub decimals: u32,
    pub unit:     KpiUnit,
}

impl KpiValue {
    pub fn percent(raw: f64, decimals: u32) -> Self {
        Self { value: round_to(raw, decimals), decimals, unit: KpiUnit::Percent }
    }

    pub fn euros(raw: f64) -> Self {
        Self { value: round_to(raw, 0), decimals: 0, unit: KpiUnit::Euro }
    }

    /// The number alone, fixed to `decimals` places ("0.0", "2500").
    pub fn number(&self) -> String {
        format!("{:.*}", self.decimals as usize, self.value)
    }
}

impl fmt::Display for KpiValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            KpiUnit::Percent => write!(f, "{} %", self.number()),
            KpiUnit::Euro    => write!(f, "€ {}", self.number()),
        }
    }
}

/// The five headline KPIs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KpiSummary {
    /// recovered / total visits × 100, 1 decimal.
    pub conversion_rate:    KpiValue,
    /// Mean price of recovered carts, whole euros.
    pub average_cart_value: KpiValue,
    /// abandoned / carts × 100, 1 decimal.
    pub abandonment_rate:   KpiValue,
    /// Relaunch-recovered / abandoned × 100, 1 decimal.
    pub recovery_rate:      KpiValue,
    /// Value left in abandoned carts, whole euros.
    pub sales_potential:    KpiValue,
}

/// Compute the KPI summary. `total_visits` is an external traffic baseline.
pub fn kpi_summary(view: &FilteredView, total_visits: u64) -> KpiSummary {
    kpi_summary_from_counts(&CartCounts::tally(view.iter()), total_visits)
}

pub fn kpi_summary_from_counts(counts: &CartCounts, total_visits: u64) -> KpiSummary {
    let average_cart = if counts.recovered > 0 {
        counts.recovered_value / counts.recovered as f64
    } else {
        0.0
    };

    KpiSummary {
        conversion_rate:    KpiValue::percent(
            percent(counts.recovered as f64, total_visits as f64),
            1,
        ),
        average_cart_value: KpiValue::euros(average_cart),
        abandonment_rate:   KpiValue::percent(counts.abandonment_rate(), 1),
        recovery_rate:      KpiValue::percent(
            percent(counts.recovered_after_marketing as f64, counts.abandoned as f64),
            1,
        ),
        sales_potential:    KpiValue::euros(counts.abandoned_value),
    }
}

/// Abandoned versus recovered cart value, the input of the carts-value chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CartsValue {
    pub abandoned_value: f64,
    pub recovered_value: f64,
}

pub fn carts_value(counts: &CartCounts) -> CartsValue {
    CartsValue {
        abandoned_value: counts.abandoned_value,
        recovered_value: counts.recovered_value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_to_matches_fixed_point_display() {
        assert_eq!(round_to(40.0, 1), 40.0);
        assert_eq!(round_to(0.01, 1), 0.0);
        assert_eq!(round_to(33.333_333, 2), 33.33);
        assert_eq!(round_to(99.5, 0), 100.0);
    }

    #[test]
    fn percent_of_zero_denominator_is_zero() {
        assert_eq!(percent(5.0, 0.0), 0.0);
        assert_eq!(percent(0.0, 0.0), 0.0);
    }

    #[test]
    fn kpi_values_render_like_cards() {
        assert_eq!(KpiValue::percent(40.0, 1).to_string(), "40.0 %");
        assert_eq!(KpiValue::percent(0.01, 1).number(), "0.0");
        assert_eq!(KpiValue::euros(2500.0).to_string(), "€ 2500");
        assert_eq!(KpiValue::euros(99.6).number(), "100");
    }
}
