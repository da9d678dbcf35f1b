//! Filter state and the filter engine.
//!
//! Two kinds of selection live side by side:
//!   - Dropdowns (year, month, product, city) are exclusive: "All" or one value.
//!   - Toggles (device, client type, channel, status, funnel stage,
//!     selected month) are set by chart clicks and are either unset or one value.
//!
//! The net predicate is the AND of every field that is set. Fields never
//! interact with each other; `month` and `selected_month` may both be active.

use crate::{
    record::{AcquisitionChannel, CartStatus, ClientType, DeviceType, Record, UnknownVariant},
    types::{Month, Year},
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Sentinel shown in every dropdown before a concrete value is chosen.
pub const ALL: &str = "All";

/// An exclusive dropdown selection. Never absent: "All" is a value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection<T> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq> Selection<T> {
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == value,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl<T: fmt::Display> fmt::Display for Selection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL),
            Self::Only(v) => v.fmt(f),
        }
    }
}

/// Funnel stage selected by clicking the conversion funnel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunnelStage {
    /// Highlightable, but places no constraint on the records.
    Visits,
    /// Abandoned or recovered carts.
    Carts,
    /// Recovered carts only.
    Purchases,
}

impl FunnelStage {
    pub const ALL: [FunnelStage; 3] = [Self::Visits, Self::Carts, Self::Purchases];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Visits    => "visits",
            Self::Carts     => "carts",
            Self::Purchases => "purchases",
        }
    }

    /// Compound predicate over the status dimension.
    pub fn admits(&self, status: CartStatus) -> bool {
        match self {
            Self::Visits    => true,
            Self::Carts     => matches!(status, CartStatus::Abandoned | CartStatus::Recovered),
            Self::Purchases => status == CartStatus::Recovered,
        }
    }
}

impl FromStr for FunnelStage {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "visits"    => Ok(Self::Visits),
            "carts"     => Ok(Self::Carts),
            "purchases" => Ok(Self::Purchases),
            other => Err(UnknownVariant { kind: "funnel stage", value: other.to_string() }),
        }
    }
}

impl fmt::Display for FunnelStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four exclusive dropdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DropdownField {
    Year,
    Month,
    Product,
    City,
}

impl DropdownField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Year    => "year",
            Self::Month   => "month",
            Self::Product => "product",
            Self::City    => "city",
        }
    }
}

/// The six click-driven toggle dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ToggleField {
    DeviceType,
    ClientType,
    AcquisitionChannel,
    Status,
    FunnelStage,
    SelectedMonth,
}

impl ToggleField {
    pub const ALL: [ToggleField; 6] = [
        Self::DeviceType,
        Self::ClientType,
        Self::AcquisitionChannel,
        Self::Status,
        Self::FunnelStage,
        Self::SelectedMonth,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DeviceType         => "deviceType",
            Self::ClientType         => "clientType",
            Self::AcquisitionChannel => "acquisitionChannel",
            Self::Status             => "status",
            Self::FunnelStage        => "funnelStage",
            Self::SelectedMonth      => "selectedMonth",
        }
    }
}

impl FromStr for ToggleField {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| UnknownVariant { kind: "toggle dimension", value: s.to_string() })
    }
}

// ── Filter state ─────────────────────────────────────────────────────────────

/// The combined dropdown and toggle selection driving the filtered view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    // Dropdowns
    pub year:                Selection<Year>,
    pub month:               Selection<Month>,
    pub product:             Selection<String>,
    pub city:                Selection<String>,
    // Toggles
    pub device_type:         Option<DeviceType>,
    pub client_type:         Option<ClientType>,
    pub acquisition_channel: Option<AcquisitionChannel>,
    pub status:              Option<CartStatus>,
    pub funnel_stage:        Option<FunnelStage>,
    pub selected_month:      Option<Month>,
}

impl FilterState {
    /// Whether any click-driven toggle is set.
    pub fn has_interactive(&self) -> bool {
        self.device_type.is_some()
            || self.client_type.is_some()
            || self.acquisition_channel.is_some()
            || self.status.is_some()
            || self.funnel_stage.is_some()
            || self.selected_month.is_some()
    }

    /// AND of every set field.
    pub fn matches(&self, record: &Record) -> bool {
        self.year.admits(&record.year)
            && self.month.admits(&record.month)
            && self.product.admits(&record.product)
            && self.city.admits(&record.city)
            && admits(self.device_type, record.device_type)
            && admits(self.client_type, record.client_type)
            && admits(self.acquisition_channel, record.acquisition_channel)
            && admits(self.status, record.status)
            && self.funnel_stage.map_or(true, |stage| stage.admits(record.status))
            && admits(self.selected_month, record.month)
    }
}

fn admits<T: PartialEq>(toggle: Option<T>, value: T) -> bool {
    toggle.map_or(true, |wanted| wanted == value)
}

// ── Filter engine ────────────────────────────────────────────────────────────

/// An ordered subset of the record store, in source order.
///
/// Holds indices into the shared record slice; never mutated after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredView {
    source:  Arc<[Record]>,
    indices: Vec<usize>,
}

impl FilteredView {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> + '_ {
        self.indices.iter().map(move |&i| &self.source[i])
    }

    /// Positions of the visible records within the store.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn to_vec(&self) -> Vec<Record> {
        self.iter().cloned().collect()
    }
}

/// Apply `state` to the full corpus. Pure; an empty result is valid.
pub fn apply_filters(records: &Arc<[Record]>, state: &FilterState) -> FilteredView {
    let indices = records
        .iter()
        .enumerate()
        .filter(|(_, r)| state.matches(r))
        .map(|(i, _)| i)
        .collect();

    FilteredView {
        source: Arc::clone(records),
        indices,
    }
}
