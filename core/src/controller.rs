//! Interaction controller: the only code that produces a new filter state.
//!
//! Transitions are pure: each takes the current state and returns the next.
//!
//! RULES:
//!   - Dropdowns are replaced unconditionally.
//!   - Toggles flip: re-selecting the active value unsets the field,
//!     any other value replaces it. One transition serves all six fields.
//!   - An unknown toggle dimension or value leaves the state unchanged.
//!   - clear_interactive never touches a dropdown.

use crate::{
    command::FilterCommand,
    error::{DashError, DashResult},
    filter::{DropdownField, FilterState, FunnelStage, Selection, ToggleField, ALL},
    record::{AcquisitionChannel, CartStatus, ClientType, DeviceType},
    types::Month,
};
use std::str::FromStr;

/// A parsed toggle target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleValue {
    Device(DeviceType),
    Client(ClientType),
    Channel(AcquisitionChannel),
    Status(CartStatus),
    Stage(FunnelStage),
    Month(Month),
}

impl ToggleValue {
    /// Parse `raw` for `field`. `None` when the value is not in the field's domain.
    pub fn parse(field: ToggleField, raw: &str) -> Option<Self> {
        match field {
            ToggleField::DeviceType         => raw.parse().ok().map(Self::Device),
            ToggleField::ClientType         => raw.parse().ok().map(Self::Client),
            ToggleField::AcquisitionChannel => raw.parse().ok().map(Self::Channel),
            ToggleField::Status             => raw.parse().ok().map(Self::Status),
            ToggleField::FunnelStage        => raw.parse().ok().map(Self::Stage),
            ToggleField::SelectedMonth      => raw
                .trim()
                .parse::<Month>()
                .ok()
                .filter(|m| (1..=12).contains(m))
                .map(Self::Month),
        }
    }

    pub fn field(&self) -> ToggleField {
        match self {
            Self::Device(_)  => ToggleField::DeviceType,
            Self::Client(_)  => ToggleField::ClientType,
            Self::Channel(_) => ToggleField::AcquisitionChannel,
            Self::Status(_)  => ToggleField::Status,
            Self::Stage(_)   => ToggleField::FunnelStage,
            Self::Month(_)   => ToggleField::SelectedMonth,
        }
    }
}

fn flip<T: PartialEq>(slot: &mut Option<T>, value: T) {
    if slot.as_ref() == Some(&value) {
        *slot = None;
    } else {
        *slot = Some(value);
    }
}

/// Typed toggle transition.
pub fn toggle(state: &FilterState, value: ToggleValue) -> FilterState {
    let mut next = state.clone();
    match value {
        ToggleValue::Device(v)  => flip(&mut next.device_type, v),
        ToggleValue::Client(v)  => flip(&mut next.client_type, v),
        ToggleValue::Channel(v) => flip(&mut next.acquisition_channel, v),
        ToggleValue::Status(v)  => flip(&mut next.status, v),
        ToggleValue::Stage(v)   => flip(&mut next.funnel_stage, v),
        ToggleValue::Month(v)   => flip(&mut next.selected_month, v),
    }
    next
}

/// Toggle from a raw click event. Unknown dimension or value is a no-op.
pub fn toggle_raw(state: &FilterState, field: &str, value: &str) -> FilterState {
    let parsed = ToggleField::from_str(field)
        .ok()
        .and_then(|f| ToggleValue::parse(f, value));

    match parsed {
        Some(v) => toggle(state, v),
        None => {
            log::debug!("controller: ignoring toggle {field}={value}");
            state.clone()
        }
    }
}

/// Replace one dropdown. "All" resets it; year and month must be numeric.
pub fn set_dropdown(state: &FilterState, field: DropdownField, value: &str) -> DashResult<FilterState> {
    let value = value.trim();
    let mut next = state.clone();
    match field {
        DropdownField::Year    => next.year = parse_selection(field, value)?,
        DropdownField::Month   => {
            let month: Selection<Month> = parse_selection(field, value)?;
            if let Selection::Only(m) = month {
                if !(1..=12).contains(&m) {
                    return Err(invalid_dropdown(field, value));
                }
            }
            next.month = month;
        }
        DropdownField::Product => next.product = text_selection(value),
        DropdownField::City    => next.city = text_selection(value),
    }
    Ok(next)
}

/// Unset all six toggles; dropdowns are kept.
pub fn clear_interactive(state: &FilterState) -> FilterState {
    FilterState {
        year:    state.year.clone(),
        month:   state.month.clone(),
        product: state.product.clone(),
        city:    state.city.clone(),
        ..FilterState::default()
    }
}

pub fn reset() -> FilterState {
    FilterState::default()
}

/// Dispatch a command to its transition.
pub fn apply(state: &FilterState, command: &FilterCommand) -> DashResult<FilterState> {
    match command {
        FilterCommand::SetDropdown { field, value } => set_dropdown(state, *field, value),
        FilterCommand::Toggle { field, value }      => Ok(toggle_raw(state, field, value)),
        FilterCommand::ClearInteractive             => Ok(clear_interactive(state)),
        FilterCommand::Reset                        => Ok(reset()),
    }
}

fn parse_selection<T: FromStr>(field: DropdownField, value: &str) -> DashResult<Selection<T>> {
    if value == ALL {
        return Ok(Selection::All);
    }
    value
        .parse()
        .map(Selection::Only)
        .map_err(|_| invalid_dropdown(field, value))
}

fn text_selection(value: &str) -> Selection<String> {
    if value == ALL {
        Selection::All
    } else {
        Selection::Only(value.to_string())
    }
}

fn invalid_dropdown(field: DropdownField, value: &str) -> DashError {
    DashError::InvalidDropdownValue {
        field: field.as_str(),
        value: value.to_string(),
    }
}
