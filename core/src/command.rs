use crate::filter::DropdownField;
use serde::{Deserialize, Serialize};

/// Every filter mutation a UI collaborator can issue.
///
/// Toggle dimensions and values travel as plain strings: an unknown
/// dimension or value must be ignored, not rejected at parse time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum FilterCommand {
    /// Replace a dropdown value. "All" clears it.
    SetDropdown {
        field: DropdownField,
        value: String,
    },
    /// Drill-down click: set the dimension, or clear it if already active.
    Toggle {
        field: String,
        value: String,
    },
    /// Strip every toggle, keep the dropdowns.
    ClearInteractive,
    /// Back to the initial state.
    Reset,
}

impl FilterCommand {
    pub fn set_dropdown(field: DropdownField, value: impl Into<String>) -> Self {
        Self::SetDropdown { field, value: value.into() }
    }

    pub fn toggle(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Toggle { field: field.into(), value: value.into() }
    }

    /// Stable name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetDropdown { .. } => "set_dropdown",
            Self::Toggle { .. }      => "toggle",
            Self::ClearInteractive   => "clear_interactive",
            Self::Reset              => "reset",
        }
    }
}
