//! Interaction controller tests: toggle semantics and dropdown updates.

use cartdash_core::{
    command::FilterCommand,
    controller::{self, ToggleValue},
    error::DashError,
    filter::{DropdownField, FilterState, FunnelStage, Selection, ToggleField},
    record::{AcquisitionChannel, CartStatus, ClientType, DeviceType},
};

// ── Helpers ──────────────────────────────────────────────────────────────────

/// A state with every dropdown and toggle set.
fn busy_state() -> FilterState {
    FilterState {
        year:                Selection::Only(2023),
        month:               Selection::Only(4),
        product:             Selection::Only("Huile de soin".into()),
        city:                Selection::Only("Rennes".into()),
        device_type:         Some(DeviceType::Tablet),
        client_type:         Some(ClientType::ReturningClient),
        acquisition_channel: Some(AcquisitionChannel::Social),
        status:              Some(CartStatus::Abandoned),
        funnel_stage:        Some(FunnelStage::Carts),
        selected_month:      Some(4),
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// Toggling the same value twice restores the field, for every dimension.
#[test]
fn toggle_is_an_involution() {
    let from_unset = [
        ("deviceType", "Mobile"),
        ("clientType", "NewVisitor"),
        ("acquisitionChannel", "PaidAds"),
        ("status", "Recovered"),
        ("funnelStage", "purchases"),
        ("selectedMonth", "11"),
    ];
    // The values busy_state already holds: first click clears, second restores.
    let from_active = [
        ("deviceType", "Tablet"),
        ("clientType", "ReturningClient"),
        ("acquisitionChannel", "Social"),
        ("status", "Abandoned"),
        ("funnelStage", "carts"),
        ("selectedMonth", "4"),
    ];

    for (start, clicks) in [(FilterState::default(), from_unset), (busy_state(), from_active)] {
        for (field, value) in clicks {
            let once = controller::toggle_raw(&start, field, value);
            assert_ne!(once, start, "{field}={value} should change the state");
            let twice = controller::toggle_raw(&once, field, value);
            assert_eq!(twice, start, "{field}={value} toggled twice must round-trip");
        }
    }
}

/// From a different active value, two clicks end unset rather than restored.
#[test]
fn second_click_on_new_value_clears_the_field() {
    let start = busy_state();
    let once = controller::toggle_raw(&start, "deviceType", "Mobile");
    let twice = controller::toggle_raw(&once, "deviceType", "Mobile");

    assert_eq!(once.device_type, Some(DeviceType::Mobile));
    assert_eq!(twice.device_type, None);
}

/// Clicking a different value replaces the active one.
#[test]
fn toggle_replaces_a_different_value() {
    let state = controller::toggle_raw(&FilterState::default(), "deviceType", "Mobile");
    assert_eq!(state.device_type, Some(DeviceType::Mobile));

    let state = controller::toggle_raw(&state, "deviceType", "Desktop");
    assert_eq!(state.device_type, Some(DeviceType::Desktop));
}

/// A toggle only touches its own field.
#[test]
fn toggle_leaves_other_fields_alone() {
    let start = busy_state();
    let next = controller::toggle(&start, ToggleValue::Channel(AcquisitionChannel::Email));

    assert_eq!(next.acquisition_channel, Some(AcquisitionChannel::Email));
    assert_eq!(
        FilterState { acquisition_channel: start.acquisition_channel, ..next },
        start
    );
}

/// Unknown dimensions and out-of-domain values are ignored, never errors.
#[test]
fn unknown_toggle_input_is_a_no_op() {
    let start = busy_state();

    for (field, value) in [
        ("colour", "blue"),
        ("deviceType", "Smartwatch"),
        ("status", "Refunded"),
        ("funnelStage", "checkout"),
        ("selectedMonth", "13"),
        ("selectedMonth", "March"),
        ("year", "2023"),
    ] {
        let next = controller::toggle_raw(&start, field, value);
        assert_eq!(next, start, "{field}={value} must leave the state unchanged");
    }
}

/// Legacy French click labels resolve like the canonical names.
#[test]
fn legacy_labels_toggle_like_canonical_names() {
    let state = controller::toggle_raw(&FilterState::default(), "deviceType", "Tablette");
    assert_eq!(state.device_type, Some(DeviceType::Tablet));

    let state = controller::toggle_raw(&state, "deviceType", "Tablet");
    assert_eq!(state.device_type, None);
}

#[test]
fn clear_interactive_keeps_dropdowns() {
    let start = controller::set_dropdown(&FilterState::default(), DropdownField::Year, "2023").unwrap();
    let start = controller::toggle_raw(&start, "deviceType", "Mobile");
    assert_eq!(start.year, Selection::Only(2023));
    assert_eq!(start.device_type, Some(DeviceType::Mobile));

    let cleared = controller::clear_interactive(&start);
    assert_eq!(cleared.year, Selection::Only(2023));
    assert_eq!(cleared.device_type, None);
}

#[test]
fn clear_interactive_unsets_all_six_toggles() {
    let cleared = controller::clear_interactive(&busy_state());

    assert!(!cleared.has_interactive());
    for field in ToggleField::ALL {
        let unchanged = match field {
            ToggleField::DeviceType         => cleared.device_type.is_none(),
            ToggleField::ClientType         => cleared.client_type.is_none(),
            ToggleField::AcquisitionChannel => cleared.acquisition_channel.is_none(),
            ToggleField::Status             => cleared.status.is_none(),
            ToggleField::FunnelStage        => cleared.funnel_stage.is_none(),
            ToggleField::SelectedMonth      => cleared.selected_month.is_none(),
        };
        assert!(unchanged, "{} still set", field.as_str());
    }
    assert_eq!(cleared.product, Selection::Only("Huile de soin".into()));
    assert_eq!(cleared.city, Selection::Only("Rennes".into()));
    assert_eq!(cleared.month, Selection::Only(4));
}

/// Dropdowns replace unconditionally; selecting the same value twice keeps it.
#[test]
fn set_dropdown_has_no_toggle_semantics() {
    let once = controller::set_dropdown(&FilterState::default(), DropdownField::City, "Lyon").unwrap();
    let twice = controller::set_dropdown(&once, DropdownField::City, "Lyon").unwrap();
    assert_eq!(twice.city, Selection::Only("Lyon".into()));

    let all = controller::set_dropdown(&twice, DropdownField::City, "All").unwrap();
    assert!(all.city.is_all());
}

/// Year and month are numeric: "03" and "3" select the same month.
#[test]
fn year_and_month_dropdowns_compare_numerically() {
    let a = controller::set_dropdown(&FilterState::default(), DropdownField::Month, "03").unwrap();
    let b = controller::set_dropdown(&FilterState::default(), DropdownField::Month, "3").unwrap();
    assert_eq!(a, b);
    assert_eq!(a.month, Selection::Only(3));

    let year = controller::set_dropdown(&FilterState::default(), DropdownField::Year, " 2024 ").unwrap();
    assert_eq!(year.year, Selection::Only(2024));
}

#[test]
fn non_numeric_year_is_rejected() {
    let err = controller::set_dropdown(&FilterState::default(), DropdownField::Year, "last year")
        .unwrap_err();
    assert!(
        matches!(err, DashError::InvalidDropdownValue { field: "year", .. }),
        "unexpected error: {err}"
    );

    let err = controller::set_dropdown(&FilterState::default(), DropdownField::Month, "13");
    assert!(err.is_err(), "month 13 must be rejected");
}

#[test]
fn reset_returns_to_initial_state() {
    let next = controller::apply(&busy_state(), &FilterCommand::Reset).unwrap();
    assert_eq!(next, FilterState::default());
}

/// Commands deserialize from the runner's JSON shape.
#[test]
fn commands_parse_from_json() {
    let cmd: FilterCommand =
        serde_json::from_str(r#"{"cmd":"toggle","field":"funnelStage","value":"carts"}"#).unwrap();
    let next = controller::apply(&FilterState::default(), &cmd).unwrap();
    assert_eq!(next.funnel_stage, Some(FunnelStage::Carts));

    let cmd: FilterCommand =
        serde_json::from_str(r#"{"cmd":"set_dropdown","field":"product","value":"Crème mains"}"#)
            .unwrap();
    let next = controller::apply(&next, &cmd).unwrap();
    assert_eq!(next.product, Selection::Only("Crème mains".into()));

    let cmd: FilterCommand = serde_json::from_str(r#"{"cmd":"clear_interactive"}"#).unwrap();
    let next = controller::apply(&next, &cmd).unwrap();
    assert_eq!(next.funnel_stage, None);
    assert_eq!(next.product, Selection::Only("Crème mains".into()));
}
