use crux_core::Command;

use crate::api_get_quiet;
use crate::events::{Event, WizardEvent};
use crate::model::Model;
use crate::types::{ApiError, SetupStep, WifiStatus};
use crate::update_field;
use crate::Effect;

/// Handle wizard navigation events
pub fn handle(event: WizardEvent, model: &mut Model) -> Command<Effect, Event> {
    match event {
        WizardEvent::Show { step } => match SetupStep::from_index(step) {
            Some(step) => show_step(model, step),
            None => {
                log::warn!("Ignoring out-of-range wizard step {step}");
                Command::done()
            }
        },

        WizardEvent::Advance => match SetupStep::from_index(model.current_step.index() + 1) {
            Some(next) => show_step(model, next),
            None => Command::done(),
        },

        WizardEvent::Retreat => {
            match model
                .current_step
                .index()
                .checked_sub(1)
                .and_then(SetupStep::from_index)
            {
                Some(previous) => show_step(model, previous),
                None => Command::done(),
            }
        }

        WizardEvent::InitialStatusResponse(result) => handle_initial_status(result, model),
    }
}

/// Make `step` the single active step and recompute wizard progress.
///
/// A no-op when the step is already active.
pub fn show_step(model: &mut Model, step: SetupStep) -> Command<Effect, Event> {
    update_field!(
        model.current_step, step;
        model.progress_percent, step.progress_percent()
    )
}

/// Handle app start - probe the status endpoint to decide between the
/// wizard sequence and the already-provisioned view
pub fn handle_initialize(model: &mut Model) -> Command<Effect, Event> {
    model.start_loading();
    Command::all([
        crux_core::render::render(),
        api_get_quiet!(
            Wizard,
            WizardEvent,
            "/api/wifi/status",
            InitialStatusResponse,
            "WiFi status check",
            expect_json: WifiStatus
        ),
    ])
}

/// Handle the startup probe response
pub fn handle_initial_status(
    result: Result<WifiStatus, ApiError>,
    model: &mut Model,
) -> Command<Effect, Event> {
    model.is_loading = false;

    match result {
        Ok(status) if status.is_success() && status.connected && status.ssid().is_some() => {
            model.existing_connection = Some(status);
        }
        Ok(_) => {
            model.existing_connection = None;
        }
        Err(error) => {
            // Setup must stay reachable when the probe fails, so this is
            // logged rather than surfaced
            log::error!("WiFi status check failed: {error}");
        }
    }

    crux_core::render::render()
}

#[cfg(test)]
mod tests {
    use super::*;

    mod navigation {
        use super::*;

        #[test]
        fn show_sets_step_and_progress() {
            let mut model = Model::default();

            let _ = handle(WizardEvent::Show { step: 3 }, &mut model);

            assert_eq!(model.current_step, SetupStep::Services);
            assert_eq!(model.progress_percent, 80);
        }

        #[test]
        fn show_ignores_out_of_range_step() {
            let mut model = Model::default();

            let _ = handle(WizardEvent::Show { step: 9 }, &mut model);

            assert_eq!(model.current_step, SetupStep::Welcome);
            assert_eq!(model.progress_percent, 20);
        }

        #[test]
        fn show_is_idempotent_for_the_active_step() {
            let mut model = Model::default();
            let before = model.clone();

            let _ = handle(WizardEvent::Show { step: 0 }, &mut model);

            assert_eq!(model, before);
        }

        #[test]
        fn advance_walks_forward_and_stops_at_the_end() {
            let mut model = Model::default();

            for expected in [
                SetupStep::NetworkScan,
                SetupStep::ConnectionValidation,
                SetupStep::Services,
                SetupStep::Complete,
            ] {
                let _ = handle(WizardEvent::Advance, &mut model);
                assert_eq!(model.current_step, expected);
            }

            // Bounds-checked no-op at the last step
            let _ = handle(WizardEvent::Advance, &mut model);
            assert_eq!(model.current_step, SetupStep::Complete);
            assert_eq!(model.progress_percent, 100);
        }

        #[test]
        fn retreat_is_a_no_op_at_the_first_step() {
            let mut model = Model::default();

            let _ = handle(WizardEvent::Retreat, &mut model);

            assert_eq!(model.current_step, SetupStep::Welcome);
        }

        #[test]
        fn retreat_walks_backward() {
            let mut model = Model::default();
            let _ = handle(WizardEvent::Show { step: 2 }, &mut model);

            let _ = handle(WizardEvent::Retreat, &mut model);

            assert_eq!(model.current_step, SetupStep::NetworkScan);
            assert_eq!(model.progress_percent, 40);
        }
    }

    mod startup_probe {
        use super::*;

        #[test]
        fn initialize_sets_loading() {
            let mut model = Model::default();

            let _ = handle_initialize(&mut model);

            assert!(model.is_loading);
        }

        #[test]
        fn connected_device_shows_the_provisioned_view() {
            let mut model = Model::default();
            let status = WifiStatus {
                connected: true,
                ssid: Some("Home".to_string()),
                signal: Some(64),
                ..Default::default()
            };

            let _ = handle_initial_status(Ok(status.clone()), &mut model);

            assert!(!model.is_loading);
            assert_eq!(model.existing_connection, Some(status));
        }

        #[test]
        fn disconnected_device_stays_in_the_wizard() {
            let mut model = Model::default();

            let _ = handle_initial_status(Ok(WifiStatus::default()), &mut model);

            assert_eq!(model.existing_connection, None);
            assert_eq!(model.current_step, SetupStep::Welcome);
        }

        #[test]
        fn connected_without_ssid_stays_in_the_wizard() {
            let mut model = Model::default();
            let status = WifiStatus {
                connected: true,
                ssid: Some(String::new()),
                ..Default::default()
            };

            let _ = handle_initial_status(Ok(status), &mut model);

            assert_eq!(model.existing_connection, None);
        }

        #[test]
        fn probe_failure_falls_back_to_the_wizard_without_an_error() {
            let mut model = Model::default();

            let _ = handle_initial_status(
                Err(ApiError::Transport {
                    detail: "WiFi status check: connection refused".to_string(),
                }),
                &mut model,
            );

            assert_eq!(model.existing_connection, None);
            assert_eq!(model.error_message, None);
            assert_eq!(model.current_step, SetupStep::Welcome);
        }
    }
}
