pub mod validation;

pub use validation::{
    handle_completed_timer, handle_deadline_timer, handle_poll_timer, handle_settle_timer,
    handle_shutdown_response, handle_status_response, handle_transition_timer,
};

use crux_core::Command;
use serde_valid::Validate;

use crate::api_post;
use crate::commands::timer::TimerOutput;
use crate::events::{Event, NetworkEvent};
use crate::model::Model;
use crate::types::{ApiError, ConnectRequest, JoinAttempt, SetupStep, WifiNetwork};
use crate::{Effect, TimerCmd};

use super::wizard::show_step;
use validation::cancel_timer;

/// Pause between the accepted join request and the validation step, so the
/// user sees the confirmation before the view changes
const JOIN_HANDOFF_MS: u64 = 1_000;

/// Grace period after a network reset for the provisioning services to come
/// back up before the wizard restarts
const RESET_SETTLE_MS: u64 = 3_000;

/// Handle network session and validation events
pub fn handle(event: NetworkEvent, model: &mut Model) -> Command<Effect, Event> {
    match event {
        NetworkEvent::Select { network } => handle_select(network, model),
        NetworkEvent::ClearSelection => handle_clear_selection(model),

        NetworkEvent::Join { password } => handle_join(password, model),
        NetworkEvent::JoinResponse(result) => handle_join_response(result, model),
        NetworkEvent::HandoffTimer(output) => handle_handoff_timer(output, model),

        // Connection validation pipeline
        NetworkEvent::PollTimer(output) => validation::handle_poll_timer(output, model),
        NetworkEvent::StatusResponse(result) => {
            validation::handle_status_response(result, model)
        }
        NetworkEvent::DeadlineTimer(output) => validation::handle_deadline_timer(output, model),
        NetworkEvent::SettleTimer(output) => validation::handle_settle_timer(output, model),
        NetworkEvent::ShutdownResponse(result) => {
            validation::handle_shutdown_response(result, model)
        }
        NetworkEvent::TransitionTimer(output) => {
            validation::handle_transition_timer(output, model)
        }
        NetworkEvent::CompletedTimer(output) => validation::handle_completed_timer(output, model),

        NetworkEvent::Reset => handle_reset(model),
        NetworkEvent::ResetResponse(result) => handle_reset_response(result, model),
        NetworkEvent::ResetSettleTimer(output) => handle_reset_settle_timer(output, model),
    }
}

/// Replace the selected network and clear the previous attempt's transient
/// UI state.
///
/// Refused while a join attempt is in progress; the previous attempt must
/// reach a terminal stage or be cancelled first.
fn handle_select(network: WifiNetwork, model: &mut Model) -> Command<Effect, Event> {
    if model.attempt_active() {
        return model.set_error_and_render(
            "Cannot select another network while a connection attempt is in progress".to_string(),
        );
    }

    model.selected_network = Some(network);
    model.join_attempt = None;
    model.connection_details.clear();
    model.error_message = None;
    model.success_message = None;

    crux_core::render::render()
}

/// Drop the selected network; cancels an in-flight attempt if one exists
fn handle_clear_selection(model: &mut Model) -> Command<Effect, Event> {
    let mut commands = vec![crux_core::render::render()];

    if let Some(attempt) = model.join_attempt.as_mut() {
        for id in attempt.take_timers() {
            commands.push(cancel_timer(id));
        }
    }

    model.join_attempt = None;
    model.selected_network = None;
    model.connection_details.clear();
    model.error_message = None;
    model.success_message = None;

    Command::all(commands)
}

/// Submit a join request for the selected network
fn handle_join(password: String, model: &mut Model) -> Command<Effect, Event> {
    let Some(network) = model.selected_network.clone() else {
        return model.set_error_and_render("No network selected".to_string());
    };

    if model.attempt_active() {
        return model
            .set_error_and_render("A connection attempt is already in progress".to_string());
    }

    if network.is_secured() && password.trim().is_empty() {
        return model.set_error_and_render("Please enter the network password".to_string());
    }

    let request = ConnectRequest {
        ssid: network.ssid.clone(),
        password: password.clone(),
    };
    if let Err(e) = request.validate() {
        return model.set_error_and_render(format!("Invalid join request: {e}"));
    }

    model.join_attempt = Some(JoinAttempt::new(network, password));
    model.connection_details = "Connecting to network...".to_string();

    api_post!(
        Network,
        NetworkEvent,
        model,
        "/api/wifi/connect",
        JoinResponse,
        "Join network",
        body_json: &request
    )
}

/// Handle the join request outcome; an accepted join schedules the handoff
/// into the validation step
fn handle_join_response(
    result: Result<(), ApiError>,
    model: &mut Model,
) -> Command<Effect, Event> {
    model.stop_loading();

    if !model.attempt_active() {
        // The attempt was cancelled while the request was in flight
        return Command::done();
    }

    match result {
        Ok(()) => {
            let handoff_id = model.allocate_timer();
            if let Some(attempt) = model.join_attempt.as_mut() {
                attempt.stage_timer = Some(handoff_id);
            }
            model.connection_details = "Connection initiated! Validating...".to_string();

            Command::all([
                crux_core::render::render(),
                TimerCmd::start(handoff_id, JOIN_HANDOFF_MS)
                    .build()
                    .then_send(|output| Event::Network(NetworkEvent::HandoffTimer(output))),
            ])
        }
        Err(error) => {
            let message = error.to_string();
            log::error!("Join request rejected: {message}");
            if let Some(attempt) = model.join_attempt.as_mut() {
                attempt.stage = crate::types::Stage::Failed {
                    message: message.clone(),
                };
            }
            model.set_error_and_render(message)
        }
    }
}

/// Handoff timer fired - move to the validation step and start the pipeline
fn handle_handoff_timer(output: TimerOutput, model: &mut Model) -> Command<Effect, Event> {
    let TimerOutput::Fired { id } = output else {
        return Command::done();
    };

    let stale = model
        .join_attempt
        .as_ref()
        .is_none_or(|attempt| attempt.stage_timer != Some(id) || attempt.is_terminal());
    if stale {
        return Command::done();
    }

    if let Some(attempt) = model.join_attempt.as_mut() {
        attempt.stage_timer = None;
    }

    Command::all([
        show_step(model, SetupStep::ConnectionValidation),
        validation::start(model),
    ])
}

/// Disconnect from WiFi and bring the provisioning hotspot back up
fn handle_reset(model: &mut Model) -> Command<Effect, Event> {
    api_post!(
        Network,
        NetworkEvent,
        model,
        "/api/wifi/reset",
        ResetResponse,
        "Network reset"
    )
}

/// Handle the reset outcome; success waits for the hotspot services to
/// restart before the wizard starts over
fn handle_reset_response(
    result: Result<(), ApiError>,
    model: &mut Model,
) -> Command<Effect, Event> {
    model.stop_loading();

    match result {
        Ok(()) => {
            let settle_id = model.allocate_timer();
            model.reset_timer = Some(settle_id);

            Command::all([
                crux_core::render::render(),
                TimerCmd::start(settle_id, RESET_SETTLE_MS)
                    .build()
                    .then_send(|output| Event::Network(NetworkEvent::ResetSettleTimer(output))),
            ])
        }
        Err(error) => {
            log::error!("Network reset failed: {error}");
            model.set_error_and_render(error.to_string())
        }
    }
}

/// Reset settle timer fired - return to a fresh wizard
fn handle_reset_settle_timer(output: TimerOutput, model: &mut Model) -> Command<Effect, Event> {
    let TimerOutput::Fired { id } = output else {
        return Command::done();
    };
    if model.reset_timer != Some(id) {
        return Command::done();
    }

    model.reset_timer = None;
    model.existing_connection = None;
    model.selected_network = None;
    model.join_attempt = None;
    model.target_service = crate::types::TargetServiceState::NotStarted;
    model.connection_details.clear();
    model.error_message = None;
    model.success_message = None;
    model.current_step = SetupStep::Welcome;
    model.progress_percent = SetupStep::Welcome.progress_percent();

    crux_core::render::render()
}
