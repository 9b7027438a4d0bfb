use crux_core::Command;

use crate::commands::timer::{TimerId, TimerOutput};
use crate::events::{Event, NetworkEvent};
use crate::model::Model;
use crate::types::{ApiError, AttemptFailure, SetupStep, Stage, WifiStatus};
use crate::{api_get_quiet, api_post_quiet};
use crate::{Effect, TimerCmd};

use super::super::wizard::show_step;

/// Interval between status polls while connecting
const POLL_INTERVAL_MS: u64 = 2_000;

/// Overall deadline for leaving the Connecting stage
const CONNECT_DEADLINE_MS: u64 = 30_000;

/// Settle delay after the link matches, in lieu of an active reachability
/// check
const SETTLE_DELAY_MS: u64 = 2_000;

/// Grace period after the provisioning services accept the shutdown request
const TRANSITION_GRACE_MS: u64 = 3_000;

/// How long the success message stays up before the wizard advances
const SUCCESS_DISPLAY_MS: u64 = 2_000;

/*
Join accepted → Connecting
                    │ poll /api/wifi/status every 2s,
                    │ 30s deadline armed
                    ▼
    ┌───────────────┴────────────────┐
    │                                │
observation matches           deadline fires /
target ssid                   poll errors
    │                                │
    ▼                                ▼
Validating ── settle 2s ──▶        Failed
    │
    ▼
Transitioning ── POST hotspot shutdown
    │                                │
 accepted, 3s grace            rejected / unreachable
    │                                │
    ▼                                ▼
Completed ── 2s display ──▶        Failed
(wizard advances to Services)
*/

/// Enter the Connecting stage: arm the overall deadline and the first
/// status poll.
///
/// Both timer handles are recorded on the attempt; a firing whose id is no
/// longer recorded is stale and ignored, so a quickly restarted attempt can
/// never be touched by its predecessor's timers.
pub fn start(model: &mut Model) -> Command<Effect, Event> {
    let Some(ssid) = model
        .join_attempt
        .as_ref()
        .filter(|attempt| attempt.stage == Stage::Connecting)
        .map(|attempt| attempt.target.ssid.clone())
    else {
        return Command::done();
    };

    let deadline_id = model.allocate_timer();
    let poll_id = model.allocate_timer();
    if let Some(attempt) = model.join_attempt.as_mut() {
        attempt.deadline_timer = Some(deadline_id);
        attempt.poll_timer = Some(poll_id);
    }
    model.connection_details = format!("Establishing connection to {ssid}...");

    Command::all([
        crux_core::render::render(),
        TimerCmd::start(deadline_id, CONNECT_DEADLINE_MS)
            .build()
            .then_send(|output| Event::Network(NetworkEvent::DeadlineTimer(output))),
        TimerCmd::start(poll_id, POLL_INTERVAL_MS)
            .build()
            .then_send(|output| Event::Network(NetworkEvent::PollTimer(output))),
    ])
}

/// Poll timer fired - issue one status query.
///
/// The next poll is armed only once the response arrives, so there is never
/// more than one query in flight and never more than one live poll timer.
pub fn handle_poll_timer(output: TimerOutput, model: &mut Model) -> Command<Effect, Event> {
    let TimerOutput::Fired { id } = output else {
        return Command::done();
    };

    let Some(attempt) = model.join_attempt.as_mut() else {
        return Command::done();
    };
    if attempt.poll_timer != Some(id) || attempt.stage != Stage::Connecting {
        return Command::done();
    }
    attempt.poll_timer = None;

    api_get_quiet!(
        Network,
        NetworkEvent,
        "/api/wifi/status",
        StatusResponse,
        "Connection status",
        expect_json: WifiStatus
    )
}

/// Handle one status observation while connecting
pub fn handle_status_response(
    result: Result<WifiStatus, ApiError>,
    model: &mut Model,
) -> Command<Effect, Event> {
    let connecting = model
        .join_attempt
        .as_ref()
        .is_some_and(|attempt| attempt.stage == Stage::Connecting);
    if !connecting {
        // Response from a poll that outlived its attempt
        return Command::done();
    }

    let status = match result {
        Ok(status) if status.is_success() => status,
        Ok(status) => {
            return fail_attempt(
                model,
                AttemptFailure::Poll(ApiError::Protocol {
                    detail: format!("Connection status reported '{}'", status.status),
                }),
            )
        }
        Err(error) => return fail_attempt(model, AttemptFailure::Poll(error)),
    };

    let Some(ssid) = model
        .join_attempt
        .as_ref()
        .map(|attempt| attempt.target.ssid.clone())
    else {
        return Command::done();
    };

    if status.matches(&ssid) {
        advance_to_validating(status, model)
    } else {
        // Not there yet; the message is cosmetic, not a transition
        model.connection_details =
            format!("Still connecting to {ssid}...\nThis may take a moment.");
        schedule_next_poll(model)
    }
}

/// A matching observation: stop polling, drop the deadline and let the link
/// settle before moving on
fn advance_to_validating(status: WifiStatus, model: &mut Model) -> Command<Effect, Event> {
    let settle_id = model.allocate_timer();
    let mut commands = vec![crux_core::render::render()];

    if let Some(attempt) = model.join_attempt.as_mut() {
        attempt.observed_signal = status.signal;
        attempt.stage = Stage::Validating;
        attempt.stage_timer = Some(settle_id);
        // The deadline only covers Connecting; cancel it the moment we
        // leave so it can never fire into a matched attempt
        if let Some(deadline_id) = attempt.deadline_timer.take() {
            commands.push(cancel_timer(deadline_id));
        }
    }

    let signal = status
        .signal
        .map_or_else(|| "unknown".to_string(), |s| format!("{s}%"));
    model.connection_details = format!(
        "Connected to: {}\nSignal: {signal}\nValidating internet connectivity...",
        status.ssid().unwrap_or_default()
    );

    commands.push(
        TimerCmd::start(settle_id, SETTLE_DELAY_MS)
            .build()
            .then_send(|output| Event::Network(NetworkEvent::SettleTimer(output))),
    );
    Command::all(commands)
}

fn schedule_next_poll(model: &mut Model) -> Command<Effect, Event> {
    let poll_id = model.allocate_timer();
    if let Some(attempt) = model.join_attempt.as_mut() {
        attempt.poll_timer = Some(poll_id);
    }

    Command::all([
        crux_core::render::render(),
        TimerCmd::start(poll_id, POLL_INTERVAL_MS)
            .build()
            .then_send(|output| Event::Network(NetworkEvent::PollTimer(output))),
    ])
}

/// Deadline fired - the attempt never left Connecting in time
pub fn handle_deadline_timer(output: TimerOutput, model: &mut Model) -> Command<Effect, Event> {
    let TimerOutput::Fired { id } = output else {
        return Command::done();
    };

    let live = model
        .join_attempt
        .as_mut()
        .filter(|attempt| attempt.deadline_timer == Some(id))
        .map(|attempt| {
            attempt.deadline_timer = None;
        })
        .is_some();
    if !live {
        return Command::done();
    }

    fail_attempt(model, AttemptFailure::Timeout)
}

/// Settle timer fired - the link had its grace period, shut the
/// provisioning services down
pub fn handle_settle_timer(output: TimerOutput, model: &mut Model) -> Command<Effect, Event> {
    let TimerOutput::Fired { id } = output else {
        return Command::done();
    };

    let Some(attempt) = model.join_attempt.as_mut() else {
        return Command::done();
    };
    if attempt.stage_timer != Some(id) || attempt.stage != Stage::Validating {
        return Command::done();
    }
    attempt.stage_timer = None;
    attempt.stage = Stage::Transitioning;

    model.connection_details = "Connection validated!\nSwitching off setup mode...\n\
                                Transitioning to home network..."
        .to_string();

    Command::all([
        crux_core::render::render(),
        api_post_quiet!(
            Network,
            NetworkEvent,
            "/api/services/hotspot/shutdown",
            ShutdownResponse,
            "Service transition"
        ),
    ])
}

/// Handle the provisioning-shutdown outcome
pub fn handle_shutdown_response(
    result: Result<(), ApiError>,
    model: &mut Model,
) -> Command<Effect, Event> {
    let transitioning = model
        .join_attempt
        .as_ref()
        .is_some_and(|attempt| attempt.stage == Stage::Transitioning);
    if !transitioning {
        return Command::done();
    }

    match result {
        Ok(()) => {
            let grace_id = model.allocate_timer();
            if let Some(attempt) = model.join_attempt.as_mut() {
                attempt.stage_timer = Some(grace_id);
            }

            TimerCmd::start(grace_id, TRANSITION_GRACE_MS)
                .build()
                .then_send(|output| Event::Network(NetworkEvent::TransitionTimer(output)))
        }
        Err(error) => fail_attempt(model, AttemptFailure::ServiceTransition(error)),
    }
}

/// Transition grace elapsed - the attempt succeeded
pub fn handle_transition_timer(output: TimerOutput, model: &mut Model) -> Command<Effect, Event> {
    let TimerOutput::Fired { id } = output else {
        return Command::done();
    };

    let Some(attempt) = model.join_attempt.as_mut() else {
        return Command::done();
    };
    if attempt.stage_timer != Some(id) || attempt.stage != Stage::Transitioning {
        return Command::done();
    }

    attempt.stage = Stage::Completed;
    let display_id = model.allocate_timer();
    if let Some(attempt) = model.join_attempt.as_mut() {
        attempt.stage_timer = Some(display_id);
    }

    model.connection_details = "Successfully connected to home network!\nSetup mode disabled.\n\
                                Ready to start Home Assistant."
        .to_string();

    Command::all([
        crux_core::render::render(),
        TimerCmd::start(display_id, SUCCESS_DISPLAY_MS)
            .build()
            .then_send(|output| Event::Network(NetworkEvent::CompletedTimer(output))),
    ])
}

/// Success display elapsed - hand the user over to the services step
pub fn handle_completed_timer(output: TimerOutput, model: &mut Model) -> Command<Effect, Event> {
    let TimerOutput::Fired { id } = output else {
        return Command::done();
    };

    let live = model
        .join_attempt
        .as_mut()
        .filter(|attempt| attempt.stage_timer == Some(id) && attempt.stage == Stage::Completed)
        .map(|attempt| {
            attempt.stage_timer = None;
        })
        .is_some();
    if !live {
        return Command::done();
    }

    show_step(model, SetupStep::Services)
}

/// Force the attempt into Failed: cancel every live timer, record the
/// message and surface it.
///
/// Cancellation is atomic with the stage transition - the handles are
/// cleared here, so anything already queued will fail the stale-id check.
fn fail_attempt(model: &mut Model, failure: AttemptFailure) -> Command<Effect, Event> {
    let message = failure.message();
    log::error!("Join attempt failed: {message}");

    let mut commands = vec![crux_core::render::render()];
    if let Some(attempt) = model.join_attempt.as_mut() {
        for id in attempt.take_timers() {
            commands.push(cancel_timer(id));
        }
        attempt.stage = Stage::Failed {
            message: message.clone(),
        };
    }

    model.connection_details = message.clone();
    model.error_message = Some(message);
    model.is_loading = false;

    Command::all(commands)
}

/// Ask the shell to cancel a timer; the resolution carries nothing of
/// interest
pub(crate) fn cancel_timer(id: TimerId) -> Command<Effect, Event> {
    TimerCmd::cancel(id).build().then_send(Event::TimerCancelled)
}
