use crux_core::Command;

use crate::api_post;
use crate::commands::timer::TimerOutput;
use crate::events::{Event, ServiceEvent};
use crate::model::Model;
use crate::types::{ApiError, SetupStep, TargetServiceState};
use crate::{Effect, TimerCmd};

use super::wizard::show_step;

/// How long the running confirmation stays up before the wizard advances
const SERVICE_DISPLAY_MS: u64 = 2_000;

/// Handle target application service events
pub fn handle(event: ServiceEvent, model: &mut Model) -> Command<Effect, Event> {
    match event {
        ServiceEvent::StartTargetService => handle_start(model),
        ServiceEvent::StartTargetServiceResponse(result) => handle_start_response(result, model),
        ServiceEvent::StartedTimer(output) => handle_started_timer(output, model),
    }
}

/// Request the target application service start
fn handle_start(model: &mut Model) -> Command<Effect, Event> {
    if matches!(
        model.target_service,
        TargetServiceState::Starting | TargetServiceState::Running
    ) {
        return Command::done();
    }

    model.target_service = TargetServiceState::Starting;

    api_post!(
        Service,
        ServiceEvent,
        model,
        "/api/services/homeassistant/start",
        StartTargetServiceResponse,
        "Start Home Assistant"
    )
}

/// Handle the service start outcome
fn handle_start_response(
    result: Result<(), ApiError>,
    model: &mut Model,
) -> Command<Effect, Event> {
    model.stop_loading();

    match result {
        Ok(()) => {
            model.target_service = TargetServiceState::Running;
            let display_id = model.allocate_timer();
            model.service_timer = Some(display_id);

            Command::all([
                crux_core::render::render(),
                TimerCmd::start(display_id, SERVICE_DISPLAY_MS)
                    .build()
                    .then_send(|output| Event::Service(ServiceEvent::StartedTimer(output))),
            ])
        }
        Err(error) => {
            let message = error.to_string();
            log::error!("Target service start failed: {message}");
            model.target_service = TargetServiceState::Failed {
                message: message.clone(),
            };
            model.set_error_and_render(message)
        }
    }
}

/// Running confirmation elapsed - finish the wizard
fn handle_started_timer(output: TimerOutput, model: &mut Model) -> Command<Effect, Event> {
    let TimerOutput::Fired { id } = output else {
        return Command::done();
    };
    if model.service_timer != Some(id) {
        return Command::done();
    }

    model.service_timer = None;
    show_step(model, SetupStep::Complete)
}
