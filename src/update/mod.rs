mod network;
mod service;
mod ui;
mod wizard;

use crux_core::Command;

use crate::events::Event;
use crate::model::Model;
use crate::Effect;

/// Main update dispatcher - routes events to domain-specific handlers
pub fn update(event: Event, model: &mut Model) -> Command<Effect, Event> {
    match event {
        // Initialization
        Event::Initialize => wizard::handle_initialize(model),

        // Wizard navigation domain
        Event::Wizard(event) => wizard::handle(event, model),

        // Network session and validation domain
        Event::Network(event) => network::handle(event, model),

        // Target service domain
        Event::Service(event) => service::handle(event, model),

        // Cancel acknowledgements carry nothing the core needs
        Event::TimerCancelled(_) => Command::done(),

        // UI actions domain
        Event::ClearError | Event::ClearSuccess => ui::handle(event, model),
    }
}
