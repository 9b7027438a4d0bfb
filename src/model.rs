use serde::{Deserialize, Serialize};

use crate::commands::timer::TimerId;
use crate::types::*;

/// Application Model - the complete state
/// Also serves as the ViewModel when serialized (passwords are excluded)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Model {
    // Wizard state
    pub current_step: SetupStep,
    pub progress_percent: u8,

    /// Connection found at startup; when set, the shell shows the
    /// already-provisioned view instead of the wizard sequence
    pub existing_connection: Option<WifiStatus>,

    // Network session state
    /// The single currently-selected network; fixed for the duration of a
    /// join attempt
    pub selected_network: Option<WifiNetwork>,

    // Connection validation state
    pub join_attempt: Option<JoinAttempt>,
    /// Progressive status display for the validation step
    pub connection_details: String,

    // Target service state
    pub target_service: TargetServiceState,

    // UI state
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub success_message: Option<String>,

    // Timer bookkeeping
    /// Monotonic source for timer handles; never reset within a session
    pub next_timer_id: u64,
    /// Live display timer after the target service started
    pub service_timer: Option<TimerId>,
    /// Live settle timer after a network reset
    pub reset_timer: Option<TimerId>,
}

impl Default for Model {
    fn default() -> Self {
        let current_step = SetupStep::default();
        Self {
            current_step,
            progress_percent: current_step.progress_percent(),
            existing_connection: None,
            selected_network: None,
            join_attempt: None,
            connection_details: String::new(),
            target_service: TargetServiceState::default(),
            is_loading: false,
            error_message: None,
            success_message: None,
            next_timer_id: 0,
            service_timer: None,
            reset_timer: None,
        }
    }
}

impl Model {
    /// Allocate a fresh timer handle, unique within this session
    pub fn allocate_timer(&mut self) -> TimerId {
        self.next_timer_id += 1;
        TimerId(self.next_timer_id)
    }

    /// Whether a join attempt exists and has not reached a terminal stage
    pub fn attempt_active(&self) -> bool {
        self.join_attempt
            .as_ref()
            .is_some_and(|attempt| !attempt.is_terminal())
    }

    /// Start a loading operation (sets is_loading=true, clears error)
    pub fn start_loading(&mut self) {
        self.is_loading = true;
        self.error_message = None;
    }

    /// Stop loading and clear error
    pub fn stop_loading(&mut self) {
        self.is_loading = false;
        self.error_message = None;
    }

    /// Set an error message and stop loading
    pub fn set_error(&mut self, error: String) {
        self.is_loading = false;
        self.error_message = Some(error);
    }

    /// Set an error message, stop loading, and return a render command
    ///
    /// This is a convenience method that combines `set_error()` with
    /// `render()`, which is a very common pattern throughout the codebase.
    pub fn set_error_and_render(
        &mut self,
        error: String,
    ) -> crux_core::Command<crate::Effect, crate::events::Event> {
        self.set_error(error);
        crux_core::render::render()
    }

    /// Clear the error message without affecting the loading state.
    pub fn clear_error(&mut self) {
        self.error_message = None;
    }
}
