use serde::{Deserialize, Serialize};

use crate::commands::timer::TimerOutput;
use crate::types::*;

/// Events that can happen in the app
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum Event {
    // Initialization
    Initialize,

    // Wizard navigation and initial status probe
    Wizard(WizardEvent),

    // Network selection, join and validation
    Network(NetworkEvent),

    // Target service handoff
    Service(ServiceEvent),

    // Resolution of a bare cancel request; carries no information
    #[serde(skip)]
    TimerCancelled(TimerOutput),

    // UI actions
    ClearError,
    ClearSuccess,
}

/// Wizard navigation events
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum WizardEvent {
    Show { step: usize },
    Advance,
    Retreat,

    // HTTP responses (internal events, skipped from serialization)
    #[serde(skip)]
    InitialStatusResponse(Result<WifiStatus, ApiError>),
}

/// Network session and connection-validation events
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum NetworkEvent {
    // Session selection
    Select { network: WifiNetwork },
    ClearSelection,

    // Join flow
    Join { password: String },
    #[serde(skip)]
    JoinResponse(Result<(), ApiError>),
    #[serde(skip)]
    HandoffTimer(TimerOutput),

    // Connection validation pipeline
    #[serde(skip)]
    PollTimer(TimerOutput),
    #[serde(skip)]
    StatusResponse(Result<WifiStatus, ApiError>),
    #[serde(skip)]
    DeadlineTimer(TimerOutput),
    #[serde(skip)]
    SettleTimer(TimerOutput),
    #[serde(skip)]
    ShutdownResponse(Result<(), ApiError>),
    #[serde(skip)]
    TransitionTimer(TimerOutput),
    #[serde(skip)]
    CompletedTimer(TimerOutput),

    // Disconnect and return to setup mode
    Reset,
    #[serde(skip)]
    ResetResponse(Result<(), ApiError>),
    #[serde(skip)]
    ResetSettleTimer(TimerOutput),
}

/// Target application service events
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum ServiceEvent {
    StartTargetService,
    #[serde(skip)]
    StartTargetServiceResponse(Result<(), ApiError>),
    #[serde(skip)]
    StartedTimer(TimerOutput),
}
