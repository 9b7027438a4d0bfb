use serde::{Deserialize, Serialize};

use crate::commands::timer::TimerId;
use crate::types::common::ApiError;
use crate::types::network::WifiNetwork;

/// Stage of the connection-validation pipeline.
///
/// Progress is strictly forward; `Failed` is the only exception and is
/// reachable from every non-terminal stage.
///
/// # State Machine Diagram
///
/// ```text
///                ┌──────────────┐
///                │  Connecting  │  status polling + overall deadline
///                └──────┬───────┘
///        matching       │
///        observation    │
///                       ▼
///                ┌──────────────┐
///                │  Validating  │  settle delay, no re-polling
///                └──────┬───────┘
///        settle timer   │
///        fires          │
///                       ▼
///                ┌───────────────┐
///                │ Transitioning │  hotspot/DHCP shutdown request
///                └──────┬────────┘
///        shutdown ok,   │
///        grace elapsed  │
///                       ▼
///                ┌──────────────┐
///                │  Completed   │  success shown, wizard advances
///                └──────────────┘
///
///   Connecting ──(deadline, poll error)──────────────┐
///   Validating ──(poll error carried over)───────────┼──▶ Failed
///   Transitioning ──(shutdown rejected/unreachable)──┘
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum Stage {
    /// Waiting for the device to associate with the target network
    #[default]
    Connecting,
    /// Link is up on the right ssid; letting DHCP and routing settle
    Validating,
    /// Shutting down the provisioning hotspot and DHCP services
    Transitioning,
    /// Terminal success
    Completed,
    /// Terminal failure; never auto-retried
    Failed { message: String },
}

impl Stage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed { .. })
    }
}

/// Why a join attempt failed
///
/// `Poll` and `ServiceTransition` wrap the transport/protocol taxonomy of
/// the underlying call; `Timeout` means the overall deadline elapsed while
/// still connecting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum AttemptFailure {
    Poll(ApiError),
    ServiceTransition(ApiError),
    Timeout,
}

impl AttemptFailure {
    /// The user-facing message displayed in place of the progress details
    pub fn message(&self) -> String {
        match self {
            Self::Poll(error) => format!("Connection failed: {error}"),
            Self::ServiceTransition(error) => {
                format!("Error during service transition: {error}")
            }
            Self::Timeout => {
                "Connection timeout. Please check your password and try again.".to_string()
            }
        }
    }
}

/// One user-initiated cycle of joining a network and validating the result.
///
/// Exactly one attempt exists at a time. The target network is copied in at
/// join time and immutable for the attempt's lifetime. Timer handles are the
/// attempt's bookkeeping for the stale-firing guard: a timer whose id is no
/// longer recorded here must be ignored when it fires.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct JoinAttempt {
    pub target: WifiNetwork,
    #[serde(skip)]
    pub password: String,
    pub stage: Stage,
    /// Signal strength recorded from the matching observation
    pub observed_signal: Option<u8>,
    /// Live status-poll timer, at most one at any moment
    pub poll_timer: Option<TimerId>,
    /// Live overall-deadline timer; armed only while Connecting
    pub deadline_timer: Option<TimerId>,
    /// Live stage-sequencing timer (handoff, settle, transition grace,
    /// success display)
    pub stage_timer: Option<TimerId>,
}

impl JoinAttempt {
    pub fn new(target: WifiNetwork, password: String) -> Self {
        Self {
            target,
            password,
            stage: Stage::Connecting,
            observed_signal: None,
            poll_timer: None,
            deadline_timer: None,
            stage_timer: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.stage.is_terminal()
    }

    /// Clear and return every live timer handle, for cancellation
    pub fn take_timers(&mut self) -> Vec<TimerId> {
        [
            self.poll_timer.take(),
            self.deadline_timer.take(),
            self.stage_timer.take(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connecting_is_the_initial_stage() {
        let attempt = JoinAttempt::new(WifiNetwork::default(), String::new());
        assert_eq!(attempt.stage, Stage::Connecting);
        assert!(!attempt.is_terminal());
    }

    #[test]
    fn completed_and_failed_are_terminal() {
        assert!(Stage::Completed.is_terminal());
        assert!(Stage::Failed {
            message: "boom".to_string()
        }
        .is_terminal());
        assert!(!Stage::Connecting.is_terminal());
        assert!(!Stage::Validating.is_terminal());
        assert!(!Stage::Transitioning.is_terminal());
    }

    #[test]
    fn take_timers_clears_all_handles() {
        let mut attempt = JoinAttempt::new(WifiNetwork::default(), String::new());
        attempt.poll_timer = Some(TimerId(1));
        attempt.deadline_timer = Some(TimerId(2));
        attempt.stage_timer = Some(TimerId(3));

        let taken = attempt.take_timers();

        assert_eq!(taken, vec![TimerId(1), TimerId(2), TimerId(3)]);
        assert_eq!(attempt.poll_timer, None);
        assert_eq!(attempt.deadline_timer, None);
        assert_eq!(attempt.stage_timer, None);
    }

    #[test]
    fn timeout_message_mentions_the_password() {
        assert!(AttemptFailure::Timeout.message().contains("password"));
    }

    #[test]
    fn transition_failure_message_names_the_step() {
        let failure = AttemptFailure::ServiceTransition(ApiError::Protocol {
            detail: "Service transition failed: hotspot still up".to_string(),
        });
        assert!(failure.message().starts_with("Error during service transition:"));
    }
}
