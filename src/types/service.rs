use serde::{Deserialize, Serialize};

/// State of the target application service handoff
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum TargetServiceState {
    #[default]
    NotStarted,
    Starting,
    Running,
    Failed {
        message: String,
    },
}

impl TargetServiceState {
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }
}
