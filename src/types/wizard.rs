use serde::{Deserialize, Serialize};

/// Number of steps in the setup wizard
pub const STEP_COUNT: usize = 5;

/// The five wizard steps, in order.
///
/// The already-provisioned view shown when the device boots with an
/// established connection is not part of this sequence; see
/// `Model::existing_connection`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum SetupStep {
    #[default]
    Welcome,
    NetworkScan,
    ConnectionValidation,
    Services,
    Complete,
}

impl SetupStep {
    pub fn index(self) -> usize {
        match self {
            Self::Welcome => 0,
            Self::NetworkScan => 1,
            Self::ConnectionValidation => 2,
            Self::Services => 3,
            Self::Complete => 4,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Welcome),
            1 => Some(Self::NetworkScan),
            2 => Some(Self::ConnectionValidation),
            3 => Some(Self::Services),
            4 => Some(Self::Complete),
            _ => None,
        }
    }

    /// Monotonic progress through the wizard, as a percentage
    pub fn progress_percent(self) -> u8 {
        (((self.index() + 1) * 100) / STEP_COUNT) as u8
    }
}
