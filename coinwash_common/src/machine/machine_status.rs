use ::core::{fmt::Display, str::FromStr};

use ::anyhow::anyhow;
use ::serde::{Deserialize, Serialize};

use crate::error::CoinwashError;

/// Status of a washing machine.
///
/// Legal moves through [MachineStatus::can_be_set_to]:
/// - `Available` -> `Maintenance`, and back
/// - `Running` -> `Available` | `Maintenance`
/// - setting the current status again is a no-op, except for `Running`
///
/// `Running` is only entered by starting a machine with enough coins,
/// which is handled by [super::MachineInfo::start], never by a status update.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MachineStatus {
    Available,
    Running,
    Maintenance,
}

impl MachineStatus {
    /// Whether a direct status update may move a machine from `self` to `target`.
    pub fn can_be_set_to(&self, target: &MachineStatus) -> bool {
        use MachineStatus::*;
        match (self, target) {
            (_, Running) => false,
            (Available | Running | Maintenance, Available | Maintenance) => true,
        }
    }
}

impl Display for MachineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Available => "AVAILABLE",
            Self::Running => "RUNNING",
            Self::Maintenance => "MAINTENANCE",
        };
        f.pad(s)
    }
}

/// Parse the upper case name, ignoring case.
impl FromStr for MachineStatus {
    type Err = CoinwashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "AVAILABLE" => Ok(Self::Available),
            "RUNNING" => Ok(Self::Running),
            "MAINTENANCE" => Ok(Self::Maintenance),
            _ => Err(CoinwashError::illegal_argument(anyhow!(
                "Unknown machine status: {}",
                s
            ))),
        }
    }
}
