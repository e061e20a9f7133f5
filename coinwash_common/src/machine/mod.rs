use ::core::num::NonZeroU32;

use ::serde::{Deserialize, Serialize};

mod machine_id;
mod machine_info;
mod machine_status;
mod machine_time;

pub use machine_id::MachineId;
pub use machine_info::MachineInfo;
pub use machine_status::MachineStatus;
pub use machine_time::MachineTime;

/// A machine as returned by the http api, its id next to its information.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Machine {
    pub id: MachineId,
    #[serde(flatten)]
    pub info: MachineInfo,
}

impl Machine {
    pub fn new(id: MachineId, info: MachineInfo) -> Self {
        Self { id, info }
    }
}

/// Request body to start a machine.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct StartMachineRequest {
    /// Total value of the inserted coins.
    pub amount: u32,
}

/// Response body of a successful start.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct StartMachineResponse {
    pub machine: Machine,
    pub change: u32,
}

/// Request body to set the status of a machine directly.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SetStatusRequest {
    pub status: MachineStatus,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Warning,
    Success,
    Info,
}

/// A notification about a machine relayed to the server, which only logs it.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BrowserNotification {
    pub message: String,
    pub machine_id: MachineId,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
}

#[derive(Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct NotificationAck {
    pub success: bool,
    pub message: String,
}

/// Shape of the fleet created when the machine table is initialized.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FleetConfig {
    pub size: u32,
    pub price: u32,
    pub duration_minutes: NonZeroU32,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            size: 4,
            price: 20,
            duration_minutes: NonZeroU32::new(30).unwrap_or(NonZeroU32::MIN),
        }
    }
}

impl FleetConfig {
    /// Machines `1..=size`, all available.
    pub fn machines(&self) -> Vec<Machine> {
        (1..=self.size)
            .filter_map(|n| MachineId::new(n).ok())
            .map(|id| {
                Machine::new(
                    id,
                    MachineInfo::new(
                        format!("Machine {}", id),
                        self.price,
                        self.duration_minutes.get(),
                    ),
                )
            })
            .collect()
    }
}
