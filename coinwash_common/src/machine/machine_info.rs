use ::anyhow::anyhow;
use ::serde::{Deserialize, Serialize};

use super::{MachineStatus, MachineTime};
use crate::error::{CoinwashError, Result};

/// Whole information of a washing machine except its id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MachineInfo {
    pub name: String,
    pub status: MachineStatus,
    /// Coins needed to start a cycle.
    pub price: u32,
    /// Length of a cycle in minutes.
    pub duration: u32,
    /// Both times are set iff the machine is `Running`.
    #[serde(default)]
    start_time: Option<MachineTime>,
    #[serde(default)]
    end_time: Option<MachineTime>,
}

impl MachineInfo {
    /// A new machine, available and idle.
    pub fn new(name: String, price: u32, duration: u32) -> Self {
        Self {
            name,
            status: MachineStatus::Available,
            price,
            duration,
            start_time: None,
            end_time: None,
        }
    }

    pub fn start_time(&self) -> Option<&MachineTime> {
        self.start_time.as_ref()
    }

    pub fn end_time(&self) -> Option<&MachineTime> {
        self.end_time.as_ref()
    }

    /// Start a cycle at `now` paid with `amount`.
    /// # Return
    /// - `Ok((running_machine, change))` when the machine is available and `amount` covers the price.
    /// - `Err(InvalidState)` when the machine is not available.
    /// - `Err(InsufficientFunds)` when `amount` is less than the price.
    /// - `Err(IllegalArgument)` when the cycle length is 0, as the cycle would end when it starts.
    pub fn start(&self, amount: u32, now: MachineTime) -> Result<(MachineInfo, u32)> {
        if self.status != MachineStatus::Available {
            return Err(CoinwashError::invalid_state(anyhow!(
                "{} is {}, cannot be started",
                self.name,
                self.status
            )));
        }
        if self.duration == 0 {
            return Err(CoinwashError::illegal_argument(anyhow!(
                "{} has a cycle of 0 minutes",
                self.name
            )));
        }
        let change = amount.checked_sub(self.price).ok_or_else(|| {
            CoinwashError::insufficient_funds(anyhow!(
                "{} costs {}, only {} inserted",
                self.name,
                self.price,
                amount
            ))
        })?;
        let running = Self {
            status: MachineStatus::Running,
            start_time: Some(now),
            end_time: Some(now.after_minutes(self.duration)),
            ..self.clone()
        };
        Ok((running, change))
    }

    /// Overwrite the status directly, bypassing payment.
    /// Only the moves allowed by [MachineStatus::can_be_set_to] are accepted,
    /// and leaving `Running` clears both times.
    pub fn set_status(&self, status: MachineStatus) -> Result<MachineInfo> {
        if !self.status.can_be_set_to(&status) {
            return Err(CoinwashError::invalid_state(anyhow!(
                "{} is {}, cannot be set to {}",
                self.name,
                self.status,
                status
            )));
        }
        Ok(Self {
            status,
            start_time: None,
            end_time: None,
            ..self.clone()
        })
    }

    /// Seconds left in the current cycle at `now`, `None` if not running.
    pub fn remaining_secs(&self, now: &MachineTime) -> Option<u64> {
        match (self.status, self.end_time.as_ref()) {
            (MachineStatus::Running, Some(end)) => {
                Some(end.saturating_duration_since(now).as_secs())
            }
            _ => None,
        }
    }
}
