use ::core::num::NonZeroU64;
use ::std::time::Duration;

use ::coinwash_common::serde::Deserialize;

/// Configuration for coinwash monitor
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
#[serde(crate = "coinwash_common::serde")]
pub struct MonitorConfig {
    /// Base url of the coinwash server
    pub server_url: String,
    /// Time interval in second for fetching the machine list
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: NonZeroU64,
    /// Time interval in millisecond for recomputing the remaining time
    #[serde(default = "default_tick_interval_millis")]
    pub tick_interval_millis: NonZeroU64,
    /// Remaining seconds at which users are warned that a cycle is almost finished
    #[serde(default = "default_warning_threshold_secs")]
    pub warning_threshold_secs: u64,
    #[serde(default = "default_toast_duration_secs")]
    pub toast_duration_secs: u64,
}

fn default_poll_interval_secs() -> NonZeroU64 {
    NonZeroU64::new(10).unwrap_or(NonZeroU64::MIN)
}

fn default_tick_interval_millis() -> NonZeroU64 {
    NonZeroU64::new(1000).unwrap_or(NonZeroU64::MIN)
}

fn default_warning_threshold_secs() -> u64 {
    60
}

fn default_toast_duration_secs() -> u64 {
    10
}

impl MonitorConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.get())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_millis.get())
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_secs(self.toast_duration_secs)
    }
}
