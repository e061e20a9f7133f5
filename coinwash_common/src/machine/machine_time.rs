use ::core::fmt::Display;
use ::std::time::Duration;

use ::serde::{Deserialize, Serialize};
use ::time::{format_description::well_known::Rfc3339, OffsetDateTime};

/// Wall clock time of a machine cycle, serialized as RFC 3339.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(transparent)]
pub struct MachineTime(#[serde(with = "time::serde::rfc3339")] OffsetDateTime);

impl MachineTime {
    pub fn now() -> Self {
        Self(OffsetDateTime::now_utc())
    }

    pub fn new(time: OffsetDateTime) -> Self {
        Self(time)
    }

    pub fn after_minutes(&self, minutes: u32) -> Self {
        Self(self.0 + time::Duration::minutes(i64::from(minutes)))
    }

    /// Time left from `now` until `self`, zero once `self` has passed.
    pub fn saturating_duration_since(&self, now: &MachineTime) -> Duration {
        Duration::try_from(self.0 - now.0).unwrap_or(Duration::ZERO)
    }
}

impl Display for MachineTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0.format(&Rfc3339) {
            Ok(s) => f.write_str(&s),
            Err(_) => write!(f, "{}", self.0),
        }
    }
}
