//! Countdown of a running machine.
//!
//! The server only knows wall clock end times. A countdown turns the end time
//! into a monotonic deadline once, so ticks never depend on the wall clock again.

use ::std::time::Instant;

use ::coinwash_common::machine::MachineTime;

/// Format seconds as `m:ss`, e.g. `1:30`.
pub fn format_remaining(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Something a tick noticed about a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownEvent {
    /// The remaining time just crossed the warning threshold.
    AlmostFinished { remaining_secs: u64 },
    /// The remaining time reached zero.
    Finished,
}

#[derive(Debug, Clone)]
pub struct Countdown {
    /// End time reported by the server, identifies the cycle
    end_time: MachineTime,
    deadline: Instant,
    /// Remaining seconds seen by the previous tick
    last_remaining: Option<u64>,
    warned: bool,
    finished: bool,
}

impl Countdown {
    /// Anchor a cycle ending at `end_time` given the wall clock and monotonic clock read at the same moment.
    pub fn new(end_time: MachineTime, wall_now: &MachineTime, now: Instant) -> Self {
        Self {
            end_time,
            deadline: now + end_time.saturating_duration_since(wall_now),
            last_remaining: None,
            warned: false,
            finished: false,
        }
    }

    pub fn end_time(&self) -> &MachineTime {
        &self.end_time
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Whole seconds left at `now`, rounded up so a fresh 90 s cycle shows `1:30`.
    pub fn remaining_secs(&self, now: Instant) -> u64 {
        let left = self.deadline.saturating_duration_since(now);
        left.as_secs() + u64::from(left.subsec_nanos() > 0)
    }

    /// Advance to `now` and report at most one event.
    ///
    /// The warning fires when the remaining time goes from above `warning_threshold_secs`
    /// to at or below it between two ticks, so a late tick cannot skip it.
    /// Each event fires once per cycle. Reaching zero wins over the warning.
    pub fn tick(&mut self, now: Instant, warning_threshold_secs: u64) -> Option<CountdownEvent> {
        let remaining = self.remaining_secs(now);
        let previous = self.last_remaining.replace(remaining);
        if remaining == 0 {
            if self.finished {
                return None;
            }
            self.finished = true;
            return Some(CountdownEvent::Finished);
        }
        let crossed = previous.is_some_and(|previous| previous > warning_threshold_secs)
            && remaining <= warning_threshold_secs;
        if crossed && !self.warned {
            self.warned = true;
            return Some(CountdownEvent::AlmostFinished {
                remaining_secs: remaining,
            });
        }
        None
    }
}
