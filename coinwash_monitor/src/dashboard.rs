//! Local copy of the machine list with a countdown per running machine.

use ::std::{
    collections::{BTreeMap, HashMap},
    fmt::Write,
    time::Instant,
};

use ::coinwash_common::machine::{Machine, MachineId, MachineStatus, MachineTime};

use crate::countdown::{format_remaining, Countdown, CountdownEvent};

#[derive(Debug, Default)]
pub struct Dashboard {
    machines: BTreeMap<MachineId, Machine>,
    countdowns: HashMap<MachineId, Countdown>,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn machines(&self) -> impl Iterator<Item = &Machine> {
        self.machines.values()
    }

    /// Replace the local copy with a fresh list from the server.
    ///
    /// A running machine keeps its countdown while its end time is unchanged,
    /// a new end time starts a new countdown.
    /// # Return
    /// Ids of machines whose countdown already finished but which the server still reports as running,
    /// i.e. the reset after completion has not gone through yet.
    pub fn replace(
        &mut self,
        machines: Vec<Machine>,
        wall_now: &MachineTime,
        now: Instant,
    ) -> Vec<MachineId> {
        let mut unreset = Vec::new();
        let mut countdowns = HashMap::new();
        for machine in &machines {
            let (MachineStatus::Running, Some(end_time)) =
                (machine.info.status, machine.info.end_time())
            else {
                continue;
            };
            let countdown = match self.countdowns.remove(&machine.id) {
                Some(countdown) if countdown.end_time() == end_time => {
                    if countdown.is_finished() {
                        unreset.push(machine.id);
                    }
                    countdown
                }
                _ => Countdown::new(*end_time, wall_now, now),
            };
            countdowns.insert(machine.id, countdown);
        }
        self.countdowns = countdowns;
        self.machines = machines.into_iter().map(|m| (m.id, m)).collect();
        unreset
    }

    /// Store a single machine returned by the server, e.g. after a status update.
    pub fn update(&mut self, machine: Machine) {
        if machine.info.status != MachineStatus::Running {
            self.countdowns.remove(&machine.id);
        }
        self.machines.insert(machine.id, machine);
    }

    /// Seconds left for a running machine.
    pub fn remaining_secs(&self, id: &MachineId, now: Instant) -> Option<u64> {
        self.countdowns.get(id).map(|c| c.remaining_secs(now))
    }

    /// Advance every countdown to `now`.
    /// # Return
    /// Events with the id and name of their machine, ordered by id.
    pub fn tick(
        &mut self,
        now: Instant,
        warning_threshold_secs: u64,
    ) -> Vec<(MachineId, String, CountdownEvent)> {
        let mut events = Vec::new();
        for (id, machine) in &self.machines {
            let Some(countdown) = self.countdowns.get_mut(id) else {
                continue;
            };
            if let Some(event) = countdown.tick(now, warning_threshold_secs) {
                events.push((*id, machine.info.name.clone(), event));
            }
        }
        events
    }

    /// Table of all machines with the time left of the running ones.
    pub fn render(&self, now: Instant) -> String {
        let mut out = format!(
            "{:>3}  {:<12} {:<12} {:>5}  {:>5}\n",
            "ID", "NAME", "STATUS", "PRICE", "LEFT"
        );
        for (id, machine) in &self.machines {
            let left = self
                .remaining_secs(id, now)
                .map(format_remaining)
                .unwrap_or_default();
            // writing into a String cannot fail
            let _ = writeln!(
                out,
                "{:>3}  {:<12} {:<12} {:>5}  {:>5}",
                id, machine.info.name, machine.info.status, machine.info.price, left
            );
        }
        out
    }
}
