use ::std::{
    io::Write,
    time::{Duration, Instant},
};

use ::coinwash_client::MachineApi;
use ::coinwash_common::{
    machine::{MachineId, MachineStatus, MachineTime},
    tokio::{
        self,
        time::{interval, MissedTickBehavior},
    },
    tracing::{debug, error, info, warn},
};
use countdown::CountdownEvent;
use dashboard::Dashboard;
use notifier::{DesktopNotifier, Notifier, Toast, ToastLevel};
use tone::Speaker;

pub mod config;
pub mod countdown;
pub mod dashboard;
pub mod notifier;
pub mod tone;

/// Polls the server, counts down running machines and alerts users.
/// Everything runs on one task, so nothing is shared.
pub struct Monitor<A, D, S, W>
where
    A: MachineApi,
    D: DesktopNotifier,
    S: Speaker,
    W: Write,
{
    api: A,
    notifier: Notifier<D, S>,
    dashboard: Dashboard,
    warning_threshold_secs: u64,
    /// where the dashboard is drawn
    out: W,
}

impl<A, D, S, W> Monitor<A, D, S, W>
where
    A: MachineApi,
    D: DesktopNotifier,
    S: Speaker,
    W: Write,
{
    pub fn new(api: A, notifier: Notifier<D, S>, warning_threshold_secs: u64, out: W) -> Self {
        Self {
            api,
            notifier,
            dashboard: Dashboard::new(),
            warning_threshold_secs,
            out,
        }
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn notifier(&self) -> &Notifier<D, S> {
        &self.notifier
    }

    /// Fetch the machine list and reconcile the countdowns.
    /// On failure the dashboard keeps its stale data until the next poll.
    pub async fn poll(&mut self) {
        match self.api.list_machines().await {
            Ok(machines) => {
                debug!("Fetched {} machines", machines.len());
                let unreset =
                    self.dashboard
                        .replace(machines, &MachineTime::now(), Instant::now());
                for id in unreset {
                    self.reset(id).await;
                }
            }
            Err(e) => error!("Failed to fetch machines: {}", e),
        }
    }

    /// Advance the countdowns, alert about the events, expire toasts and redraw.
    pub async fn tick(&mut self) {
        let now = Instant::now();
        for (id, name, event) in self.dashboard.tick(now, self.warning_threshold_secs) {
            match event {
                CountdownEvent::AlmostFinished { remaining_secs } => {
                    info!("Machine {} has {} seconds left", id, remaining_secs);
                    self.notifier
                        .machine_almost_finished(id, &name, remaining_secs, now)
                        .await;
                }
                CountdownEvent::Finished => {
                    info!("Machine {} is finished", id);
                    self.notifier.machine_finished(id, &name, now).await;
                    self.reset(id).await;
                }
            }
        }
        self.notifier.expire(now);
        self.draw(now);
    }

    /// Make a finished machine available again.
    /// A failure is retried after the next poll.
    async fn reset(&mut self, id: MachineId) {
        match self.api.set_status(id, MachineStatus::Available).await {
            Ok(machine) => {
                info!("Machine {} is available again", id);
                self.dashboard.update(machine);
            }
            Err(e) => warn!("Failed to reset machine {}, retry after next poll: {}", id, e),
        }
    }

    fn draw(&mut self, now: Instant) {
        let board = self.dashboard.render(now);
        let toasts = render_toasts(self.notifier.toasts());
        // clear the screen and move the cursor home
        if let Err(e) = write!(self.out, "\x1b[2J\x1b[H{}{}", board, toasts)
            .and_then(|()| self.out.flush())
        {
            warn!("Failed to draw dashboard: {}", e);
        }
    }

    /// Run forever, polling every `poll_interval` and ticking every `tick_interval`.
    pub async fn run(mut self, poll_interval: Duration, tick_interval: Duration) {
        let mut poll = interval(poll_interval);
        let mut tick = interval(tick_interval);
        poll.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = poll.tick() => self.poll().await,
                _ = tick.tick() => self.tick().await,
            }
        }
    }
}

fn render_toasts(toasts: &[Toast]) -> String {
    toasts
        .iter()
        .map(|toast| {
            let level = match toast.level {
                ToastLevel::Success => "success",
                ToastLevel::Warning => "warning",
                ToastLevel::Error => "error",
                ToastLevel::Info => "info",
            };
            format!("\n[{}] {}", level, toast.message)
        })
        .collect()
}
