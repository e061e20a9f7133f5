//! Toasts, desktop notifications and tones about machine cycles.

use ::core::future::Future;
use ::std::time::{Duration, Instant};

use ::coinwash_client::{MachineApi, Result};
use ::coinwash_common::{
    machine::{BrowserNotification, MachineId, NotificationKind},
    tracing::{debug, warn},
};

use crate::tone::{Speaker, Tone};

/// Severity of a [Toast], which decides how it is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Warning,
    Error,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToastId(u64);

/// A short lived notice shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: ToastId,
    pub message: String,
    pub level: ToastLevel,
    pub duration: Duration,
    expires_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&[Toast]) + Send>;

/// Channel for notifications outside the dashboard.
pub trait DesktopNotifier: Send + Sync {
    fn notify(&self, notification: &BrowserNotification)
        -> impl Future<Output = Result<()>> + Send;
}

/// Relays notifications to the notification log of the coinwash server.
pub struct ServerRelay<A: MachineApi> {
    api: A,
}

impl<A: MachineApi> ServerRelay<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }
}

impl<A: MachineApi> DesktopNotifier for ServerRelay<A> {
    async fn notify(&self, notification: &BrowserNotification) -> Result<()> {
        let ack = self.api.send_notification(notification).await?;
        debug!("Notification relayed: {}", ack.message);
        Ok(())
    }
}

/// Keeps the active toasts and alerts users about machines.
/// Subscribers receive the whole toast list after every change.
pub struct Notifier<D: DesktopNotifier, S: Speaker> {
    desktop: D,
    speaker: S,
    toast_duration: Duration,
    toasts: Vec<Toast>,
    next_toast_id: u64,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription_id: u64,
}

impl<D: DesktopNotifier, S: Speaker> Notifier<D, S> {
    pub fn new(desktop: D, speaker: S, toast_duration: Duration) -> Self {
        Self {
            desktop,
            speaker,
            toast_duration,
            toasts: Vec::new(),
            next_toast_id: 0,
            subscribers: Vec::new(),
            next_subscription_id: 0,
        }
    }

    /// Active toasts, oldest first.
    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&[Toast]) + Send + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription_id);
        self.next_subscription_id += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Return false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(subscription, _)| *subscription != id);
        self.subscribers.len() != before
    }

    /// Show a toast for the default duration.
    pub fn show_toast(&mut self, message: String, level: ToastLevel, now: Instant) -> ToastId {
        self.show_toast_for(message, level, self.toast_duration, now)
    }

    pub fn show_toast_for(
        &mut self,
        message: String,
        level: ToastLevel,
        duration: Duration,
        now: Instant,
    ) -> ToastId {
        let id = ToastId(self.next_toast_id);
        self.next_toast_id += 1;
        self.toasts.push(Toast {
            id,
            message,
            level,
            duration,
            expires_at: now + duration,
        });
        self.publish();
        id
    }

    /// Return false if there is no such toast.
    pub fn dismiss(&mut self, id: ToastId) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|toast| toast.id != id);
        let removed = self.toasts.len() != before;
        if removed {
            self.publish();
        }
        removed
    }

    /// Remove the toasts whose duration has elapsed at `now`, return how many were removed.
    pub fn expire(&mut self, now: Instant) -> usize {
        let before = self.toasts.len();
        self.toasts.retain(|toast| toast.expires_at > now);
        let removed = before - self.toasts.len();
        if removed > 0 {
            self.publish();
        }
        removed
    }

    pub async fn machine_almost_finished(
        &mut self,
        id: MachineId,
        name: &str,
        remaining_secs: u64,
        now: Instant,
    ) {
        let message = format!(
            "{} has {} seconds left, please get ready to collect your laundry",
            name, remaining_secs
        );
        self.alert(id, message, ToastLevel::Warning, NotificationKind::Warning, Tone::Warning, now)
            .await;
    }

    pub async fn machine_finished(&mut self, id: MachineId, name: &str, now: Instant) {
        let message = format!("{} is finished, please collect your laundry", name);
        self.alert(id, message, ToastLevel::Success, NotificationKind::Success, Tone::Finish, now)
            .await;
    }

    /// Toast, desktop notification and tone.
    /// Failures of the last two are logged and ignored.
    async fn alert(
        &mut self,
        id: MachineId,
        message: String,
        level: ToastLevel,
        kind: NotificationKind,
        tone: Tone,
        now: Instant,
    ) {
        self.show_toast(message.clone(), level, now);
        if let Err(e) = self.speaker.play(tone) {
            warn!("Failed to play {:?} tone: {}", tone, e);
        }
        let notification = BrowserNotification {
            message,
            machine_id: id,
            kind,
        };
        if let Err(e) = self.desktop.notify(&notification).await {
            warn!("Failed to send desktop notification of machine {}: {}", id, e);
        }
    }

    fn publish(&mut self) {
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(&self.toasts);
        }
    }
}
