//! Endpoint receiving notifications shown to laundromat users.
//! Notifications are only logged, nothing is stored.

use ::coinwash_common::{
    machine::{BrowserNotification, MachineTime, NotificationAck},
    tracing::info,
};
use axum::{routing::post, Json, Router};

async fn log_browser_notification(
    Json(notification): Json<BrowserNotification>,
) -> Json<NotificationAck> {
    info!(
        machine_id = %notification.machine_id,
        kind = ?notification.kind,
        timestamp = %MachineTime::now(),
        "Browser notification: {}",
        notification.message
    );
    Json(NotificationAck {
        success: true,
        message: "Notification logged successfully".to_owned(),
    })
}

pub(crate) fn get_notification_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/browser", post(log_browser_notification))
}
