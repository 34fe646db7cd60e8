use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::debug;
use uuid::Uuid;

use crate::config::Config;

const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NotificationEvent {
    Shown(Notification),
    Dismissed { id: Uuid },
}

struct Active {
    notification: Notification,
    timer: Option<JoinHandle<()>>,
}

impl Active {
    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

struct Inner {
    sender: broadcast::Sender<NotificationEvent>,
    active: Mutex<Option<Active>>,
    dismiss_after: Duration,
}

impl Inner {
    fn publish(&self, event: NotificationEvent) {
        if self.sender.send(event).is_err() {
            debug!("no notification listeners");
        }
    }

    fn expire(&self, id: Uuid) {
        let mut active = self.active.lock();
        if active.as_ref().is_some_and(|a| a.notification.id == id) {
            *active = None;
            drop(active);
            debug!(%id, "notification auto-dismissed");
            self.publish(NotificationEvent::Dismissed { id });
        }
    }
}

/// Transient banner notifications with any number of listeners.
///
/// At most one notification is visible. Showing a new one replaces the
/// current one; every visible notification is dismissed automatically after
/// `dismiss_after` unless it is dismissed or replaced first.
#[derive(Clone)]
pub struct NotificationCenter {
    inner: Arc<Inner>,
}

impl NotificationCenter {
    pub fn new(dismiss_after: Duration) -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                sender,
                active: Mutex::new(None),
                dismiss_after,
            }),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.notification_dismiss)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<NotificationEvent> {
        self.inner.sender.subscribe()
    }

    pub fn listener_count(&self) -> usize {
        self.inner.sender.receiver_count()
    }

    pub fn current(&self) -> Option<Notification> {
        self.inner
            .active
            .lock()
            .as_ref()
            .map(|a| a.notification.clone())
    }

    pub fn success(&self, title: impl Into<String>, message: impl Into<String>) -> Uuid {
        self.show(NotificationKind::Success, title, message)
    }

    pub fn error(&self, title: impl Into<String>, message: impl Into<String>) -> Uuid {
        self.show(NotificationKind::Error, title, message)
    }

    pub fn info(&self, title: impl Into<String>, message: impl Into<String>) -> Uuid {
        self.show(NotificationKind::Info, title, message)
    }

    pub fn show(
        &self,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Uuid {
        let notification = Notification {
            id: Uuid::new_v4(),
            kind,
            title: title.into(),
            message: message.into(),
            created_at: Utc::now(),
        };
        let id = notification.id;

        let replaced = {
            let mut active = self.inner.active.lock();
            let replaced = active.take().map(|mut previous| {
                previous.cancel_timer();
                previous.notification.id
            });
            *active = Some(Active {
                notification: notification.clone(),
                timer: self.spawn_timer(id),
            });
            replaced
        };

        if let Some(previous) = replaced {
            self.inner.publish(NotificationEvent::Dismissed { id: previous });
        }
        debug!(%id, ?kind, "notification shown");
        self.inner.publish(NotificationEvent::Shown(notification));
        id
    }

    /// Returns `false` when `id` is no longer the visible notification.
    pub fn dismiss(&self, id: Uuid) -> bool {
        let removed = {
            let mut active = self.inner.active.lock();
            match active.as_ref() {
                Some(a) if a.notification.id == id => active.take(),
                _ => None,
            }
        };

        match removed {
            Some(mut a) => {
                a.cancel_timer();
                self.inner.publish(NotificationEvent::Dismissed { id });
                true
            }
            None => false,
        }
    }

    fn spawn_timer(&self, id: Uuid) -> Option<JoinHandle<()>> {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            debug!(%id, "no runtime, notification will not auto-dismiss");
            return None;
        };
        let inner = Arc::clone(&self.inner);
        Some(handle.spawn(async move {
            tokio::time::sleep(inner.dismiss_after).await;
            inner.expire(id);
        }))
    }
}
