//! User-facing notifications
//!
//! The reconciler and notes service report outcomes through this trait; the
//! front end decides how to show them (toast, console line, log).

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

/// Transient message for the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
}

impl Notification {
    pub fn success(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            title: title.into(),
            body: body.into(),
        }
    }

    pub fn error(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Receiver of sync outcomes
pub trait SyncNotifier: Send + Sync {
    fn notify(&self, notification: Notification);

    /// The user asked to sync but nothing is configured
    fn open_configuration(&self);
}

/// Notifier that only writes to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl SyncNotifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Success => {
                tracing::info!("Notification: {} - {}", notification.title, notification.body)
            }
            NotificationKind::Error => {
                tracing::warn!("Notification: {} - {}", notification.title, notification.body)
            }
        }
    }

    fn open_configuration(&self) {
        tracing::info!("Storage is not configured, configuration requested");
    }
}
