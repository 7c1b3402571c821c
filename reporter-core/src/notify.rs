//! Fire-and-forget user messages.
//!
//! At most one notification is visible at a time; posting replaces it, and it
//! disappears on its own after the configured display time.

use std::{fmt, sync::Arc, time::Duration};

use parking_lot::RwLock;
use tokio::{sync::broadcast, time::Instant};

pub const DEFAULT_DISPLAY_TIME: Duration = Duration::from_millis(2500);

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Warning,
    Error,
    Success,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Success => "success",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    pub posted_at: Instant,
}

#[derive(Debug)]
struct Inner {
    /// The visible notification; expiry is checked on read.
    slot: RwLock<Option<Notification>>,
    events: broadcast::Sender<Notification>,
    display_time: Duration,
}

/// Shared handle; clones post to the same channel.
#[derive(Debug, Clone)]
pub struct Notifier {
    inner: Arc<Inner>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_DISPLAY_TIME)
    }
}

impl Notifier {
    pub fn new(display_time: Duration) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                slot: RwLock::new(None),
                events,
                display_time,
            }),
        }
    }

    pub fn notify(&self, message: impl Into<String>, severity: Severity) {
        let message = message.into();

        match severity {
            Severity::Error => tracing::error!(%message, "notification"),
            Severity::Warning => tracing::warn!(%message, "notification"),
            Severity::Info | Severity::Success => {
                tracing::info!(%message, %severity, "notification")
            }
        }

        let note = Notification {
            message,
            severity,
            posted_at: Instant::now(),
        };
        *self.inner.slot.write() = Some(note.clone());
        // Nobody listening is fine.
        let _ = self.inner.events.send(note);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.notify(message, Severity::Info);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.notify(message, Severity::Warning);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.notify(message, Severity::Error);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.notify(message, Severity::Success);
    }

    /// The notification currently on screen, if it has not timed out yet.
    pub fn current(&self) -> Option<Notification> {
        self.inner
            .slot
            .read()
            .as_ref()
            .filter(|n| n.posted_at.elapsed() < self.inner.display_time)
            .cloned()
    }

    /// Dismiss the visible notification early.
    pub fn dismiss(&self) {
        *self.inner.slot.write() = None;
    }

    /// Every posted notification, in order, for renderers and tests.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.inner.events.subscribe()
    }
}
