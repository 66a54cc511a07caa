//! Form status messages with automatic dismissal.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use tokio::runtime::Handle;
use tracing::debug;
use uuid::Uuid;

use crate::util::lock::mutex_lock;

const SOURCE: &str = "application::status";

/// How long a status message stays visible by default.
pub const DEFAULT_STATUS_TTL: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
}

impl StatusKind {
    pub fn as_variant(self) -> &'static str {
        match self {
            StatusKind::Success => "success",
            StatusKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub id: Uuid,
    pub kind: StatusKind,
    pub text: String,
    pub ttl: Duration,
}

impl StatusMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self::success_with_ttl(text, DEFAULT_STATUS_TTL)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::error_with_ttl(text, DEFAULT_STATUS_TTL)
    }

    pub fn success_with_ttl(text: impl Into<String>, ttl: Duration) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: StatusKind::Success,
            text: text.into(),
            ttl,
        }
    }

    pub fn error_with_ttl(text: impl Into<String>, ttl: Duration) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: StatusKind::Error,
            text: text.into(),
            ttl,
        }
    }

    /// Class list applied to the status element, e.g. `form-status error`.
    pub fn css_class(&self) -> String {
        format!("form-status {}", self.kind.as_variant())
    }
}

/// Single-slot status area: showing a message replaces the previous one.
///
/// Each message hides itself after its TTL unless a newer message has taken
/// its place by then.
#[derive(Clone)]
pub struct StatusBoard {
    current: Arc<Mutex<Option<StatusMessage>>>,
    runtime: Handle,
}

impl StatusBoard {
    pub fn new(runtime: Handle) -> Self {
        Self {
            current: Arc::new(Mutex::new(None)),
            runtime,
        }
    }

    pub fn show(&self, message: StatusMessage) {
        let id = message.id;
        let ttl = message.ttl;
        *mutex_lock(&self.current, SOURCE, "show") = Some(message);

        let slot = Arc::downgrade(&self.current);
        self.runtime.spawn(async move {
            tokio::time::sleep(ttl).await;
            let Some(slot) = slot.upgrade() else {
                return;
            };
            let mut current = mutex_lock(&slot, SOURCE, "auto_hide");
            if current.as_ref().is_some_and(|shown| shown.id == id) {
                *current = None;
                debug!(target: "devguide::status", message_id = %id, "Status message hidden");
            }
        });
    }

    /// Message currently visible, if any.
    pub fn current(&self) -> Option<StatusMessage> {
        mutex_lock(&self.current, SOURCE, "current").clone()
    }

    pub fn is_visible(&self) -> bool {
        mutex_lock(&self.current, SOURCE, "is_visible").is_some()
    }
}
