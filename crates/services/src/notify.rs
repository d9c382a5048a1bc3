use std::time::Duration;

use chrono::{DateTime, Utc};
use quiz_core::Clock;
use quiz_core::time::format_stamp;

/// How long a short toast stays up.
pub const SHORT_TOAST_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    /// Auto-dismissed after `SHORT_TOAST_TTL`.
    Short,
    /// Stays until dismissed or replaced.
    Persistent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ToastId(u64);

/// What to show. `body` may carry inline HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastMessage {
    pub title: String,
    pub body: String,
    pub kind: ToastKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: ToastId,
    pub message: ToastMessage,
    pub shown_at: DateTime<Utc>,
}

impl Toast {
    #[must_use]
    pub fn stamp(&self) -> String {
        format_stamp(self.shown_at)
    }
}

/// Single toast slot. A new toast replaces the current one.
#[derive(Debug, Clone, Default)]
pub struct ToastCenter {
    clock: Clock,
    current: Option<Toast>,
    next_id: u64,
}

impl ToastCenter {
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self {
            clock,
            current: None,
            next_id: 0,
        }
    }

    #[must_use]
    pub fn current(&self) -> Option<&Toast> {
        self.current.as_ref()
    }

    /// Show `message` and return its id. Callers schedule `expire` for short toasts.
    pub fn show(&mut self, message: ToastMessage) -> ToastId {
        self.next_id += 1;
        let id = ToastId(self.next_id);
        self.current = Some(Toast {
            id,
            message,
            shown_at: self.clock.now(),
        });
        id
    }

    /// Auto-dismiss `id` if it is still the toast on screen.
    pub fn expire(&mut self, id: ToastId) -> bool {
        let latest = self
            .current
            .as_ref()
            .is_some_and(|t| t.id == id && t.message.kind == ToastKind::Short);
        if latest {
            self.current = None;
        }
        latest
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_clock;

    fn message(kind: ToastKind) -> ToastMessage {
        ToastMessage {
            title: "t".into(),
            body: "b".into(),
            kind,
        }
    }

    #[test]
    fn short_toast_expires() {
        let mut center = ToastCenter::new(fixed_clock());
        let id = center.show(message(ToastKind::Short));
        assert!(center.expire(id));
        assert!(center.current().is_none());
    }

    #[test]
    fn newer_toast_suppresses_older_expiry() {
        let mut center = ToastCenter::new(fixed_clock());
        let old = center.show(message(ToastKind::Short));
        let new = center.show(message(ToastKind::Short));
        assert!(!center.expire(old));
        assert_eq!(center.current().map(|t| t.id), Some(new));
    }

    #[test]
    fn persistent_toast_ignores_expiry() {
        let mut center = ToastCenter::new(fixed_clock());
        let id = center.show(message(ToastKind::Persistent));
        assert!(!center.expire(id));
        center.dismiss();
        assert!(center.current().is_none());
    }
}
