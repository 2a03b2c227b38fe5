//! User-facing notifications, shown one at a time in a dismissible dialog

use std::collections::VecDeque;

/// Shown when a step transition or submission is blocked by validation
pub const FIX_FIELDS_MESSAGE: &str = "Please fill in all required fields correctly.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Warning,
    Error,
}

impl NotificationKind {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Warning => "Check your input",
            Self::Error => "Error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }

    pub fn fix_fields() -> Self {
        Self::warning(FIX_FIELDS_MESSAGE)
    }
}

/// FIFO of pending notifications; the front one is on screen
#[derive(Debug, Clone, Default)]
pub struct Notifications {
    queue: VecDeque<Notification>,
}

impl Notifications {
    pub fn push(&mut self, notification: Notification) {
        self.queue.push_back(notification);
    }

    pub fn current(&self) -> Option<&Notification> {
        self.queue.front()
    }

    pub fn dismiss(&mut self) -> Option<Notification> {
        self.queue.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut n = Notifications::default();
        n.push(Notification::error("first"));
        n.push(Notification::success("second"));

        assert_eq!(n.len(), 2);
        assert_eq!(n.current().map(|x| x.message.as_str()), Some("first"));
        n.dismiss();
        assert_eq!(n.current().map(|x| x.kind), Some(NotificationKind::Success));
        n.dismiss();
        assert!(n.is_empty());
        assert!(n.dismiss().is_none());
    }

    #[test]
    fn test_fix_fields_is_warning() {
        let n = Notification::fix_fields();
        assert_eq!(n.kind, NotificationKind::Warning);
        assert_eq!(n.message, FIX_FIELDS_MESSAGE);
    }
}
