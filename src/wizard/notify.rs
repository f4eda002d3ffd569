//! Transient notifications (toasts) raised by wizard actions

use std::collections::VecDeque;
use std::time::{Duration, Instant};

const SUCCESS_TTL: Duration = Duration::from_secs(3);
const REJECTED_TTL: Duration = Duration::from_secs(3);
const FAILURE_TTL: Duration = Duration::from_secs(5);
const WARNING_TTL: Duration = Duration::from_secs(5);

/// Oldest toasts are dropped beyond this
const MAX_VISIBLE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub level: Level,
    pub title: String,
    pub message: String,
    created: Instant,
    ttl: Duration,
}

impl Notification {
    fn new(level: Level, title: &str, message: impl Into<String>, ttl: Duration) -> Self {
        Self {
            level,
            title: title.to_string(),
            message: message.into(),
            created: Instant::now(),
            ttl,
        }
    }

    pub fn success(title: &str, message: impl Into<String>) -> Self {
        Self::new(Level::Success, title, message, SUCCESS_TTL)
    }

    /// An action refused before reaching the backend
    pub fn rejected(title: &str, message: impl Into<String>) -> Self {
        Self::new(Level::Error, title, message, REJECTED_TTL)
    }

    pub fn failure(title: &str, message: impl Into<String>) -> Self {
        Self::new(Level::Error, title, message, FAILURE_TTL)
    }

    pub fn warning(title: &str, message: impl Into<String>) -> Self {
        Self::new(Level::Warning, title, message, WARNING_TTL)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created) >= self.ttl
    }
}

#[derive(Debug, Default)]
pub struct Notifications {
    items: VecDeque<Notification>,
}

impl Notifications {
    pub fn push(&mut self, notification: Notification) {
        tracing::debug!(
            level = ?notification.level,
            title = %notification.title,
            message = %notification.message,
            "notification"
        );
        self.items.push_back(notification);
        while self.items.len() > MAX_VISIBLE {
            self.items.pop_front();
        }
    }

    /// Remove toasts whose time is up
    pub fn prune(&mut self, now: Instant) {
        self.items.retain(|n| !n.is_expired(now));
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.items.back()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
