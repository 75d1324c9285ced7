//! User Notifications
//!
//! Short-lived success and error messages raised by page controllers.
//! Success messages clear after 3 seconds and errors after 5 by default.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::config::NotificationConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
    Info,
}

impl Level {
    pub fn icon(&self) -> &'static str {
        match self {
            Level::Success => "✓",
            Level::Error => "✕",
            Level::Info => "ℹ",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub level: Level,
    pub message: String,
    expires_at: Instant,
}

impl Notification {
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.level.icon(), self.message)
    }
}

/// Shared notification queue. Clones share the same queue.
#[derive(Debug, Clone)]
pub struct Notifier {
    queue: Arc<Mutex<VecDeque<Notification>>>,
    success_ttl: Duration,
    error_ttl: Duration,
    capacity: usize,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(&NotificationConfig::default())
    }
}

impl Notifier {
    pub fn new(config: &NotificationConfig) -> Self {
        Self {
            queue: Arc::default(),
            success_ttl: Duration::from_millis(config.success_ttl_ms),
            error_ttl: Duration::from_millis(config.error_ttl_ms),
            capacity: config.capacity.max(1),
        }
    }

    /// Show a success message (auto-clears after timeout)
    pub fn success(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!(%message, "success");
        self.push(Level::Success, message, self.success_ttl);
    }

    /// Show an error message (auto-clears after timeout)
    pub fn error(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(%message, "error shown to user");
        self.push(Level::Error, message, self.error_ttl);
    }

    pub fn info(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(%message, "info");
        self.push(Level::Info, message, self.success_ttl);
    }

    /// Notifications still on screen, oldest first
    pub fn active(&self) -> Vec<Notification> {
        let now = Instant::now();
        let mut queue = self.lock();
        queue.retain(|n| !n.is_expired(now));
        queue.iter().cloned().collect()
    }

    /// Take every pending notification, expired or not
    pub fn drain(&self) -> Vec<Notification> {
        self.lock().drain(..).collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn push(&self, level: Level, message: String, ttl: Duration) {
        let mut queue = self.lock();
        while queue.len() >= self.capacity {
            queue.pop_front();
        }
        queue.push_back(Notification {
            level,
            message,
            expires_at: Instant::now() + ttl,
        });
    }

    // A panic while holding the lock leaves the queue usable
    fn lock(&self) -> MutexGuard<'_, VecDeque<Notification>> {
        self.queue.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_queue() {
        let notifier = Notifier::default();
        let page = notifier.clone();

        page.success("Client créé");
        page.error("Impossible de supprimer");

        let shown = notifier.active();
        assert_eq!(shown.len(), 2);
        assert_eq!(shown[0].level, Level::Success);
        assert_eq!(shown[1].to_string(), "✕ Impossible de supprimer");
    }

    #[test]
    fn test_expired_messages_pruned() {
        let notifier = Notifier::new(&NotificationConfig {
            success_ttl_ms: 0,
            error_ttl_ms: 60_000,
            capacity: 8,
        });

        notifier.success("gone");
        notifier.error("kept");

        let shown = notifier.active();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].message, "kept");
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let notifier = Notifier::new(&NotificationConfig {
            capacity: 2,
            ..Default::default()
        });

        notifier.info("one");
        notifier.info("two");
        notifier.info("three");

        let messages: Vec<_> = notifier.drain().into_iter().map(|n| n.message).collect();
        assert_eq!(messages, vec!["two", "three"]);
        assert!(notifier.drain().is_empty());
    }
}
