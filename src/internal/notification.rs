use std::time::{Duration, Instant};

/// Type of notification to display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationType {
    Info,
    /// Stays up until replaced.
    Progress,
    Success,
    Error,
}

impl NotificationType {
    fn timeout(&self) -> Option<Duration> {
        match self {
            NotificationType::Info => Some(Duration::from_secs(3)),
            NotificationType::Progress => None,
            NotificationType::Success => Some(Duration::from_secs(4)),
            NotificationType::Error => Some(Duration::from_secs(5)),
        }
    }
}

/// An inline notice with auto-dismiss
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub notification_type: NotificationType,
    pub timestamp: Instant,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, NotificationType::Info)
    }

    pub fn progress(message: impl Into<String>) -> Self {
        Self::new(message, NotificationType::Progress)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, NotificationType::Success)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, NotificationType::Error)
    }

    fn new(message: impl Into<String>, notification_type: NotificationType) -> Self {
        Self {
            message: message.into(),
            notification_type,
            timestamp: Instant::now(),
        }
    }

    /// Check if this notification should be auto-dismissed
    pub fn should_dismiss(&self) -> bool {
        self.should_dismiss_at(Instant::now())
    }

    pub fn should_dismiss_at(&self, now: Instant) -> bool {
        match self.notification_type.timeout() {
            Some(timeout) => now.saturating_duration_since(self.timestamp) > timeout,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_notice_dismisses_after_a_few_seconds() {
        let notice = Notification::error("Error updating: boom");
        assert!(!notice.should_dismiss());
        assert!(!notice.should_dismiss_at(notice.timestamp + Duration::from_secs(4)));
        assert!(notice.should_dismiss_at(notice.timestamp + Duration::from_secs(6)));
    }

    #[test]
    fn progress_notice_never_times_out() {
        let notice = Notification::progress("Syncing with Hacker News...");
        assert!(!notice.should_dismiss_at(notice.timestamp + Duration::from_secs(3600)));
    }

    #[test]
    fn info_notice_is_short_lived() {
        let notice = Notification::info("Theme: dark");
        assert_eq!(notice.notification_type, NotificationType::Info);
        assert!(notice.should_dismiss_at(notice.timestamp + Duration::from_secs(4)));
    }
}
