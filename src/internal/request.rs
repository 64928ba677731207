use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Identifies one issued request within a [`RequestTracker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

/// Generation counter for a stream of requests where only the newest matters.
///
/// Every request takes a token from [`RequestTracker::issue`]; when its
/// response arrives, [`RequestTracker::is_current`] tells whether a newer
/// request has been issued since, in which case the response is dropped.
#[derive(Debug, Default)]
pub struct RequestTracker {
    generation: u64,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self) -> RequestToken {
        self.generation = self.generation.wrapping_add(1);
        RequestToken(self.generation)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.generation
    }

    /// Make every outstanding token stale without issuing a new one.
    pub fn invalidate(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }
}

/// Runs a callback once input has been quiet for `delay`.
///
/// Scheduling again before the delay elapses cancels the pending callback.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<CancellationToken>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&mut self, fire: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();

        let token = CancellationToken::new();
        self.pending = Some(token.clone());
        let delay = self.delay;

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::trace!("debounce cancelled");
                }
                _ = tokio::time::sleep(delay) => fire(),
            }
        });
    }

    pub fn cancel(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .map(|t| !t.is_cancelled())
            .unwrap_or(false)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn newest_token_is_current() {
        let mut tracker = RequestTracker::new();
        let first = tracker.issue();
        assert!(tracker.is_current(first));

        let second = tracker.issue();
        assert!(!tracker.is_current(first));
        assert!(tracker.is_current(second));
    }

    #[test]
    fn invalidate_makes_all_tokens_stale() {
        let mut tracker = RequestTracker::new();
        let token = tracker.issue();
        tracker.invalidate();
        assert!(!tracker.is_current(token));
    }

    #[tokio::test]
    async fn debouncer_fires_once_after_quiet_period() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut debouncer = Debouncer::new(Duration::from_millis(30));

        for _ in 0..3 {
            let fired = fired.clone();
            debouncer.schedule(move || {
                fired.fetch_add(1, Ordering::SeqCst);
            });
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn cancelled_debounce_never_fires() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut debouncer = Debouncer::new(Duration::from_millis(20));

        let counter = fired.clone();
        debouncer.schedule(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert!(debouncer.is_pending());
        debouncer.cancel();
        assert!(!debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
