//! Trailing-edge debounce for interactive search.

use std::time::Duration;

use tokio::time::{Instant, sleep_until};

/// Quiet period after the last filter change before a search runs.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Holds the latest value until no newer one has arrived for `delay`.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    /// A debouncer with the given quiet period.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Record a change, replacing any pending one and restarting the timer.
    pub fn push(&mut self, value: T) {
        self.pending = Some((value, Instant::now() + self.delay));
    }

    /// When the pending value settles, if there is one.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, at)| *at)
    }

    /// Wait for the pending value to settle and take it.
    ///
    /// Never resolves while nothing is pending. Cancel-safe: dropping the
    /// future keeps the pending value.
    pub async fn settled(&mut self) -> T {
        loop {
            match self.deadline() {
                Some(at) => {
                    sleep_until(at).await;
                    if let Some((value, _)) = self.pending.take() {
                        return value;
                    }
                }
                None => std::future::pending::<()>().await,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_only_last_change_runs() {
        let mut debouncer = Debouncer::new(SEARCH_DEBOUNCE);
        debouncer.push("wa");
        tokio::time::advance(Duration::from_millis(300)).await;
        debouncer.push("wave");

        let start = Instant::now();
        assert_eq!(debouncer.settled().await, "wave");
        assert!(start.elapsed() >= SEARCH_DEBOUNCE);
        assert!(start.elapsed() < SEARCH_DEBOUNCE + Duration::from_millis(300));
        assert!(debouncer.deadline().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_nothing_pending_never_settles() {
        let mut debouncer: Debouncer<u8> = Debouncer::new(SEARCH_DEBOUNCE);
        let waited =
            tokio::time::timeout(Duration::from_secs(5), debouncer.settled()).await;
        assert!(waited.is_err());
    }
}
