//! Coalesces bursts of input events into one downstream value.

use std::time::Duration;
use tokio::{sync::mpsc, task::JoinHandle};

pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(500);

/// Single-flight-per-burst trigger.
///
/// Every [`schedule`](Self::schedule) resets the one pending timer, so only the
/// last value of a burst is delivered, `quiet` after it arrived.
/// [`fire_now`](Self::fire_now) skips the wait. Values are delivered on the
/// receiver returned by [`Debouncer::new`].
///
/// Must be used from inside a tokio runtime.
#[derive(Debug)]
pub struct Debouncer<T> {
    quiet: Duration,
    tx: mpsc::UnboundedSender<T>,
    pending: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(quiet: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { quiet, tx, pending: None }, rx)
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet
    }

    pub fn schedule(&mut self, value: T) {
        self.cancel();

        let tx = self.tx.clone();
        let quiet = self.quiet;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(quiet).await;
            if tx.send(value).is_err() {
                tracing::debug!("debounced value dropped, receiver closed");
            }
        }));
    }

    /// Delivers `value` immediately and drops any pending one.
    pub fn fire_now(&mut self, value: T) {
        self.cancel();
        if self.tx.send(value).is_err() {
            tracing::debug!("immediate value dropped, receiver closed");
        }
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{Instant, sleep, timeout};

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[tokio::test(start_paused = true)]
    async fn burst_delivers_only_last_value_after_quiet_period() {
        let (mut debouncer, mut rx) = Debouncer::new(DEFAULT_QUIET_PERIOD);
        let start = Instant::now();

        debouncer.schedule("h");
        sleep(ms(100)).await;
        debouncer.schedule("he");
        sleep(ms(50)).await;
        debouncer.schedule("hel");

        let value = rx.recv().await.expect("value delivered");
        let elapsed = start.elapsed();

        assert_eq!(value, "hel");
        assert!(elapsed >= ms(650) && elapsed < ms(651), "fired at {elapsed:?}");
        assert!(timeout(ms(5_000), rx.recv()).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_fires_before_quiet_period() {
        let (mut debouncer, mut rx) = Debouncer::new(DEFAULT_QUIET_PERIOD);
        debouncer.schedule(1);

        assert!(timeout(ms(499), rx.recv()).await.is_err());
        assert!(debouncer.is_pending());
        assert_eq!(rx.recv().await, Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn separate_bursts_each_fire() {
        let (mut debouncer, mut rx) = Debouncer::new(DEFAULT_QUIET_PERIOD);

        debouncer.schedule("first");
        assert_eq!(rx.recv().await, Some("first"));

        debouncer.schedule("second");
        assert_eq!(rx.recv().await, Some("second"));
    }

    #[tokio::test(start_paused = true)]
    async fn fire_now_bypasses_and_cancels_pending_timer() {
        let (mut debouncer, mut rx) = Debouncer::new(DEFAULT_QUIET_PERIOD);
        let start = Instant::now();

        debouncer.schedule("typed");
        sleep(ms(100)).await;
        debouncer.fire_now("language changed");

        assert_eq!(rx.recv().await, Some("language changed"));
        assert!(start.elapsed() < ms(101));
        assert!(!debouncer.is_pending());
        assert!(timeout(ms(5_000), rx.recv()).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_pending_value() {
        let (mut debouncer, mut rx) = Debouncer::new(ms(200));
        debouncer.schedule(7);
        debouncer.cancel();

        assert!(!debouncer.is_pending());
        assert!(timeout(ms(1_000), rx.recv()).await.is_err());
    }
}
