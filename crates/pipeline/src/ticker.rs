//! Periodic progress tick source.
//!
//! A [`ProgressTicker`] is acquired when a generation is dispatched and
//! released when it reaches a terminal phase. Releasing aborts the tick
//! task; dropping the ticker releases it too, so a ticker can never
//! outlive the attempt that owns it.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Handle to a running tick task.
#[derive(Debug)]
pub struct ProgressTicker {
    handle: JoinHandle<()>,
}

impl ProgressTicker {
    /// Spawn a task calling `on_tick` every `period`, first after one full
    /// period. The task ends when `on_tick` returns `false` or the ticker
    /// is stopped.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn<F>(period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if !on_tick() {
                    break;
                }
            }
        });
        Self { handle }
    }

    /// Stop the tick task. No tick starts after this returns.
    pub fn stop(self) {
        self.handle.abort();
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for ProgressTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    use super::*;

    const PERIOD: Duration = Duration::from_millis(100);

    async fn settle() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    async fn advance_periods(n: u32) {
        for _ in 0..n {
            tokio::time::advance(PERIOD).await;
            settle().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_after_each_full_period() {
        let count = Arc::new(AtomicU64::new(0));
        let c = Arc::clone(&count);
        let ticker = ProgressTicker::spawn(PERIOD, move || {
            c.fetch_add(1, Ordering::SeqCst);
            true
        });

        settle().await;
        assert_eq!(count.load(Ordering::SeqCst), 0, "no tick before the first period");

        advance_periods(3).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert!(ticker.is_running());
        ticker.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn stop_prevents_further_ticks() {
        let count = Arc::new(AtomicU64::new(0));
        let c = Arc::clone(&count);
        let ticker = ProgressTicker::spawn(PERIOD, move || {
            c.fetch_add(1, Ordering::SeqCst);
            true
        });

        advance_periods(2).await;
        ticker.stop();
        advance_periods(5).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn drop_stops_the_task() {
        let count = Arc::new(AtomicU64::new(0));
        let c = Arc::clone(&count);
        {
            let _ticker = ProgressTicker::spawn(PERIOD, move || {
                c.fetch_add(1, Ordering::SeqCst);
                true
            });
            advance_periods(1).await;
        }
        advance_periods(4).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn callback_can_end_the_task() {
        let count = Arc::new(AtomicU64::new(0));
        let c = Arc::clone(&count);
        let ticker = ProgressTicker::spawn(PERIOD, move || c.fetch_add(1, Ordering::SeqCst) < 1);

        advance_periods(4).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert!(!ticker.is_running());
    }
}
