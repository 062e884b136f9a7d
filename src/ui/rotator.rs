//! Rotating status message shown while a try-on is generating
//!
//! A [`StatusRotator`] is a periodic tokio task that advances an index into
//! the message cycle. It lives exactly as long as the value: dropping it
//! aborts the task, which is how every exit from `Loading` (completion,
//! reset, quit) stops the timer.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

pub struct StatusRotator {
    messages: &'static [&'static str],
    index: Arc<AtomicUsize>,
    task: JoinHandle<()>,
}

impl StatusRotator {
    /// Start on `runtime`, showing `messages[0]` until the first interval elapses.
    pub fn start(runtime: &Handle, messages: &'static [&'static str], every: Duration) -> Self {
        let index = Arc::new(AtomicUsize::new(0));
        let ticks = Arc::clone(&index);
        let len = messages.len().max(1);
        let first_tick = Instant::now() + every;
        let task = runtime.spawn(async move {
            let mut ticker = interval_at(first_tick, every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let _ = ticks.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |i| {
                    Some((i + 1) % len)
                });
            }
        });
        Self {
            messages,
            index,
            task,
        }
    }

    pub fn message(&self) -> &'static str {
        self.messages
            .get(self.index.load(Ordering::Relaxed))
            .copied()
            .unwrap_or_default()
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for StatusRotator {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::LOADING_MESSAGES;

    const EVERY: Duration = Duration::from_millis(2500);

    async fn advance(by: Duration) {
        tokio::time::advance(by).await;
        // Let the rotator task observe the tick.
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_rotates_once_per_interval() {
        let rotator = StatusRotator::start(&Handle::current(), &LOADING_MESSAGES, EVERY);
        assert_eq!(rotator.message(), LOADING_MESSAGES[0]);

        advance(Duration::from_millis(2400)).await;
        assert_eq!(rotator.message(), LOADING_MESSAGES[0]);

        advance(Duration::from_millis(200)).await;
        assert_eq!(rotator.message(), LOADING_MESSAGES[1]);

        advance(EVERY).await;
        assert_eq!(rotator.message(), LOADING_MESSAGES[2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wraps_around_cycle() {
        let rotator = StatusRotator::start(&Handle::current(), &LOADING_MESSAGES, EVERY);
        for _ in 0..LOADING_MESSAGES.len() {
            advance(EVERY).await;
        }
        assert_eq!(rotator.message(), LOADING_MESSAGES[0]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_aborts_task() {
        let rotator = StatusRotator::start(&Handle::current(), &LOADING_MESSAGES, EVERY);
        assert!(rotator.is_running());
        let index = Arc::clone(&rotator.index);
        drop(rotator);

        advance(EVERY * 3).await;
        assert_eq!(index.load(Ordering::Relaxed), 0);
    }
}
