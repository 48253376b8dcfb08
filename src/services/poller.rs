//! Fixed-interval polling with an owned, cancellable handle
//!
//! A poll run is awaited inline by the loop, so runs never overlap. Ticks
//! that fire while a run is still outstanding are skipped rather than
//! queued.

use std::future::Future;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Polling interval for the chargeback and executive views
pub const SUMMARY_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Polling interval for the trend view
pub const TREND_POLL_INTERVAL: Duration = Duration::from_secs(5);

const MIN_INTERVAL: Duration = Duration::from_millis(100);

/// Owns a running poll loop.
///
/// `stop()` cancels the loop and waits for it; dropping the handle aborts it.
pub struct PollHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl PollHandle {
    /// Cancel the loop, including any run in progress, and wait for it to exit
    pub async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, |t| t.is_finished())
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

pub struct Poller;

impl Poller {
    /// Run `task` now and then every `interval` until the handle is stopped
    /// or dropped. Must be called inside a tokio runtime.
    pub fn spawn<F, Fut>(name: &str, interval: Duration, mut task: F) -> PollHandle
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let name = name.to_string();
        let interval = interval.max(MIN_INTERVAL);
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    _ = ticker.tick() => {}
                }

                let started = Instant::now();
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    _ = task() => {}
                }

                let elapsed = started.elapsed();
                if elapsed > interval {
                    log::debug!(
                        "{} poll took {:?} (interval {:?}), skipping missed ticks",
                        name,
                        elapsed,
                        interval
                    );
                }
            }
            log::debug!("{} poller stopped", name);
        });

        PollHandle {
            shutdown: Some(shutdown_tx),
            task: Some(handle),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_runs_immediately_then_every_interval() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = runs.clone();

        let handle = Poller::spawn("test", Duration::from_secs(10), move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 3);

        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_runs_never_overlap() {
        let active = Arc::new(AtomicUsize::new(0));
        let max_active = Arc::new(AtomicUsize::new(0));
        let runs = Arc::new(AtomicUsize::new(0));
        let (a, m, r) = (active.clone(), max_active.clone(), runs.clone());

        let handle = Poller::spawn("slow", Duration::from_secs(10), move || {
            let (a, m, r) = (a.clone(), m.clone(), r.clone());
            async move {
                let now = a.fetch_add(1, Ordering::SeqCst) + 1;
                m.fetch_max(now, Ordering::SeqCst);
                r.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_secs(25)).await;
                a.fetch_sub(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_secs(59)).await;
        handle.stop().await;

        assert_eq!(max_active.load(Ordering::SeqCst), 1);
        // 25s runs on a 10s interval: ticks at 0 and 30 only
        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_ends_loop() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = runs.clone();

        let handle = Poller::spawn("stop", Duration::from_secs(5), move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });
        tokio::time::sleep(Duration::from_secs(1)).await;
        handle.stop().await;

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels_run_in_progress() {
        let finished = Arc::new(AtomicUsize::new(0));
        let counter = finished.clone();

        let handle = Poller::spawn("cancel", Duration::from_secs(5), move || {
            let counter = counter.clone();
            async move {
                tokio::time::sleep(Duration::from_secs(60)).await;
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });
        tokio::time::sleep(Duration::from_secs(1)).await;
        handle.stop().await;

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(finished.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_aborts_loop() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = runs.clone();

        let handle = Poller::spawn("drop", Duration::from_secs(5), move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(!handle.is_finished());
        drop(handle);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }
}
