//! Deferred and periodic work: the search debouncer and the refresh timer.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::api::DashboardApi;
use crate::surface::Surface;

use super::engine::Dashboard;

const PENDING: u8 = 0;
const FIRED: u8 = 1;
const CANCELLED: u8 = 2;

/// A unit of work that runs once after a delay unless cancelled first.
///
/// Cancellation only wins while the task is still waiting; once the delay has
/// elapsed the work runs to completion.
#[derive(Debug)]
pub struct ScheduledTask {
    state: Arc<AtomicU8>,
    handle: JoinHandle<()>,
}

impl ScheduledTask {
    pub fn spawn<F>(delay: Duration, work: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let state = Arc::new(AtomicU8::new(PENDING));
        let flag = Arc::clone(&state);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if flag
                .compare_exchange(PENDING, FIRED, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                work.await;
            }
        });
        Self { state, handle }
    }

    /// Cancel the task if it has not fired yet. Returns true if it was cancelled.
    pub fn cancel(&self) -> bool {
        let cancelled = self
            .state
            .compare_exchange(PENDING, CANCELLED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if cancelled {
            self.handle.abort();
        }
        cancelled
    }

    pub fn has_fired(&self) -> bool {
        self.state.load(Ordering::Acquire) == FIRED
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.load(Ordering::Acquire) == CANCELLED
    }
}

/// Collapses bursts of input into a single run after a quiet interval.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<ScheduledTask>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    /// Arm `work`, replacing any earlier task that has not fired yet.
    pub fn schedule<F>(&self, work: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut pending = self.pending.lock();
        if let Some(previous) = pending.take()
            && previous.cancel()
        {
            tracing::trace!("debounced task superseded");
        }
        *pending = Some(ScheduledTask::spawn(self.delay, work));
    }

    /// Cancel the pending task, if any. Returns true if one was cancelled.
    pub fn cancel(&self) -> bool {
        self.pending
            .lock()
            .take()
            .is_some_and(|task| task.cancel())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Some(task) = self.pending.get_mut().take() {
            task.cancel();
        }
    }
}

/// Periodic full refresh of a shared dashboard.
///
/// Every tick spawns its own `refresh_dashboard(true)` without waiting for the
/// previous one; a slow round never delays the next tick. The loop stops when
/// the timer is dropped.
#[derive(Debug)]
pub struct RefreshTimer {
    handle: JoinHandle<()>,
}

impl RefreshTimer {
    pub fn start<C, S>(dashboard: Arc<Dashboard<C, S>>, period: Duration) -> Self
    where
        C: DashboardApi + 'static,
        S: Surface + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let dashboard = Arc::clone(&dashboard);
                tokio::spawn(async move {
                    dashboard.refresh_dashboard(true).await;
                });
            }
        });
        Self { handle }
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    pub fn stop(self) {}
}

impl Drop for RefreshTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[tokio::test(start_paused = true)]
    async fn test_task_fires_after_delay() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);
        let task = ScheduledTask::spawn(Duration::from_millis(100), async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert!(task.has_fired());
        assert!(!task.cancel());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_task_never_runs() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);
        let task = ScheduledTask::spawn(Duration::from_millis(100), async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(task.cancel());
        assert!(task.is_cancelled());
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fired_task_is_not_interrupted() {
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let done = Arc::new(AtomicUsize::new(0));
        let flag = Arc::clone(&done);
        let debouncer = Debouncer::new(Duration::from_millis(10));
        debouncer.schedule(async move {
            let _ = rx.await;
            flag.fetch_add(1, Ordering::SeqCst);
        });

        // Let the first task fire and park on the channel
        tokio::time::sleep(Duration::from_millis(20)).await;
        debouncer.schedule(async {});
        tx.send(()).unwrap();

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(done.load(Ordering::SeqCst), 1);
    }
}
