//! Deferred-call scheduling.
//!
//! The cooldown tracker cleans itself lazily; a scheduler adds an active path that
//! removes entries once their time is up. Deferred tasks are fire-and-forget and are
//! never cancelled explicitly: a task that no longer applies simply does nothing.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;

pub type DeferredTask = Box<dyn FnOnce() + Send + 'static>;

pub trait Scheduler: Send + Sync {
    /// Run `task` once, roughly `delay` from now. Must not block the caller.
    fn after(&self, delay: Duration, task: DeferredTask);
}

/// Schedules tasks on a tokio runtime.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Scheduler bound to the runtime of the calling context, if there is one.
    pub fn current() -> Option<Self> {
        Handle::try_current().ok().map(Self::new)
    }
}

impl Scheduler for TokioScheduler {
    fn after(&self, delay: Duration, task: DeferredTask) {
        self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            task();
        });
    }
}

/// Queues tasks until time is advanced by hand.
#[derive(Default)]
pub struct ManualScheduler {
    state: Mutex<ManualState>,
}

#[derive(Default)]
struct ManualState {
    elapsed: Duration,
    pending: Vec<(Duration, DeferredTask)>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tasks that have not fired yet
    pub fn pending(&self) -> usize {
        self.lock().pending.len()
    }

    /// Move time forward and run every task that became due, earliest first.
    /// Returns how many tasks ran.
    pub fn advance(&self, by: Duration) -> usize {
        let due = {
            let mut state = self.lock();
            state.elapsed += by;
            let now = state.elapsed;

            let (mut due, rest): (Vec<_>, Vec<_>) =
                state.pending.drain(..).partition(|(at, _)| *at <= now);
            state.pending = rest;
            due.sort_by_key(|(at, _)| *at);
            due
        };

        // Run outside the lock so tasks may schedule follow-ups
        let count = due.len();
        for (_, task) in due {
            task();
        }
        count
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ManualState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Scheduler for ManualScheduler {
    fn after(&self, delay: Duration, task: DeferredTask) {
        let mut state = self.lock();
        let at = state.elapsed + delay;
        state.pending.push((at, task));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_manual_scheduler_fires_only_due_tasks() {
        let scheduler = ManualScheduler::new();
        let fired = Arc::new(AtomicUsize::new(0));

        for secs in [5, 10] {
            let fired = Arc::clone(&fired);
            scheduler.after(
                Duration::from_secs(secs),
                Box::new(move || {
                    fired.fetch_add(1, Ordering::SeqCst);
                }),
            );
        }

        assert_eq!(scheduler.advance(Duration::from_secs(4)), 0);
        assert_eq!(scheduler.advance(Duration::from_secs(1)), 1);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.pending(), 1);

        assert_eq!(scheduler.advance(Duration::from_secs(60)), 1);
        assert_eq!(fired.load(Ordering::SeqCst), 2);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_manual_scheduler_runs_in_due_order() {
        let scheduler = ManualScheduler::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for secs in [3u64, 1, 2] {
            let order = Arc::clone(&order);
            scheduler.after(
                Duration::from_secs(secs),
                Box::new(move || order.lock().unwrap().push(secs)),
            );
        }

        scheduler.advance(Duration::from_secs(3));
        assert_eq!(*order.lock().unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_tokio_scheduler_runs_task_after_delay() {
        let scheduler = TokioScheduler::current().expect("inside a runtime");
        let (tx, rx) = tokio::sync::oneshot::channel();

        scheduler.after(
            Duration::from_millis(20),
            Box::new(move || {
                let _ = tx.send(());
            }),
        );

        tokio::time::timeout(Duration::from_secs(2), rx)
            .await
            .expect("task fired before timeout")
            .expect("sender not dropped");
    }
}
