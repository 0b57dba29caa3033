//! Single-slot delayed-task scheduler (trailing-edge debounce).
//!
//! At most one task is outstanding. Scheduling a new task atomically cancels
//! the pending one before arming the new timer, so a burst of calls inside the
//! quiet period collapses into a single run of the last task. Once a timer has
//! fired, its task runs to completion; it is never cancelled mid-flight, and
//! [`Debouncer::flush`] still waits for it.

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

struct Pending {
    generation: u64,
    cancel: CancellationToken,
    fire_now: CancellationToken,
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct Slot {
    next_generation: u64,
    pending: Option<Pending>,
    /// Tasks whose timer fired and that have not finished yet.
    running: Vec<(u64, JoinHandle<()>)>,
}

impl Slot {
    /// Move the fired task from `pending` to `running`.
    fn mark_running(&mut self, generation: u64) {
        if self
            .pending
            .as_ref()
            .is_some_and(|p| p.generation == generation)
        {
            if let Some(fired) = self.pending.take() {
                self.running.push((generation, fired.handle));
            }
        }
    }

    fn mark_finished(&mut self, generation: u64) {
        self.running.retain(|(g, _)| *g != generation);
    }
}

/// Trailing-edge debouncer with a fixed quiet period.
///
/// Cheap to clone; clones share the same slot.
#[derive(Clone)]
pub struct Debouncer {
    delay: Duration,
    slot: Arc<Mutex<Slot>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            slot: Arc::new(Mutex::new(Slot::default())),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Slot> {
        // A panic inside the critical section cannot leave the slot
        // half-written, so a poisoned lock is still usable.
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Arm the timer for `task`, superseding any pending task.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn schedule<F, Fut>(&self, task: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut slot = self.lock();
        if let Some(previous) = slot.pending.take() {
            previous.cancel.cancel();
        }

        slot.next_generation += 1;
        let generation = slot.next_generation;
        let cancel = CancellationToken::new();
        let fire_now = CancellationToken::new();

        let delay = self.delay;
        let shared = Arc::clone(&self.slot);
        let cancelled = cancel.clone();
        let fired_early = fire_now.clone();

        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = cancelled.cancelled() => return,
                _ = fired_early.cancelled() => {}
                _ = tokio::time::sleep(delay) => {}
            }
            shared
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .mark_running(generation);
            task().await;
            shared
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .mark_finished(generation);
        });

        slot.pending = Some(Pending {
            generation,
            cancel,
            fire_now,
            handle,
        });
    }

    /// Whether a task is armed and has not fired yet.
    pub fn is_pending(&self) -> bool {
        self.lock().pending.is_some()
    }

    /// Drop the pending task without running it. Returns whether one existed.
    pub fn cancel(&self) -> bool {
        match self.lock().pending.take() {
            Some(pending) => {
                pending.cancel.cancel();
                true
            }
            None => false,
        }
    }

    /// Whether a fired task is still running.
    pub fn is_running(&self) -> bool {
        !self.lock().running.is_empty()
    }

    /// Fire the pending task immediately and wait for it to finish, along
    /// with any task whose timer already fired.
    ///
    /// Returns `false` if nothing was pending or running.
    pub async fn flush(&self) -> bool {
        let (pending, running) = {
            let mut slot = self.lock();
            (slot.pending.take(), std::mem::take(&mut slot.running))
        };
        if pending.is_none() && running.is_empty() {
            return false;
        }

        let mut handles: Vec<JoinHandle<()>> = running.into_iter().map(|(_, h)| h).collect();
        if let Some(pending) = pending {
            pending.fire_now.cancel();
            handles.push(pending.handle);
        }
        for handle in handles {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "Debounced task panicked");
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const QUIET: Duration = Duration::from_millis(1000);

    fn counting_task(counter: &Arc<AtomicUsize>) -> impl FnOnce() -> std::future::Ready<()> + Send + 'static {
        let counter = Arc::clone(counter);
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
            std::future::ready(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn burst_of_schedules_runs_once() {
        let debouncer = Debouncer::new(QUIET);
        let runs = Arc::new(AtomicUsize::new(0));

        for _ in 0..5 {
            debouncer.schedule(counting_task(&runs));
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
        assert_eq!(runs.load(Ordering::SeqCst), 0);
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn last_scheduled_task_wins() {
        let debouncer = Debouncer::new(QUIET);
        let seen = Arc::new(Mutex::new(Vec::new()));

        for value in 1..=3 {
            let seen = Arc::clone(&seen);
            debouncer.schedule(move || async move {
                seen.lock().unwrap().push(value);
            });
        }
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(*seen.lock().unwrap(), vec![3]);
    }

    #[tokio::test(start_paused = true)]
    async fn separated_schedules_run_separately() {
        let debouncer = Debouncer::new(QUIET);
        let runs = Arc::new(AtomicUsize::new(0));

        debouncer.schedule(counting_task(&runs));
        tokio::time::sleep(Duration::from_millis(1500)).await;
        debouncer.schedule(counting_task(&runs));
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_pending_task() {
        let debouncer = Debouncer::new(QUIET);
        let runs = Arc::new(AtomicUsize::new(0));

        debouncer.schedule(counting_task(&runs));
        assert!(debouncer.cancel());
        assert!(!debouncer.cancel());
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn flush_runs_pending_task_immediately() {
        let debouncer = Debouncer::new(QUIET);
        let runs = Arc::new(AtomicUsize::new(0));

        debouncer.schedule(counting_task(&runs));
        assert!(debouncer.flush().await);
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert!(!debouncer.flush().await);

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn flush_waits_for_task_already_running() {
        let debouncer = Debouncer::new(QUIET);
        let done = Arc::new(AtomicUsize::new(0));

        let finished = Arc::clone(&done);
        debouncer.schedule(move || async move {
            tokio::time::sleep(Duration::from_millis(500)).await;
            finished.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert!(!debouncer.is_pending());
        assert!(debouncer.is_running());
        assert_eq!(done.load(Ordering::SeqCst), 0);

        assert!(debouncer.flush().await);
        assert_eq!(done.load(Ordering::SeqCst), 1);
        assert!(!debouncer.is_running());
        assert!(!debouncer.flush().await);
    }

    #[tokio::test(start_paused = true)]
    async fn finished_task_leaves_nothing_to_flush() {
        let debouncer = Debouncer::new(QUIET);
        let runs = Arc::new(AtomicUsize::new(0));

        debouncer.schedule(counting_task(&runs));
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert!(!debouncer.is_running());
        assert!(!debouncer.flush().await);
    }
}
