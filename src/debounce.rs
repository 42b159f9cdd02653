//! Time-windowed coalescing of rapid successive invocations.
//!
//! The debouncer is either idle or holds exactly one pending action with an
//! armed single-shot timer. Scheduling while pending replaces the action and
//! re-arms the timer, so a burst of calls spaced closer than the window runs
//! only the last action, once, one window after the last call.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::trace;

pub const DEFAULT_WINDOW: Duration = Duration::from_millis(500);

struct Pending {
    generation: u64,
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct State {
    generation: u64,
    pending: Option<Pending>,
}

fn lock(state: &Mutex<State>) -> MutexGuard<'_, State> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Requires a tokio runtime: timers are spawned onto the ambient runtime.
pub struct RequestDebouncer {
    delay: Duration,
    state: Arc<Mutex<State>>,
}

impl RequestDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            state: Arc::new(Mutex::new(State::default())),
        }
    }

    /// Arm (or re-arm) the timer with `action` as the only pending action.
    ///
    /// An action that has already started running is not affected.
    pub fn schedule<F>(&self, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut state = lock(&self.state);

        if let Some(previous) = state.pending.take() {
            previous.handle.abort();
            trace!(generation = previous.generation, "Superseded pending action");
        }

        state.generation = state.generation.wrapping_add(1);
        let generation = state.generation;
        let shared = Arc::clone(&self.state);
        let delay = self.delay;

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            // Only the action still registered as pending may fire.
            {
                let mut state = lock(&shared);
                let current = state
                    .pending
                    .as_ref()
                    .is_some_and(|p| p.generation == generation);
                if !current {
                    return;
                }
                state.pending = None;
            }

            action.await;
        });

        state.pending = Some(Pending { generation, handle });
    }

    /// Drop the pending action without running it.
    pub fn cancel(&self) {
        if let Some(pending) = lock(&self.state).pending.take() {
            pending.handle.abort();
            trace!(generation = pending.generation, "Cancelled pending action");
        }
    }

    pub fn is_pending(&self) -> bool {
        lock(&self.state).pending.is_some()
    }
}

impl Default for RequestDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

impl Drop for RequestDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for RequestDebouncer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestDebouncer")
            .field("delay", &self.delay)
            .field("pending", &self.is_pending())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{Instant, sleep};

    type Log = Arc<Mutex<Vec<(u32, Instant)>>>;

    fn record(log: &Log, id: u32) -> impl Future<Output = ()> + Send + use<> {
        let log = Arc::clone(log);
        async move {
            log.lock().unwrap().push((id, Instant::now()));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_runs_only_last_action() {
        let debouncer = RequestDebouncer::new(Duration::from_millis(500));
        let log: Log = Arc::default();

        debouncer.schedule(record(&log, 1));
        sleep(Duration::from_millis(100)).await;
        debouncer.schedule(record(&log, 2));
        sleep(Duration::from_millis(100)).await;
        debouncer.schedule(record(&log, 3));
        let last_call = Instant::now();

        sleep(Duration::from_millis(499)).await;
        assert!(log.lock().unwrap().is_empty());
        assert!(debouncer.is_pending());

        sleep(Duration::from_millis(2)).await;
        let log = log.lock().unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].0, 3);
        let waited = log[0].1 - last_call;
        assert!(waited >= Duration::from_millis(500) && waited < Duration::from_millis(502));
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_spaced_calls_each_run() {
        let debouncer = RequestDebouncer::new(Duration::from_millis(500));
        let log: Log = Arc::default();

        debouncer.schedule(record(&log, 1));
        sleep(Duration::from_millis(600)).await;
        debouncer.schedule(record(&log, 2));
        sleep(Duration::from_millis(600)).await;

        let ids: Vec<u32> = log.lock().unwrap().iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_discards_pending_action() {
        let debouncer = RequestDebouncer::default();
        let log: Log = Arc::default();

        debouncer.schedule(record(&log, 1));
        assert!(debouncer.is_pending());
        debouncer.cancel();
        assert!(!debouncer.is_pending());

        sleep(Duration::from_secs(2)).await;
        assert!(log.lock().unwrap().is_empty());

        // Cancelling an idle debouncer is a no-op.
        debouncer.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn test_running_action_is_not_aborted() {
        let debouncer = RequestDebouncer::new(Duration::from_millis(100));
        let log: Log = Arc::default();

        let slow_log = Arc::clone(&log);
        debouncer.schedule(async move {
            sleep(Duration::from_millis(1000)).await;
            slow_log.lock().unwrap().push((1, Instant::now()));
        });

        // The first action is now mid-flight.
        sleep(Duration::from_millis(200)).await;
        assert!(!debouncer.is_pending());
        debouncer.schedule(record(&log, 2));
        debouncer.cancel();

        sleep(Duration::from_secs(2)).await;
        let ids: Vec<u32> = log.lock().unwrap().iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![1]);
    }
}
