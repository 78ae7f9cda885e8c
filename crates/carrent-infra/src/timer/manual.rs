//! Deterministic ticker driven by hand.
//!
//! Time only moves when [`ManualTicker::advance`] is called, which makes
//! schedules testable without sleeping.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use carrent_core::ports::{TickHandle, TickTask, Ticker};

const MIN_PERIOD: Duration = Duration::from_millis(1);

#[derive(Clone, Default)]
pub struct ManualTicker {
    state: Arc<Mutex<ManualState>>,
}

#[derive(Default)]
struct ManualState {
    now: Duration,
    timers: Vec<ManualTimer>,
}

struct ManualTimer {
    period: Duration,
    next_due: Duration,
    task: TickTask,
    cancelled: Arc<AtomicBool>,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ManualState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Virtual time elapsed since creation.
    pub fn now(&self) -> Duration {
        self.lock().now
    }

    /// Number of schedules that have not been cancelled.
    pub fn active_timers(&self) -> usize {
        self.lock()
            .timers
            .iter()
            .filter(|t| !t.cancelled.load(Ordering::SeqCst))
            .count()
    }

    /// Move time forward by `by`, running every task that falls due, in due
    /// order. Each run is awaited before the next one starts.
    pub async fn advance(&self, by: Duration) {
        let target = self.now() + by;

        loop {
            let task = {
                let mut state = self.lock();
                state.timers.retain(|t| !t.cancelled.load(Ordering::SeqCst));

                let Some(timer) = state
                    .timers
                    .iter_mut()
                    .filter(|t| t.next_due <= target)
                    .min_by_key(|t| t.next_due)
                else {
                    state.now = target;
                    break;
                };

                let due = timer.next_due;
                timer.next_due += timer.period;
                let task = timer.task.clone();
                state.now = due;
                task
            };

            task().await;
        }
    }
}

impl Ticker for ManualTicker {
    fn every(&self, period: Duration, task: TickTask) -> Box<dyn TickHandle> {
        let period = period.max(MIN_PERIOD);
        let cancelled = Arc::new(AtomicBool::new(false));

        let mut state = self.lock();
        let next_due = state.now + period;
        state.timers.push(ManualTimer {
            period,
            next_due,
            task,
            cancelled: cancelled.clone(),
        });

        Box::new(ManualTickHandle { cancelled })
    }
}

struct ManualTickHandle {
    cancelled: Arc<AtomicBool>,
}

impl TickHandle for ManualTickHandle {
    fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }
}
