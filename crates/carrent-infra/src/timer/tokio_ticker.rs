//! Ticker backed by the tokio runtime.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

use carrent_core::ports::{TickHandle, TickTask, Ticker};

/// Smallest period accepted; tokio rejects a zero interval.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Runs each schedule as a spawned task on the current tokio runtime.
///
/// Runs never overlap: the next tick is awaited only after the previous run
/// finished, and ticks missed meanwhile are delayed rather than bunched.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTicker;

impl TokioTicker {
    pub fn new() -> Self {
        Self
    }
}

impl Ticker for TokioTicker {
    fn every(&self, period: Duration, task: TickTask) -> Box<dyn TickHandle> {
        let period = period.max(MIN_PERIOD);
        let (cancel_tx, mut cancel_rx) = watch::channel(false);

        tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    // Fires on cancel and when the handle is dropped
                    _ = cancel_rx.changed() => break,
                    _ = interval.tick() => {}
                }

                if *cancel_rx.borrow() {
                    break;
                }
                task().await;
            }

            tracing::trace!("Ticker loop exited");
        });

        Box::new(TokioTickHandle { cancel: cancel_tx })
    }
}

struct TokioTickHandle {
    cancel: watch::Sender<bool>,
}

impl TickHandle for TokioTickHandle {
    fn cancel(&self) {
        // Err only means the loop is already gone
        let _ = self.cancel.send(true);
    }
}
