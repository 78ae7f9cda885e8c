//! Notification poller.
//!
//! Fetches the notification list once on start, then on every tick of an
//! injected [`Ticker`], handing each successful snapshot to a callback.
//! A generation counter ties every fetch to the cycle that issued it, so a
//! stopped or restarted cycle can never reach the callback again.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

use crate::api::NotificationsApi;
use crate::domain::Notification;
use crate::ports::{TickHandle, TickTask, Ticker};

type Callback = Arc<dyn Fn(Vec<Notification>) + Send + Sync>;

/// Poller configuration.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    pub interval: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
        }
    }
}

/// Keeps a callback fed with the user's notifications.
pub struct NotificationPoller {
    inner: Arc<Inner>,
}

struct Inner {
    api: NotificationsApi,
    ticker: Arc<dyn Ticker>,
    interval: Duration,
    generation: AtomicU64,
    // Lock order: always taken before `generation` is bumped.
    timer: Mutex<Option<Box<dyn TickHandle>>>,
}

impl NotificationPoller {
    pub fn new(api: NotificationsApi, ticker: Arc<dyn Ticker>, config: PollerConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                api,
                ticker,
                interval: config.interval,
                generation: AtomicU64::new(0),
                timer: Mutex::new(None),
            }),
        }
    }

    /// Start (or restart) polling.
    ///
    /// Any running cycle is stopped first. The first fetch runs before this
    /// returns; later ones follow the configured interval.
    pub async fn start_polling<F>(&self, callback: F)
    where
        F: Fn(Vec<Notification>) + Send + Sync + 'static,
    {
        let generation = {
            let mut timer = self.inner.lock_timer();
            let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
            if let Some(old) = timer.take() {
                old.cancel();
            }
            generation
        };

        tracing::info!(
            interval_secs = self.inner.interval.as_secs_f64(),
            "Notification polling started"
        );

        let callback: Callback = Arc::new(callback);
        self.inner.tick(generation, &callback).await;

        let weak = Arc::downgrade(&self.inner);
        let handle = self
            .inner
            .ticker
            .every(self.inner.interval, tick_task(weak, generation, callback));

        let mut timer = self.inner.lock_timer();
        if self.inner.is_current(generation) {
            *timer = Some(handle);
        } else {
            // Stopped or restarted while the first fetch was running.
            handle.cancel();
        }
    }

    /// Stop polling. No-op when idle.
    pub fn stop_polling(&self) {
        if self.inner.stop() {
            tracing::info!("Notification polling stopped");
        }
    }

    pub fn is_polling(&self) -> bool {
        self.inner.lock_timer().is_some()
    }
}

impl Drop for NotificationPoller {
    fn drop(&mut self) {
        self.inner.stop();
    }
}

impl Inner {
    fn lock_timer(&self) -> MutexGuard<'_, Option<Box<dyn TickHandle>>> {
        self.timer.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Invalidate the running cycle. Returns whether a timer was armed.
    fn stop(&self) -> bool {
        let mut timer = self.lock_timer();
        self.generation.fetch_add(1, Ordering::SeqCst);
        match timer.take() {
            Some(handle) => {
                handle.cancel();
                true
            }
            None => false,
        }
    }

    async fn tick(&self, generation: u64, callback: &Callback) {
        if !self.is_current(generation) {
            return;
        }

        let notifications = match self.api.mine().await {
            Ok(list) => list,
            Err(e) => {
                tracing::debug!(error = %e, "Notification fetch failed, skipping tick");
                return;
            }
        };

        if !self.is_current(generation) {
            tracing::debug!("Discarding notifications fetched by a stopped cycle");
            return;
        }

        let count = notifications.len();
        if catch_unwind(AssertUnwindSafe(|| callback(notifications))).is_err() {
            tracing::error!(count, "Notification callback panicked");
        }
    }
}

fn tick_task(inner: Weak<Inner>, generation: u64, callback: Callback) -> TickTask {
    Arc::new(move || {
        let inner = inner.clone();
        let callback = callback.clone();
        Box::pin(async move {
            if let Some(inner) = inner.upgrade() {
                inner.tick(generation, &callback).await;
            }
        })
    })
}
