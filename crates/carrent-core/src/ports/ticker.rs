//! Timer port used by the notification poller.

use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;

/// Future produced by one run of a repeating task.
pub type TickFuture = BoxFuture<'static, ()>;

/// A task the ticker runs on every period.
pub type TickTask = Arc<dyn Fn() -> TickFuture + Send + Sync>;

/// Schedules repeating work.
///
/// Implementations must not run the task immediately; the first run happens
/// one `period` after [`Ticker::every`] is called.
pub trait Ticker: Send + Sync {
    fn every(&self, period: Duration, task: TickTask) -> Box<dyn TickHandle>;
}

/// Handle to a repeating schedule.
pub trait TickHandle: Send + Sync {
    /// Stop scheduling further runs. A run already in progress is allowed to
    /// finish. Cancelling twice is a no-op.
    fn cancel(&self);
}
