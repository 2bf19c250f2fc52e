//! Cancellable repeating task
//!
//! [`spawn_repeating`] runs a tick callback on a fixed period until the
//! callback returns [`Tick::Stop`] or the returned [`PollHandle`] is aborted.
//! The first tick fires one full period after spawning. A tick's future is
//! awaited before the next one is scheduled, so ticks never overlap.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

/// What a tick asks the loop to do next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Continue,
    Stop,
}

/// How a repeating task ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollExit {
    /// A tick returned [`Tick::Stop`]
    Completed { ticks: u64 },
    /// [`PollHandle::abort`] was called
    Aborted { ticks: u64 },
}

/// Handle to a running repeating task
#[derive(Debug)]
pub struct PollHandle {
    cancel: Arc<Notify>,
    task: JoinHandle<PollExit>,
}

impl PollHandle {
    /// Stop the loop; an in-flight tick is dropped
    pub fn abort(&self) {
        self.cancel.notify_one();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the loop to end
    pub async fn join(self) -> PollExit {
        self.task.await.unwrap_or(PollExit::Aborted { ticks: 0 })
    }
}

/// Spawn `tick` every `period` on the current tokio runtime
///
/// `tick` receives the 1-based tick number.
pub fn spawn_repeating<F, Fut>(period: Duration, mut tick: F) -> PollHandle
where
    F: FnMut(u64) -> Fut + Send + 'static,
    Fut: Future<Output = Tick> + Send + 'static,
{
    let cancel = Arc::new(Notify::new());
    let shutdown = Arc::clone(&cancel);

    let task = tokio::spawn(async move {
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut ticks = 0;

        loop {
            tokio::select! {
                biased;
                () = shutdown.notified() => {
                    debug!(ticks, "repeating task aborted while waiting");
                    return PollExit::Aborted { ticks };
                }
                _ = interval.tick() => {}
            }

            ticks += 1;

            let next = tokio::select! {
                biased;
                () = shutdown.notified() => {
                    debug!(ticks, "repeating task aborted during tick");
                    return PollExit::Aborted { ticks };
                }
                next = tick(ticks) => next,
            };

            if next == Tick::Stop {
                debug!(ticks, "repeating task completed");
                return PollExit::Completed { ticks };
            }
        }
    });

    PollHandle { cancel, task }
}
