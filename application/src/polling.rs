use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollFlow {
    Continue,
    Stop,
}

/// A repeating task that runs `on_tick` every `period`, first after one full period.
///
/// Ticks never overlap: the next period starts counting once the previous tick has
/// returned. Cancelling consumes the task, so it can only happen once.
pub struct PollingTask {
    token: CancellationToken,
    join: JoinHandle<()>,
}

impl PollingTask {
    pub fn spawn<F, Fut>(period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = PollFlow> + Send + 'static,
    {
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let join = tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = cancelled.cancelled() => break,
                    _ = ticker.tick() => {}
                }
                if on_tick().await == PollFlow::Stop {
                    break;
                }
                if cancelled.is_cancelled() {
                    break;
                }
            }
            tracing::trace!("polling task finished");
        });
        Self { token, join }
    }

    /// Stops further ticks. A tick already running completes; its caller is expected
    /// to ignore the result.
    pub fn cancel(self) {
        self.token.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}
