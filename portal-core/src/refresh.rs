use std::{future::Future, time::Duration};

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// How often the widget re-runs its fetch-aggregate-render cycle unless
/// `refresh_minutes` says otherwise.
pub const DEFAULT_REFRESH: Duration = Duration::from_secs(30 * 60);

/// Run `tick` now and then once per `period` until `cancel` fires.
///
/// Cancellation also interrupts a tick that is still running. Returns the
/// number of ticks that ran to completion.
pub async fn run_periodic<F, Fut>(period: Duration, cancel: CancellationToken, mut tick: F) -> usize
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    let mut interval = tokio::time::interval(period.max(Duration::from_millis(1)));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut completed = 0;
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {}
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = tick() => completed += 1,
        }
    }

    debug!(completed, "periodic refresh stopped");
    completed
}
