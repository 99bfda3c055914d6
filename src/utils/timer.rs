// ============================================================================
// TIMERS - sleep + timeout sobre gloo-timers (wasm) o tokio (nativo)
// ============================================================================

use std::future::Future;
use std::time::Duration;

use futures::future::{select, Either};
use futures::pin_mut;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("timed out after {0:?}")]
pub struct TimeoutElapsed(pub Duration);

#[cfg(target_arch = "wasm32")]
pub async fn sleep(duration: Duration) {
    gloo_timers::future::sleep(duration).await;
}

#[cfg(not(target_arch = "wasm32"))]
pub async fn sleep(duration: Duration) {
    tokio::time::sleep(duration).await;
}

/// Corre `future` hasta que termine o venza `duration`.
///
/// Si vence, el future se descarta: no hay cancelación a nivel de red.
pub async fn with_timeout<F: Future>(future: F, duration: Duration) -> Result<F::Output, TimeoutElapsed> {
    let delay = sleep(duration);
    pin_mut!(future);
    pin_mut!(delay);

    match select(future, delay).await {
        Either::Left((output, _)) => Ok(output),
        Either::Right(((), _)) => Err(TimeoutElapsed(duration)),
    }
}
