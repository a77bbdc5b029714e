//! Interval polling with an explicit disposer.
//!
//! The notification badge refreshes every [`DEFAULT_POLL_INTERVAL`] while
//! the bell dropdown is mounted. [`spawn_poll`] returns a [`PollHandle`]
//! whose drop (or [`PollHandle::cancel`]) stops the loop, so a dismounted
//! screen can never leave a ticker running behind it.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::ClientError;
use crate::http::ApiClient;

/// How often the notification badge refreshes.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Disposer for a polling loop. Dropping it cancels the loop.
pub struct PollHandle {
    token: CancellationToken,
    task: tokio::task::JoinHandle<()>,
}

impl PollHandle {
    /// Stop the loop and wait for the in-flight tick, if any, to finish.
    pub async fn cancel(mut self) {
        self.token.cancel();
        // The task only ends by cancellation, so join errors mean it
        // panicked; nothing to salvage either way.
        let _ = (&mut self.task).await;
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Run `tick` immediately and then once per `interval` until cancelled.
///
/// A failing tick is logged and the loop keeps going; transient backend or
/// network trouble should not kill the badge. The loop does stop on
/// [`ClientError::Unauthorized`], since every further tick would fail the
/// same way until the user logs in again.
pub fn spawn_poll<F, Fut>(interval: Duration, mut tick: F) -> PollHandle
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<(), ClientError>> + Send + 'static,
{
    let token = CancellationToken::new();
    let loop_token = token.clone();

    let task = tokio::spawn(async move {
        let mut timer = tokio::time::interval(interval);
        loop {
            tokio::select! {
                _ = loop_token.cancelled() => break,
                _ = timer.tick() => {}
            }
            match tick().await {
                Ok(()) => {}
                Err(ClientError::Unauthorized) => {
                    tracing::debug!("Polling stopped: session invalidated");
                    break;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Poll tick failed");
                }
            }
        }
    });

    PollHandle { token, task }
}

/// Poll the unread notification count, pushing each fresh value into
/// `on_count`.
pub fn poll_unread_count<F>(client: ApiClient, interval: Duration, on_count: F) -> PollHandle
where
    F: Fn(i64) + Send + Sync + 'static,
{
    let on_count = std::sync::Arc::new(on_count);
    spawn_poll(interval, move || {
        let client = client.clone();
        let on_count = on_count.clone();
        async move {
            let n = client.unread_count().await?;
            on_count(n);
            Ok(())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_ticks_on_interval() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = ticks.clone();

        let handle = spawn_poll(Duration::from_secs(30), move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });

        // First tick fires immediately.
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(61)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 3);

        handle.cancel().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_ticking() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = ticks.clone();

        let handle = spawn_poll(Duration::from_secs(30), move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });

        tokio::time::sleep(Duration::from_millis(10)).await;
        handle.cancel().await;
        let after_cancel = ticks.load(Ordering::SeqCst);

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), after_cancel);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = ticks.clone();

        let handle = spawn_poll(Duration::from_secs(30), move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });

        tokio::time::sleep(Duration::from_millis(10)).await;
        drop(handle);

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_tick_keeps_polling() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = ticks.clone();

        let handle = spawn_poll(Duration::from_secs(30), move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(ClientError::Api {
                    status: 500,
                    message: "boom".into(),
                })
            }
        });

        tokio::time::sleep(Duration::from_secs(61)).await;
        assert!(ticks.load(Ordering::SeqCst) >= 2, "errors must not stop the loop");

        handle.cancel().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_unauthorized_stops_the_loop() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = ticks.clone();

        let handle = spawn_poll(Duration::from_secs(30), move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(ClientError::Unauthorized)
            }
        });

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 1);

        handle.cancel().await;
    }
}
