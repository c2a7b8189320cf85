//! Request-scoped execution context
//!
//! Every repository call receives a [`RequestContext`] that bounds it with
//! an optional deadline and a process-wide shutdown signal. The context is
//! created per request and passed down by reference; nothing stores it.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

use super::DomainError;

/// Owner side of the process-wide shutdown signal
#[derive(Debug)]
pub struct Shutdown {
    tx: watch::Sender<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    /// Create a listener that resolves once [`Shutdown::trigger`] is called
    pub fn subscribe(&self) -> ShutdownListener {
        ShutdownListener(self.tx.subscribe())
    }

    /// Signal every listener. Idempotent.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiver side of [`Shutdown`]
#[derive(Debug, Clone)]
pub struct ShutdownListener(watch::Receiver<bool>);

impl ShutdownListener {
    /// A listener that never fires
    pub fn never() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self(rx)
    }

    /// Resolves when shutdown was triggered. Pends forever if the owning
    /// [`Shutdown`] is dropped without triggering.
    pub async fn triggered(&self) {
        let mut rx = self.0.clone();

        if rx.wait_for(|stop| *stop).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Per-request cancellation, deadline and correlation id
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: String,
    deadline: Option<Instant>,
    shutdown: ShutdownListener,
}

impl RequestContext {
    pub fn new(
        request_id: impl Into<String>,
        timeout: Option<Duration>,
        shutdown: ShutdownListener,
    ) -> Self {
        Self {
            request_id: request_id.into(),
            deadline: timeout.map(|t| Instant::now() + t),
            shutdown,
        }
    }

    /// Context with no deadline that is never cancelled (migrations, tests)
    pub fn background() -> Self {
        Self::new("background", None, ShutdownListener::never())
    }

    /// Replace the deadline with one `timeout` from now
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Time left before the deadline, `None` when unbounded
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    /// Drive a store operation to completion unless the deadline passes or
    /// shutdown is signalled first.
    pub async fn run<T, F>(&self, operation: &str, fut: F) -> Result<T, DomainError>
    where
        F: Future<Output = Result<T, DomainError>>,
    {
        let bounded = async {
            match self.deadline {
                Some(deadline) => tokio::time::timeout_at(deadline, fut)
                    .await
                    .unwrap_or_else(|_| {
                        Err(DomainError::timeout(format!(
                            "{} did not complete before the request deadline",
                            operation
                        )))
                    }),
                None => fut.await,
            }
        };

        tokio::select! {
            biased;
            _ = self.shutdown.triggered() => Err(DomainError::cancelled(format!(
                "{} aborted by server shutdown",
                operation
            ))),
            result = bounded => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorKind;

    #[tokio::test]
    async fn test_run_passes_through_result() {
        let ctx = RequestContext::background();

        let ok: Result<i64, DomainError> = ctx.run("op", async { Ok(42) }).await;
        assert_eq!(ok, Ok(42));

        let err: Result<i64, DomainError> = ctx
            .run("op", async { Err(DomainError::not_found("gone")) })
            .await;
        assert_eq!(err, Err(DomainError::not_found("gone")));
    }

    #[tokio::test]
    async fn test_run_times_out() {
        let ctx = RequestContext::background().with_timeout(Duration::from_millis(10));

        let result: Result<(), DomainError> = ctx
            .run("slow query", async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            })
            .await;

        let err = result.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert!(err.message().contains("slow query"));
    }

    #[tokio::test]
    async fn test_run_cancelled_by_shutdown() {
        let shutdown = Shutdown::new();
        let ctx = RequestContext::new("req-1", None, shutdown.subscribe());
        shutdown.trigger();

        let result: Result<(), DomainError> =
            ctx.run("insert", std::future::pending()).await;

        assert_eq!(result.unwrap_err().kind(), ErrorKind::Cancelled);
        assert!(shutdown.is_triggered());
    }

    #[tokio::test]
    async fn test_shutdown_while_in_flight() {
        let shutdown = Shutdown::new();
        let ctx = RequestContext::new("req-2", None, shutdown.subscribe());

        let task = tokio::spawn(async move {
            ctx.run::<(), _>("list", std::future::pending()).await
        });

        tokio::time::sleep(Duration::from_millis(10)).await;
        shutdown.trigger();

        let result = task.await.unwrap();
        assert_eq!(result.unwrap_err().kind(), ErrorKind::Cancelled);
    }

    #[test]
    fn test_remaining() {
        assert!(RequestContext::background().remaining().is_none());

        let ctx = RequestContext::background().with_timeout(Duration::from_secs(60));
        assert!(ctx.remaining().unwrap() <= Duration::from_secs(60));
        assert_eq!(ctx.request_id(), "background");
    }
}
