//! Caller-scoped cancellation and deadlines for store operations.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::errors::{DomainError, DomainResult};

/// Cancellation signal and optional deadline handed to every operation
///
/// Cloning shares the same cancellation token. Use [`OperationContext::child`]
/// for a context that is cancelled together with its parent but can also be
/// cancelled on its own.
#[derive(Debug, Clone, Default)]
pub struct OperationContext {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl OperationContext {
    /// A context that is never cancelled and has no deadline
    pub fn background() -> Self {
        Self::default()
    }

    /// A context whose deadline is `timeout` from now
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::background().deadline_at(Instant::now() + timeout)
    }

    /// Set an absolute deadline, keeping the earlier one if already set
    pub fn deadline_at(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) => current.min(deadline),
            None => deadline,
        });
        self
    }

    /// Derive a context cancelled whenever this one is
    pub fn child(&self) -> Self {
        Self {
            cancel: self.cancel.child_token(),
            deadline: self.deadline,
        }
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Fail fast if the context is already done
    pub fn check(&self, operation: &'static str) -> DomainResult<()> {
        if self.cancel.is_cancelled() {
            return Err(DomainError::Cancelled { operation });
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(DomainError::DeadlineExceeded { operation });
            }
        }
        Ok(())
    }

    /// Drive `fut` to completion unless the context is cancelled or its
    /// deadline passes first
    ///
    /// An abandoned future is dropped, which rolls back any transaction it
    /// holds open. A single statement outside a transaction may already have
    /// been applied by the backend when cancellation wins the race, so a
    /// `Cancelled` result does not prove that nothing was written.
    pub async fn run<T, F>(&self, operation: &'static str, fut: F) -> DomainResult<T>
    where
        F: Future<Output = DomainResult<T>>,
    {
        self.check(operation)?;

        let guarded = async {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => Err(DomainError::Cancelled { operation }),
                result = fut => result,
            }
        };

        match self.deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, guarded)
                .await
                .unwrap_or(Err(DomainError::DeadlineExceeded { operation })),
            None => guarded.await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_background_runs_to_completion() {
        let ctx = OperationContext::background();
        let value = ctx.run("op", async { Ok(7) }).await.unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let ctx = OperationContext::background();
        ctx.cancel();

        let result: DomainResult<()> = ctx.run("op", async { Ok(()) }).await;
        assert!(matches!(result, Err(DomainError::Cancelled { operation: "op" })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_while_pending() {
        let ctx = OperationContext::background();
        let canceller = ctx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            canceller.cancel();
        });

        let result: DomainResult<()> = ctx
            .run("op", async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(())
            })
            .await;
        assert!(matches!(result, Err(DomainError::Cancelled { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_after_side_effect_still_reports_cancelled() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::sync::Arc;

        let ctx = OperationContext::background();
        let applied = Arc::new(AtomicBool::new(false));

        let canceller = ctx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            canceller.cancel();
        });

        let flag = applied.clone();
        let result: DomainResult<()> = ctx
            .run("op", async move {
                flag.store(true, Ordering::SeqCst);
                // Reply still in flight when cancellation arrives
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(())
            })
            .await;

        assert!(matches!(result, Err(DomainError::Cancelled { .. })));
        assert!(applied.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_exceeded_while_pending() {
        let ctx = OperationContext::with_timeout(Duration::from_millis(50));

        let result: DomainResult<()> = ctx
            .run("op", async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(())
            })
            .await;
        assert!(matches!(result, Err(DomainError::DeadlineExceeded { operation: "op" })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_elapsed_deadline_fails_fast() {
        let ctx = OperationContext::with_timeout(Duration::from_millis(1));
        tokio::time::advance(Duration::from_millis(5)).await;
        assert!(matches!(ctx.check("op"), Err(DomainError::DeadlineExceeded { .. })));
    }

    #[tokio::test]
    async fn test_child_follows_parent() {
        let parent = OperationContext::background();
        let child = parent.child();
        assert!(!child.is_cancelled());

        parent.cancel();
        assert!(child.is_cancelled());

        let sibling = OperationContext::background();
        let other_child = sibling.child();
        other_child.cancel();
        assert!(!sibling.is_cancelled());
    }

    #[test]
    fn test_deadline_keeps_earliest() {
        let now = Instant::now();
        let ctx = OperationContext::background()
            .deadline_at(now + Duration::from_secs(10))
            .deadline_at(now + Duration::from_secs(20));
        assert_eq!(ctx.deadline(), Some(now + Duration::from_secs(10)));
    }
}
