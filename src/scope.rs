//! Task scopes: structured ownership and cancellation of spawned work.
//!
//! A [`TaskScope`] owns every task spawned through it. Its cancellation token
//! is a child of the caller's token, so cancelling the caller cancels the
//! scope and every scope nested under it. A scope is only finished once all
//! of its tasks have finished, failed or been cancelled.
//!
//! [`spawn_detached`] is the deliberate exception: it hands work to the
//! runtime without any owner.

use std::future::Future;

use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::error::Error;

/// Run `fut` unless `token` is cancelled first.
///
/// Cancellation is checked before the future is polled, so once the token
/// fires the outcome is always [`Error::Cancelled`], never a late result.
pub async fn run_cancellable<T, F>(token: &CancellationToken, fut: F) -> Result<T, Error>
where
    F: Future<Output = Result<T, Error>>,
{
    tokio::select! {
        biased;
        () = token.cancelled() => Err(Error::Cancelled),
        result = fut => result,
    }
}

/// A set of tasks sharing one cancellation scope.
pub struct TaskScope<T> {
    token: CancellationToken,
    tasks: JoinSet<Result<T, Error>>,
}

impl<T: Send + 'static> TaskScope<T> {
    /// Open a scope nested under `parent`.
    pub fn new(parent: &CancellationToken) -> Self {
        Self {
            token: parent.child_token(),
            tasks: JoinSet::new(),
        }
    }

    /// Token of this scope, for nesting further scopes.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Number of tasks not yet joined.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Spawn a task owned by this scope.
    pub fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = Result<T, Error>> + Send + 'static,
    {
        let token = self.token.clone();
        self.tasks
            .spawn(async move { run_cancellable(&token, task).await });
    }

    /// Cancel every task in the scope and any scope nested under it.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Wait for the next task to finish; `None` once no tasks remain.
    ///
    /// After the scope is cancelled every outcome reads as
    /// [`Error::Cancelled`], whatever the task itself returned.
    pub async fn next(&mut self) -> Option<Result<T, Error>> {
        let joined = self.tasks.join_next().await?;
        if self.token.is_cancelled() {
            return Some(Err(Error::Cancelled));
        }
        Some(joined.map_err(Error::from).and_then(|result| result))
    }

    /// Wait for every task, failing fast.
    ///
    /// Results are returned in completion order. The first failure cancels
    /// the remaining tasks, waits for them to stop, and is returned alone.
    pub async fn join_all(mut self) -> Result<Vec<T>, Error> {
        let mut results = Vec::with_capacity(self.tasks.len());
        while let Some(result) = self.next().await {
            match result {
                Ok(value) => results.push(value),
                Err(err) => {
                    self.shutdown().await;
                    return Err(err);
                }
            }
        }
        Ok(results)
    }

    /// Resolve with the first failed task, discarding successful results.
    ///
    /// Never resolves if every task succeeds. Cancel safe, so it can be
    /// raced against other work in `tokio::select!`.
    pub async fn failure(&mut self) -> Error {
        while let Some(result) = self.next().await {
            if let Err(err) = result {
                return err;
            }
        }
        std::future::pending().await
    }

    /// Cancel the scope and wait until every task has stopped.
    pub async fn shutdown(&mut self) {
        if !self.tasks.is_empty() {
            warn!(remaining = self.tasks.len(), "Cancelling in-flight tasks");
        }
        self.token.cancel();
        self.tasks.shutdown().await;
    }
}

impl<T> Drop for TaskScope<T> {
    fn drop(&mut self) {
        // Dropping the JoinSet aborts owned tasks; nested scopes follow the token.
        self.token.cancel();
    }
}

/// Spawn `task` on the runtime without attaching it to any scope.
///
/// This deliberately leaks the task's lifetime: it is not cancelled when the
/// caller is cancelled or dropped, and it keeps running until it finishes on
/// its own. Dropping the returned handle detaches it completely.
pub fn spawn_detached<T, F>(task: F) -> JoinHandle<Result<T, Error>>
where
    T: Send + 'static,
    F: Future<Output = Result<T, Error>> + Send + 'static,
{
    tokio::spawn(task)
}
