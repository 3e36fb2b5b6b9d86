//! Destination for aggregated results.

use async_trait::async_trait;

use crate::types::User;

/// Receives aggregated rankings as a load progresses.
///
/// `completed` is `true` exactly once, on the final delivery of a successful
/// load. Delivery may suspend (for example to hand the value to a UI task);
/// strategies that deliver from inside a scope treat it as part of that
/// scope's work, so a cancelled scope may abandon a delivery mid-way.
#[async_trait]
pub trait ResultSink: Send + Sync {
    async fn deliver(&self, users: Vec<User>, completed: bool);
}

/// Adapts a synchronous closure into a [`ResultSink`].
///
/// # Example
///
/// ```rust
/// use contributors::{FnSink, User};
///
/// let sink = FnSink::new(|users: Vec<User>, completed: bool| {
///     println!("{} users (completed: {completed})", users.len());
/// });
/// # let _ = sink;
/// ```
pub struct FnSink<F> {
    f: F,
}

impl<F> FnSink<F>
where
    F: Fn(Vec<User>, bool) + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F> ResultSink for FnSink<F>
where
    F: Fn(Vec<User>, bool) + Send + Sync,
{
    async fn deliver(&self, users: Vec<User>, completed: bool) {
        (self.f)(users, completed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_fn_sink_invokes_closure() {
        let seen = AtomicUsize::new(0);
        let sink = FnSink::new(|users: Vec<User>, completed: bool| {
            assert!(completed);
            seen.fetch_add(users.len(), Ordering::SeqCst);
        });

        sink.deliver(vec![User::new("alice", 1), User::new("bob", 2)], true)
            .await;
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }
}
