//! Streaming fan-in strategy.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::aggregate::aggregate_all;
use crate::channel::{self, Capacity};
use crate::error::Error;
use crate::fetcher::Fetcher;
use crate::scope::{run_cancellable, TaskScope};
use crate::service::ContributorsService;
use crate::sink::ResultSink;
use crate::types::{RequestData, User};

/// Load every repository concurrently and deliver the running ranking each
/// time one of them arrives.
///
/// One producer task per repository pushes its contributors into a bounded
/// channel; this task is the single consumer. The k-th delivery ranks exactly
/// k repositories (in arrival order), and the N-th one has
/// `completed = true`. A failed retrieval cancels the remaining producers and
/// ends the load as soon as it happens, abandoning a delivery in progress and
/// any items still queued. Cancelling `cancel` does the same.
pub async fn load_contributors_channels(
    service: Arc<dyn ContributorsService>,
    req: &RequestData,
    sink: &dyn ResultSink,
    capacity: Capacity,
    cancel: &CancellationToken,
) -> Result<(), Error> {
    let fetcher = Fetcher::new(service, req.clone());
    let repos = run_cancellable(cancel, fetcher.repos()).await?;

    if repos.is_empty() {
        sink.deliver(Vec::new(), true).await;
        return Ok(());
    }

    let expected = repos.len();
    let mut scope = TaskScope::new(cancel);
    let (producer, mut consumer) = channel::bounded::<Vec<User>>(capacity);
    for repo in repos {
        let fetcher = fetcher.clone();
        let producer = producer.clone();
        scope.spawn(async move {
            let users = fetcher.contributors(&repo).await?;
            producer.send(users).await
        });
    }
    drop(producer);

    let mut completed: Vec<Vec<User>> = Vec::with_capacity(expected);
    let drain = consumer.recv_exact(expected, |index, users| {
        completed.push(users);
        let snapshot = aggregate_all(&completed);
        async move {
            debug!(received = index + 1, expected, "Delivering partial ranking");
            sink.deliver(snapshot, index + 1 == expected).await;
            Ok::<(), Error>(())
        }
    });

    // A failed producer ends the drain at once, even mid-delivery.
    let token = scope.token().clone();
    let drained = tokio::select! {
        biased;
        () = token.cancelled() => Err(Error::Cancelled),
        err = scope.failure() => Err(err),
        result = drain => result,
    };

    match drained {
        Ok(()) => {}
        Err(Error::ChannelClosed { .. }) => {
            // Producers only leave early when they failed; report that failure.
            let err = match scope.join_all().await {
                Err(err) => err,
                Ok(_) => Error::Worker("Producers exited without sending".to_string()),
            };
            warn!(org = %req.org, "Streaming load aborted: {}", err);
            return Err(err);
        }
        Err(err) => {
            warn!(org = %req.org, "Streaming load aborted: {}", err);
            scope.shutdown().await;
            return Err(err);
        }
    }

    // Every item is in; wait for the producers to wind down.
    scope.join_all().await?;
    info!(org = %req.org, repos = expected, "Streaming load finished");
    Ok(())
}
