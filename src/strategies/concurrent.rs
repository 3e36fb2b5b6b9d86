//! Fan-out strategies: one task per repository.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::aggregate::aggregate_all;
use crate::error::Error;
use crate::fetcher::Fetcher;
use crate::scope::{run_cancellable, spawn_detached, TaskScope};
use crate::service::ContributorsService;
use crate::types::{RequestData, User};

/// Load every repository's contributors concurrently and rank them once all
/// have arrived.
///
/// The child tasks live in a scope nested under `cancel`: cancelling it
/// stops all of them, and the first failed retrieval cancels its siblings
/// and becomes the result.
pub async fn load_contributors_concurrent(
    service: Arc<dyn ContributorsService>,
    req: &RequestData,
    cancel: &CancellationToken,
) -> Result<Vec<User>, Error> {
    let fetcher = Fetcher::new(service, req.clone());
    let repos = run_cancellable(cancel, fetcher.repos()).await?;

    let mut scope = TaskScope::new(cancel);
    for repo in repos {
        let fetcher = fetcher.clone();
        scope.spawn(async move { fetcher.contributors(&repo).await });
    }

    let collections = scope.join_all().await?;
    let users = aggregate_all(&collections);
    info!(org = %req.org, repos = collections.len(), users = users.len(), "Concurrent load finished");
    Ok(users)
}

/// Like [`load_contributors_concurrent`], but the child tasks are spawned
/// detached from any scope.
///
/// Cancelling `cancel` only stops the wait: the child tasks keep running to
/// completion and their results are thrown away. A failure is reported
/// without stopping the other tasks either. Orphaned work like this is
/// rarely what a caller wants; prefer [`load_contributors_concurrent`].
pub async fn load_contributors_not_cancellable(
    service: Arc<dyn ContributorsService>,
    req: &RequestData,
    cancel: &CancellationToken,
) -> Result<Vec<User>, Error> {
    let fetcher = Fetcher::new(service, req.clone());
    let repos = run_cancellable(cancel, fetcher.repos()).await?;
    let expected = repos.len();

    // One slot per task, so a detached task never waits on a departed caller.
    let (tx, mut rx) = mpsc::channel(expected.max(1));
    for repo in repos {
        let fetcher = fetcher.clone();
        let tx = tx.clone();
        // Intentionally unowned: these tasks outlive a cancelled caller.
        drop(spawn_detached(async move {
            let result = fetcher.contributors(&repo).await;
            if tx.send(result).await.is_err() {
                warn!(repo = %repo.name, "Detached task finished after its caller left");
            }
            Ok::<(), Error>(())
        }));
    }
    drop(tx);

    let collections = run_cancellable(cancel, async {
        let mut collections = Vec::with_capacity(expected);
        while collections.len() < expected {
            match rx.recv().await {
                Some(result) => collections.push(result?),
                None => {
                    return Err(Error::ChannelClosed {
                        received: collections.len(),
                        expected,
                    })
                }
            }
        }
        Ok(collections)
    })
    .await;

    let collections = match collections {
        Ok(collections) => collections,
        Err(err) => {
            warn!(org = %req.org, "Detached tasks keep running after: {}", err);
            return Err(err);
        }
    };

    let users = aggregate_all(&collections);
    info!(org = %req.org, repos = expected, users = users.len(), "Detached load finished");
    Ok(users)
}
