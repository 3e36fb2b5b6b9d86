//! Cooperative sequential strategies.
//!
//! One logical task retrieves the repositories one at a time, suspending at
//! every request instead of blocking its thread. Cancellation takes effect at
//! the next suspension point.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::aggregate::aggregate_all;
use crate::error::Error;
use crate::fetcher::Fetcher;
use crate::scope::run_cancellable;
use crate::service::ContributorsService;
use crate::sink::ResultSink;
use crate::types::{RequestData, User};

/// Load contributors one repository at a time.
pub async fn load_contributors_suspend(
    service: Arc<dyn ContributorsService>,
    req: &RequestData,
    cancel: &CancellationToken,
) -> Result<Vec<User>, Error> {
    let fetcher = Fetcher::new(service, req.clone());
    let repos = run_cancellable(cancel, fetcher.repos()).await?;

    let mut collections = Vec::with_capacity(repos.len());
    for repo in &repos {
        collections.push(run_cancellable(cancel, fetcher.contributors(repo)).await?);
    }

    let users = aggregate_all(&collections);
    info!(org = %req.org, repos = repos.len(), users = users.len(), "Sequential load finished");
    Ok(users)
}

/// Load contributors one repository at a time, delivering the running
/// ranking after every repository.
///
/// The last delivery has `completed = true`. An organization without
/// repositories gets a single empty, completed delivery.
pub async fn load_contributors_progress(
    service: Arc<dyn ContributorsService>,
    req: &RequestData,
    sink: &dyn ResultSink,
    cancel: &CancellationToken,
) -> Result<(), Error> {
    let fetcher = Fetcher::new(service, req.clone());
    let repos = run_cancellable(cancel, fetcher.repos()).await?;

    if repos.is_empty() {
        sink.deliver(Vec::new(), true).await;
        return Ok(());
    }

    let last = repos.len() - 1;
    let mut all_users: Vec<User> = Vec::new();
    for (index, repo) in repos.iter().enumerate() {
        let users = run_cancellable(cancel, fetcher.contributors(repo)).await?;
        all_users = aggregate_all(&[all_users, users]);

        let snapshot = all_users.clone();
        run_cancellable(cancel, async {
            sink.deliver(snapshot, index == last).await;
            Ok::<(), Error>(())
        })
        .await?;
    }

    info!(org = %req.org, repos = repos.len(), users = all_users.len(), "Progress load finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::testing::{MockGitHubService, RecordingSink};

    fn service() -> Arc<MockGitHubService> {
        Arc::new(
            MockGitHubService::new()
                .with_repos_delay(Duration::from_secs(1))
                .with_delayed_repo("alpha", vec![User::new("alice", 3)], Duration::from_secs(3))
                .with_delayed_repo("beta", vec![User::new("bob", 4)], Duration::from_secs(1))
                .with_delayed_repo("gamma", vec![User::new("alice", 2)], Duration::from_secs(2)),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_suspend_takes_the_sum_of_delays() {
        let start = tokio::time::Instant::now();
        let users = load_contributors_suspend(
            service(),
            &RequestData::new("acme"),
            &CancellationToken::new(),
        )
        .await
        .expect("load should succeed");

        assert_eq!(users, vec![User::new("alice", 5), User::new("bob", 4)]);
        assert_eq!(start.elapsed(), Duration::from_secs(1 + 3 + 1 + 2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_suspend_stops_at_next_suspension_point() {
        let mock = service();
        let cancel = CancellationToken::new();
        let canceller = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(2)).await;
            canceller.cancel();
        });

        let err = load_contributors_suspend(mock.clone(), &RequestData::new("acme"), &cancel)
            .await
            .expect_err("load is cancelled");
        assert!(err.is_cancelled());

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(mock.call_count("get_repo_contributors"), 1);
        assert_eq!(mock.completed_count("get_repo_contributors"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_delivers_after_every_repo() {
        let sink = RecordingSink::new();
        load_contributors_progress(
            service(),
            &RequestData::new("acme"),
            &sink,
            &CancellationToken::new(),
        )
        .await
        .expect("load should succeed");

        let deliveries = sink.deliveries();
        let completed: Vec<bool> = deliveries.iter().map(|d| d.completed).collect();
        assert_eq!(completed, vec![false, false, true]);
        assert_eq!(deliveries[0].users, vec![User::new("alice", 3)]);
        assert_eq!(
            deliveries[1].users,
            vec![User::new("bob", 4), User::new("alice", 3)]
        );
        assert_eq!(
            deliveries[2].users,
            vec![User::new("alice", 5), User::new("bob", 4)]
        );
        assert_eq!(sink.totals(), vec![3, 7, 9]);
    }

    #[tokio::test]
    async fn test_progress_with_no_repos_delivers_empty_result() {
        let sink = RecordingSink::new();
        load_contributors_progress(
            Arc::new(MockGitHubService::new()),
            &RequestData::new("empty"),
            &sink,
            &CancellationToken::new(),
        )
        .await
        .expect("load should succeed");

        let deliveries = sink.deliveries();
        assert_eq!(deliveries.len(), 1);
        assert!(deliveries[0].completed);
        assert!(deliveries[0].users.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_failure_stops_deliveries() {
        let mock = Arc::new(
            MockGitHubService::new()
                .with_repo("alpha", vec![User::new("alice", 1)])
                .with_repo("beta", vec![])
                .with_repo("gamma", vec![User::new("carol", 1)])
                .fail_repo("beta", 500, "Server Error"),
        );
        let sink = RecordingSink::new();

        let err = load_contributors_progress(
            mock.clone(),
            &RequestData::new("acme"),
            &sink,
            &CancellationToken::new(),
        )
        .await
        .expect_err("beta fails");

        assert_eq!(err.as_service().and_then(|e| e.status()), Some(500));
        assert_eq!(sink.len(), 1);
        assert!(!sink.deliveries()[0].completed);
        assert_eq!(mock.call_count("get_repo_contributors"), 2);
    }
}
