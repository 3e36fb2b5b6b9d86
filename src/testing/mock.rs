//! Mock remote service for testing.
//!
//! Provides a `MockGitHubService` that serves configured repositories and
//! contributors with simulated network latency, records every call, and can
//! be told to fail.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::ServiceError;
use crate::service::ContributorsService;
use crate::types::{Repo, User};

/// Record of a method call.
#[derive(Debug, Clone)]
pub struct MockCall {
    /// Method name ("get_org_repos" or "get_repo_contributors")
    pub method: String,
    /// Arguments passed to the method
    pub args: Vec<String>,
    /// Timestamp of the call
    pub timestamp: DateTime<Utc>,
}

impl MockCall {
    /// Create a new mock call record.
    pub fn new(method: &str, args: Vec<String>) -> Self {
        Self {
            method: method.to_string(),
            args,
            timestamp: Utc::now(),
        }
    }
}

/// A configured repository and how the mock answers for it.
#[derive(Debug, Clone)]
struct MockRepo {
    repo: Repo,
    users: Vec<User>,
    delay: Duration,
    error: Option<ServiceError>,
}

/// Internal state for the mock service.
#[derive(Debug, Default)]
struct MockState {
    /// Calls that were started
    calls: Vec<MockCall>,
    /// Calls that ran to completion (were not cancelled mid-flight)
    completed: Vec<MockCall>,
}

/// Mock [`ContributorsService`] with per-call latency.
///
/// Latency uses `tokio::time::sleep`, so tests running on a paused clock see
/// deterministic virtual timings. A call that is cancelled while "in flight"
/// is recorded as started but never as completed.
#[derive(Debug, Default)]
pub struct MockGitHubService {
    repos: Vec<MockRepo>,
    repos_delay: Duration,
    repos_error: Option<ServiceError>,
    state: Mutex<MockState>,
}

impl MockGitHubService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a repository answering immediately.
    #[must_use]
    pub fn with_repo(self, name: &str, users: Vec<User>) -> Self {
        self.with_delayed_repo(name, users, Duration::ZERO)
    }

    /// Add a repository whose contributors arrive after `delay`.
    #[must_use]
    pub fn with_delayed_repo(mut self, name: &str, users: Vec<User>, delay: Duration) -> Self {
        let id = self.repos.len() as u64 + 1;
        self.repos.push(MockRepo {
            repo: Repo::new(id, name),
            users,
            delay,
            error: None,
        });
        self
    }

    /// Delay the repository listing.
    #[must_use]
    pub fn with_repos_delay(mut self, delay: Duration) -> Self {
        self.repos_delay = delay;
        self
    }

    /// Make the repository listing fail with the given status.
    #[must_use]
    pub fn fail_repos(mut self, status: u16, message: &str) -> Self {
        self.repos_error = Some(mock_error(status, message));
        self
    }

    /// Make the contributors call of `name` fail (after its configured delay).
    #[must_use]
    pub fn fail_repo(mut self, name: &str, status: u16, message: &str) -> Self {
        if let Some(entry) = self.repos.iter_mut().find(|r| r.repo.name == name) {
            entry.error = Some(mock_error(status, message));
        }
        self
    }

    /// Check if a method was called.
    pub fn was_called(&self, method: &str) -> bool {
        self.call_count(method) > 0
    }

    /// Number of times a method was called.
    pub fn call_count(&self, method: &str) -> usize {
        self.lock().calls.iter().filter(|c| c.method == method).count()
    }

    /// Number of calls to a method that ran to completion.
    pub fn completed_count(&self, method: &str) -> usize {
        self.lock()
            .completed
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    /// Get recorded calls, optionally filtered by method.
    pub fn get_calls(&self, method: Option<&str>) -> Vec<MockCall> {
        self.lock()
            .calls
            .iter()
            .filter(|c| method.map_or(true, |m| c.method == m))
            .cloned()
            .collect()
    }

    /// Reset all recorded calls.
    pub fn reset(&self) {
        let mut state = self.lock();
        state.calls.clear();
        state.completed.clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record_call(&self, call: &MockCall) {
        self.lock().calls.push(call.clone());
    }

    fn record_completed(&self, call: MockCall) {
        self.lock().completed.push(call);
    }
}

#[async_trait]
impl ContributorsService for MockGitHubService {
    async fn get_org_repos(&self, org: &str) -> Result<Vec<Repo>, ServiceError> {
        let call = MockCall::new("get_org_repos", vec![org.to_string()]);
        self.record_call(&call);

        tokio::time::sleep(self.repos_delay).await;
        self.record_completed(call);

        match &self.repos_error {
            Some(error) => Err(error.clone()),
            None => Ok(self.repos.iter().map(|r| r.repo.clone()).collect()),
        }
    }

    async fn get_repo_contributors(
        &self,
        org: &str,
        repo: &str,
    ) -> Result<Vec<User>, ServiceError> {
        let call = MockCall::new("get_repo_contributors", vec![org.to_string(), repo.to_string()]);
        self.record_call(&call);

        let Some(entry) = self.repos.iter().find(|r| r.repo.name == repo) else {
            self.record_completed(call);
            return Err(mock_error(404, "Not Found"));
        };

        tokio::time::sleep(entry.delay).await;
        self.record_completed(call);

        match &entry.error {
            Some(error) => Err(error.clone()),
            None => Ok(entry.users.clone()),
        }
    }
}

fn mock_error(status: u16, message: &str) -> ServiceError {
    let message = message.to_string();
    match status {
        404 => ServiceError::NotFound {
            status,
            message,
            request_id: None,
        },
        s if s >= 500 => ServiceError::Server {
            status,
            message,
            request_id: None,
        },
        _ => ServiceError::Status {
            status,
            message,
            request_id: None,
        },
    }
}
