//! Remote service that provides repositories and their contributors.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::Config;
use crate::error::{Error, ServiceError};
use crate::transport::HttpTransport;
use crate::types::{Repo, User};

/// Largest page the GitHub API serves.
const PER_PAGE: &str = "100";

/// Source of repositories and contributors.
///
/// Every call is a suspension point; implementations must be cheap to share
/// across tasks.
#[async_trait]
pub trait ContributorsService: Send + Sync {
    /// List the repositories of an organization.
    async fn get_org_repos(&self, org: &str) -> Result<Vec<Repo>, ServiceError>;

    /// List the contributors of one repository of an organization.
    async fn get_repo_contributors(&self, org: &str, repo: &str)
        -> Result<Vec<User>, ServiceError>;
}

/// [`ContributorsService`] backed by the GitHub REST API.
///
/// # Example
///
/// ```rust,ignore
/// use contributors::{GitHubService, ContributorsService};
///
/// let service = GitHubService::new("https://api.github.com", Duration::from_secs(30))?;
/// let repos = service.get_org_repos("kotlin").await?;
/// ```
#[derive(Debug, Clone)]
pub struct GitHubService {
    transport: Arc<HttpTransport>,
}

impl GitHubService {
    /// Create a new service client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP transport cannot be created.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, Error> {
        Ok(Self {
            transport: Arc::new(HttpTransport::new(base_url, timeout)?),
        })
    }

    /// Create a service client from a loaded [`Config`].
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP transport cannot be created.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        Self::new(&config.base_url, config.timeout)
    }
}

#[async_trait]
impl ContributorsService for GitHubService {
    async fn get_org_repos(&self, org: &str) -> Result<Vec<Repo>, ServiceError> {
        self.transport
            .get_list(&format!("/orgs/{org}/repos"), &[("per_page", PER_PAGE)])
            .await
    }

    async fn get_repo_contributors(
        &self,
        org: &str,
        repo: &str,
    ) -> Result<Vec<User>, ServiceError> {
        self.transport
            .get_list(
                &format!("/repos/{org}/{repo}/contributors"),
                &[("per_page", PER_PAGE)],
            )
            .await
    }
}
