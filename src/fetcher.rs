//! Two-level retrieval: an organization's repositories, then each repository's
//! contributors.
//!
//! The fetcher knows nothing about scheduling; strategies decide whether the
//! child retrievals run in sequence or fan out.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::Error;
use crate::service::ContributorsService;
use crate::types::{Repo, RequestData, User};

/// Retrieves repositories and contributors for one request.
///
/// Cloning is cheap, so each spawned child task gets its own handle.
#[derive(Clone)]
pub struct Fetcher {
    service: Arc<dyn ContributorsService>,
    req: Arc<RequestData>,
}

impl Fetcher {
    pub fn new(service: Arc<dyn ContributorsService>, req: RequestData) -> Self {
        Self {
            service,
            req: Arc::new(req),
        }
    }

    pub fn request(&self) -> &RequestData {
        &self.req
    }

    /// Retrieve the organization's repositories.
    pub async fn repos(&self) -> Result<Vec<Repo>, Error> {
        let repos = self.service.get_org_repos(&self.req.org).await?;
        log_repos(&self.req, &repos);
        Ok(repos)
    }

    /// Retrieve the contributors of one repository.
    pub async fn contributors(&self, repo: &Repo) -> Result<Vec<User>, Error> {
        let users = self
            .service
            .get_repo_contributors(&self.req.org, &repo.name)
            .await?;
        log_users(repo, &users);
        Ok(users)
    }
}

fn log_repos(req: &RequestData, repos: &[Repo]) {
    info!(org = %req.org, count = repos.len(), "Loaded repos");
}

fn log_users(repo: &Repo, users: &[User]) {
    debug!(repo = %repo.name, count = users.len(), "Loaded contributors");
}
