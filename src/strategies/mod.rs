//! Loading strategies.
//!
//! Every strategy retrieves the same data and ranks it with the same
//! [`aggregate`](crate::aggregate::aggregate) function; they differ only in
//! how the child retrievals are scheduled and how cancellation reaches them.
//!
//! | Variant          | Shape                                   | Cancellable            |
//! |------------------|-----------------------------------------|------------------------|
//! | `BLOCKING`       | sequential, blocks the calling thread   | no (wait only)         |
//! | `BACKGROUND`     | sequential on a dedicated thread        | no (wait only)         |
//! | `SUSPEND`        | sequential, suspends at each request    | yes                    |
//! | `CONCURRENT`     | one task per repo, fail-fast join       | yes, whole scope       |
//! | `NOT_CANCELLABLE`| one detached task per repo              | wait only, tasks leak  |
//! | `PROGRESS`       | sequential, delivers after each repo    | yes                    |
//! | `CHANNELS`       | one task per repo, fan-in channel       | yes, whole scope       |

mod blocking;
mod channels;
mod concurrent;
mod suspend;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::channel::Capacity;
use crate::config::Config;
use crate::error::Error;
use crate::scope::run_cancellable;
use crate::service::{ContributorsService, GitHubService};
use crate::sink::ResultSink;
use crate::types::RequestData;

pub use blocking::{load_contributors_background, load_contributors_blocking, BackgroundLoad};
pub use channels::load_contributors_channels;
pub use concurrent::{load_contributors_concurrent, load_contributors_not_cancellable};
pub use suspend::{load_contributors_progress, load_contributors_suspend};

/// Strategy used to load contributors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    Blocking,
    Background,
    Suspend,
    Concurrent,
    NotCancellable,
    Progress,
    Channels,
}

impl Variant {
    pub const ALL: [Variant; 7] = [
        Variant::Blocking,
        Variant::Background,
        Variant::Suspend,
        Variant::Concurrent,
        Variant::NotCancellable,
        Variant::Progress,
        Variant::Channels,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Blocking => "BLOCKING",
            Self::Background => "BACKGROUND",
            Self::Suspend => "SUSPEND",
            Self::Concurrent => "CONCURRENT",
            Self::NotCancellable => "NOT_CANCELLABLE",
            Self::Progress => "PROGRESS",
            Self::Channels => "CHANNELS",
        }
    }

    /// Whether the variant delivers intermediate results before the final one.
    pub fn reports_progress(self) -> bool {
        matches!(self, Self::Progress | Self::Channels)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown variant: {0}")]
pub struct ParseVariantError(String);

impl FromStr for Variant {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == normalized)
            .ok_or_else(|| ParseVariantError(s.to_string()))
    }
}

/// Runs any [`Variant`] against one service.
///
/// # Example
///
/// ```rust,ignore
/// use contributors::{CancellationToken, Config, FnSink, Loader, RequestData, Variant};
///
/// let loader = Loader::from_config(&Config::from_env()?)?;
/// let sink = FnSink::new(|users, completed| println!("{} users, done: {completed}", users.len()));
/// loader
///     .load(Variant::Channels, RequestData::new("kotlin"), &sink, &CancellationToken::new())
///     .await?;
/// ```
#[derive(Clone)]
pub struct Loader {
    service: Arc<dyn ContributorsService>,
    channel_capacity: Capacity,
}

impl Loader {
    pub fn new(service: Arc<dyn ContributorsService>) -> Self {
        Self {
            service,
            channel_capacity: Capacity::default(),
        }
    }

    /// Build a loader over [`GitHubService`] using the configured base URL,
    /// timeout and channel capacity.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP transport cannot be created.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let service = GitHubService::from_config(config)?;
        Ok(Self::new(Arc::new(service)).with_channel_capacity(config.channel_capacity))
    }

    /// Capacity of the fan-in channel used by [`Variant::Channels`].
    #[must_use]
    pub fn with_channel_capacity(mut self, capacity: Capacity) -> Self {
        self.channel_capacity = capacity;
        self
    }

    /// Load with the selected strategy and deliver to `sink`.
    ///
    /// Returns once the final result has been delivered. Single-result
    /// variants deliver exactly once with `completed = true`; nothing is
    /// delivered when the load fails or is cancelled.
    ///
    /// `BLOCKING` runs on the blocking thread pool while this call waits:
    /// blocking an executor thread would stall every other task on it.
    pub async fn load(
        &self,
        variant: Variant,
        req: RequestData,
        sink: &dyn ResultSink,
        cancel: &CancellationToken,
    ) -> Result<(), Error> {
        info!(%variant, org = %req.org, "Loading contributors");
        let service = Arc::clone(&self.service);

        let users = match variant {
            Variant::Blocking => {
                let blocking = tokio::task::spawn_blocking(move || {
                    load_contributors_blocking(service, &req)
                });
                run_cancellable(cancel, async { blocking.await? }).await?
            }
            Variant::Background => {
                let load = load_contributors_background(service, req)?;
                run_cancellable(cancel, load.wait()).await?
            }
            Variant::Suspend => load_contributors_suspend(service, &req, cancel).await?,
            Variant::Concurrent => load_contributors_concurrent(service, &req, cancel).await?,
            Variant::NotCancellable => {
                load_contributors_not_cancellable(service, &req, cancel).await?
            }
            Variant::Progress => {
                return load_contributors_progress(service, &req, sink, cancel).await;
            }
            Variant::Channels => {
                return load_contributors_channels(
                    service,
                    &req,
                    sink,
                    self.channel_capacity,
                    cancel,
                )
                .await;
            }
        };

        sink.deliver(users, true).await;
        Ok(())
    }
}

/// Load with the selected strategy using default options.
pub async fn load_contributors(
    variant: Variant,
    service: Arc<dyn ContributorsService>,
    req: RequestData,
    sink: &dyn ResultSink,
    cancel: &CancellationToken,
) -> Result<(), Error> {
    Loader::new(service).load(variant, req, sink, cancel).await
}
