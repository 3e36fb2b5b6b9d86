//! Contributors loader
//!
//! Loads the repositories of an organization, then the contributors of every
//! repository, and ranks the contributors by their total number of
//! contributions. The same load can run under several strategies, from
//! fully sequential to concurrent fan-out with streamed partial results;
//! all of them produce the same final ranking.
//!
//! # Quick Start
//!
//! ```rust
//! use contributors::{aggregate, User};
//!
//! let repo_a = vec![User::new("alice", 3)];
//! let repo_b = vec![User::new("alice", 2), User::new("bob", 1)];
//!
//! let ranking = aggregate([repo_a.as_slice(), repo_b.as_slice()]);
//! assert_eq!(ranking, vec![User::new("alice", 5), User::new("bob", 1)]);
//! ```

pub mod aggregate;
pub mod channel;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod scope;
pub mod service;
pub mod sink;
pub mod strategies;
pub mod testing;
pub mod transport;
pub mod types;

// Re-exports
pub use aggregate::{aggregate, aggregate_all, total_contributions};
pub use channel::Capacity;
pub use config::{Config, ConfigError};
pub use error::{Error, ServiceError};
pub use fetcher::Fetcher;
pub use scope::{spawn_detached, TaskScope};
pub use service::{ContributorsService, GitHubService};
pub use sink::{FnSink, ResultSink};
pub use strategies::{
    load_contributors, load_contributors_background, load_contributors_blocking,
    load_contributors_channels, load_contributors_concurrent, load_contributors_not_cancellable,
    load_contributors_progress, load_contributors_suspend, BackgroundLoad, Loader, Variant,
};
pub use transport::HttpTransport;
pub use types::{Repo, RequestData, User};
pub use tokio_util::sync::CancellationToken;
