//! Testing utilities.
//!
//! Provides a mock remote service and a recording result sink for testing
//! loading strategies without network access.

mod mock;
mod recording;

pub use mock::{MockCall, MockGitHubService};
pub use recording::{Delivery, RecordingSink};
