//! Data model types for the contributors loader.

pub mod repos;
pub mod users;

// Re-exports
pub use repos::{Repo, RequestData};
pub use users::User;
