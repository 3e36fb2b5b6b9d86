//! Contributor data model.

use serde::{Deserialize, Serialize};

/// A contributor of a repository and the number of contributions made.
///
/// Two users are the same contributor iff their logins are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    /// Login, the contributor's identity key
    pub login: String,
    /// Number of contributions
    pub contributions: u32,
}

impl User {
    pub fn new(login: impl Into<String>, contributions: u32) -> Self {
        Self {
            login: login.into(),
            contributions,
        }
    }
}
