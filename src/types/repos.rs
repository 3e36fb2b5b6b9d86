//! Repository-related data models.

use serde::{Deserialize, Serialize};

/// Parameters of a single load request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestData {
    /// Organization whose repositories are loaded
    pub org: String,
}

impl RequestData {
    /// Create request parameters for an organization.
    pub fn new(org: impl Into<String>) -> Self {
        Self { org: org.into() }
    }
}

/// Repository belonging to an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repo {
    /// Numeric repository identifier
    pub id: u64,
    /// Repository name, used as the key for contributor lookups
    pub name: String,
}

impl Repo {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
