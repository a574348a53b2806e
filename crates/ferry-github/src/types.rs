//! GitHub API types.

use serde::{Deserialize, Serialize};

/// A repository hosted on GitHub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostedRepository {
    /// Stable numeric repository ID.
    pub id: u64,

    /// Repository name (without owner).
    pub name: String,

    /// `owner/name`.
    pub full_name: String,

    /// Whether the repository is private.
    pub private: bool,

    /// HTTPS clone URL.
    pub clone_url: String,

    /// Web URL.
    pub html_url: String,
}

/// The authenticated account.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    /// Account login.
    pub login: String,
}

/// Request to create a repository owned by the authenticated user.
#[derive(Debug, Clone, Serialize)]
pub struct CreateRepository {
    /// Repository name.
    pub name: String,

    /// Whether the repository is private.
    pub private: bool,

    /// Optional description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Whether GitHub should create an initial commit.
    pub auto_init: bool,
}

impl CreateRepository {
    /// Request for an empty private repository.
    #[must_use]
    pub fn private(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            private: true,
            description: None,
            auto_init: false,
        }
    }
}
