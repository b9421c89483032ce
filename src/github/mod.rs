/// HTTP client for the GitHub-compatible REST API.
pub mod client;
/// Serde shapes of the API payloads.
pub mod types;

pub use client::GitHubClient;

use serde::{Deserialize, Serialize};

use crate::AppResult;
use crate::revision::Revision;

/// The single content file a viewer is bound to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepoCoordinates {
    pub owner: String,
    pub repo: String,
    pub path: String,
}

/// Where revisions, historical file contents and patches come from.
///
/// Every call is a single request; implementations never retry.
pub trait RevisionSource {
    /// Revisions touching `coords.path`, newest first, in the order the service returns them.
    async fn list_revisions(&self, coords: &RepoCoordinates) -> AppResult<Vec<Revision>>;

    /// Decoded text of `coords.path` as of `sha`.
    async fn file_at(&self, coords: &RepoCoordinates, sha: &str) -> AppResult<String>;

    /// Unified-diff text for `coords.path` between `base` and `head`.
    ///
    /// Fails with [`crate::AppError::MissingPatch`] when the path is not part of the comparison.
    async fn patch_between(
        &self,
        coords: &RepoCoordinates,
        base: &str,
        head: &str,
    ) -> AppResult<String>;
}
