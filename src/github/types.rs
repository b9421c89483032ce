//! Wire shapes of the repository REST API. Only the fields the viewer reads are modelled.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// One element of `GET repos/{owner}/{repo}/commits?path=…`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommitEntry {
    pub sha: String,
    pub commit: CommitDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommitDetail {
    pub author: CommitAuthor,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommitAuthor {
    pub name: String,
    #[serde(with = "crate::serde_helpers::offset_datetime")]
    pub date: OffsetDateTime,
}

/// Body of `GET repos/{owner}/{repo}/contents/{path}?ref=…`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContentEntry {
    pub content: String,
    #[serde(default = "default_encoding")]
    pub encoding: String,
}

fn default_encoding() -> String {
    "base64".to_string()
}

/// Body of `GET repos/{owner}/{repo}/compare/{base}...{head}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Comparison {
    #[serde(default)]
    pub files: Vec<ComparedFile>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComparedFile {
    pub filename: String,
    /// Absent for binary files and for patches the API considers too large.
    #[serde(default)]
    pub patch: Option<String>,
}

impl Comparison {
    /// Patch for exactly `path`; every other file in the comparison is ignored.
    pub fn patch_for(&self, path: &str) -> Option<&str> {
        self.files
            .iter()
            .find(|f| f.filename == path)
            .and_then(|f| f.patch.as_deref())
            .filter(|patch| !patch.is_empty())
    }
}
