use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::github::types::CommitEntry;

/// Length of the abbreviated hash shown next to a version.
const SHORT_SHA_LEN: usize = 7;

/// One historical snapshot of the tracked file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Revision {
    pub sha: String,
    pub author: String,
    #[serde(with = "crate::serde_helpers::offset_datetime")]
    pub date: OffsetDateTime,
    pub message: String,
}

impl Revision {
    pub fn short_sha(&self) -> &str {
        match self.sha.char_indices().nth(SHORT_SHA_LEN) {
            Some((end, _)) => &self.sha[..end],
            None => &self.sha,
        }
    }
}

impl From<CommitEntry> for Revision {
    fn from(entry: CommitEntry) -> Self {
        Revision {
            sha: entry.sha,
            author: entry.commit.author.name,
            date: entry.commit.author.date,
            message: entry.commit.message,
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    fn revision(sha: &str) -> Revision {
        Revision {
            sha: sha.to_string(),
            author: "Ada".to_string(),
            date: datetime!(2024-01-01 09:00:00 UTC),
            message: "Initial post".to_string(),
        }
    }

    #[test]
    fn abbreviates_long_hashes() {
        assert_eq!(
            revision("def5678aa11bb22cc33dd44ee55ff66aa77bb88c").short_sha(),
            "def5678"
        );
    }

    #[test]
    fn keeps_short_hashes_whole() {
        assert_eq!(revision("abc1234").short_sha(), "abc1234");
        assert_eq!(revision("abc").short_sha(), "abc");
    }
}
