use std::fmt::Write;

use serde::{Deserialize, Serialize};
use time::UtcOffset;

use super::html::escape_html;
use crate::revision::Revision;
use crate::time_utils::{display_date, display_time};

pub const LOADING_HISTORY: &str = "Loading version history...";
pub const NO_HISTORY: &str = "No version history available.";

/// Indices of a "compare with previous" action, valid for the current load only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparePair {
    pub older: usize,
    pub newer: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    /// Position in the held revision sequence; the "view this version" target.
    pub index: usize,
    /// Counts up from the oldest revision, which is version 1.
    pub version: usize,
    pub latest: bool,
    pub short_sha: String,
    pub date: String,
    pub time: String,
    pub message: String,
    pub author: String,
    /// Absent on the oldest entry.
    pub compare: Option<ComparePair>,
}

/// Render model of the revision list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Timeline {
    Loading,
    Empty,
    Entries { entries: Vec<TimelineEntry> },
}

impl Timeline {
    /// Build the timeline for `revisions`, newest first.
    pub fn build(revisions: &[Revision], offset: UtcOffset) -> Self {
        if revisions.is_empty() {
            return Timeline::Empty;
        }
        let total = revisions.len();
        let entries = revisions
            .iter()
            .enumerate()
            .map(|(index, rev)| TimelineEntry {
                index,
                version: total - index,
                latest: index == 0,
                short_sha: rev.short_sha().to_string(),
                date: display_date(&rev.date, offset),
                time: display_time(&rev.date, offset),
                message: rev.message.clone(),
                author: rev.author.clone(),
                compare: (index + 1 < total).then_some(ComparePair {
                    older: index + 1,
                    newer: index,
                }),
            })
            .collect();
        Timeline::Entries { entries }
    }

    pub fn to_html(&self) -> String {
        match self {
            Timeline::Loading => format!(r#"<div class="loading">{LOADING_HISTORY}</div>"#),
            Timeline::Empty => format!(r#"<p class="no-versions">{NO_HISTORY}</p>"#),
            Timeline::Entries { entries } => {
                let mut html = String::from(r#"<div class="versions-timeline">"#);
                for entry in entries {
                    entry.write_html(&mut html);
                }
                html.push_str("</div>");
                html
            }
        }
    }
}

impl TimelineEntry {
    fn write_html(&self, html: &mut String) {
        let item_class = if self.latest {
            "version-item latest"
        } else {
            "version-item"
        };
        let _ = write!(
            html,
            r#"<div class="{item_class}"><div class="version-header"><span class="version-number">Version {}</span>"#,
            self.version
        );
        if self.latest {
            html.push_str(r#"<span class="badge-latest">Latest</span>"#);
        }
        let _ = write!(
            html,
            r#"<span class="version-date">{} at {}</span></div>"#,
            self.date, self.time
        );
        let _ = write!(
            html,
            r#"<div class="version-message">{}</div><div class="version-author">by {}</div>"#,
            escape_html(&self.message),
            escape_html(&self.author)
        );
        let _ = write!(
            html,
            r#"<div class="version-actions"><button class="btn-view" data-action="view" data-index="{}">📄 View this version</button>"#,
            self.index
        );
        if let Some(ComparePair { older, newer }) = self.compare {
            let _ = write!(
                html,
                r#"<button class="btn-diff" data-action="diff" data-older="{older}" data-newer="{newer}">🔍 Compare with previous</button>"#
            );
        }
        html.push_str("</div></div>");
    }
}
