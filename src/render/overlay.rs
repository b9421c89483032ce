use serde::{Deserialize, Serialize};
use time::UtcOffset;

use super::diff::{DiffLine, classify_patch, diff_lines_html};
use super::front_matter::strip_front_matter;
use super::html::escape_html;
use super::markdown::render_markdown;
use crate::revision::Revision;
use crate::time_utils::{display_date, display_time};

pub const LOADING_VERSION: &str = "Loading version content...";
pub const FAILED_VERSION: &str = "Failed to load version content.";
pub const LOADING_DIFF: &str = "Loading diff...";
pub const FAILED_DIFF: &str = "Failed to load diff.";

/// The single modal display surface shared by version and diff views.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Overlay {
    #[default]
    Closed,
    Open { title: String, body: OverlayBody },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OverlayBody {
    Loading { message: String },
    Revision(RevisionView),
    Diff(DiffView),
    Error { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionView {
    pub short_sha: String,
    pub message: String,
    pub author: String,
    /// Post body converted to markup, front matter removed.
    pub html: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffView {
    pub older_date: String,
    pub older_message: String,
    pub newer_date: String,
    pub newer_message: String,
    pub lines: Vec<DiffLine>,
}

pub fn revision_title(rev: &Revision, offset: UtcOffset) -> String {
    format!(
        "Version from {} at {}",
        display_date(&rev.date, offset),
        display_time(&rev.date, offset)
    )
}

pub fn diff_title(older: &Revision, newer: &Revision, offset: UtcOffset) -> String {
    format!(
        "Changes between {} and {}",
        display_date(&older.date, offset),
        display_date(&newer.date, offset)
    )
}

impl RevisionView {
    pub fn new(rev: &Revision, content: &str) -> Self {
        RevisionView {
            short_sha: rev.short_sha().to_string(),
            message: rev.message.clone(),
            author: rev.author.clone(),
            html: render_markdown(&strip_front_matter(content)),
        }
    }
}

impl DiffView {
    pub fn new(older: &Revision, newer: &Revision, patch: &str, offset: UtcOffset) -> Self {
        DiffView {
            older_date: display_date(&older.date, offset),
            older_message: older.message.clone(),
            newer_date: display_date(&newer.date, offset),
            newer_message: newer.message.clone(),
            lines: classify_patch(patch),
        }
    }
}

impl Overlay {
    pub fn loading(title: String, message: &str) -> Self {
        Overlay::Open {
            title,
            body: OverlayBody::Loading {
                message: message.to_string(),
            },
        }
    }

    pub fn error(title: String, message: &str) -> Self {
        Overlay::Open {
            title,
            body: OverlayBody::Error {
                message: message.to_string(),
            },
        }
    }

    /// Modal markup; a closed overlay renders hidden and empty.
    pub fn to_html(&self) -> String {
        match self {
            Overlay::Closed => r#"<div id="version-modal" class="modal" hidden></div>"#.to_string(),
            Overlay::Open { title, body } => format!(
                r#"<div id="version-modal" class="modal"><h2 id="version-modal-title">{}</h2><div id="version-content">{}</div></div>"#,
                escape_html(title),
                body.to_html()
            ),
        }
    }
}

impl OverlayBody {
    pub fn to_html(&self) -> String {
        match self {
            OverlayBody::Loading { message } => {
                format!(r#"<div class="loading">{}</div>"#, escape_html(message))
            }
            OverlayBody::Error { message } => {
                format!(r#"<p class="error">{}</p>"#, escape_html(message))
            }
            OverlayBody::Revision(view) => format!(
                concat!(
                    r#"<div class="version-metadata">"#,
                    "<strong>Commit:</strong> {}<br>",
                    "<strong>Message:</strong> {}<br>",
                    "<strong>Author:</strong> {}",
                    r#"</div><hr><div class="version-markdown">{}</div>"#
                ),
                escape_html(&view.short_sha),
                escape_html(&view.message),
                escape_html(&view.author),
                view.html
            ),
            OverlayBody::Diff(view) => format!(
                concat!(
                    r#"<div class="diff-metadata"><div class="diff-header">"#,
                    "<strong>Older version:</strong> {} - {}<br>",
                    "<strong>Newer version:</strong> {} - {}",
                    r#"</div></div><hr><div class="diff-content">{}</div>"#
                ),
                view.older_date,
                escape_html(&view.older_message),
                view.newer_date,
                escape_html(&view.newer_message),
                diff_lines_html(&view.lines)
            ),
        }
    }
}
