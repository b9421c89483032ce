use std::fmt::Write;

use serde::{Deserialize, Serialize};

use super::html::escape_html;

/// Role of one patch line, decided from its leading characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LineKind {
    Addition,
    Deletion,
    HunkHeader,
    Context,
}

impl LineKind {
    /// `+` and `-` are checked before `@@`.
    pub fn classify(line: &str) -> Self {
        if line.starts_with('+') {
            LineKind::Addition
        } else if line.starts_with('-') {
            LineKind::Deletion
        } else if line.starts_with("@@") {
            LineKind::HunkHeader
        } else {
            LineKind::Context
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            LineKind::Addition => "diff-addition",
            LineKind::Deletion => "diff-deletion",
            LineKind::HunkHeader => "diff-hunk",
            LineKind::Context => "diff-context",
        }
    }
}

/// A patch line with its raw, unescaped text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffLine {
    pub kind: LineKind,
    pub text: String,
}

/// Split a unified-diff patch on `\n` and classify every line.
pub fn classify_patch(patch: &str) -> Vec<DiffLine> {
    patch
        .split('\n')
        .map(|line| DiffLine {
            kind: LineKind::classify(line),
            text: line.to_string(),
        })
        .collect()
}

pub fn diff_lines_html(lines: &[DiffLine]) -> String {
    let mut html = String::from(r#"<div class="diff-lines">"#);
    for line in lines {
        let _ = write!(
            html,
            r#"<div class="{}">{}</div>"#,
            line.kind.css_class(),
            escape_html(&line.text)
        );
    }
    html.push_str("</div>");
    html
}
