use std::sync::LazyLock;

use regex::Regex;

/// A `---` line, any body, and a closing `---` line, only at the very start of the document.
static FRONT_MATTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A---\s*\n(?s:.*?)\n---\s*\n").unwrap());

/// Remove a leading metadata header, then trim. Content without a header is only trimmed.
pub fn strip_front_matter(content: &str) -> String {
    FRONT_MATTER.replace(content, "").trim().to_string()
}
