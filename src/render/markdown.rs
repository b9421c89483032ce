//! Minimal markdown to HTML conversion.
//!
//! This is a fixed chain of regex substitutions, applied in order. It does not
//! escape its input and knows nothing about lists, tables or escaped characters;
//! existing posts depend on exactly this output, so rules must not be reordered.

use std::sync::LazyLock;

use regex::Regex;

struct Rule {
    pattern: LazyLock<Regex>,
    replacement: &'static str,
}

macro_rules! rule {
    ($pattern:literal => $replacement:literal) => {
        Rule {
            pattern: LazyLock::new(|| Regex::new($pattern).unwrap()),
            replacement: $replacement,
        }
    };
}

// `R` makes `.`, `^` and `$` treat `\r\n` as a line break.
static RULES: [Rule; 9] = [
    rule!(r"(?mR)^### (.*)$" => "<h3>${1}</h3>"),
    rule!(r"(?mR)^## (.*)$" => "<h2>${1}</h2>"),
    rule!(r"(?mR)^# (.*)$" => "<h1>${1}</h1>"),
    rule!(r"(?R)\*\*\*(.+?)\*\*\*" => "<strong><em>${1}</em></strong>"),
    rule!(r"(?R)\*\*(.+?)\*\*" => "<strong>${1}</strong>"),
    rule!(r"(?R)\*(.+?)\*" => "<em>${1}</em>"),
    rule!(r"(?s)```(.*?)```" => "<pre><code>${1}</code></pre>"),
    rule!(r"`([^`]+)`" => "<code>${1}</code>"),
    rule!(r"\[([^\]]+)\]\(([^)]+)\)" => r#"<a href="${2}">${1}</a>"#),
];

/// Convert a post body to HTML. Blank lines split paragraphs.
pub fn render_markdown(markdown: &str) -> String {
    let mut html = markdown.to_string();
    for rule in &RULES {
        html = rule
            .pattern
            .replace_all(&html, rule.replacement)
            .into_owned();
    }
    format!("<p>{}</p>", html.replace("\n\n", "</p><p>"))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn headings() {
        assert!(render_markdown("# Title").contains("<h1>Title</h1>"));
        assert_eq!(
            render_markdown("# One\n## Two\n### Three"),
            "<p><h1>One</h1>\n<h2>Two</h2>\n<h3>Three</h3></p>"
        );
    }

    #[test]
    fn heading_needs_a_space_and_line_start() {
        assert_eq!(render_markdown("#tag and a # b"), "<p>#tag and a # b</p>");
    }

    #[test]
    fn emphasis_levels() {
        assert!(render_markdown("**bold**").contains("<strong>bold</strong>"));
        assert_eq!(render_markdown("*it*"), "<p><em>it</em></p>");
        assert_eq!(
            render_markdown("***both***"),
            "<p><strong><em>both</em></strong></p>"
        );
    }

    #[test]
    fn emphasis_does_not_span_lines() {
        assert_eq!(render_markdown("*a\nb*"), "<p>*a\nb*</p>");
    }

    #[test]
    fn code_block_and_inline_code() {
        assert_eq!(
            render_markdown("```\nlet x = 1;\n```"),
            "<p><pre><code>\nlet x = 1;\n</code></pre></p>"
        );
        assert_eq!(
            render_markdown("run `cargo doc` now"),
            "<p>run <code>cargo doc</code> now</p>"
        );
    }

    #[test]
    fn emphasis_runs_before_code() {
        // Inherited ordering: asterisks inside code spans still become emphasis.
        assert_eq!(
            render_markdown("`a*b*c`"),
            "<p><code>a<em>b</em>c</code></p>"
        );
    }

    #[test]
    fn links() {
        assert_eq!(
            render_markdown("see [the docs](https://example.com/a)"),
            r#"<p>see <a href="https://example.com/a">the docs</a></p>"#
        );
    }

    #[test]
    fn blank_lines_split_paragraphs() {
        assert_eq!(
            render_markdown("first\n\nsecond\nstill second"),
            "<p>first</p><p>second\nstill second</p>"
        );
    }

    #[test]
    fn markup_passes_through_unescaped() {
        assert_eq!(render_markdown("<br>"), "<p><br></p>");
    }

    #[test]
    fn empty_input_is_one_empty_paragraph() {
        assert_eq!(render_markdown(""), "<p></p>");
    }
}
