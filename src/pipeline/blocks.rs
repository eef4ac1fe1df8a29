//! Shared building blocks for the rewrite stages: directive markers, block
//! extents, indentation and quote-prefix handling.
//!
//! RST directive bodies have no closing delimiter. A body runs until the
//! text dedents back to column 0, until two blank lines in a row, or until
//! the end of the document. [`block_end`] encodes that rule once so every
//! directive-driven stage agrees on where a block stops.

use super::scope::ScopeMap;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Admonition directive names rendered as callouts.
pub const ADMONITIONS: [&str; 10] = [
    "note",
    "warning",
    "admonition",
    "attention",
    "caution",
    "danger",
    "error",
    "hint",
    "important",
    "tip",
];

/// A classified `.. name:: argument` directive marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// One of [`ADMONITIONS`].
    Admonition(String),
    /// `raw` with its sub-format (only `html` is rendered).
    Raw(String),
    /// `image` with its path.
    Image(String),
    /// `code`, `code-block` or `sourcecode`, with an optional language.
    Code(Option<String>),
    /// Anything else; handled by the generic fallback of the repair pass.
    Unknown(String),
}

static RE_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([ \t]*)\.\.[ \t]+([A-Za-z0-9_-]+)::[ \t]*(.*?)[ \t]*$").unwrap());

impl Directive {
    /// Classify a directive by name and argument.
    pub fn classify(name: &str, argument: &str) -> Self {
        let argument = argument.trim();
        match name {
            n if ADMONITIONS.contains(&n) => Directive::Admonition(n.to_string()),
            "raw" => Directive::Raw(argument.to_string()),
            "image" => Directive::Image(argument.to_string()),
            "code" | "code-block" | "sourcecode" => Directive::Code(
                argument
                    .split_whitespace()
                    .next()
                    .map(|lang| lang.to_string()),
            ),
            other => Directive::Unknown(other.to_string()),
        }
    }

    /// Parse a marker line, returning its indentation and the directive.
    ///
    /// The line must not carry a quote prefix; strip it with
    /// [`split_quote`] first.
    pub fn parse_marker(line: &str) -> Option<(usize, Directive)> {
        let caps = RE_MARKER.captures(line)?;
        Some((caps[1].len(), Directive::classify(&caps[2], &caps[3])))
    }

    /// True for directives whose body is literal text, not markup.
    pub fn is_literal(&self) -> bool {
        matches!(self, Directive::Raw(_) | Directive::Code(_))
    }
}

/// End offset (exclusive) of a directive body starting at `from`.
///
/// The body stops before the first newline that is followed by a
/// non-whitespace character or by two more newlines.
pub(crate) fn block_end(text: &str, from: usize) -> usize {
    let bytes = text.as_bytes();
    let mut i = from;
    while let Some(off) = text[i..].find('\n') {
        let nl = i + off;
        match bytes.get(nl + 1).copied() {
            Some(b'\n') if bytes.get(nl + 2).copied() == Some(b'\n') => return nl,
            Some(b) if !b.is_ascii_whitespace() => return nl,
            _ => {}
        }
        i = nl + 1;
    }
    text.len()
}

/// Number of leading spaces and tabs.
pub(crate) fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start_matches([' ', '\t']).len()
}

/// Remove the common leading whitespace of all non-blank lines.
///
/// Whitespace-only lines become empty.
pub(crate) fn dedent<'a>(lines: &[&'a str]) -> Vec<&'a str> {
    let common = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| indent_of(l))
        .min()
        .unwrap_or(0);
    lines
        .iter()
        .map(|l| if l.trim().is_empty() { "" } else { &l[common..] })
        .collect()
}

/// Drop leading and trailing blank lines.
pub(crate) fn trim_blank_lines<'a, 'b>(lines: &'b [&'a str]) -> &'b [&'a str] {
    let start = lines
        .iter()
        .position(|l| !l.trim().is_empty())
        .unwrap_or(lines.len());
    let end = lines
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .map_or(start, |p| p + 1);
    &lines[start..end]
}

/// Split a line into its blockquote prefix (`"> "`, `">"` or `""`) and body.
pub(crate) fn split_quote(line: &str) -> (&str, &str) {
    if line.starts_with("> ") {
        line.split_at(2)
    } else if line.starts_with('>') {
        line.split_at(1)
    } else {
        ("", line)
    }
}

/// Prefix `body` with a quote marker when `quoted`; blank bodies become `>`.
pub(crate) fn quote_line(quoted: bool, body: &str) -> String {
    match (quoted, body.is_empty()) {
        (false, _) => body.to_string(),
        (true, true) => ">".to_string(),
        (true, false) => format!("> {body}"),
    }
}

/// True when a line (after any quote prefix) opens or closes a fence.
pub(crate) fn is_fence_line(line: &str) -> bool {
    split_quote(line).1.trim_start().starts_with("```")
}

/// One directive block located by [`rewrite_directive_blocks`].
pub(crate) struct BlockMatch<'t> {
    /// Offset of the `..` that opens the marker.
    pub start: usize,
    /// Captures of the marker regex. Group 1 is always the line prefix.
    pub caps: Captures<'t>,
    /// Text after the marker up to [`block_end`], without trailing whitespace.
    pub body: &'t str,
}

/// Rewrite every directive block whose marker matches `marker`.
///
/// `marker` must be multi-line anchored and capture the line prefix (indent,
/// optionally a quote marker) as group 1; the prefix is kept in the output.
/// Markers inside literal regions or inside an already consumed block are
/// skipped, as are blocks for which `render` returns `None`.
///
/// Returns the rewritten text and the number of blocks replaced.
pub(crate) fn rewrite_directive_blocks<F>(text: &str, marker: &Regex, mut render: F) -> (String, usize)
where
    F: FnMut(&BlockMatch<'_>, &ScopeMap) -> Option<String>,
{
    let scope = ScopeMap::scan(text);
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    let mut count = 0;

    for caps in marker.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let start = whole.start() + caps[1].len();
        if start < last || scope.in_literal(start) {
            continue;
        }
        // Trailing blank lines separate the block from what follows; keep them.
        let raw_end = block_end(text, whole.end());
        let end = whole.end() + text[whole.end()..raw_end].trim_end().len();
        let m = BlockMatch {
            start,
            body: &text[whole.end()..end],
            caps,
        };
        if let Some(replacement) = render(&m, &scope) {
            out.push_str(&text[last..start]);
            out.push_str(&replacement);
            last = end;
            count += 1;
        }
    }

    out.push_str(&text[last..]);
    (out, count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_known_directives() {
        assert_eq!(
            Directive::classify("tip", ""),
            Directive::Admonition("tip".into())
        );
        assert_eq!(
            Directive::classify("raw", " html "),
            Directive::Raw("html".into())
        );
        assert_eq!(
            Directive::classify("code-block", "python"),
            Directive::Code(Some("python".into()))
        );
        assert_eq!(Directive::classify("code", ""), Directive::Code(None));
        assert_eq!(
            Directive::classify("toctree", ""),
            Directive::Unknown("toctree".into())
        );
    }

    #[test]
    fn parse_marker_reports_indent() {
        let (indent, d) = Directive::parse_marker("   .. image:: a.png").unwrap();
        assert_eq!(indent, 3);
        assert_eq!(d, Directive::Image("a.png".into()));
        assert!(Directive::parse_marker(".. _target: http://x").is_none());
        assert!(Directive::parse_marker("text .. note::").is_none());
    }

    #[test]
    fn block_end_stops_at_dedent() {
        let text = ".. note::\n\n   body\n   more\nafter";
        let from = ".. note::".len();
        assert_eq!(&text[from..block_end(text, from)], "\n\n   body\n   more");
    }

    #[test]
    fn block_end_stops_at_two_blank_lines() {
        let text = "x\n   body\n\n\n   detached";
        assert_eq!(&text[..block_end(text, 1)], "x\n   body");
    }

    #[test]
    fn block_end_runs_to_end_of_text() {
        let text = "x\n   body\n";
        assert_eq!(block_end(text, 1), text.len());
    }

    #[test]
    fn dedent_keeps_relative_indent() {
        let lines = ["    a", "", "      b", "    c"];
        assert_eq!(dedent(&lines), vec!["a", "", "  b", "c"]);
    }

    #[test]
    fn trim_blank_lines_both_ends() {
        let lines = ["", "  ", "a", "", "b", ""];
        assert_eq!(trim_blank_lines(&lines), &["a", "", "b"]);
        assert!(trim_blank_lines(&["", ""]).is_empty());
    }

    #[test]
    fn split_quote_variants() {
        assert_eq!(split_quote("> text"), ("> ", "text"));
        assert_eq!(split_quote(">"), (">", ""));
        assert_eq!(split_quote(">text"), (">", "text"));
        assert_eq!(split_quote("text"), ("", "text"));
    }

    #[test]
    fn quote_line_blank_is_bare_marker() {
        assert_eq!(quote_line(true, ""), ">");
        assert_eq!(quote_line(true, "x"), "> x");
        assert_eq!(quote_line(false, "x"), "x");
    }
}
