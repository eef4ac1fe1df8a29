//! Stage 3: `.. raw:: html` blocks.
//!
//! Markdown accepts inline HTML, so most raw blocks pass through verbatim,
//! flanked by blank lines so they form their own HTML block. The exception
//! is `<pre>`: its text is unwrapped and rendered as a fenced block, or,
//! inside a callout where a fence would break the quote, inlined as plain
//! text.
//!
//! The stage runs twice: once from the callout stage over each callout body
//! ([`RawContext::Callout`]) and once over the whole document
//! ([`RawContext::Document`]), where the scope stack decides per block.

use super::blocks::{dedent, rewrite_directive_blocks};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static RE_RAW_HTML: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^([ \t]*)\.\.[ \t]+raw::[ \t]+html[ \t]*\n[ \t]*\n").unwrap()
});

static RE_PRE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^\s*<pre>(.*?)</pre>\s*$").unwrap());

/// Where a raw block is being rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawContext {
    /// Top-level pass; callout membership comes from the scope stack.
    Document,
    /// Body of a callout being rendered.
    Callout,
}

/// Shape of a raw HTML payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawShape {
    /// `<pre>…</pre>`, holding the unwrapped text.
    Pre(String),
    /// `<style>…`, kept verbatim.
    Style(String),
    /// Any other HTML, kept verbatim.
    Other(String),
}

impl RawShape {
    /// Classify trimmed raw HTML by its leading tag.
    pub fn classify(html: &str) -> Self {
        let html = html.trim();
        if html.starts_with("<pre>") {
            let inner = RE_PRE
                .captures(html)
                .and_then(|c| c.get(1))
                .map_or(html, |m| m.as_str());
            RawShape::Pre(inner.trim().to_string())
        } else if html.starts_with("<style>") {
            RawShape::Style(html.to_string())
        } else {
            RawShape::Other(html.to_string())
        }
    }

    /// Render for the target format.
    pub fn render(&self, in_callout: bool) -> String {
        match self {
            RawShape::Pre(text) if in_callout => text.clone(),
            RawShape::Pre(text) => format!("\n```\n{}\n```\n", unescape_html(text)),
            RawShape::Style(html) | RawShape::Other(html) => format!("\n\n{html}\n\n"),
        }
    }
}

/// Rewrite the top-level raw HTML blocks of a document.
pub fn convert_raw_html(input: &str) -> String {
    rewrite_raw_html(input, RawContext::Document)
}

/// Rewrite raw HTML blocks of `input` in the given context.
pub fn rewrite_raw_html(input: &str, context: RawContext) -> String {
    let (out, count) = rewrite_directive_blocks(input, &RE_RAW_HTML, |m, scope| {
        let lines: Vec<&str> = m.body.split('\n').collect();
        // A body must be indented under its marker.
        if lines.first().is_some_and(|l| !l.starts_with([' ', '\t'])) {
            return None;
        }
        let html = dedent(&lines).join("\n");
        let in_callout = context == RawContext::Callout || scope.in_callout(m.start);
        Some(RawShape::classify(&html).render(in_callout))
    });
    debug!(count, ?context, "raw html blocks rewritten");
    out
}

/// Decode the entities HTML requires inside `<pre>`, which a fence shows
/// literally.
fn unescape_html(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_pre() {
        assert_eq!(
            RawShape::classify("<pre>\nGET /api\n</pre>"),
            RawShape::Pre("GET /api".into())
        );
    }

    #[test]
    fn test_classify_unclosed_pre_keeps_text() {
        assert_eq!(
            RawShape::classify("<pre>GET /api"),
            RawShape::Pre("<pre>GET /api".into())
        );
    }

    #[test]
    fn test_classify_style_and_other() {
        assert!(matches!(
            RawShape::classify("<style>p {}</style>"),
            RawShape::Style(_)
        ));
        assert!(matches!(
            RawShape::classify("<div>x</div>"),
            RawShape::Other(_)
        ));
    }

    #[test]
    fn test_pre_becomes_fence_at_top_level() {
        let input = "Intro.\n\n.. raw:: html\n\n   <pre>\n   GET /api\n   </pre>\n\nAfter.";
        assert_eq!(
            convert_raw_html(input),
            "Intro.\n\n\n```\nGET /api\n```\n\n\nAfter."
        );
    }

    #[test]
    fn test_pre_fence_decodes_entities() {
        let input = ".. raw:: html\n\n   <pre>a &lt;b&gt; &amp; c</pre>";
        assert_eq!(convert_raw_html(input), "\n```\na <b> & c\n```\n");
    }

    #[test]
    fn test_pre_inlined_in_callout_context() {
        let input = ".. raw:: html\n\n   <pre>https://example.org</pre>";
        assert_eq!(
            rewrite_raw_html(input, RawContext::Callout),
            "https://example.org"
        );
    }

    #[test]
    fn test_pre_inlined_inside_unrendered_admonition() {
        let input = ".. hint::\n\n   .. raw:: html\n\n      <pre>x</pre>";
        assert_eq!(convert_raw_html(input), ".. hint::\n\n   x");
    }

    #[test]
    fn test_style_passed_through_with_blank_lines() {
        let input = ".. raw:: html\n\n   <style>\n     .x { color: red; }\n   </style>\nNext";
        assert_eq!(
            convert_raw_html(input),
            "\n\n<style>\n  .x { color: red; }\n</style>\n\n\nNext"
        );
    }

    #[test]
    fn test_other_html_passed_through() {
        let input = ".. raw:: html\n\n   <iframe src=\"v\"></iframe>";
        assert_eq!(convert_raw_html(input), "\n\n<iframe src=\"v\"></iframe>\n\n");
    }

    #[test]
    fn test_non_html_raw_untouched() {
        let input = ".. raw:: latex\n\n   \\newpage";
        assert_eq!(convert_raw_html(input), input);
    }

    #[test]
    fn test_unindented_body_untouched() {
        let input = ".. raw:: html\n\nNot a body.";
        assert_eq!(convert_raw_html(input), input);
    }
}
