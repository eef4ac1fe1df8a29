//! Stage 7: literal blocks and code directives → fenced code.
//!
//! Two introducers open a code block:
//!
//! - a paragraph ending in `::`, followed by a blank line and an indented
//!   block (`Text::` keeps one colon, `Text ::` loses both, a bare `::`
//!   line disappears);
//! - `.. code:: lang` (or `code-block`, `sourcecode`), optionally followed
//!   by option lines, then a blank line and an indented block.
//!
//! The block ends at the first non-blank line that dedents to the
//! introducer's level. Trailing blank lines stay outside the fence. Both
//! forms also work inside a quoted region, where the quote prefix is
//! re-applied to every emitted line.

use super::blocks::{dedent, indent_of, quote_line, split_quote, trim_blank_lines, Directive};
use super::scope::ScopeMap;
use tracing::debug;

/// A recognised introducer line.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Intro<'a> {
    quoted: bool,
    /// Leading whitespace of the introducer, reused for the fence lines.
    indent: &'a str,
    /// Paragraph text to keep above the fence.
    lead: Option<String>,
    language: Option<String>,
    directive: bool,
}

impl<'a> Intro<'a> {
    fn parse(line: &'a str) -> Option<Self> {
        let (quote, body) = split_quote(line);
        let quoted = !quote.is_empty();
        let indent = &body[..indent_of(body)];

        if let Some((_, directive)) = Directive::parse_marker(body) {
            return match directive {
                Directive::Code(language) => Some(Intro {
                    quoted,
                    indent,
                    lead: None,
                    language,
                    directive: true,
                }),
                _ => None,
            };
        }

        let text = body.trim_end();
        if text.trim_start().starts_with("..") {
            return None;
        }
        let text = text.strip_suffix("::")?;
        let lead = if text.trim().is_empty() {
            None
        } else if text.ends_with([' ', '\t']) {
            Some(text.trim_end().to_string())
        } else {
            Some(format!("{text}:"))
        };
        Some(Intro {
            quoted,
            indent,
            lead,
            language: None,
            directive: false,
        })
    }

    fn continues(&self, line: &str) -> bool {
        line.starts_with('>') == self.quoted
    }
}

/// Rewrite every literal block and code directive as a fenced block.
pub fn convert_code_blocks(input: &str) -> String {
    let lines: Vec<&str> = input.split('\n').collect();
    let scope = ScopeMap::scan(input);
    let mut result: Vec<String> = Vec::with_capacity(lines.len());
    let mut count = 0usize;
    let mut offset = 0;
    let mut offsets = Vec::with_capacity(lines.len());
    for line in &lines {
        offsets.push(offset);
        offset += line.len() + 1;
    }

    let mut i = 0;
    while i < lines.len() {
        if !scope.in_literal(offsets[i]) {
            let rendered = Intro::parse(lines[i])
                .and_then(|intro| render_block(&lines, i, &intro, &mut result));
            if let Some(end) = rendered {
                count += 1;
                i = end;
                continue;
            }
        }
        result.push(lines[i].to_string());
        i += 1;
    }

    debug!(count, "code blocks rewritten");
    result.join("\n")
}

/// Render the block introduced at `lines[at]` into `out`, returning the
/// index of the first line after it. Returns `None`, leaving `out`
/// untouched, when no indented block follows.
fn render_block(lines: &[&str], at: usize, intro: &Intro<'_>, out: &mut Vec<String>) -> Option<usize> {
    let level = intro.indent.len();
    let mut j = at + 1;

    // Option lines (`:linenos:`) sit directly under a code directive.
    if intro.directive {
        while lines.get(j).is_some_and(|&l| {
            let body = split_quote(l).1;
            intro.continues(l) && indent_of(body) > level && body.trim_start().starts_with(':')
        }) {
            j += 1;
        }
    }

    // A blank separator line is required.
    if !lines
        .get(j)
        .is_some_and(|&l| intro.continues(l) && split_quote(l).1.trim().is_empty())
    {
        return None;
    }

    let mut end = None;
    for (k, line) in lines.iter().enumerate().skip(j) {
        if !intro.continues(line) {
            break;
        }
        let body = split_quote(line).1;
        if body.trim().is_empty() {
            continue;
        }
        if indent_of(body) <= level {
            break;
        }
        end = Some(k + 1);
    }
    let end = end?;

    let bodies: Vec<&str> = lines[j..end].iter().map(|l| split_quote(l).1).collect();
    let content = dedent(trim_blank_lines(&bodies));

    let q = intro.quoted;
    let ind = intro.indent;
    if let Some(lead) = &intro.lead {
        out.push(quote_line(q, lead));
        out.push(quote_line(q, ""));
    }
    out.push(quote_line(q, &format!("{ind}```{}", intro.language.as_deref().unwrap_or(""))));
    for line in content {
        if line.is_empty() {
            out.push(quote_line(q, ""));
        } else {
            out.push(quote_line(q, &format!("{ind}{line}")));
        }
    }
    out.push(quote_line(q, &format!("{ind}```")));
    Some(end)
}
