//! Stage 2: admonition directives → blockquote callouts.
//!
//! ```text
//! .. note::                 > **Note**
//!                      →    >
//!    Hello                  > Hello
//! ```
//!
//! Raw HTML nested in the body is resolved first, in callout context, so a
//! `<pre>` block lands inline inside the quote instead of as a fence. Nested
//! admonitions are rendered recursively and end up as nested quotes.

use super::blocks::{dedent, quote_line, rewrite_directive_blocks, trim_blank_lines};
use super::raw_html::{rewrite_raw_html, RawContext};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static RE_ADMONITION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^([ \t]*)\.\.[ \t]+(note|warning|admonition|attention|caution|danger|error|hint|important|tip)::",
    )
    .unwrap()
});

/// Rewrite every admonition block as a quoted callout.
pub fn convert_callouts(input: &str) -> String {
    let (out, count) = rewrite_directive_blocks(input, &RE_ADMONITION, |m, _| {
        Some(render_callout(&m.caps[2], m.body))
    });
    debug!(count, "callouts rewritten");
    out
}

/// Render one admonition: `kind` is the directive name, `body` everything
/// after its `::` up to the end of the block.
fn render_callout(kind: &str, body: &str) -> String {
    let content = callout_content(body);
    let content = rewrite_raw_html(&content, RawContext::Callout);
    let content = convert_callouts(&content);

    let (title, content) = match kind {
        "note" => ("Note".to_string(), content.as_str()),
        "warning" => ("Warning".to_string(), content.as_str()),
        "admonition" => {
            let (first, rest) = content.split_once('\n').unwrap_or((content.as_str(), ""));
            let title = match first.trim() {
                "" => "Info",
                t => t,
            };
            (title.to_string(), rest.trim_start_matches(['\n', ' ', '\t']))
        }
        other => (capitalize(other), content.as_str()),
    };

    let mut out = format!("> **{title}**\n> ");
    if !content.trim().is_empty() {
        for line in content.split('\n') {
            out.push('\n');
            out.push_str(&quote_line(true, line.trim_end()));
        }
    }
    out
}

/// The directive argument (text on the marker line) followed by the dedented
/// body, without surrounding blank lines.
fn callout_content(body: &str) -> String {
    let mut lines = body.split('\n');
    let argument = lines.next().unwrap_or("").trim();
    let rest: Vec<&str> = lines.collect();

    let mut content: Vec<&str> = Vec::with_capacity(rest.len() + 1);
    if !argument.is_empty() {
        content.push(argument);
    }
    content.extend(dedent(&rest));
    trim_blank_lines(&content).join("\n")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
