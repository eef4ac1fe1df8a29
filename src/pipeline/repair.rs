//! Stage 8: cleanup and repair of cross-stage artefacts.
//!
//! ## Step Order
//!
//! 1. Render leftover directives: drop the marker, keep the argument and
//!    the body dedented to the marker column
//! 2. Drop comment lines and attribute-only lines
//! 3. Clear `html` tokens stranded on quoted lines
//! 4. Context walk: collapse quoted fences around a lone URL, strip
//!    `<pre>` tags inside fences
//! 5. Collapse runs of blank lines
//! 6. Balance fences
//!
//! Steps 1–5 never touch fenced content. Step 6 is the only structural
//! guarantee the pipeline gives: the output holds an even number of
//! ```` ``` ```` tokens.

use super::blocks::{
    dedent, indent_of, is_fence_line, quote_line, split_quote, trim_blank_lines, Directive,
};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

/// Result of the repair pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairOutcome {
    pub text: String,
    /// True when an unbalanced fence had to be closed.
    pub closed_fence: bool,
}

/// Run every repair step in order.
pub fn repair(input: &str) -> RepairOutcome {
    let s = strip_directive_markers(input);
    let s = drop_comment_and_attribute_lines(&s);
    let s = clear_html_residue(&s);
    let s = walk_context(&s);
    let s = collapse_blank_lines(&s);
    balance_fences(&s)
}

/// Apply `f` to every line outside a fence; fence lines and fenced content
/// are passed through. `f` returns `None` to drop the line.
fn map_unfenced_lines<F>(input: &str, mut f: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    let mut in_fence = false;
    let mut out: Vec<String> = Vec::new();
    for line in input.split('\n') {
        if is_fence_line(line) {
            in_fence = !in_fence;
            out.push(line.to_string());
        } else if in_fence {
            out.push(line.to_string());
        } else if let Some(kept) = f(line) {
            out.push(kept);
        }
    }
    out.join("\n")
}

// ── Step 1: Strip leftover directive markers ─────────────────────────────────

static RE_DIRECTIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^((?:>[ \t]*)?[ \t]*)\.\.[ \t]+([A-Za-z0-9_-]+)::[ \t]*(.*)$").unwrap()
});

/// Render every directive marker left over by the earlier stages: the marker
/// goes, its argument stays, and its body is dedented to the marker's
/// column so it does not turn into an indented code block.
fn strip_directive_markers(input: &str) -> String {
    let lines: Vec<&str> = input.split('\n').collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut in_fence = false;
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        if is_fence_line(line) {
            in_fence = !in_fence;
        }
        let caps = match RE_DIRECTIVE.captures(line) {
            Some(caps) if !in_fence => caps,
            _ => {
                out.push(line.to_string());
                i += 1;
                continue;
            }
        };

        let directive = Directive::classify(&caps[2], &caps[3]);
        debug!(?directive, "rendering leftover directive");

        let (quote, lead) = split_quote(caps.get(1).map_or("", |m| m.as_str()));
        let quoted = !quote.is_empty();
        let level = indent_of(lead);
        let end = directive_body_end(&lines, i + 1, quoted, level);

        let body: Vec<&str> = lines[i + 1..end].iter().map(|l| split_quote(l).1).collect();
        let body = dedent(trim_blank_lines(&body));
        let argument = caps[3].trim();

        let mut rendered: Vec<&str> = Vec::with_capacity(body.len() + 2);
        if !argument.is_empty() {
            rendered.push(argument);
            if !body.is_empty() {
                rendered.push("");
            }
        }
        rendered.extend(body);
        if rendered.is_empty() {
            rendered.push("");
        }

        for r in rendered {
            let indented = if r.is_empty() { String::new() } else { format!("{lead}{r}") };
            out.push(quote_line(quoted, &indented));
        }
        i = end;
    }
    out.join("\n")
}

/// End (exclusive) of the body of a directive whose marker sits at column
/// `level`: blank lines and lines indented deeper, with the same quote
/// status. Trailing blank lines are left to the surrounding text.
fn directive_body_end(lines: &[&str], from: usize, quoted: bool, level: usize) -> usize {
    let mut end = from;
    let mut j = from;
    while let Some(line) = lines.get(j) {
        let (quote, rest) = split_quote(line);
        if quote.is_empty() == quoted || is_fence_line(line) {
            break;
        }
        if rest.trim().is_empty() {
            j += 1;
            continue;
        }
        if indent_of(rest) <= level {
            break;
        }
        j += 1;
        end = j;
    }
    end
}

// ── Step 2: Drop comments and attribute-only lines ───────────────────────────

static RE_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:>[ \t]*)?[ \t]*\.\.(?:[ \t].*)?$").unwrap());

static RE_ATTRIBUTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:>[ \t]*)?[ \t]*:[A-Za-z][\w-]*:(?:[ \t].*)?$").unwrap());

fn drop_comment_and_attribute_lines(input: &str) -> String {
    map_unfenced_lines(input, |line| {
        if RE_COMMENT.is_match(line) || RE_ATTRIBUTE.is_match(line) {
            None
        } else {
            Some(line.to_string())
        }
    })
}

// ── Step 3: Clear stranded `html` tokens ─────────────────────────────────────

static RE_HTML_RESIDUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^>[ \t]*html[ \t]*$").unwrap());

fn clear_html_residue(input: &str) -> String {
    map_unfenced_lines(input, |line| {
        if RE_HTML_RESIDUE.is_match(line) {
            Some(">".to_string())
        } else {
            Some(line.to_string())
        }
    })
}

// ── Step 4: Context walk ─────────────────────────────────────────────────────

/// Tracks whether the walk is inside a quoted region and inside a fence.
#[derive(Debug, Default)]
struct WalkState {
    in_quote: bool,
    in_fence: bool,
}

fn walk_context(input: &str) -> String {
    let lines: Vec<&str> = input.split('\n').collect();
    let mut state = WalkState::default();
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut collapsed = 0usize;
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        if line.starts_with('>') {
            state.in_quote = true;
        } else if line.trim().is_empty()
            && !lines.get(i + 1).is_some_and(|next| next.starts_with('>'))
        {
            state.in_quote = false;
        }

        if state.in_quote && !state.in_fence {
            if let Some(url) = quoted_fenced_url(&lines[i..]) {
                out.push(url.to_string());
                collapsed += 1;
                i += 3;
                continue;
            }
        }

        if is_fence_line(line) {
            state.in_fence = !state.in_fence;
        }
        if state.in_fence && line.contains("pre>") {
            out.push(line.replace("<pre>", "").replace("</pre>", ""));
        } else {
            out.push(line.to_string());
        }
        i += 1;
    }

    debug!(collapsed, "quoted url fences collapsed");
    out.join("\n")
}

/// The URL line of a `> ```` / `> <url>` / `> ```` triple at the start of
/// `lines`, if there is one.
fn quoted_fenced_url<'a>(lines: &[&'a str]) -> Option<&'a str> {
    let [open, url, close, ..] = lines else {
        return None;
    };
    let quoted_fence = |line: &str| {
        let (prefix, body) = split_quote(line);
        !prefix.is_empty() && body.trim() == "```"
    };
    let (prefix, body) = split_quote(url);
    let body = body.trim();
    let is_url = !prefix.is_empty()
        && (body.starts_with("http://") || body.starts_with("https://"))
        && !body.contains(char::is_whitespace);
    (quoted_fence(*open) && is_url && quoted_fence(*close)).then_some(*url)
}

// ── Step 5: Collapse blank lines ─────────────────────────────────────────────

fn collapse_blank_lines(input: &str) -> String {
    let mut in_fence = false;
    let mut previous_blank = false;
    let mut out: Vec<&str> = Vec::new();
    for line in input.split('\n') {
        if is_fence_line(line) {
            in_fence = !in_fence;
        }
        let blank = !in_fence && line.trim().is_empty();
        if blank && previous_blank {
            continue;
        }
        previous_blank = blank;
        out.push(if blank { "" } else { line });
    }
    out.join("\n")
}

// ── Step 6: Balance fences ───────────────────────────────────────────────────

fn balance_fences(input: &str) -> RepairOutcome {
    let fences = input.matches("```").count();
    if fences % 2 == 0 {
        return RepairOutcome {
            text: input.to_string(),
            closed_fence: false,
        };
    }
    warn!(fences, "unbalanced code fence, appending a closing fence");
    RepairOutcome {
        text: format!("{}\n```", input.trim_end_matches('\n')),
        closed_fence: true,
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
