//! Stage 1: underline-style section headers → ATX headers.
//!
//! RST marks a section title by underlining it (and optionally overlining
//! it) with a run of one punctuation character. Markdown wants the level up
//! front, so the underline character is mapped to a level and both lines
//! collapse into one `#`-prefixed line.

use super::blocks::is_fence_line;
use tracing::debug;

/// Section adornment characters. Backticks are handled separately by
/// [`backtick_underline`], since a short backtick run is a Markdown fence.
const ADORNMENT: &str = "=-:'\"~^_*+#";

/// Rewrite every underlined (or over- and underlined) title as an ATX header.
/// Fenced content is left alone.
pub fn convert_headers(input: &str) -> String {
    let lines: Vec<&str> = input.split('\n').collect();
    let mut result: Vec<String> = Vec::with_capacity(lines.len());
    let mut count = 0usize;
    let mut in_fence = false;
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        let fence = is_fence_line(line);
        if fence {
            in_fence = !in_fence;
        }
        if fence || in_fence {
            result.push(line.to_string());
            i += 1;
            continue;
        }

        // Overline + title + matching underline.
        if let (Some(over), Some(title), Some(under)) =
            (adornment_char(line), lines.get(i + 1), lines.get(i + 2))
        {
            if !title.trim().is_empty()
                && adornment_char(title).is_none()
                && adornment_char(under) == Some(over)
            {
                result.push(format_header(over, title.trim()));
                count += 1;
                i += 3;
                continue;
            }
        }

        if let Some(under) = lines
            .get(i + 1)
            .and_then(|next| adornment_char(next).or_else(|| backtick_underline(line, next)))
        {
            if !line.trim().is_empty() && adornment_char(line).is_none() {
                result.push(format_header(under, line.trim_end()));
                count += 1;
                i += 2;
                continue;
            }
        }

        result.push(line.to_string());
        i += 1;
    }

    debug!(count, "headers rewritten");
    result.join("\n")
}

/// The adornment character if `line` is a run of ≥ 3 identical adornment
/// characters starting at column 0.
pub fn adornment_char(line: &str) -> Option<char> {
    let run = line.trim_end();
    let first = run.chars().next()?;
    if !ADORNMENT.contains(first) || run.chars().count() < 3 {
        return None;
    }
    run.chars().all(|c| c == first).then_some(first)
}

/// `Some('`')` if `under` is a backtick run that underlines `title`.
///
/// A backtick run only counts when it is at least as long as the title, so
/// an opening fence right below a short line of text stays a fence.
pub fn backtick_underline(title: &str, under: &str) -> Option<char> {
    let run = under.trim_end();
    let len = run.chars().count();
    let underlines = len >= 3
        && run.chars().all(|c| c == '`')
        && len >= title.trim_end().chars().count();
    underlines.then_some('`')
}

/// Header level for an adornment character.
pub fn header_level(c: char) -> usize {
    match c {
        '=' => 1,
        '-' | '~' => 2,
        '^' => 3,
        '"' => 4,
        _ => 3,
    }
}

fn format_header(adornment: char, text: &str) -> String {
    format!("{} {}", "#".repeat(header_level(adornment)), text)
}
