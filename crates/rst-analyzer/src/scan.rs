//! Single pass over the document lines, feeding an explicit [`Tally`].
//!
//! No tree is built. Each line is classified on its own, with two pieces of
//! carried state: the indentation of an open literal region (whose lines are
//! skipped) and the adornment styles seen so far (which fix section levels).

use crate::report::{Report, Section, Summary};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

/// Element kinds too common to be worth reporting.
const ORDINARY: [&str; 10] = [
    "document",
    "section",
    "paragraph",
    "text",
    "title",
    "reference",
    "target",
    "literal",
    "emphasis",
    "strong",
];

const ADMONITIONS: [&str; 10] = [
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

/// Section adornment characters.
const ADORNMENT: &str = "=-`:'\"~^_*+#";

static RE_DIRECTIVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]*\.\.[ \t]+([A-Za-z0-9_-]+)::[ \t]*(.*?)[ \t]*$").unwrap());

static RE_OPTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]+:[A-Za-z][\w-]*:(?:[ \t]|$)").unwrap());

static RE_TARGET: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[ \t]*\.\.[ \t]+_").unwrap());

static RE_FOOTNOTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]*\.\.[ \t]+\[(#?[0-9]*|\*)\]").unwrap());

static RE_CITATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]*\.\.[ \t]+\[[A-Za-z][\w.-]*\]").unwrap());

static RE_SUBSTITUTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]*\.\.[ \t]+\|[^|]+\|").unwrap());

static RE_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[ \t]*\.\.(?:[ \t]|$)").unwrap());

static RE_BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[ \t]*[-*+•][ \t]+\S").unwrap());

static RE_ENUMERATED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]*(?:[0-9]+|#)[.)][ \t]+\S").unwrap());

static RE_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]*:[A-Za-z][\w -]*:(?:[ \t]|$)").unwrap());

static RE_DOCTEST: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[ \t]*>>>").unwrap());

static RE_LINE_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[ \t]*\|(?:[ \t]|$)").unwrap());

static RE_INLINE_LITERAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"``.+?``").unwrap());

// :role:`text`, `text`_, `text`__ and bare `text`.
static RE_INTERPRETED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?::([A-Za-z][\w.+-]*(?::[A-Za-z][\w.+-]*)*):)?`([^`]+)`(_{1,2})?").unwrap()
});

/// Running counts for one document.
#[derive(Debug, Default)]
pub(crate) struct Tally {
    directives: BTreeMap<String, usize>,
    roles: BTreeMap<String, usize>,
    admonitions: BTreeMap<String, usize>,
    raw_html: usize,
    sections: Vec<Section>,
    styles: Vec<(char, bool)>,
    custom_elements: Vec<String>,
}

impl Tally {
    fn directive(&mut self, name: &str, argument: &str) {
        *self.directives.entry(name.to_string()).or_default() += 1;
        if ADMONITIONS.contains(&name) {
            *self.admonitions.entry(name.to_string()).or_default() += 1;
        }
        if name == "raw" && argument == "html" {
            self.raw_html += 1;
        }
        self.element(&element_kind(name));
    }

    fn role(&mut self, role: &str) {
        *self.roles.entry(role.to_string()).or_default() += 1;
    }

    fn section(&mut self, title: &str, style: (char, bool)) {
        let level = match self.styles.iter().position(|s| *s == style) {
            Some(p) => p + 1,
            None => {
                self.styles.push(style);
                self.styles.len()
            }
        };
        self.sections.push(Section {
            title: title.to_string(),
            level,
        });
    }

    fn element(&mut self, kind: &str) {
        if ORDINARY.contains(&kind) || kind == "title_reference" {
            return;
        }
        if !self.custom_elements.iter().any(|k| k == kind) {
            self.custom_elements.push(kind.to_string());
        }
    }

    pub(crate) fn into_report(self) -> Report {
        let summary = Summary {
            total_directives: self.directives.values().sum(),
            unique_directives: self.directives.len(),
            total_raw_html: self.raw_html,
            total_admonitions: self.admonitions.values().sum(),
            total_sections: self.sections.len(),
        };
        Report {
            summary,
            directives: self.directives,
            roles: self.roles,
            admonitions: self.admonitions,
            sections: self.sections,
            custom_elements: self.custom_elements,
        }
    }
}

/// Document-tree element kind a directive produces.
fn element_kind(directive: &str) -> String {
    match directive {
        "code" | "code-block" | "sourcecode" | "literalinclude" | "parsed-literal" => {
            "literal_block".to_string()
        }
        "table" | "list-table" | "csv-table" => "table".to_string(),
        "contents" => "topic".to_string(),
        "math" => "math_block".to_string(),
        other => other.replace('-', "_"),
    }
}

/// True for directives whose body is not RST markup.
fn is_literal_directive(name: &str) -> bool {
    matches!(
        name,
        "raw" | "code" | "code-block" | "sourcecode" | "parsed-literal" | "math"
    )
}

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start_matches([' ', '\t']).len()
}

fn adornment_char(line: &str) -> Option<char> {
    let run = line.trim_end();
    let first = run.chars().next()?;
    if !ADORNMENT.contains(first) || run.chars().count() < 3 {
        return None;
    }
    run.chars().all(|c| c == first).then_some(first)
}

/// Record every line of `text` into `tally`.
pub(crate) fn scan(text: &str, tally: &mut Tally) {
    let lines: Vec<&str> = text.lines().collect();
    let mut literal: Option<usize> = None;
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        let blank = line.trim().is_empty();
        let indent = indent_of(line);

        if let Some(level) = literal {
            if blank || indent > level {
                i += 1;
                continue;
            }
            literal = None;
        }
        if blank {
            i += 1;
            continue;
        }

        if let Some(consumed) = scan_section(&lines, i, tally) {
            i += consumed;
            continue;
        }

        if let Some(caps) = RE_DIRECTIVE.captures(line) {
            let name = &caps[1];
            tally.directive(name, &caps[2]);
            if is_literal_directive(name) {
                literal = Some(indent);
            }
            i += 1;
            // Options belong to the directive, not to a field list.
            while lines.get(i).is_some_and(|l| RE_OPTION.is_match(l) && indent_of(l) > indent) {
                i += 1;
            }
            continue;
        }

        if line.trim_start().starts_with("..") {
            if scan_explicit_markup(line, tally) {
                // Comment bodies are not markup.
                literal = Some(indent);
            }
            i += 1;
            continue;
        }

        scan_body_line(line, tally);
        if line.trim_end().ends_with("::") {
            tally.element("literal_block");
            literal = Some(indent);
        }
        i += 1;
    }
}

/// Record a section whose title starts at `lines[i]` (or whose overline
/// does), returning the number of lines it spans.
fn scan_section(lines: &[&str], i: usize, tally: &mut Tally) -> Option<usize> {
    let line = lines[i];
    if indent_of(line) > 0 {
        return None;
    }

    if let (Some(over), Some(title), Some(under)) =
        (adornment_char(line), lines.get(i + 1), lines.get(i + 2))
    {
        if !title.trim().is_empty()
            && adornment_char(title).is_none()
            && adornment_char(under) == Some(over)
        {
            tally.section(title.trim(), (over, true));
            return Some(3);
        }
    }

    if adornment_char(line).is_some() {
        // An adornment after a blank line is a transition.
        let after_blank = i.checked_sub(1).is_none_or(|p| lines[p].trim().is_empty());
        if !after_blank {
            return None;
        }
        tally.element("transition");
        return Some(1);
    }

    let under = lines.get(i + 1).and_then(|next| adornment_char(next))?;
    tally.section(line.trim_end(), (under, false));
    Some(2)
}

/// Record a `..` line that is not a directive. Returns true for comments.
fn scan_explicit_markup(line: &str, tally: &mut Tally) -> bool {
    let kind = if RE_TARGET.is_match(line) {
        "target"
    } else if RE_FOOTNOTE.is_match(line) {
        "footnote"
    } else if RE_CITATION.is_match(line) {
        "citation"
    } else if RE_SUBSTITUTION.is_match(line) {
        "substitution_definition"
    } else if RE_COMMENT.is_match(line) {
        "comment"
    } else {
        return false;
    };
    tally.element(kind);
    kind == "comment"
}

fn scan_body_line(line: &str, tally: &mut Tally) {
    if RE_BULLET.is_match(line) {
        tally.element("bullet_list");
        tally.element("list_item");
    } else if RE_ENUMERATED.is_match(line) {
        tally.element("enumerated_list");
        tally.element("list_item");
    } else if RE_FIELD.is_match(line) {
        tally.element("field_list");
    } else if RE_DOCTEST.is_match(line) {
        tally.element("doctest_block");
    } else if RE_LINE_BLOCK.is_match(line) {
        tally.element("line_block");
    }
    scan_roles(line, tally);
}

fn scan_roles(line: &str, tally: &mut Tally) {
    let line = RE_INLINE_LITERAL.replace_all(line, "");
    for caps in RE_INTERPRETED.captures_iter(&line) {
        match (caps.get(1), caps.get(3)) {
            (Some(role), _) => tally.role(role.as_str()),
            (None, Some(_)) => tally.element("reference"),
            (None, None) => tally.role("title_reference"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(text: &str) -> Report {
        let mut tally = Tally::default();
        scan(text, &mut tally);
        tally.into_report()
    }

    #[test]
    fn section_levels_follow_first_seen_style() {
        let r = report("A\n===\n\nB\n---\n\nC\n===\n\nD\n~~~\n");
        let levels: Vec<_> = r.sections.iter().map(|s| (s.title.as_str(), s.level)).collect();
        assert_eq!(levels, vec![("A", 1), ("B", 2), ("C", 1), ("D", 3)]);
    }

    #[test]
    fn overline_style_differs_from_underline_only() {
        let r = report("=====\nTitle\n=====\n\nSub\n===\n");
        assert_eq!(r.sections[0].level, 1);
        assert_eq!(r.sections[1].level, 2);
    }

    #[test]
    fn transition_is_not_a_section() {
        let r = report("Para.\n\n-----\n\nMore.\n");
        assert!(r.sections.is_empty());
        assert_eq!(r.custom_elements, vec!["transition"]);
    }

    #[test]
    fn roles_and_title_references() {
        let r = report("See :ref:`setup`, :py:func:`f`, `Book` and `site <http://x>`_.\n");
        assert_eq!(r.roles.get("ref"), Some(&1));
        assert_eq!(r.roles.get("py:func"), Some(&1));
        assert_eq!(r.roles.get("title_reference"), Some(&1));
        assert_eq!(r.roles.len(), 3);
    }

    #[test]
    fn inline_literals_are_not_roles() {
        let r = report("Run ``make `all` now``.\n");
        assert!(r.roles.is_empty());
    }

    #[test]
    fn literal_block_content_is_skipped() {
        let r = report("Example::\n\n    .. note:: shown as code\n\nAfter.\n");
        assert!(r.directives.is_empty());
        assert_eq!(r.custom_elements, vec!["literal_block"]);
    }

    #[test]
    fn directive_options_are_not_field_lists() {
        let r = report(".. image:: a.png\n   :width: 50%\n\n:Author: Me\n");
        assert_eq!(r.custom_elements, vec!["image", "field_list"]);
    }

    #[test]
    fn explicit_markup_kinds() {
        let r = report(".. _anchor:\n\n.. [1] Note.\n\n.. |sub| replace:: x\n\n.. a comment\n   continued\n");
        assert_eq!(
            r.custom_elements,
            vec!["footnote", "substitution_definition", "comment"]
        );
        assert_eq!(r.directives.get("replace"), None);
    }
}
