//! Explicit scope stack: which structural regions enclose each line.
//!
//! The stages rewrite text, not a tree, but several decisions depend on
//! where a match sits: a raw `<pre>` block inside a callout is inlined
//! rather than fenced, and directive-looking text inside a literal block or
//! a fence must be left alone. [`ScopeMap::scan`] answers those questions by
//! walking the lines once and maintaining a stack of open regions:
//!
//! - directive bodies and `::` literal blocks are indentation scoped: they
//!   close when a non-blank line dedents to (or past) the opening line;
//! - fences open and close on ```` ``` ```` lines and ignore indentation;
//! - a quoted region lasts from a `>` line to the next non-blank line
//!   without one.

use super::blocks::{indent_of, is_fence_line, split_quote, Directive};

/// A structural region enclosing a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Region {
    /// Body of a directive.
    Directive(Directive),
    /// Indented block introduced by a `::` paragraph.
    Literal,
    /// Fenced code (target syntax).
    Fence,
    /// Blockquote, i.e. an already rendered callout.
    Quote,
}

impl Region {
    fn is_literal(&self) -> bool {
        match self {
            Region::Directive(d) => d.is_literal(),
            Region::Literal | Region::Fence => true,
            Region::Quote => false,
        }
    }
}

#[derive(Debug)]
struct Frame {
    region: Region,
    indent: usize,
}

/// Per-line scope stacks for one snapshot of the document.
#[derive(Debug, Default)]
pub struct ScopeMap {
    line_starts: Vec<usize>,
    scopes: Vec<Vec<Region>>,
}

impl ScopeMap {
    /// Compute the enclosing regions of every line of `text`.
    pub fn scan(text: &str) -> Self {
        let mut map = ScopeMap::default();
        let mut stack: Vec<Frame> = Vec::new();
        let mut in_fence = false;
        let mut in_quote = false;
        let mut offset = 0;

        for line in text.split('\n') {
            map.line_starts.push(offset);
            offset += line.len() + 1;

            let (_, body) = split_quote(line);
            let blank = body.trim().is_empty();
            let fence = is_fence_line(line);

            if in_fence {
                map.scopes.push(snapshot(&stack, true, in_quote));
                in_fence = !fence;
                continue;
            }

            if !blank {
                in_quote = line.starts_with('>');
                let indent = indent_of(body);
                while stack.last().is_some_and(|f| indent <= f.indent) {
                    stack.pop();
                }
            }

            let literal = stack.iter().any(|f| f.region.is_literal());
            if fence && !literal {
                in_fence = true;
            }
            map.scopes.push(snapshot(&stack, in_fence, in_quote));

            if blank || literal || in_fence {
                continue;
            }
            if let Some((indent, directive)) = Directive::parse_marker(body) {
                stack.push(Frame {
                    region: Region::Directive(directive),
                    indent,
                });
            } else if body.trim_end().ends_with("::") {
                stack.push(Frame {
                    region: Region::Literal,
                    indent: indent_of(body),
                });
            }
        }

        map
    }

    /// Regions enclosing the line that contains byte `offset`.
    pub fn at(&self, offset: usize) -> &[Region] {
        let line = self.line_starts.partition_point(|&s| s <= offset);
        self.scopes
            .get(line.saturating_sub(1))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// True when `offset` sits inside a callout, rendered or not.
    pub fn in_callout(&self, offset: usize) -> bool {
        self.at(offset).iter().any(|r| {
            matches!(r, Region::Quote | Region::Directive(Directive::Admonition(_)))
        })
    }

    /// True when `offset` sits inside literal text (code, raw markup, fence).
    pub fn in_literal(&self, offset: usize) -> bool {
        self.at(offset).iter().any(Region::is_literal)
    }
}

fn snapshot(stack: &[Frame], in_fence: bool, in_quote: bool) -> Vec<Region> {
    let mut regions: Vec<Region> = stack.iter().map(|f| f.region.clone()).collect();
    if in_quote {
        regions.push(Region::Quote);
    }
    if in_fence {
        regions.push(Region::Fence);
    }
    regions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offset_of(text: &str, needle: &str) -> usize {
        text.find(needle).unwrap()
    }

    #[test]
    fn top_level_has_no_scope() {
        let text = "Title\n\nParagraph";
        let map = ScopeMap::scan(text);
        assert!(map.at(offset_of(text, "Paragraph")).is_empty());
    }

    #[test]
    fn admonition_body_is_callout_scope() {
        let text = ".. note::\n\n   inside\n\noutside";
        let map = ScopeMap::scan(text);
        assert!(map.in_callout(offset_of(text, "inside")));
        assert!(!map.in_callout(offset_of(text, "outside")));
    }

    #[test]
    fn quoted_region_is_callout_scope() {
        let text = "> **Note**\n>\n> body\n\nplain";
        let map = ScopeMap::scan(text);
        assert!(map.in_callout(offset_of(text, "body")));
        assert!(!map.in_callout(offset_of(text, "plain")));
    }

    #[test]
    fn literal_block_closes_on_dedent() {
        let text = "Example::\n\n    .. note:: shown\n\n.. note:: real";
        let map = ScopeMap::scan(text);
        assert!(map.in_literal(offset_of(text, ".. note:: shown")));
        assert!(!map.in_literal(offset_of(text, ".. note:: real")));
    }

    #[test]
    fn fence_interior_is_literal() {
        let text = "```\n.. image:: x.png\n```\n.. image:: y.png";
        let map = ScopeMap::scan(text);
        assert!(map.in_literal(offset_of(text, ".. image:: x.png")));
        assert!(!map.in_literal(offset_of(text, ".. image:: y.png")));
    }

    #[test]
    fn nested_directives_stack() {
        let text = ".. note::\n\n   .. code:: rust\n\n      fn main() {}\n\n   text";
        let map = ScopeMap::scan(text);
        let inner = map.at(offset_of(text, "fn main"));
        assert_eq!(inner.len(), 2);
        assert_eq!(inner[0], Region::Directive(Directive::Admonition("note".into())));
        assert_eq!(inner[1], Region::Directive(Directive::Code(Some("rust".into()))));
        assert!(!map.in_literal(offset_of(text, "text")));
    }
}
