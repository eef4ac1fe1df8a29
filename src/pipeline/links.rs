//! Stage 4: inline hyperlink references.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::debug;

// `label <target>`_ (named) and `label <target>`__ (anonymous).
static RE_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"`([^`]+?)\s+<([^>]+)>`__?").unwrap());

/// Rewrite `` `label <target>`_ `` as `[label](target)`.
pub fn convert_links(input: &str) -> String {
    let mut count = 0usize;
    let out = RE_LINK.replace_all(input, |caps: &Captures<'_>| {
        count += 1;
        format!("[{}]({})", caps[1].trim(), caps[2].trim())
    });
    debug!(count, "links rewritten");
    out.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_link() {
        assert_eq!(
            convert_links("`Example <http://example.com>`_"),
            "[Example](http://example.com)"
        );
    }

    #[test]
    fn test_anonymous_link() {
        assert_eq!(
            convert_links("see `the docs <https://docs.rs>`__."),
            "see [the docs](https://docs.rs)."
        );
    }

    #[test]
    fn test_several_links_in_one_line() {
        assert_eq!(
            convert_links("`A <a.html>`_ and `B <b.html>`_"),
            "[A](a.html) and [B](b.html)"
        );
    }

    #[test]
    fn test_plain_literal_untouched() {
        let input = "use `cargo build` and ``<tag>``";
        assert_eq!(convert_links(input), input);
    }

    #[test]
    fn test_markdown_link_passes_through() {
        let input = "[Example](http://example.com)";
        assert_eq!(convert_links(input), input);
    }
}
