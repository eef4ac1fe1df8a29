//! Stage 5: `.. image::` directives → Markdown or HTML images.
//!
//! A plain `![alt](path)` is emitted when the directive carries at most an
//! `:alt:` option. Width, alignment and class have no Markdown spelling, so
//! any of them switches the output to an `<img>` element with an inline
//! style; `:align: center` additionally wraps it in a centring `<div>`.

use super::blocks::rewrite_directive_blocks;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static RE_IMAGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^((?:>[ \t]*)?[ \t]*)\.\.[ \t]+image::[ \t]*").unwrap()
});

/// Attributes collected from an image's option lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageAttributes {
    pub alt: String,
    pub width: String,
    pub align: String,
    pub class: String,
}

impl ImageAttributes {
    /// Apply one option line (`:alt: text` etc.).
    ///
    /// Options are matched by prefix, case-sensitively; a later option of
    /// the same kind replaces an earlier one. Returns false for lines that
    /// are not one of the four image options.
    pub fn apply(&mut self, line: &str) -> bool {
        let line = line.trim();
        let (slot, value) = if let Some(v) = line.strip_prefix(":alt:") {
            (&mut self.alt, v)
        } else if let Some(v) = line.strip_prefix(":width:") {
            (&mut self.width, v)
        } else if let Some(v) = line.strip_prefix(":align:") {
            (&mut self.align, v)
        } else if let Some(v) = line.strip_prefix(":class:") {
            (&mut self.class, v)
        } else {
            return false;
        };
        *slot = value.trim().to_string();
        true
    }

    /// True when the image cannot be expressed as plain Markdown.
    pub fn needs_html(&self) -> bool {
        !self.width.is_empty() || !self.align.is_empty() || !self.class.is_empty()
    }

    /// Markdown image if possible, HTML otherwise.
    pub fn render(&self, path: &str) -> String {
        if self.needs_html() {
            self.render_html(path)
        } else {
            self.render_markdown(path)
        }
    }

    pub fn render_markdown(&self, path: &str) -> String {
        format!("![{}]({})", self.alt, path)
    }

    pub fn render_html(&self, path: &str) -> String {
        let mut style = Vec::with_capacity(2);
        if !self.align.is_empty() {
            style.push(format!("text-align: {};", self.align));
        }
        if !self.width.is_empty() {
            style.push(format!("width: {};", self.width));
        }

        let mut img = format!("<img src=\"{}\" alt=\"{}\"", path, self.alt);
        if !style.is_empty() {
            img.push_str(&format!(" style=\"{}\"", style.join(" ")));
        }
        if !self.class.is_empty() {
            img.push_str(&format!(" class=\"{}\"", self.class));
        }
        img.push('>');

        if self.align == "center" {
            format!("<div style=\"text-align: center;\">{img}</div>")
        } else {
            img
        }
    }
}

/// Rewrite every image directive.
///
/// The path is the text after `image::`. Option lines directly below it are
/// consumed; anything else in the block is kept as it was. A quoted marker
/// (`> .. image:: p`) ends at its own line, so its quoted options are left
/// for [`super::image_attributes`].
pub fn convert_images(input: &str) -> String {
    let (out, count) = rewrite_directive_blocks(input, &RE_IMAGE, |m, _| {
        let mut lines = m.body.split('\n');
        let path = lines.next().unwrap_or("").trim();
        if path.is_empty() {
            return None;
        }

        let mut attrs = ImageAttributes::default();
        let mut rest = lines.peekable();
        while rest.next_if(|line| attrs.apply(line)).is_some() {}

        let mut out = attrs.render(path);
        for line in rest {
            out.push('\n');
            out.push_str(line);
        }
        Some(out)
    });
    debug!(count, "images rewritten");
    out
}
