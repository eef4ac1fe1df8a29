//! Stage 6: image option lines stranded below an already rendered image.
//!
//! When an image sits in a quoted region, the block stage only sees the
//! marker line; its option lines end up as quoted text below a Markdown
//! image. This pass folds them back into the image.

use super::blocks::{is_fence_line, split_quote};
use super::images::ImageAttributes;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static RE_IMAGE_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(>[ \t]*)?!\[(.*?)\]\((.*?)\)[ \t]*$").unwrap());

static RE_OPTION_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:>[ \t]*)?[ \t]*:[a-zA-Z]+:").unwrap());

/// Merge option lines that follow a Markdown image into an HTML image.
///
/// The result always uses the HTML form and keeps the image line's quote
/// prefix. Fenced regions are left alone.
pub fn convert_inline_image_attributes(input: &str) -> String {
    let lines: Vec<&str> = input.split('\n').collect();
    let mut result: Vec<String> = Vec::with_capacity(lines.len());
    let mut count = 0usize;
    let mut in_fence = false;
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        if is_fence_line(line) {
            in_fence = !in_fence;
        }

        let image = if in_fence {
            None
        } else {
            RE_IMAGE_LINE.captures(line)
        };
        let followed_by_option = lines
            .get(i + 1)
            .is_some_and(|next| RE_OPTION_LINE.is_match(next));

        match image {
            Some(caps) if followed_by_option => {
                let prefix = caps.get(1).map_or("", |m| m.as_str());
                let mut attrs = ImageAttributes {
                    alt: caps[2].to_string(),
                    ..ImageAttributes::default()
                };
                let mut j = i + 1;
                while let Some(next) = lines.get(j).filter(|l| RE_OPTION_LINE.is_match(l)) {
                    attrs.apply(split_quote(next).1);
                    j += 1;
                }
                result.push(format!("{prefix}{}", attrs.render_html(&caps[3])));
                count += 1;
                i = j;
            }
            _ => {
                result.push(line.to_string());
                i += 1;
            }
        }
    }

    debug!(count, "stranded image options merged");
    result.join("\n")
}
