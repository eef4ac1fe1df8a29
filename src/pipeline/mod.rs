//! Pipeline stages for RST-to-Markdown conversion.
//!
//! Each submodule implements exactly one rewrite step over the whole
//! document text. Stages are pure `&str → String` functions and run in a
//! fixed order; they are not commutative, because later stages rely on the
//! shapes earlier ones produce (callouts must exist before quoted images
//! can be repaired, code fences must exist before the repair pass balances
//! them).
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ headers ──▶ callouts ──▶ raw_html ──▶ links ──▶ images
//!                          │
//!                          └─▶ raw_html (callout context)
//!
//!   ──▶ image_attributes ──▶ code_blocks ──▶ repair
//! ```
//!
//! 1. [`headers`]  : underlined titles become ATX headers
//! 2. [`callouts`] : admonitions become `>` callouts; nested raw HTML is
//!    resolved in callout context
//! 3. [`raw_html`] : remaining `.. raw:: html` blocks
//! 4. [`links`]    : `` `label <url>`_ `` references
//! 5. [`images`]   : `.. image::` blocks
//! 6. [`image_attributes`] : option lines stranded below rendered images
//! 7. [`code_blocks`] : literal blocks and code directives become fences
//! 8. [`repair`]   : strip leftovers, collapse artefacts, balance fences
//!
//! [`blocks`] and [`scope`] hold what the stages share: directive markers,
//! block extents and the per-line scope stack.

pub mod blocks;
pub mod callouts;
pub mod code_blocks;
pub mod headers;
pub mod image_attributes;
pub mod images;
pub mod input;
pub mod links;
pub mod raw_html;
pub mod repair;
pub mod scope;

use repair::RepairOutcome;
use tracing::debug;

/// Run every stage over `input`.
///
/// The returned text ends with exactly one newline.
pub fn run(input: &str) -> RepairOutcome {
    let s = normalise_line_endings(input);
    let s = headers::convert_headers(&s);
    let s = callouts::convert_callouts(&s);
    let s = raw_html::convert_raw_html(&s);
    let s = links::convert_links(&s);
    let s = images::convert_images(&s);
    let s = image_attributes::convert_inline_image_attributes(&s);
    let s = code_blocks::convert_code_blocks(&s);
    let outcome = repair::repair(&s);
    debug!(
        bytes = outcome.text.len(),
        closed_fence = outcome.closed_fence,
        "pipeline finished"
    );
    RepairOutcome {
        text: ensure_final_newline(&outcome.text),
        closed_fence: outcome.closed_fence,
    }
}

/// CRLF and lone CR become LF.
pub fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

fn ensure_final_newline(input: &str) -> String {
    let trimmed = input.trim_end();
    if trimmed.is_empty() {
        String::from("\n")
    } else {
        format!("{}\n", trimmed)
    }
}
