//! # rst2md
//!
//! Convert reStructuredText documents to Markdown.
//!
//! ## Why this crate?
//!
//! Documentation written for Sphinx-style toolchains leans on a handful of
//! RST constructs (underlined section titles, admonitions, raw HTML, image
//! options, literal blocks) that have a direct Markdown spelling. This crate
//! rewrites those constructs into GitHub-flavoured Markdown with a fixed
//! sequence of text stages, then repairs what the stages leave behind, so the
//! output always has balanced code fences.
//!
//! ## Pipeline Overview
//!
//! ```text
//! RST
//!  │
//!  ├─ 1. Headers     underlined titles → `#` headers
//!  ├─ 2. Callouts    admonitions → `> **Note**` blockquotes
//!  ├─ 3. Raw HTML    `.. raw:: html` → verbatim HTML or fenced `<pre>`
//!  ├─ 4. Links       `` `label <url>`_ `` → `[label](url)`
//!  ├─ 5. Images      `.. image::` → `![alt](path)` or `<img>`
//!  ├─ 6. Attributes  image options stranded in callouts → `<img>`
//!  ├─ 7. Code        `::` blocks and `.. code::` → fenced code
//!  └─ 8. Repair      strip leftovers, collapse blank lines, balance fences
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rst2md::{convert_file, ConversionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::default();
//!     let done = convert_file("integrations.rst", &config).await?;
//!     println!("Converted {} to {}", done.input.display(), done.output.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `rst2md` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! rst2md = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod stream;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder};
pub use convert::{
    convert_file, convert_file_sync, convert_str, convert_to_file, output_path_for,
};
pub use error::Rst2MdError;
pub use output::{ConversionOutput, ConversionStats, FileConversion};
pub use stream::{convert_batch, convert_stream, FileStream};
