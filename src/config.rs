//! Configuration types for RST-to-Markdown conversion.
//!
//! The rewrite pipeline has no knobs: every stage is a fixed rule. What the
//! caller controls is where the Markdown lands and how many files are
//! converted at once, all collected in [`ConversionConfig`] and built via
//! its [`ConversionConfigBuilder`].

use crate::error::Rst2MdError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for converting RST files to Markdown.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use rst2md::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .output_extension("markdown")
///     .concurrency(8)
///     .build()
///     .unwrap();
/// assert_eq!(config.output_extension, "markdown");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionConfig {
    /// Extension given to the output file, without the leading dot. Default: `md`.
    pub output_extension: String,

    /// Directory receiving the output files. Default: `None` (next to the input).
    pub output_dir: Option<PathBuf>,

    /// Replace an existing output file. Default: true.
    ///
    /// When false, converting onto an existing file fails with
    /// [`Rst2MdError::OutputExists`] before anything is written.
    pub overwrite: bool,

    /// Maximum number of files converted concurrently by
    /// [`crate::stream::convert_stream`]. Default: 4.
    ///
    /// Each document is converted independently, so any value ≥ 1 yields the
    /// same per-file output; only throughput changes.
    pub concurrency: usize,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            output_extension: "md".to_string(),
            output_dir: None,
            overwrite: true,
            concurrency: 4,
        }
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    /// Accepts `md` as well as `.md`.
    pub fn output_extension(mut self, ext: impl Into<String>) -> Self {
        let ext = ext.into();
        self.config.output_extension = ext.trim().trim_start_matches('.').to_string();
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = Some(dir.into());
        self
    }

    pub fn overwrite(mut self, v: bool) -> Self {
        self.config.overwrite = v;
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Rst2MdError> {
        let c = &self.config;
        if c.output_extension.is_empty() {
            return Err(Rst2MdError::InvalidConfig(
                "Output extension must not be empty".into(),
            ));
        }
        if c.output_extension.contains(['/', '\\']) {
            return Err(Rst2MdError::InvalidConfig(format!(
                "Output extension must not contain a path separator, got '{}'",
                c.output_extension
            )));
        }
        if c.concurrency == 0 {
            return Err(Rst2MdError::InvalidConfig(
                "Concurrency must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = ConversionConfig::default();
        assert_eq!(c.output_extension, "md");
        assert!(c.output_dir.is_none());
        assert!(c.overwrite);
        assert_eq!(c.concurrency, 4);
    }

    #[test]
    fn builder_strips_leading_dot() {
        let c = ConversionConfig::builder()
            .output_extension(".markdown")
            .build()
            .unwrap();
        assert_eq!(c.output_extension, "markdown");
    }

    #[test]
    fn builder_rejects_empty_extension() {
        let err = ConversionConfig::builder()
            .output_extension(".")
            .build()
            .unwrap_err();
        assert!(matches!(err, Rst2MdError::InvalidConfig(_)));
    }

    #[test]
    fn builder_rejects_zero_concurrency() {
        let err = ConversionConfig::builder().concurrency(0).build().unwrap_err();
        assert!(err.to_string().contains("Concurrency"));
    }

    #[test]
    fn config_roundtrips_through_json() {
        let c = ConversionConfig::builder()
            .output_dir("out")
            .overwrite(false)
            .build()
            .unwrap();
        let json = serde_json::to_string(&c).unwrap();
        let back: ConversionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }
}
