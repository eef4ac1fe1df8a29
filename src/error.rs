//! Error types for the rst2md library.
//!
//! The rewrite pipeline itself never fails: malformed or unknown markup is
//! passed through or stripped, and an unbalanced code fence is repaired
//! rather than reported. Every variant here therefore belongs to the
//! surfaces around the pipeline: reading the source file, writing the
//! Markdown file, and validating the configuration.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the rst2md library.
#[derive(Debug, Error)]
pub enum Rst2MdError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("RST file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists but could not be read as UTF-8 text.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Output errors ─────────────────────────────────────────────────────
    /// The output file already exists and overwriting is disabled.
    #[error("Output file '{path}' already exists.\nRemove it or enable overwrite.")]
    OutputExists { path: PathBuf },

    /// Could not create or write the output Markdown file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_not_found_display() {
        let e = Rst2MdError::FileNotFound {
            path: PathBuf::from("docs/missing.rst"),
        };
        let msg = e.to_string();
        assert!(msg.contains("docs/missing.rst"), "got: {msg}");
    }

    #[test]
    fn output_exists_display() {
        let e = Rst2MdError::OutputExists {
            path: PathBuf::from("out.md"),
        };
        assert!(e.to_string().contains("out.md"));
        assert!(e.to_string().contains("overwrite"));
    }

    #[test]
    fn write_failed_keeps_source() {
        use std::error::Error as _;
        let e = Rst2MdError::OutputWriteFailed {
            path: PathBuf::from("out.md"),
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        };
        assert!(e.to_string().contains("disk full"));
        assert!(e.source().is_some());
    }

    #[test]
    fn invalid_config_display() {
        let e = Rst2MdError::InvalidConfig("extension must not be empty".into());
        assert_eq!(
            e.to_string(),
            "Invalid configuration: extension must not be empty"
        );
    }
}
