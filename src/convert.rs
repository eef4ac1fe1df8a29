//! Eager conversion entry points: one document in, one document out.
//!
//! [`convert_str`] runs the pipeline on text already in memory and cannot
//! fail. [`convert_file`] adds the file surfaces around it: read the source,
//! convert, then write the Markdown atomically next to the input (or into
//! [`ConversionConfig::output_dir`]). Use [`crate::stream::convert_stream`]
//! to convert many files concurrently.

use crate::config::ConversionConfig;
use crate::error::Rst2MdError;
use crate::output::{ConversionOutput, ConversionStats, FileConversion};
use crate::pipeline::{self, input};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Convert RST text to Markdown.
///
/// # Example
/// ```rust
/// let output = rst2md::convert_str("Title\n=====\n");
/// assert_eq!(output.markdown, "# Title\n");
/// ```
pub fn convert_str(input: &str) -> ConversionOutput {
    let start = Instant::now();
    let outcome = pipeline::run(input);

    let stats = ConversionStats {
        input_lines: input.lines().count(),
        output_lines: outcome.text.lines().count(),
        input_bytes: input.len(),
        output_bytes: outcome.text.len(),
        fence_closed: outcome.closed_fence,
        duration_ms: start.elapsed().as_millis() as u64,
    };
    ConversionOutput {
        markdown: outcome.text,
        stats,
    }
}

/// Convert an RST file and write the Markdown next to it.
///
/// The output path comes from [`output_path_for`]; see [`convert_to_file`]
/// for the write semantics and errors.
pub async fn convert_file(
    input: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<FileConversion, Rst2MdError> {
    let input = input.as_ref();
    convert_to_file(input, output_path_for(input, config), config).await
}

/// Convert an RST file and write the Markdown to an explicit `output` path.
///
/// The file is written to a temporary sibling first and renamed into place,
/// so a failed write never leaves a truncated document behind.
///
/// # Errors
/// - [`Rst2MdError::InvalidConfig`] when `output` is the input file
/// - [`Rst2MdError::FileNotFound`], [`Rst2MdError::PermissionDenied`] or
///   [`Rst2MdError::ReadFailed`] when the source cannot be read
/// - [`Rst2MdError::OutputExists`] when the target exists and
///   `config.overwrite` is false
/// - [`Rst2MdError::OutputWriteFailed`] when the target cannot be written
pub async fn convert_to_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<FileConversion, Rst2MdError> {
    let input = input.as_ref();
    let output = output.as_ref().to_path_buf();
    info!("Converting {} -> {}", input.display(), output.display());

    if output == input {
        return Err(Rst2MdError::InvalidConfig(format!(
            "output path '{}' is the input file; choose another extension or output directory",
            output.display()
        )));
    }

    let source = input::read_source(input).await?;

    if !config.overwrite && tokio::fs::try_exists(&output).await.unwrap_or(false) {
        return Err(Rst2MdError::OutputExists { path: output });
    }

    let converted = convert_str(&source);
    write_atomic(&output, &converted.markdown).await?;

    info!(
        "Converted {} ({} lines) in {}ms",
        input.display(),
        converted.stats.output_lines,
        converted.stats.duration_ms
    );

    Ok(FileConversion {
        input: input.to_path_buf(),
        output,
        stats: converted.stats,
    })
}

/// Synchronous wrapper around [`convert_file`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_file_sync(
    input: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<FileConversion, Rst2MdError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Rst2MdError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(convert_file(input, config))
}

/// Output path for `input`: the same file name with its extension replaced
/// by `config.output_extension`, in `config.output_dir` when set.
pub fn output_path_for(input: &Path, config: &ConversionConfig) -> PathBuf {
    let renamed = input.with_extension(&config.output_extension);
    match (&config.output_dir, renamed.file_name()) {
        (Some(dir), Some(name)) => dir.join(name),
        _ => renamed,
    }
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Atomic write: write to a temp sibling, then rename over `path`.
async fn write_atomic(path: &Path, contents: &str) -> Result<(), Rst2MdError> {
    let write_failed = |source: std::io::Error| Rst2MdError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_failed)?;
    }

    let mut tmp_name = path.as_os_str().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    tokio::fs::write(&tmp_path, contents)
        .await
        .map_err(write_failed)?;
    if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(write_failed(e));
    }

    debug!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_replaces_extension() {
        let config = ConversionConfig::default();
        assert_eq!(
            output_path_for(Path::new("docs/integrations.rst"), &config),
            PathBuf::from("docs/integrations.md")
        );
        assert_eq!(
            output_path_for(Path::new("README"), &config),
            PathBuf::from("README.md")
        );
    }

    #[test]
    fn test_output_path_uses_output_dir() {
        let config = ConversionConfig::builder()
            .output_dir("out")
            .output_extension("markdown")
            .build()
            .unwrap();
        assert_eq!(
            output_path_for(Path::new("docs/guide.rst"), &config),
            PathBuf::from("out/guide.markdown")
        );
    }

    #[test]
    fn test_convert_str_stats() {
        let output = convert_str("Title\n=====\n\nBody.\n");
        assert_eq!(output.markdown, "# Title\n\nBody.\n");
        assert_eq!(output.stats.input_lines, 4);
        assert_eq!(output.stats.output_lines, 3);
        assert!(!output.stats.fence_closed);
    }

    #[test]
    fn test_convert_file_refuses_to_overwrite_input() {
        let config = ConversionConfig::builder()
            .output_extension("rst")
            .build()
            .unwrap();
        let err = tokio_test::block_on(convert_file("doc.rst", &config)).unwrap_err();
        assert!(matches!(err, Rst2MdError::InvalidConfig(_)), "got: {err}");
    }

    #[test]
    fn test_convert_to_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("guide.rst");
        std::fs::write(&input, "Guide\n-----\n").unwrap();
        let target = dir.path().join("nested").join("out.txt");

        let done = tokio_test::block_on(convert_to_file(
            &input,
            &target,
            &ConversionConfig::default(),
        ))
        .unwrap();
        assert_eq!(done.output, target);
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "## Guide\n");
        assert!(!dir.path().join("nested").join("out.txt.tmp").exists());
    }
}
