//! Batch conversion API: convert many files, emitting results as they finish.
//!
//! Documents share no state, so independent files are converted
//! concurrently, up to [`ConversionConfig::concurrency`] at a time. Results
//! arrive in completion order, not input order; each carries its input path.
//! One failing file does not stop the others.

use crate::config::ConversionConfig;
use crate::convert::convert_file;
use crate::error::Rst2MdError;
use crate::output::FileConversion;
use futures::stream::{self, StreamExt};
use std::path::PathBuf;
use std::pin::Pin;
use tokio_stream::Stream;
use tracing::{info, warn};

/// A boxed stream of per-file results.
pub type FileStream = Pin<Box<dyn Stream<Item = Result<FileConversion, Rst2MdError>> + Send>>;

/// Convert every input file, streaming results as they complete.
///
/// # Example
/// ```rust,no_run
/// use futures::StreamExt;
/// use rst2md::{convert_stream, ConversionConfig};
///
/// # #[tokio::main]
/// # async fn main() {
/// let config = ConversionConfig::default();
/// let mut results = convert_stream(["a.rst", "b.rst"], &config);
/// while let Some(result) = results.next().await {
///     match result {
///         Ok(done) => println!("Converted {} to {}", done.input.display(), done.output.display()),
///         Err(e) => eprintln!("Error: {e}"),
///     }
/// }
/// # }
/// ```
pub fn convert_stream<I, P>(inputs: I, config: &ConversionConfig) -> FileStream
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    let inputs: Vec<PathBuf> = inputs.into_iter().map(Into::into).collect();
    info!(
        "Starting batch conversion: {} files, concurrency {}",
        inputs.len(),
        config.concurrency
    );

    let concurrency = config.concurrency.max(1);
    let config = config.clone();
    let s = stream::iter(inputs.into_iter().map(move |path| {
        let cfg = config.clone();
        async move {
            let result = convert_file(&path, &cfg).await;
            if let Err(ref e) = result {
                warn!("Failed to convert {}: {}", path.display(), e);
            }
            result
        }
    }))
    .buffer_unordered(concurrency);

    Box::pin(s)
}

/// Convert every input file and collect the results (completion order).
pub async fn convert_batch<I, P>(
    inputs: I,
    config: &ConversionConfig,
) -> Vec<Result<FileConversion, Rst2MdError>>
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    convert_stream(inputs, config).collect().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_batch_reports_each_file() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.rst");
        std::fs::write(&good, "Title\n=====\n").unwrap();
        let missing = dir.path().join("missing.rst");

        let config = ConversionConfig::builder().concurrency(2).build().unwrap();
        let results = convert_batch([good.clone(), missing], &config).await;

        assert_eq!(results.len(), 2);
        let ok: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
        assert_eq!(ok.len(), 1);
        assert_eq!(ok[0].input, good);
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(Rst2MdError::FileNotFound { .. }))));
        assert_eq!(
            std::fs::read_to_string(dir.path().join("good.md")).unwrap(),
            "# Title\n"
        );
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let results = convert_batch(Vec::<PathBuf>::new(), &ConversionConfig::default()).await;
        assert!(results.is_empty());
    }
}
