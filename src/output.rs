//! Output types returned by the conversion entry points.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Markdown produced from one document, with statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// The converted document, ending with a single newline.
    pub markdown: String,
    pub stats: ConversionStats,
}

/// Size and timing figures for one conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionStats {
    pub input_lines: usize,
    pub output_lines: usize,
    pub input_bytes: usize,
    pub output_bytes: usize,
    /// True when the repair pass had to close an unbalanced code fence.
    pub fence_closed: bool,
    /// Wall-clock time spent in the pipeline.
    pub duration_ms: u64,
}

/// Result of converting one file on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileConversion {
    pub input: PathBuf,
    /// Where the Markdown was written.
    pub output: PathBuf,
    pub stats: ConversionStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_serialise_to_json() {
        let stats = ConversionStats {
            input_lines: 3,
            output_lines: 2,
            fence_closed: true,
            ..ConversionStats::default()
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["input_lines"], 3);
        assert_eq!(json["fence_closed"], true);
    }
}
