//! # rst-analyzer
//!
//! Inventory the reStructuredText constructs a document uses: which
//! directives and how often, which interpreted-text roles, which
//! admonitions, how many raw HTML blocks, the section outline, and any
//! element kinds beyond ordinary prose.
//!
//! The analyzer reads the source independently of any converter and keeps
//! no state between calls: every count lives in an accumulator created for
//! one document and folded into the returned [`Report`].
//!
//! ```rust
//! let report = rst_analyzer::analyze("Title\n=====\n\n.. note::\n\n   Hi.\n");
//! assert_eq!(report.summary.total_sections, 1);
//! assert_eq!(report.admonitions.get("note"), Some(&1));
//! ```

mod report;
mod scan;

pub use report::{Report, Section, Summary};

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors returned by [`analyze_file`].
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// The file could not be read as UTF-8 text.
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Analyze RST source text.
pub fn analyze(text: &str) -> Report {
    let mut tally = scan::Tally::default();
    scan::scan(text, &mut tally);
    tally.into_report()
}

/// Read and analyze an RST file.
pub fn analyze_file(path: impl AsRef<Path>) -> Result<Report, AnalyzeError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| AnalyzeError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(analyze(&text))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Integrations
============

Intro with `a link <http://x>`_, :ref:`setup` and `Title Ref`.

Setup
-----

.. note::

   Remember this.

.. raw:: html

   <pre>x</pre>

Details
~~~~~~~

.. image:: a.png
   :width: 50%

Example::

    .. warning:: not counted

Other
-----

.. warning::

   Careful.
";

    #[test]
    fn sample_summary() {
        let r = analyze(SAMPLE);
        assert_eq!(
            r.summary,
            Summary {
                total_directives: 4,
                unique_directives: 4,
                total_raw_html: 1,
                total_admonitions: 2,
                total_sections: 4,
            }
        );
    }

    #[test]
    fn sample_tables() {
        let r = analyze(SAMPLE);
        assert_eq!(r.directives.get("warning"), Some(&1));
        assert_eq!(r.admonitions.get("note"), Some(&1));
        assert_eq!(r.roles.get("ref"), Some(&1));
        assert_eq!(r.roles.get("title_reference"), Some(&1));
        let outline: Vec<_> = r.sections.iter().map(|s| (s.title.as_str(), s.level)).collect();
        assert_eq!(
            outline,
            vec![("Integrations", 1), ("Setup", 2), ("Details", 3), ("Other", 2)]
        );
        assert_eq!(
            r.custom_elements,
            vec!["note", "raw", "image", "literal_block", "warning"]
        );
    }

    #[test]
    fn report_json_shape() {
        let json: serde_json::Value =
            serde_json::from_str(&analyze(SAMPLE).to_json().unwrap()).unwrap();
        assert_eq!(json["summary"]["total_raw_html"], 1);
        assert_eq!(json["sections"][0]["title"], "Integrations");
        assert!(json["custom_elements"].is_array());
    }

    #[test]
    fn empty_document() {
        assert_eq!(analyze(""), Report::default());
    }

    #[test]
    fn analyze_file_missing() {
        let err = analyze_file("/nonexistent/missing.rst").unwrap_err();
        assert!(err.to_string().contains("missing.rst"));
    }

    #[test]
    fn analyze_file_reads_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.rst");
        std::fs::write(&path, SAMPLE).unwrap();
        assert_eq!(analyze_file(&path).unwrap(), analyze(SAMPLE));
    }
}
