//! Input: read an RST source file into memory.
//!
//! The whole document is loaded as one `String`; every later stage works on
//! text. I/O failures are mapped onto the [`Rst2MdError`] variant that tells
//! the user what to fix (missing file, missing permission, not UTF-8).

use crate::error::Rst2MdError;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, warn};

/// Extensions conventionally used for reStructuredText sources.
const RST_EXTENSIONS: [&str; 3] = ["rst", "rest", "txt"];

/// Read `path` as UTF-8 text, dropping a leading byte-order mark.
pub async fn read_source(path: &Path) -> Result<String, Rst2MdError> {
    if !has_rst_extension(path) {
        warn!(path = %path.display(), "input does not have an .rst extension; converting anyway");
    }

    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => Rst2MdError::FileNotFound {
                path: path.to_path_buf(),
            },
            ErrorKind::PermissionDenied => Rst2MdError::PermissionDenied {
                path: path.to_path_buf(),
            },
            _ => Rst2MdError::ReadFailed {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

    debug!(path = %path.display(), bytes = text.len(), "read source");
    Ok(strip_bom(text))
}

/// True for `.rst`, `.rest` and `.txt` paths (case-insensitive).
pub fn has_rst_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| RST_EXTENSIONS.iter().any(|r| e.eq_ignore_ascii_case(r)))
}

fn strip_bom(text: String) -> String {
    match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    }
}
