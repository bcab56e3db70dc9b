//! Page Files
//!
//! A page file stands in for a rendered profile page: a JSON array with the
//! attributes bound to each button, in render order.
//!
//! ```json
//! [
//!   { "id": "follow-dave", "status": "follow",
//!     "uuid": "2f1b6c3e-8d0b-4a44-a3a3-1c2b9f0e7d55", "islocal": "true",
//!     "username": "dave" }
//! ]
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;

use socknet_conductor::ButtonAttributes;

/// Errors reading a page file
#[derive(Debug, Error)]
pub enum PageError {
    /// The file could not be read
    #[error("Failed to read page file {path}: {source}")]
    Read {
        /// File that was attempted
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// The file is not a JSON array of button attributes
    #[error("Failed to parse page file {path}: {source}")]
    Parse {
        /// File that was parsed
        path: PathBuf,
        /// Underlying JSON error
        source: serde_json::Error,
    },
}

/// Read the buttons of a page file
///
/// # Errors
///
/// Returns [`PageError`] when the file is unreadable or malformed. Buttons
/// with bad values still load here; the controller rejects them.
pub fn load_page_file(path: &Path) -> Result<Vec<ButtonAttributes>, PageError> {
    let content = std::fs::read_to_string(path).map_err(|source| PageError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| PageError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
