//! Error types for catalog operations

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Failure of a single catalog operation.
///
/// Every variant is recoverable: the operation is aborted and the caller is
/// told why. A missing storage root during listing is not an error at all.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Unsupported file type '{extension}'. Accepted types: {accepted}")]
    UnsupportedType { extension: String, accepted: String },

    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid file name: '{0}'")]
    InvalidName(String),

    #[error("{}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CatalogError {
    /// Wrap an I/O failure on `path`, keeping a missing file distinct
    pub fn from_io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            CatalogError::NotFound(path.to_path_buf())
        } else {
            CatalogError::Filesystem {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    /// Wrap an I/O failure on `path` without reclassifying it
    pub fn filesystem(path: &Path, source: io::Error) -> Self {
        CatalogError::Filesystem {
            path: path.to_path_buf(),
            source,
        }
    }
}
