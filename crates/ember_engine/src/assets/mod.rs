//! Asset collaborator contracts
//!
//! Decoding and import pipelines live outside the engine core; the core only
//! needs raw bytes and an extension sniff to route them. [`DiskFileReader`]
//! is the default filesystem-backed implementation.

use std::path::Path;

use thiserror::Error;

/// Errors raised by asset access
#[derive(Error, Debug)]
pub enum AssetError {
    /// Underlying I/O failure
    #[error("asset I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The asset does not exist
    #[error("asset not found: {0}")]
    NotFound(String),

    /// The asset's format is not handled by any registered loader
    #[error("unsupported asset format: {0}")]
    UnsupportedFormat(String),
}

/// Read-whole-file collaborator used to originate asset data
pub trait FileReader {
    /// Read a file's entire contents
    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>, AssetError>;
}

/// Filesystem-backed [`FileReader`]
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskFileReader;

impl FileReader for DiskFileReader {
    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>, AssetError> {
        std::fs::read(path).map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => AssetError::NotFound(path.display().to_string()),
            _ => AssetError::Io(err),
        })
    }
}

/// Sniff a path's extension, lower-cased
pub fn sniff_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|extension| extension.to_str())
        .map(str::to_lowercase)
}
