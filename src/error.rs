use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the extraction facade.
///
/// Only failure to access the underlying file is reported. Anything wrong with
/// the file's contents degrades the result instead of failing the call.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The file could not be opened or read
    #[error("Failed to read jpeg file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExtractError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ExtractError::Io {
            path: path.into(),
            source,
        }
    }

    /// The I/O error kind behind this failure.
    pub fn kind(&self) -> std::io::ErrorKind {
        match self {
            ExtractError::Io { source, .. } => source.kind(),
        }
    }
}

/// Errors in the fixed-format EXIF header.
///
/// These never reach callers of the facade; they are logged and treated as
/// "no metadata".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExifError {
    /// Payload is too small to contain the TIFF-style header
    #[error("EXIF payload too small: need at least {required} bytes, got {actual}")]
    FileTooSmall { required: usize, actual: usize },

    /// Byte order marker is neither "II" nor "MM"
    #[error("Invalid byte order marker: expected 0x4949 (II) or 0x4D4D (MM), got 0x{0:04X}")]
    InvalidByteOrder(u16),

    /// Constant validation field is not 42
    #[error("Invalid header magic: expected 42, got {0}")]
    InvalidMagic(u16),

    /// First directory offset points outside the payload
    #[error("Invalid IFD offset: {0}")]
    InvalidIfdOffset(u32),
}
