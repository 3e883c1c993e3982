//! Embedded thumbnail location.
//!
//! The second directory of the main chain describes the thumbnail. When its
//! compression marks it as JPEG, the interchange-format offset and length
//! tags give the byte range of a complete JPEG stream inside the EXIF payload.

use bytes::Bytes;
use tracing::debug;

use crate::io::RawFile;

use super::parser::ExifData;
use super::tags::{Compression, ExifTag};

/// Location of an embedded thumbnail, relative to the EXIF payload start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailDescriptor {
    pub offset: usize,
    pub length: usize,
}

impl ThumbnailDescriptor {
    /// Absolute byte range in the file, given where the payload starts.
    pub fn file_range(&self, payload_start: usize) -> Option<(usize, usize)> {
        let start = payload_start.checked_add(self.offset)?;
        Some((start, self.length))
    }
}

/// Locate the thumbnail described by the secondary directory.
///
/// Returns `None` when there is no secondary directory, when it is not JPEG
/// compressed, when either location tag is missing, or when the described
/// range does not lie entirely inside `payload_len` bytes.
pub fn locate_thumbnail(exif: &ExifData, payload_len: usize) -> Option<ThumbnailDescriptor> {
    let directory = exif.secondary()?;

    let compression = directory.find_u32(ExifTag::Compression)?;
    let is_jpeg = u16::try_from(compression)
        .ok()
        .and_then(Compression::from_u16)
        .is_some_and(Compression::is_embedded_jpeg);
    if !is_jpeg {
        debug!(compression, "Secondary directory is not a JPEG thumbnail");
        return None;
    }

    let offset = directory.find_u32(ExifTag::JpegInterchangeFormat)? as usize;
    let length = directory.find_u32(ExifTag::JpegInterchangeFormatLength)? as usize;

    match offset.checked_add(length) {
        Some(end) if length > 0 && end <= payload_len => Some(ThumbnailDescriptor { offset, length }),
        _ => {
            debug!(offset, length, payload_len, "Thumbnail range out of bounds");
            None
        }
    }
}

/// Copy out the thumbnail bytes from `file`, whose EXIF payload begins at
/// `payload_start`.
pub fn read_thumbnail(
    file: &RawFile,
    payload_start: usize,
    descriptor: ThumbnailDescriptor,
) -> Option<Bytes> {
    let (start, length) = descriptor.file_range(payload_start)?;
    file.slice(start, length)
}

// =============================================================================
// Tests
// =============================================================================
