//! Extraction facade.
//!
//! Ties the stages together for one input file:
//!
//! ```text
//! ┌──────────┐    ┌────────────────┐    ┌───────────────┐    ┌────────────┐
//! │ RawFile  │ -> │ Segment scan   │ -> │ ExifData      │ -> │ ImageInfo  │
//! │ (read)   │    │ (APP1 "Exif")  │    │ (directories) │    │ (display)  │
//! └──────────┘    └────────────────┘    └───────────────┘    └────────────┘
//!                                               │
//!                                               ▼
//!                                        ┌───────────────┐
//!                                        │ Thumbnail     │
//!                                        └───────────────┘
//! ```
//!
//! Each call reads the file, decodes, and returns. Nothing is cached between
//! calls; the only shared state is the read-only tag dictionary. Only failure
//! to read the file is an error. Malformed content yields fewer tags or no
//! thumbnail.

use std::path::Path;

use bytes::Bytes;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, trace};

use crate::error::ExtractError;
use crate::format::exif::{
    format_directory_entry, locate_thumbnail, read_thumbnail, Directory, ExifData, ExifTag,
    TagDictionary, TagSpace,
};
use crate::format::jpeg::{exif_tiff_range, find_exif_segment, summarize, JpegSummary};
use crate::io::RawFile;

// =============================================================================
// ImageInfo
// =============================================================================

/// Ordered mapping from tag display name to display value.
///
/// Entries keep the order in which they were first seen. Inserting a name
/// that is already present replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ImageInfo {
    entries: IndexMap<String, String>,
}

impl ImageInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite an entry, returning the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consume into the underlying ordered map.
    pub fn into_inner(self) -> IndexMap<String, String> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a ImageInfo {
    type Item = (&'a String, &'a String);
    type IntoIter = indexmap::map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// =============================================================================
// File-level Operations
// =============================================================================

fn open(path: &Path) -> Result<RawFile, ExtractError> {
    RawFile::open(path).map_err(|source| ExtractError::io(path, source))
}

/// Read the file at `path` and return its metadata table.
///
/// Returns an empty table when the file carries no usable EXIF segment.
///
/// # Errors
/// `ExtractError::Io` if the file cannot be opened or read.
pub fn extract_metadata(path: impl AsRef<Path>) -> Result<ImageInfo, ExtractError> {
    let path = path.as_ref();
    let file = open(path)?;
    let info = image_info_from(&file);
    trace!(path = %path.display(), tags = info.len(), "Extracted metadata");
    Ok(info)
}

/// Read the file at `path` and return its embedded thumbnail, if any.
///
/// # Errors
/// `ExtractError::Io` if the file cannot be opened or read.
pub fn extract_thumbnail(path: impl AsRef<Path>) -> Result<Option<Bytes>, ExtractError> {
    let path = path.as_ref();
    let file = open(path)?;
    let thumbnail = thumbnail_from(&file);
    trace!(
        path = %path.display(),
        bytes = thumbnail.as_ref().map_or(0, Bytes::len),
        "Extracted thumbnail"
    );
    Ok(thumbnail)
}

/// Read the file at `path` and summarize its main JPEG frame.
///
/// Returns `None` when the file is not a JPEG stream.
pub fn describe_jpeg(path: impl AsRef<Path>) -> Result<Option<JpegSummary>, ExtractError> {
    let file = open(path.as_ref())?;
    Ok(summarize(&file))
}

/// Metadata table for an image path.
pub fn get_image_info(file_path: &str) -> Result<ImageInfo, ExtractError> {
    extract_metadata(file_path)
}

/// Thumbnail bytes for an image path; empty when there is no thumbnail.
pub fn get_thumbnail(file_path: &str) -> Result<Vec<u8>, ExtractError> {
    Ok(extract_thumbnail(file_path)?
        .map(|bytes| bytes.to_vec())
        .unwrap_or_default())
}

// =============================================================================
// In-memory Operations
// =============================================================================

/// Decoded EXIF structure plus where its payload lies in the file.
struct DecodedExif {
    exif: ExifData,
    payload_start: usize,
    payload_len: usize,
}

fn decode_exif(file: &RawFile) -> Option<DecodedExif> {
    let segment = find_exif_segment(file)?;
    let (start, len) = exif_tiff_range(&segment);
    let payload = file.as_slice().get(start..start.checked_add(len)?)?;

    match ExifData::decode(payload) {
        Ok(exif) => Some(DecodedExif {
            exif,
            payload_start: start,
            payload_len: len,
        }),
        Err(err) => {
            debug!(error = %err, "EXIF header rejected, treating as no metadata");
            None
        }
    }
}

/// Metadata table for an in-memory file.
///
/// The primary directory's entries come first, followed by those of its
/// nested directories (Exif, Interoperability, GPS). The secondary directory
/// is consulted only when that yields nothing.
pub fn image_info_from(file: &RawFile) -> ImageInfo {
    let mut info = ImageInfo::new();
    let Some(DecodedExif { exif, .. }) = decode_exif(file) else {
        return info;
    };

    let dictionary = TagDictionary::global();
    if let Some(primary) = exif.primary() {
        fold_tree(&mut info, dictionary, &exif, primary);
    }
    if info.is_empty() {
        if let Some(secondary) = exif.secondary() {
            fold_tree(&mut info, dictionary, &exif, secondary);
        }
    }

    info
}

/// Fold `root` and every directory nested below it, depth first.
fn fold_tree(info: &mut ImageInfo, dictionary: &TagDictionary, exif: &ExifData, root: &Directory) {
    fold_directory(info, dictionary, exif, root);
    for nested in exif.nested(root) {
        fold_directory(info, dictionary, exif, nested);
    }
}

fn fold_directory(
    info: &mut ImageInfo,
    dictionary: &TagDictionary,
    exif: &ExifData,
    directory: &Directory,
) {
    let space = TagSpace::from(directory.kind);
    for entry in &directory.entries {
        let is_pointer = space == TagSpace::Image
            && ExifTag::from_u16(entry.tag).is_some_and(ExifTag::is_directory_pointer);
        if is_pointer {
            continue;
        }
        match format_directory_entry(dictionary, space, directory, entry, exif.byte_order) {
            Some((name, value)) => {
                info.insert(name, value);
            }
            None => debug!(tag = entry.tag, kind = ?directory.kind, "Skipping unreadable entry"),
        }
    }
}

/// Embedded thumbnail of an in-memory file.
pub fn thumbnail_from(file: &RawFile) -> Option<Bytes> {
    let decoded = decode_exif(file)?;
    let descriptor = locate_thumbnail(&decoded.exif, decoded.payload_len)?;
    read_thumbnail(file, decoded.payload_start, descriptor)
}

// =============================================================================
// Tests
// =============================================================================
