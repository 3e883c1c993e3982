//! # exify
//!
//! A read-only extractor for EXIF metadata and embedded thumbnails in JPEG
//! files.
//!
//! The decoder is written for untrusted input: every offset is bounds-checked,
//! directory chains are cycle-safe, and anything malformed degrades the result
//! (fewer tags, no thumbnail) instead of failing the call. Only failure to read
//! the file itself is reported as an error.
//!
//! ## Features
//!
//! - **Segment scanning**: Locates the EXIF APP1 segment without decoding image data
//! - **Directory decoding**: Both byte orders, chained and nested directories (Exif, GPS, Interoperability)
//! - **Display formatting**: Human-readable values for well-known tags (orientation, f-number, GPS position, ...)
//! - **Thumbnails**: Returns the embedded JPEG preview byte-for-byte
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`io`] - Whole-file buffer and endian helpers
//! - [`mod@format`] - JPEG segment scanner and EXIF decoder
//! - [`extract`] - Facade tying the stages together
//! - [`config`] - CLI configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use exify::{extract_metadata, extract_thumbnail};
//!
//! fn main() -> Result<(), exify::ExtractError> {
//!     let info = extract_metadata("photo.jpg")?;
//!     for (name, value) in info.iter() {
//!         println!("{name}: {value}");
//!     }
//!
//!     if let Some(thumbnail) = extract_thumbnail("photo.jpg")? {
//!         std::fs::write("thumb.jpg", &thumbnail).ok();
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod format;
pub mod io;

// Re-export commonly used types
pub use config::{Cli, Command, InfoConfig, OutputFormat, ThumbnailConfig};
pub use error::{ExifError, ExtractError};
pub use extract::{
    describe_jpeg, extract_metadata, extract_thumbnail, get_image_info, get_thumbnail,
    image_info_from, thumbnail_from, ImageInfo,
};
pub use format::exif::{
    ByteOrder, Directory, DirectoryEntry, DirectoryKind, ExifData, ExifHeader, TagDictionary,
    TagInfo, TagSpace, ThumbnailDescriptor, Value,
};
pub use format::jpeg::{find_exif_segment, summarize, JpegSummary, Segment, Segments};
pub use io::RawFile;
