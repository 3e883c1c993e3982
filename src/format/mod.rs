//! Format parsers for JPEG files and their embedded metadata.
//!
//! - [`jpeg`] walks the marker segments of a JPEG stream and locates the
//!   EXIF-bearing APP1 segment.
//! - [`exif`] decodes the EXIF payload: directories, typed values, display
//!   formatting and the embedded thumbnail.

pub mod exif;
pub mod jpeg;

pub use jpeg::{find_exif_segment, summarize, JpegSummary, Segment, Segments};
