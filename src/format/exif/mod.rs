//! EXIF metadata decoding.
//!
//! The EXIF payload carried by a JPEG APP1 segment is a miniature TIFF file:
//! a header naming the byte order, followed by a chain of directories.
//!
//! # Key Concepts
//!
//! - **Byte order**: declared once in the header ("II" or "MM") and applied to
//!   every multi-byte field of the payload.
//!
//! - **Main chain**: directory 0 describes the primary image, directory 1 (if
//!   present) the embedded thumbnail.
//!
//! - **Nested directories**: pointer tags in an image directory lead to the
//!   Exif and GPS sub-directories; the Exif sub-directory may point to an
//!   Interoperability directory.
//!
//! - **Inline vs offset values**: values of at most 4 bytes are stored in the
//!   entry itself, larger ones at an offset from the payload start.

mod dictionary;
mod display;
mod parser;
mod tags;
mod thumbnail;
mod values;

pub use dictionary::{enumerated_label, Rule, TagDictionary, TagInfo, TagSpace};
pub use display::{
    display_name, format_directory_entry, format_entry, format_plain, format_value,
    gps_coordinate, VALUE_SEPARATOR,
};
pub use parser::{
    ByteOrder, Directory, DirectoryEntry, DirectoryKind, ExifData, ExifHeader, EXIF_HEADER_SIZE,
    IFD_ENTRY_SIZE,
};
pub use tags::{Compression, ExifTag, FieldType};
pub use thumbnail::{locate_thumbnail, read_thumbnail, ThumbnailDescriptor};
pub use values::{Rational, SRational, Value};
