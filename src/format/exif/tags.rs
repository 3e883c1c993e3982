//! EXIF field types and structural tags.
//!
//! This module defines the low-level vocabulary of the TIFF-style directory
//! structure embedded in EXIF data:
//! - Field types that determine how entry values are encoded
//! - The handful of tags the decoder itself must understand (directory
//!   pointers, thumbnail location, compression)
//!
//! Display names and interpretation rules for all other tags live in the
//! tag dictionary.

// =============================================================================
// Field Types
// =============================================================================

/// Field types that determine how entry values are encoded.
///
/// Each field type has a fixed element size, which decides whether a value
/// fits inline in the 4-byte value field of a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum FieldType {
    /// Unsigned 8-bit integer
    Byte = 1,

    /// 8-bit ASCII character, NUL terminated
    Ascii = 2,

    /// Unsigned 16-bit integer
    Short = 3,

    /// Unsigned 32-bit integer
    Long = 4,

    /// Two Longs: numerator, denominator
    Rational = 5,

    /// Signed 8-bit integer
    SByte = 6,

    /// Opaque byte
    Undefined = 7,

    /// Signed 16-bit integer
    SShort = 8,

    /// Signed 32-bit integer
    SLong = 9,

    /// Two SLongs: numerator, denominator
    SRational = 10,

    /// IEEE single precision float
    Float = 11,

    /// IEEE double precision float
    Double = 12,
}

impl FieldType {
    /// Maximum bytes stored inline in a directory entry.
    pub const INLINE_THRESHOLD: usize = 4;

    /// Size of a single value of this type in bytes.
    #[inline]
    pub const fn size_in_bytes(self) -> usize {
        match self {
            FieldType::Byte | FieldType::Ascii | FieldType::SByte | FieldType::Undefined => 1,
            FieldType::Short | FieldType::SShort => 2,
            FieldType::Long | FieldType::SLong | FieldType::Float => 4,
            FieldType::Rational | FieldType::SRational | FieldType::Double => 8,
        }
    }

    /// Create a FieldType from its numeric code.
    ///
    /// Returns `None` for unknown codes; such entries are kept as unsupported
    /// rather than failing the directory.
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            1 => Some(FieldType::Byte),
            2 => Some(FieldType::Ascii),
            3 => Some(FieldType::Short),
            4 => Some(FieldType::Long),
            5 => Some(FieldType::Rational),
            6 => Some(FieldType::SByte),
            7 => Some(FieldType::Undefined),
            8 => Some(FieldType::SShort),
            9 => Some(FieldType::SLong),
            10 => Some(FieldType::SRational),
            11 => Some(FieldType::Float),
            12 => Some(FieldType::Double),
            _ => None,
        }
    }

    /// Total encoded size of `count` values, or `None` on overflow.
    #[inline]
    pub fn total_size(self, count: u32) -> Option<usize> {
        (self.size_in_bytes() as u64)
            .checked_mul(count as u64)
            .and_then(|size| usize::try_from(size).ok())
    }

    /// Check if `count` values of this type fit in the inline value field.
    #[inline]
    pub fn fits_inline(self, count: u32) -> bool {
        self.size_in_bytes() as u64 * count as u64 <= Self::INLINE_THRESHOLD as u64
    }
}

// =============================================================================
// Structural Tags
// =============================================================================

/// Tags the decoder and thumbnail locator act on directly.
///
/// Every other tag is only looked up in the dictionary for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ExifTag {
    /// Compression scheme of the image described by the directory
    Compression = 0x0103,

    /// Offset of an embedded JPEG stream (thumbnail)
    JpegInterchangeFormat = 0x0201,

    /// Length of the embedded JPEG stream
    JpegInterchangeFormatLength = 0x0202,

    /// Pointer to the Exif sub-directory
    ExifIfdPointer = 0x8769,

    /// Pointer to the GPS sub-directory
    GpsIfdPointer = 0x8825,

    /// Pointer to the Interoperability sub-directory
    InteropIfdPointer = 0xA005,
}

impl ExifTag {
    /// Create an ExifTag from its numeric value.
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            0x0103 => Some(ExifTag::Compression),
            0x0201 => Some(ExifTag::JpegInterchangeFormat),
            0x0202 => Some(ExifTag::JpegInterchangeFormatLength),
            0x8769 => Some(ExifTag::ExifIfdPointer),
            0x8825 => Some(ExifTag::GpsIfdPointer),
            0xA005 => Some(ExifTag::InteropIfdPointer),
            _ => None,
        }
    }

    /// Get the numeric tag ID.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Whether this tag links to a nested directory.
    #[inline]
    pub const fn is_directory_pointer(self) -> bool {
        matches!(
            self,
            ExifTag::ExifIfdPointer | ExifTag::GpsIfdPointer | ExifTag::InteropIfdPointer
        )
    }
}

// =============================================================================
// Compression Values
// =============================================================================

/// Compression scheme identifiers found in image directories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum Compression {
    /// No compression
    None = 1,

    /// "Old-style" JPEG, which EXIF uses to mark JPEG thumbnails
    OldJpeg = 6,

    /// JPEG compression
    Jpeg = 7,
}

impl Compression {
    /// Create a Compression from its numeric value.
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            1 => Some(Compression::None),
            6 => Some(Compression::OldJpeg),
            7 => Some(Compression::Jpeg),
            _ => None,
        }
    }

    /// Whether the image is stored as an embedded JPEG stream located by
    /// the interchange-format offset and length tags.
    #[inline]
    pub const fn is_embedded_jpeg(self) -> bool {
        matches!(self, Compression::OldJpeg | Compression::Jpeg)
    }
}

// =============================================================================
// Tests
// =============================================================================
