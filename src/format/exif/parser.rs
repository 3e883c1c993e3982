//! EXIF header and directory parsing.
//!
//! The payload of an EXIF segment (after the `Exif\0\0` signature) is a small
//! TIFF file. All offsets inside it are relative to the start of this payload.
//!
//! # Header Structure (8 bytes)
//! ```text
//! Bytes 0-1: Byte order (0x4949 = little-endian "II", 0x4D4D = big-endian "MM")
//! Bytes 2-3: Magic (42 = 0x002A)
//! Bytes 4-7: Offset to first directory
//! ```
//!
//! # Directory Structure
//! ```text
//! 2 bytes      entry count N
//! N * 12 bytes entries: tag (2), type (2), count (4), value or offset (4)
//! 4 bytes      offset to next directory (0 = end of chain)
//! ```
//!
//! Decoded directories are stored in an arena and linked by index. Every
//! directory offset is decoded at most once, which keeps both the main chain
//! and nested pointer tags cycle-free.

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::error::ExifError;
use crate::io::{read_u16_be, read_u16_le, read_u32_be, read_u32_le, read_u64_be, read_u64_le};

use super::tags::{ExifTag, FieldType};
use super::values::Value;

// =============================================================================
// Constants
// =============================================================================

/// Magic bytes indicating little-endian byte order ("II" for Intel)
const BYTE_ORDER_LITTLE_ENDIAN: u16 = 0x4949;

/// Magic bytes indicating big-endian byte order ("MM" for Motorola)
const BYTE_ORDER_BIG_ENDIAN: u16 = 0x4D4D;

/// Constant validation field following the byte order marker
const HEADER_MAGIC: u16 = 42;

/// Size of the header in bytes
pub const EXIF_HEADER_SIZE: usize = 8;

/// Size of one directory entry in bytes
pub const IFD_ENTRY_SIZE: usize = 12;

/// Out-of-line value bytes decoded per payload, as a multiple of its length.
///
/// Entries may share value bytes; once the budget is spent, further
/// out-of-line values are left unread.
const VALUE_BUDGET_FACTOR: usize = 4;

// =============================================================================
// ByteOrder
// =============================================================================

/// Byte order (endianness) of an EXIF payload.
///
/// Established once from the header and used for every multi-byte read in
/// the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Little-endian ("II" = Intel)
    LittleEndian,
    /// Big-endian ("MM" = Motorola)
    BigEndian,
}

impl ByteOrder {
    /// Read a u16 from a byte slice using this byte order.
    #[inline]
    pub fn read_u16(self, bytes: &[u8]) -> u16 {
        match self {
            ByteOrder::LittleEndian => read_u16_le(bytes),
            ByteOrder::BigEndian => read_u16_be(bytes),
        }
    }

    /// Read a u32 from a byte slice using this byte order.
    #[inline]
    pub fn read_u32(self, bytes: &[u8]) -> u32 {
        match self {
            ByteOrder::LittleEndian => read_u32_le(bytes),
            ByteOrder::BigEndian => read_u32_be(bytes),
        }
    }

    /// Read a u64 from a byte slice using this byte order.
    #[inline]
    pub fn read_u64(self, bytes: &[u8]) -> u64 {
        match self {
            ByteOrder::LittleEndian => read_u64_le(bytes),
            ByteOrder::BigEndian => read_u64_be(bytes),
        }
    }
}

// =============================================================================
// ExifHeader
// =============================================================================

/// Parsed fixed-format header of an EXIF payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExifHeader {
    /// Byte order for all multi-byte values in the payload
    pub byte_order: ByteOrder,

    /// Offset to the first (primary) directory
    pub first_ifd_offset: u32,
}

impl ExifHeader {
    /// Parse and validate the header at the start of `bytes`.
    ///
    /// # Errors
    /// - `FileTooSmall` if there are fewer than 8 bytes
    /// - `InvalidByteOrder` if the byte order bytes are not II or MM
    /// - `InvalidMagic` if the validation field is not 42
    /// - `InvalidIfdOffset` if the first directory offset is outside the payload
    pub fn parse(bytes: &[u8]) -> Result<Self, ExifError> {
        if bytes.len() < EXIF_HEADER_SIZE {
            return Err(ExifError::FileTooSmall {
                required: EXIF_HEADER_SIZE,
                actual: bytes.len(),
            });
        }

        // Compared against fixed byte patterns, so the read order is irrelevant
        let marker = u16::from_le_bytes([bytes[0], bytes[1]]);
        let byte_order = match marker {
            BYTE_ORDER_LITTLE_ENDIAN => ByteOrder::LittleEndian,
            BYTE_ORDER_BIG_ENDIAN => ByteOrder::BigEndian,
            _ => return Err(ExifError::InvalidByteOrder(marker)),
        };

        let magic = byte_order.read_u16(&bytes[2..4]);
        if magic != HEADER_MAGIC {
            return Err(ExifError::InvalidMagic(magic));
        }

        let first_ifd_offset = byte_order.read_u32(&bytes[4..8]);
        if first_ifd_offset as usize >= bytes.len() {
            return Err(ExifError::InvalidIfdOffset(first_ifd_offset));
        }

        Ok(ExifHeader {
            byte_order,
            first_ifd_offset,
        })
    }
}

// =============================================================================
// Directory Entries
// =============================================================================

/// One typed entry of a directory, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryEntry {
    /// Tag identifier
    pub tag: u16,

    /// Raw field type code as stored in the file
    pub type_code: u16,

    /// Number of values of the field type
    pub count: u32,

    /// Decoded value; `None` when the value bytes lie outside the payload
    pub value: Option<Value>,
}

impl DirectoryEntry {
    /// Parsed field type, `None` for unknown type codes.
    #[inline]
    pub fn field_type(&self) -> Option<FieldType> {
        FieldType::from_u16(self.type_code)
    }

    /// First value as an unsigned integer, if readable and integral.
    #[inline]
    pub fn first_u32(&self) -> Option<u32> {
        self.value.as_ref().and_then(Value::first_u32)
    }
}

// =============================================================================
// Directories
// =============================================================================

/// Role of a directory within the EXIF structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryKind {
    /// Position `n` in the main chain: 0 = primary image, 1 = thumbnail
    Image(usize),
    /// Exif sub-directory (camera settings)
    Exif,
    /// GPS sub-directory
    Gps,
    /// Interoperability sub-directory
    Interop,
}

/// A decoded directory.
#[derive(Debug, Clone, PartialEq)]
pub struct Directory {
    /// Offset of the directory within the payload
    pub offset: u32,

    /// Role of this directory
    pub kind: DirectoryKind,

    /// Entries in file order
    pub entries: Vec<DirectoryEntry>,

    /// Arena index of the next directory in the main chain
    pub next: Option<usize>,

    /// Arena indices of nested directories reached via pointer tags
    pub children: Vec<usize>,

    /// Whether the entry table was cut short by the end of the payload
    pub truncated: bool,
}

impl Directory {
    /// Last entry carrying `tag`, matching last-write-wins on duplicates.
    pub fn find(&self, tag: u16) -> Option<&DirectoryEntry> {
        self.entries.iter().rev().find(|entry| entry.tag == tag)
    }

    /// First value of `tag` as an unsigned integer.
    pub fn find_u32(&self, tag: ExifTag) -> Option<u32> {
        self.find(tag.as_u16()).and_then(DirectoryEntry::first_u32)
    }
}

// =============================================================================
// ExifData
// =============================================================================

/// All directories decoded from one EXIF payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ExifData {
    /// Byte order of the payload
    pub byte_order: ByteOrder,

    directories: Vec<Directory>,
    chain: Vec<usize>,
}

impl ExifData {
    /// Decode the header and every reachable directory of an EXIF payload.
    ///
    /// Only a bad header is an error. Out-of-bounds or repeated directory
    /// offsets end the chain early and out-of-bounds values leave their entry
    /// unreadable; whatever was decoded up to that point is returned.
    pub fn decode(payload: &[u8]) -> Result<Self, ExifError> {
        let header = ExifHeader::parse(payload)?;
        let mut decoder = Decoder {
            data: payload,
            byte_order: header.byte_order,
            visited: HashSet::new(),
            directories: Vec::new(),
            value_budget: payload.len().saturating_mul(VALUE_BUDGET_FACTOR),
        };
        let chain = decoder.decode_chain(header.first_ifd_offset);

        trace!(
            directories = decoder.directories.len(),
            chain = chain.len(),
            "Decoded EXIF directories"
        );

        Ok(ExifData {
            byte_order: header.byte_order,
            directories: decoder.directories,
            chain,
        })
    }

    /// All decoded directories, in decode order.
    pub fn directories(&self) -> &[Directory] {
        &self.directories
    }

    /// Directory by arena index.
    pub fn directory(&self, index: usize) -> Option<&Directory> {
        self.directories.get(index)
    }

    /// Directories of the main chain, in chain order.
    pub fn image_directories(&self) -> impl Iterator<Item = &Directory> + '_ {
        self.chain.iter().filter_map(|&index| self.directories.get(index))
    }

    /// First directory of the main chain.
    pub fn primary(&self) -> Option<&Directory> {
        self.image_directories().next()
    }

    /// Second directory of the main chain, conventionally the thumbnail.
    pub fn secondary(&self) -> Option<&Directory> {
        self.image_directories().nth(1)
    }

    /// Nested directories reached from `directory`, depth first.
    pub fn nested(&self, directory: &Directory) -> Vec<&Directory> {
        let mut out = Vec::new();
        for &child in &directory.children {
            if let Some(dir) = self.directories.get(child) {
                out.push(dir);
                out.extend(self.nested(dir));
            }
        }
        out
    }
}

// =============================================================================
// Decoder
// =============================================================================

struct Decoder<'a> {
    data: &'a [u8],
    byte_order: ByteOrder,
    visited: HashSet<u32>,
    directories: Vec<Directory>,
    value_budget: usize,
}

impl Decoder<'_> {
    fn decode_chain(&mut self, first: u32) -> Vec<usize> {
        let mut chain: Vec<usize> = Vec::new();
        let mut offset = first;

        while offset != 0 {
            let kind = DirectoryKind::Image(chain.len());
            let Some((index, next)) = self.decode_directory(offset, kind) else {
                break;
            };
            if let Some(&previous) = chain.last() {
                self.directories[previous].next = Some(index);
            }
            chain.push(index);
            match next {
                Some(next) => offset = next,
                None => break,
            }
        }

        chain
    }

    /// Decode one directory and its nested directories into the arena.
    ///
    /// Returns the arena index and the raw next-directory offset.
    fn decode_directory(
        &mut self,
        offset: u32,
        kind: DirectoryKind,
    ) -> Option<(usize, Option<u32>)> {
        if !self.visited.insert(offset) {
            debug!(offset, ?kind, "Directory already visited, stopping");
            return None;
        }

        let start = offset as usize;
        if start.checked_add(2).map_or(true, |end| end > self.data.len()) {
            debug!(offset, ?kind, "Directory offset out of bounds");
            return None;
        }

        let data = self.data;
        let count = self.byte_order.read_u16(&data[start..]) as usize;
        let mut entries = Vec::with_capacity(count.min(self.data.len() / IFD_ENTRY_SIZE));
        let mut truncated = false;

        for i in 0..count {
            let pos = start + 2 + i * IFD_ENTRY_SIZE;
            if pos + IFD_ENTRY_SIZE > self.data.len() {
                debug!(offset, read = i, declared = count, "Directory entries truncated");
                truncated = true;
                break;
            }
            entries.push(self.decode_entry(&data[pos..pos + IFD_ENTRY_SIZE]));
        }

        let next_pos = start + 2 + count * IFD_ENTRY_SIZE;
        let next = if !truncated && next_pos + 4 <= self.data.len() {
            Some(self.byte_order.read_u32(&self.data[next_pos..])).filter(|&next| next != 0)
        } else {
            None
        };

        trace!(offset, ?kind, entries = entries.len(), ?next, "Decoded directory");

        let pointers: Vec<(DirectoryKind, u32)> = entries
            .iter()
            .filter_map(|entry| {
                let child_kind = nested_kind(kind, entry.tag)?;
                Some((child_kind, entry.first_u32()?))
            })
            .collect();

        let index = self.directories.len();
        self.directories.push(Directory {
            offset,
            kind,
            entries,
            next: None,
            children: Vec::new(),
            truncated,
        });

        let mut children = Vec::new();
        for (child_kind, child_offset) in pointers {
            if let Some((child, _)) = self.decode_directory(child_offset, child_kind) {
                children.push(child);
            }
        }
        self.directories[index].children = children;

        Some((index, next))
    }

    fn decode_entry(&mut self, raw: &[u8]) -> DirectoryEntry {
        let order = self.byte_order;
        let tag = order.read_u16(&raw[0..2]);
        let type_code = order.read_u16(&raw[2..4]);
        let count = order.read_u32(&raw[4..8]);
        let value_field = [raw[8], raw[9], raw[10], raw[11]];

        let value = match FieldType::from_u16(type_code) {
            None => Some(Value::Unsupported {
                type_code,
                raw: value_field,
            }),
            Some(field_type) => self.read_value(tag, field_type, count, &value_field),
        };

        DirectoryEntry {
            tag,
            type_code,
            count,
            value,
        }
    }

    fn read_value(
        &mut self,
        tag: u16,
        field_type: FieldType,
        count: u32,
        value_field: &[u8; 4],
    ) -> Option<Value> {
        let size = field_type.total_size(count)?;

        if field_type.fits_inline(count) {
            return Some(Value::decode(field_type, &value_field[..size], self.byte_order));
        }

        let offset = self.byte_order.read_u32(value_field) as usize;
        match offset.checked_add(size) {
            Some(end) if end <= self.data.len() => {
                if size > self.value_budget {
                    debug!(tag, offset, size, "Value budget exhausted, skipping entry");
                    return None;
                }
                self.value_budget -= size;
                Some(Value::decode(field_type, &self.data[offset..end], self.byte_order))
            }
            _ => {
                debug!(tag, offset, size, "Entry value out of bounds");
                None
            }
        }
    }
}

/// Kind of nested directory that `tag` points to when found in a directory of
/// kind `parent`, or `None` if the tag is not a pointer there.
fn nested_kind(parent: DirectoryKind, tag: u16) -> Option<DirectoryKind> {
    match (parent, ExifTag::from_u16(tag)?) {
        (DirectoryKind::Image(_), ExifTag::ExifIfdPointer) => Some(DirectoryKind::Exif),
        (DirectoryKind::Image(_), ExifTag::GpsIfdPointer) => Some(DirectoryKind::Gps),
        (DirectoryKind::Exif, ExifTag::InteropIfdPointer) => Some(DirectoryKind::Interop),
        _ => None,
    }
}

// =============================================================================
// Tests
// =============================================================================
