use std::path::Path;

use bytes::Bytes;

// =============================================================================
// RawFile
// =============================================================================

/// An immutable, fully-buffered view of one input file.
///
/// Every decoder stage borrows from the same `RawFile`; slices handed out are
/// cheap `Bytes` views that share the underlying allocation. A `RawFile` is
/// created per extraction call and dropped when the call returns.
#[derive(Debug, Clone)]
pub struct RawFile {
    data: Bytes,
}

impl RawFile {
    /// Read the whole file at `path` into memory.
    ///
    /// The file handle is closed before this function returns, on both the
    /// success and the error path.
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let data = std::fs::read(path)?;
        Ok(Self::from_vec(data))
    }

    /// Wrap an in-memory buffer.
    pub fn from_vec(data: Vec<u8>) -> Self {
        Self {
            data: Bytes::from(data),
        }
    }

    /// Wrap an existing `Bytes` buffer without copying.
    pub fn from_bytes(data: Bytes) -> Self {
        Self { data }
    }

    /// Total size in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The whole buffer.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Return `len` bytes at `offset`, or `None` if any part of the range
    /// lies outside the file.
    pub fn slice(&self, offset: usize, len: usize) -> Option<Bytes> {
        let end = offset.checked_add(len)?;
        if end > self.data.len() {
            return None;
        }
        Some(self.data.slice(offset..end))
    }
}

impl From<Vec<u8>> for RawFile {
    fn from(data: Vec<u8>) -> Self {
        Self::from_vec(data)
    }
}

// =============================================================================
// Endian Helper Functions
// =============================================================================
//
// EXIF payloads can be either little-endian or big-endian, while JPEG segment
// lengths are always big-endian. Callers must check slice lengths first.

/// Read a little-endian u16 from a byte slice.
///
/// # Panics
/// Panics if the slice has fewer than 2 bytes.
#[inline]
pub fn read_u16_le(bytes: &[u8]) -> u16 {
    u16::from_le_bytes([bytes[0], bytes[1]])
}

/// Read a big-endian u16 from a byte slice.
///
/// # Panics
/// Panics if the slice has fewer than 2 bytes.
#[inline]
pub fn read_u16_be(bytes: &[u8]) -> u16 {
    u16::from_be_bytes([bytes[0], bytes[1]])
}

/// Read a little-endian u32 from a byte slice.
///
/// # Panics
/// Panics if the slice has fewer than 4 bytes.
#[inline]
pub fn read_u32_le(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Read a big-endian u32 from a byte slice.
///
/// # Panics
/// Panics if the slice has fewer than 4 bytes.
#[inline]
pub fn read_u32_be(bytes: &[u8]) -> u32 {
    u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Read a little-endian u64 from a byte slice.
///
/// # Panics
/// Panics if the slice has fewer than 8 bytes.
#[inline]
pub fn read_u64_le(bytes: &[u8]) -> u64 {
    u64::from_le_bytes([
        bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
    ])
}

/// Read a big-endian u64 from a byte slice.
///
/// # Panics
/// Panics if the slice has fewer than 8 bytes.
#[inline]
pub fn read_u64_be(bytes: &[u8]) -> u64 {
    u64::from_be_bytes([
        bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
    ])
}
