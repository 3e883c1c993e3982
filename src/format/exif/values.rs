//! Typed entry values.
//!
//! Directory entries carry their payload as raw bytes whose meaning depends on
//! the field type and the file's byte order. The decoder turns those bytes into
//! a [`Value`] once, so later stages (display formatting, thumbnail lookup)
//! match on a closed set of value kinds instead of re-reading bytes.

use std::fmt;

use super::parser::ByteOrder;
use super::tags::FieldType;

// =============================================================================
// Rationals
// =============================================================================

/// Unsigned rational: numerator / denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rational {
    pub num: u32,
    pub denom: u32,
}

impl Rational {
    pub const fn new(num: u32, denom: u32) -> Self {
        Self { num, denom }
    }

    /// Value as a float, `None` when the denominator is zero.
    pub fn to_f64(self) -> Option<f64> {
        if self.denom == 0 {
            None
        } else {
            Some(self.num as f64 / self.denom as f64)
        }
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.denom)
    }
}

/// Signed rational: numerator / denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SRational {
    pub num: i32,
    pub denom: i32,
}

impl SRational {
    pub const fn new(num: i32, denom: i32) -> Self {
        Self { num, denom }
    }

    /// Value as a float, `None` when the denominator is zero.
    pub fn to_f64(self) -> Option<f64> {
        if self.denom == 0 {
            None
        } else {
            Some(self.num as f64 / self.denom as f64)
        }
    }
}

impl fmt::Display for SRational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.denom)
    }
}

// =============================================================================
// Value
// =============================================================================

/// Decoded value of a directory entry.
///
/// One variant per field type, each holding all `count` elements. Entries
/// with an unknown type code keep their 4 raw value-field bytes.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Byte(Vec<u8>),
    /// Raw characters including any NUL terminator
    Ascii(Vec<u8>),
    Short(Vec<u16>),
    Long(Vec<u32>),
    Rational(Vec<Rational>),
    SByte(Vec<i8>),
    Undefined(Vec<u8>),
    SShort(Vec<i16>),
    SLong(Vec<i32>),
    SRational(Vec<SRational>),
    Float(Vec<f32>),
    Double(Vec<f64>),
    Unsupported { type_code: u16, raw: [u8; 4] },
}

impl Value {
    /// Decode `bytes` as an array of `field_type` elements.
    ///
    /// Trailing bytes that do not form a whole element are ignored.
    pub fn decode(field_type: FieldType, bytes: &[u8], byte_order: ByteOrder) -> Self {
        match field_type {
            FieldType::Byte => Value::Byte(bytes.to_vec()),
            FieldType::Ascii => Value::Ascii(bytes.to_vec()),
            FieldType::Undefined => Value::Undefined(bytes.to_vec()),
            FieldType::SByte => Value::SByte(bytes.iter().map(|&b| b as i8).collect()),
            FieldType::Short => Value::Short(
                bytes
                    .chunks_exact(2)
                    .map(|c| byte_order.read_u16(c))
                    .collect(),
            ),
            FieldType::SShort => Value::SShort(
                bytes
                    .chunks_exact(2)
                    .map(|c| byte_order.read_u16(c) as i16)
                    .collect(),
            ),
            FieldType::Long => Value::Long(
                bytes
                    .chunks_exact(4)
                    .map(|c| byte_order.read_u32(c))
                    .collect(),
            ),
            FieldType::SLong => Value::SLong(
                bytes
                    .chunks_exact(4)
                    .map(|c| byte_order.read_u32(c) as i32)
                    .collect(),
            ),
            FieldType::Float => Value::Float(
                bytes
                    .chunks_exact(4)
                    .map(|c| f32::from_bits(byte_order.read_u32(c)))
                    .collect(),
            ),
            FieldType::Double => Value::Double(
                bytes
                    .chunks_exact(8)
                    .map(|c| f64::from_bits(byte_order.read_u64(c)))
                    .collect(),
            ),
            FieldType::Rational => Value::Rational(
                bytes
                    .chunks_exact(8)
                    .map(|c| Rational::new(byte_order.read_u32(c), byte_order.read_u32(&c[4..])))
                    .collect(),
            ),
            FieldType::SRational => Value::SRational(
                bytes
                    .chunks_exact(8)
                    .map(|c| {
                        SRational::new(
                            byte_order.read_u32(c) as i32,
                            byte_order.read_u32(&c[4..]) as i32,
                        )
                    })
                    .collect(),
            ),
        }
    }

    /// Number of decoded elements.
    pub fn len(&self) -> usize {
        match self {
            Value::Byte(v) | Value::Ascii(v) | Value::Undefined(v) => v.len(),
            Value::Short(v) => v.len(),
            Value::Long(v) => v.len(),
            Value::Rational(v) => v.len(),
            Value::SByte(v) => v.len(),
            Value::SShort(v) => v.len(),
            Value::SLong(v) => v.len(),
            Value::SRational(v) => v.len(),
            Value::Float(v) => v.len(),
            Value::Double(v) => v.len(),
            Value::Unsupported { .. } => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element `index` as an unsigned integer.
    ///
    /// Only integer types convert; negative signed values yield `None`.
    pub fn get_u32(&self, index: usize) -> Option<u32> {
        match self {
            Value::Byte(v) | Value::Undefined(v) => v.get(index).map(|&x| x as u32),
            Value::Short(v) => v.get(index).map(|&x| x as u32),
            Value::Long(v) => v.get(index).copied(),
            Value::SByte(v) => v.get(index).and_then(|&x| u32::try_from(x).ok()),
            Value::SShort(v) => v.get(index).and_then(|&x| u32::try_from(x).ok()),
            Value::SLong(v) => v.get(index).and_then(|&x| u32::try_from(x).ok()),
            _ => None,
        }
    }

    /// First element as an unsigned integer.
    #[inline]
    pub fn first_u32(&self) -> Option<u32> {
        self.get_u32(0)
    }

    /// Element `index` as a float, for any numeric type.
    ///
    /// Rationals with a zero denominator yield `None`.
    pub fn get_f64(&self, index: usize) -> Option<f64> {
        match self {
            Value::Rational(v) => v.get(index).and_then(|r| r.to_f64()),
            Value::SRational(v) => v.get(index).and_then(|r| r.to_f64()),
            Value::Float(v) => v.get(index).map(|&x| x as f64),
            Value::Double(v) => v.get(index).copied(),
            Value::SByte(v) => v.get(index).map(|&x| x as f64),
            Value::SShort(v) => v.get(index).map(|&x| x as f64),
            Value::SLong(v) => v.get(index).map(|&x| x as f64),
            other => other.get_u32(index).map(|x| x as f64),
        }
    }

    /// Raw bytes for byte-oriented types.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Byte(v) | Value::Ascii(v) | Value::Undefined(v) => Some(v),
            _ => None,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
