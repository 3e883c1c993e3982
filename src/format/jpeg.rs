//! JPEG marker-structure scanning.
//!
//! This module walks a JPEG byte stream segment by segment. It does not decode
//! image data; it only finds the byte ranges of the segments the rest of the
//! crate cares about: the APP1 segment carrying EXIF metadata, the frame header
//! (SOFn) and comment segments.
//!
//! # Segment Layout
//!
//! ```text
//! FF D8                      SOI (standalone, no length)
//! FF En LL LL <payload>      APPn, length includes the two length bytes
//! ...
//! FF DA LL LL <payload>      SOS, entropy-coded data follows
//! ```
//!
//! Scanning stops at SOS or EOI. Segment lengths that run past the end of the
//! file end the scan; the overrunning segment is reported as truncated.

use serde::Serialize;
use tracing::{debug, trace};

use crate::io::{read_u16_be, RawFile};

// =============================================================================
// JPEG Markers
// =============================================================================

/// Marker prefix byte
pub const MARKER_PREFIX: u8 = 0xFF;

/// Start Of Image marker
pub const SOI: [u8; 2] = [0xFF, 0xD8];

/// End Of Image marker code
pub const EOI: u8 = 0xD9;

/// Start Of Scan marker code
pub const SOS: u8 = 0xDA;

/// Temporary private use marker (standalone)
pub const TEM: u8 = 0x01;

/// First restart marker code (standalone)
pub const RST0: u8 = 0xD0;

/// Last restart marker code (standalone)
pub const RST7: u8 = 0xD7;

/// Define Huffman Table marker code
pub const DHT: u8 = 0xC4;

/// JPEG extensions marker code (reserved, not a frame header)
pub const JPG: u8 = 0xC8;

/// Define Arithmetic Coding conditioning marker code
pub const DAC: u8 = 0xCC;

/// Application segment 1 (EXIF) marker code
pub const APP1: u8 = 0xE1;

/// Define Quantization Table marker code
pub const DQT: u8 = 0xDB;

/// Comment marker code
pub const COM: u8 = 0xFE;

/// Identifying signature at the start of an EXIF APP1 payload.
pub const EXIF_SIGNATURE: &[u8; 6] = b"Exif\0\0";

// =============================================================================
// Segment
// =============================================================================

/// One marker-delimited segment of a JPEG stream.
///
/// `offset` and `length` describe the payload only (after the marker and the
/// 2-byte length field). Standalone markers have an empty payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// Marker code (the byte following 0xFF)
    pub marker: u8,

    /// Absolute offset of the payload in the file
    pub offset: usize,

    /// Payload length in bytes, clamped to the end of the file
    pub length: usize,

    /// Whether the declared length ran past the end of the file
    pub truncated: bool,
}

impl Segment {
    /// Payload bytes of this segment.
    pub fn payload<'a>(&self, data: &'a [u8]) -> &'a [u8] {
        &data[self.offset..self.offset + self.length]
    }
}

/// Markers that are not followed by a length field.
#[inline]
pub fn is_standalone(marker: u8) -> bool {
    matches!(marker, TEM | RST0..=RST7) || marker == SOI[1] || marker == EOI
}

/// Start Of Frame markers (C0-CF, excluding DHT, JPG and DAC).
#[inline]
pub fn is_start_of_frame(marker: u8) -> bool {
    (0xC0..=0xCF).contains(&marker) && !matches!(marker, DHT | JPG | DAC)
}

// =============================================================================
// Segment Iterator
// =============================================================================

/// Lazily yields segments in file order.
///
/// Produces nothing if the stream does not begin with SOI. Stops after SOS,
/// at EOI, at the end of the data, or at the first malformed marker or length.
pub struct Segments<'a> {
    data: &'a [u8],
    pos: usize,
    done: bool,
}

impl<'a> Segments<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        let starts_with_soi = data.len() >= 2 && data[0..2] == SOI;
        Self {
            data,
            pos: 2,
            done: !starts_with_soi,
        }
    }

    fn finish(&mut self) -> Option<Segment> {
        self.done = true;
        None
    }
}

impl Iterator for Segments<'_> {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        if self.done {
            return None;
        }

        let data = self.data;

        // Markers may be preceded by any number of 0xFF fill bytes
        if self.pos >= data.len() || data[self.pos] != MARKER_PREFIX {
            return self.finish();
        }
        while self.pos < data.len() && data[self.pos] == MARKER_PREFIX {
            self.pos += 1;
        }
        if self.pos >= data.len() {
            return self.finish();
        }

        let marker = data[self.pos];
        self.pos += 1;

        if is_standalone(marker) {
            if marker == EOI {
                self.done = true;
            }
            return Some(Segment {
                marker,
                offset: self.pos,
                length: 0,
                truncated: false,
            });
        }

        if self.pos + 2 > data.len() {
            debug!(marker, "JPEG segment length field cut off by end of file");
            return self.finish();
        }
        let declared = read_u16_be(&data[self.pos..]) as usize;
        if declared < 2 {
            debug!(marker, declared, "Invalid JPEG segment length");
            return self.finish();
        }

        let offset = self.pos + 2;
        let wanted = declared - 2;
        let available = data.len() - offset;

        trace!(marker, offset, length = wanted, "JPEG segment");

        if wanted > available {
            debug!(
                marker,
                declared = wanted,
                available,
                "JPEG segment length runs past end of file"
            );
            self.done = true;
            return Some(Segment {
                marker,
                offset,
                length: available,
                truncated: true,
            });
        }

        self.pos = offset + wanted;
        if marker == SOS {
            // Entropy-coded data follows; nothing after this is a plain segment
            self.done = true;
        }

        Some(Segment {
            marker,
            offset,
            length: wanted,
            truncated: false,
        })
    }
}

// =============================================================================
// Metadata Segment Lookup
// =============================================================================

/// Find the APP1 segment carrying EXIF metadata.
///
/// Returns `None` when the file is not a JPEG, when scanning reaches SOS or
/// EOI first, or when a malformed segment ends the scan early. An EXIF segment
/// whose declared length overruns the file is returned clamped to the
/// available bytes with `truncated` set, so the decoder can still recover the
/// entries that are in bounds.
pub fn find_exif_segment(file: &RawFile) -> Option<Segment> {
    let data = file.as_slice();
    let found = Segments::new(data)
        .find(|segment| segment.marker == APP1 && segment.payload(data).starts_with(EXIF_SIGNATURE));

    match found {
        Some(segment) if segment.truncated => {
            debug!(
                offset = segment.offset,
                length = segment.length,
                "EXIF segment truncated, decoding available bytes"
            );
            Some(segment)
        }
        Some(segment) => Some(segment),
        None => {
            debug!("No EXIF segment found");
            None
        }
    }
}

/// Byte range of the TIFF-style structure inside an EXIF segment, i.e. the
/// payload with the identifying signature removed.
pub fn exif_tiff_range(segment: &Segment) -> (usize, usize) {
    let skip = EXIF_SIGNATURE.len().min(segment.length);
    (segment.offset + skip, segment.length - skip)
}

// =============================================================================
// Frame Summary
// =============================================================================

/// Basic facts about the main JPEG image, read from the frame header and
/// comment segments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JpegSummary {
    /// Image width in pixels
    pub width: u16,

    /// Image height in pixels
    pub height: u16,

    /// Number of colour components (1 = grayscale)
    pub components: u8,

    /// Sample precision in bits
    pub precision: u8,

    /// Coding process named by the SOFn marker
    pub process: Option<&'static str>,

    /// Text of COM segments, in file order
    pub comments: Vec<String>,

    /// Size of the whole file in bytes
    pub file_size: usize,

    /// Encoder quality (1-100) estimated from the luminance quantization table
    pub quality: Option<u8>,
}

impl JpegSummary {
    /// Whether the image has colour components.
    pub fn is_color(&self) -> bool {
        self.components != 1
    }
}

/// Human-readable name of the coding process for a SOFn marker.
pub fn process_name(marker: u8) -> Option<&'static str> {
    let name = match marker {
        0xC0 => "Baseline",
        0xC1 => "Extended sequential",
        0xC2 => "Progressive",
        0xC3 => "Lossless",
        0xC5 => "Differential sequential",
        0xC6 => "Differential progressive",
        0xC7 => "Differential lossless",
        0xC9 => "Extended sequential, arithmetic coding",
        0xCA => "Progressive, arithmetic coding",
        0xCB => "Lossless, arithmetic coding",
        0xCD => "Differential sequential, arithmetic coding",
        0xCE => "Differential progressive, arithmetic coding",
        0xCF => "Differential lossless, arithmetic coding",
        _ => return None,
    };
    Some(name)
}

/// Summarize the frame header and comments of a JPEG stream.
///
/// Returns `None` if the data is not a JPEG stream. Missing or short frame
/// headers leave the dimension fields at zero.
pub fn summarize(file: &RawFile) -> Option<JpegSummary> {
    let data = file.as_slice();
    if data.len() < 2 || data[0..2] != SOI {
        return None;
    }

    let mut summary = JpegSummary {
        file_size: data.len(),
        ..JpegSummary::default()
    };
    let mut seen_frame = false;

    for segment in Segments::new(data) {
        let payload = segment.payload(data);

        if is_start_of_frame(segment.marker) && !seen_frame && payload.len() >= 6 {
            seen_frame = true;
            summary.precision = payload[0];
            summary.height = read_u16_be(&payload[1..]);
            summary.width = read_u16_be(&payload[3..]);
            summary.components = payload[5];
            summary.process = process_name(segment.marker);
        } else if segment.marker == DQT {
            if let Some(quality) = estimate_quality(payload) {
                summary.quality = Some(quality);
            }
        } else if segment.marker == COM {
            let end = payload.iter().position(|&b| b == 0).unwrap_or(payload.len());
            let text = String::from_utf8_lossy(&payload[..end]).trim_end().to_string();
            if !text.is_empty() {
                summary.comments.push(text);
            }
        }
    }

    Some(summary)
}

// =============================================================================
// Quality Estimate
// =============================================================================

/// Standard luminance quantization table at quality 50, in natural order.
const STD_LUMINANCE: [u16; 64] = [
    16, 11, 10, 16, 24, 40, 51, 61, //
    12, 12, 14, 19, 26, 58, 60, 55, //
    14, 13, 16, 24, 40, 57, 69, 56, //
    14, 17, 22, 29, 51, 87, 80, 62, //
    18, 22, 37, 56, 68, 109, 103, 77, //
    24, 35, 55, 64, 81, 104, 113, 92, //
    49, 64, 78, 87, 103, 121, 120, 101, //
    72, 92, 95, 98, 112, 100, 103, 99,
];

/// Natural-order index of each coefficient as stored in a DQT segment.
const ZIGZAG: [usize; 64] = [
    0, 1, 8, 16, 9, 2, 3, 10, 17, 24, 32, 25, 18, 11, 4, 5, //
    12, 19, 26, 33, 40, 48, 41, 34, 27, 20, 13, 6, 7, 14, 21, 28, //
    35, 42, 49, 56, 57, 50, 43, 36, 29, 22, 15, 23, 30, 37, 44, 51, //
    58, 59, 52, 45, 38, 31, 39, 46, 53, 60, 61, 54, 47, 55, 62, 63,
];

/// Estimate encoder quality from the tables of one DQT segment.
///
/// Only table 0 (luminance) is compared against the standard table. Returns
/// `None` if the segment does not define table 0 or is cut short.
pub fn estimate_quality(payload: &[u8]) -> Option<u8> {
    let mut pos = 0;
    let mut quality = None;

    while pos < payload.len() {
        let precision_and_id = payload[pos];
        let wide = precision_and_id >> 4 != 0;
        let table_id = precision_and_id & 0x0F;
        let size = if wide { 128 } else { 64 };
        let table = payload.get(pos + 1..pos + 1 + size)?;
        pos += 1 + size;

        if table_id != 0 {
            continue;
        }

        let mut scale_sum = 0.0;
        let mut all_ones = true;
        for (k, &natural) in ZIGZAG.iter().enumerate() {
            let value = if wide {
                read_u16_be(&table[k * 2..])
            } else {
                u16::from(table[k])
            };
            all_ones &= value == 1;
            scale_sum += 100.0 * f64::from(value) / f64::from(STD_LUMINANCE[natural]);
        }

        let scale = scale_sum / 64.0;
        let estimate = if all_ones {
            100.0
        } else if scale <= 100.0 {
            (200.0 - scale) / 2.0
        } else {
            5000.0 / scale
        };
        quality = Some(estimate.round().clamp(1.0, 100.0) as u8);
    }

    quality
}

// =============================================================================
// Tests
// =============================================================================
