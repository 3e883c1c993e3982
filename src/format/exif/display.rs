//! Display formatting of entry values.
//!
//! Turns a decoded [`DirectoryEntry`] into the string shown to users, applying
//! the interpretation rule from the tag dictionary. Values that a rule cannot
//! interpret (wrong type, zero denominators, unmapped enumeration) fall back
//! to the plain rendering so nothing is silently dropped.

use std::borrow::Cow;

use super::dictionary::{enumerated_label, Rule, TagDictionary, TagInfo, TagSpace};
use super::parser::{ByteOrder, Directory, DirectoryEntry};
use super::values::Value;

/// Separator between multiple values of one entry.
pub const VALUE_SEPARATOR: &str = ", ";

/// Undefined byte blobs longer than this are abbreviated.
const MAX_HEX_BYTES: usize = 32;

/// Numeric arrays longer than this are abbreviated.
const MAX_LISTED_VALUES: usize = 64;

/// EXIF infinity sentinel for SubjectDistance.
const DISTANCE_INFINITY: u32 = 0xFFFF_FFFF;

/// GPS coordinate tags paired with the tag holding their hemisphere.
const GPS_COORDINATE_REFS: [(u16, u16); 4] = [
    (0x0002, 0x0001), // GPSLatitude, GPSLatitudeRef
    (0x0004, 0x0003), // GPSLongitude, GPSLongitudeRef
    (0x0014, 0x0013), // GPSDestLatitude, GPSDestLatitudeRef
    (0x0016, 0x0015), // GPSDestLongitude, GPSDestLongitudeRef
];

// =============================================================================
// Entry Formatting
// =============================================================================

/// Display name of `tag`: the dictionary name, or its hexadecimal id.
pub fn display_name(info: Option<&TagInfo>, tag: u16) -> Cow<'static, str> {
    match info {
        Some(info) => Cow::Borrowed(info.name),
        None => Cow::Owned(format!("Tag 0x{tag:04X}")),
    }
}

/// Name and display value for one entry.
///
/// Returns `None` for entries whose value could not be read from the file.
pub fn format_entry(
    dictionary: &TagDictionary,
    space: TagSpace,
    entry: &DirectoryEntry,
    byte_order: ByteOrder,
) -> Option<(Cow<'static, str>, String)> {
    let value = entry.value.as_ref()?;
    let info = dictionary.lookup(space, entry.tag);
    let rule = info.map_or(Rule::Plain, |info| info.rule);
    Some((display_name(info, entry.tag), format_value(rule, value, byte_order)))
}

/// Name and display value for an entry of `directory`.
///
/// Like [`format_entry`], but values that depend on a sibling entry are
/// resolved too: GPS coordinates become signed decimal degrees, negative for
/// the southern and western hemispheres.
pub fn format_directory_entry(
    dictionary: &TagDictionary,
    space: TagSpace,
    directory: &Directory,
    entry: &DirectoryEntry,
    byte_order: ByteOrder,
) -> Option<(Cow<'static, str>, String)> {
    let (name, display) = format_entry(dictionary, space, entry, byte_order)?;
    match signed_coordinate(space, directory, entry) {
        Some(degrees) => Some((name, format!("{degrees:.6}"))),
        None => Some((name, display)),
    }
}

fn signed_coordinate(
    space: TagSpace,
    directory: &Directory,
    entry: &DirectoryEntry,
) -> Option<f64> {
    if space != TagSpace::Gps {
        return None;
    }
    let &(_, ref_tag) = GPS_COORDINATE_REFS.iter().find(|(tag, _)| *tag == entry.tag)?;
    let degrees = gps_coordinate(entry.value.as_ref()?)?;
    let hemisphere = directory.find(ref_tag)?.value.as_ref()?.as_bytes()?.first()?;

    match hemisphere.to_ascii_uppercase() {
        b'S' | b'W' if degrees > 0.0 => Some(-degrees),
        _ => Some(degrees),
    }
}

/// Apply `rule` to `value`, falling back to the plain rendering.
pub fn format_value(rule: Rule, value: &Value, byte_order: ByteOrder) -> String {
    let interpreted = match rule {
        Rule::Plain | Rule::DateTime => None,
        Rule::Enumerated(table) => value
            .first_u32()
            .and_then(|v| enumerated_label(table, v))
            .map(str::to_string),
        Rule::GpsCoordinate => gps_coordinate(value).map(|deg| format!("{deg:.6}")),
        Rule::GpsTimeStamp => gps_time(value),
        Rule::GpsAltitude => value.get_f64(0).map(|m| format!("{m:.2} m")),
        Rule::FNumber => value.get_f64(0).map(|f| format!("f/{f:.1}")),
        Rule::ApexAperture => value
            .get_f64(0)
            .map(|apex| format!("f/{:.1}", 2f64.powf(apex / 2.0))),
        Rule::ApexShutter => value.get_f64(0).map(apex_shutter),
        Rule::FocalLength => value.get_f64(0).map(|mm| format!("{mm:.1} mm")),
        Rule::ExposureBias => value.get_f64(0).map(|ev| format!("{ev:+.2} EV")),
        Rule::SubjectDistance => subject_distance(value),
        Rule::Version => version(value),
        Rule::EncodedText => encoded_text(value, byte_order),
    };

    interpreted.unwrap_or_else(|| format_plain(value))
}

// =============================================================================
// Plain Rendering
// =============================================================================

/// Render a value without interpretation.
pub fn format_plain(value: &Value) -> String {
    match value {
        Value::Ascii(bytes) => ascii_text(bytes),
        Value::Undefined(bytes) => undefined_bytes(bytes),
        Value::Byte(v) => join(v),
        Value::Short(v) => join(v),
        Value::Long(v) => join(v),
        Value::SByte(v) => join(v),
        Value::SShort(v) => join(v),
        Value::SLong(v) => join(v),
        Value::Rational(v) => join(v),
        Value::SRational(v) => join(v),
        Value::Float(v) => join(v),
        Value::Double(v) => join(v),
        Value::Unsupported { type_code, .. } => format!("unsupported (type {type_code})"),
    }
}

fn join<T: ToString>(values: &[T]) -> String {
    let listed = values
        .iter()
        .take(MAX_LISTED_VALUES)
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(VALUE_SEPARATOR);
    if values.len() > MAX_LISTED_VALUES {
        format!("{listed}... ({} values)", values.len())
    } else {
        listed
    }
}

/// Text up to the first NUL. Padding before the terminator is kept.
fn ascii_text(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

fn undefined_bytes(bytes: &[u8]) -> String {
    let printable = !bytes.is_empty()
        && bytes.len() <= MAX_HEX_BYTES
        && bytes.iter().all(|b| b.is_ascii_graphic() || *b == b' ');
    if printable {
        return String::from_utf8_lossy(bytes).into_owned();
    }
    if bytes.len() <= MAX_HEX_BYTES {
        hex::encode(bytes)
    } else {
        format!(
            "{}... ({} bytes)",
            hex::encode(&bytes[..MAX_HEX_BYTES]),
            bytes.len()
        )
    }
}

// =============================================================================
// Derived Quantities
// =============================================================================

/// Degrees + minutes/60 + seconds/3600.
///
/// Missing minute or second components count as zero; any component with a
/// zero denominator makes the coordinate uninterpretable.
pub fn gps_coordinate(value: &Value) -> Option<f64> {
    let Value::Rational(parts) = value else {
        return None;
    };
    if parts.is_empty() || parts.len() > 3 {
        return None;
    }
    let mut degrees = 0.0;
    for (part, scale) in parts.iter().zip([1.0, 60.0, 3600.0]) {
        degrees += part.to_f64()? / scale;
    }
    Some(degrees)
}

fn gps_time(value: &Value) -> Option<String> {
    if value.len() != 3 {
        return None;
    }
    let hours = value.get_f64(0)?;
    let minutes = value.get_f64(1)?;
    let seconds = value.get_f64(2)?;
    if seconds.fract() == 0.0 {
        Some(format!("{:02}:{:02}:{:02}", hours as u32, minutes as u32, seconds as u32))
    } else {
        Some(format!("{:02}:{:02}:{:05.2}", hours as u32, minutes as u32, seconds))
    }
}

fn apex_shutter(apex: f64) -> String {
    let seconds = 2f64.powf(-apex);
    if seconds > 0.0 && seconds < 1.0 {
        format!("1/{:.0} s", 1.0 / seconds)
    } else {
        format!("{seconds:.1} s")
    }
}

fn subject_distance(value: &Value) -> Option<String> {
    let Value::Rational(parts) = value else {
        return None;
    };
    let distance = parts.first()?;
    match distance.num {
        0 => Some("unknown".to_string()),
        DISTANCE_INFINITY => Some("infinity".to_string()),
        _ => distance.to_f64().map(|m| format!("{m:.2} m")),
    }
}

/// "0230" → "2.30"
fn version(value: &Value) -> Option<String> {
    let bytes = value.as_bytes()?;
    if bytes.len() != 4 || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    let major = (bytes[0] - b'0') as u32 * 10 + (bytes[1] - b'0') as u32;
    let minor = std::str::from_utf8(&bytes[2..]).ok()?;
    Some(format!("{major}.{minor}"))
}

/// Text with an 8-byte character code prefix (UserComment and friends).
fn encoded_text(value: &Value, byte_order: ByteOrder) -> Option<String> {
    let bytes = value.as_bytes()?;
    if bytes.len() < 8 {
        return None;
    }
    let (code, text) = bytes.split_at(8);

    let decoded = if code.starts_with(b"UNICODE") {
        let units: Vec<u16> = text
            .chunks_exact(2)
            .map(|pair| byte_order.read_u16(pair))
            .take_while(|&unit| unit != 0)
            .collect();
        String::from_utf16_lossy(&units)
    } else if code.starts_with(b"ASCII") || code.iter().all(|&b| b == 0) {
        ascii_text(text)
    } else {
        // JIS and unknown encodings are left to the plain rendering
        return None;
    };

    Some(decoded.trim_end().to_string())
}

// =============================================================================
// Tests
// =============================================================================
