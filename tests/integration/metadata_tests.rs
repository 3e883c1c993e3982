//! End-to-end tests for metadata extraction.

use exify::{describe_jpeg, extract_metadata, get_image_info, image_info_from, RawFile};
use std::io::ErrorKind;

use super::test_utils::{
    camera_exif, create_test_rgb_jpeg, wrap_exif, write_file, ByteOrderType, ExifBuilder,
    IfdBuilder, EXIF_PAYLOAD_START,
};

fn info_of(payload: &[u8]) -> exify::ImageInfo {
    image_info_from(&RawFile::from_vec(wrap_exif(payload)))
}

// =============================================================================
// Well-formed Files
// =============================================================================

#[test]
fn test_camera_file_primary_tags() {
    let dir = tempfile::tempdir().unwrap();
    let payload = camera_exif(ByteOrderType::LittleEndian).build();
    let path = write_file(dir.path(), "camera.jpg", &wrap_exif(&payload));

    let info = get_image_info(path.to_str().unwrap()).unwrap();
    assert_eq!(info.get("Make"), Some("Acme"));
    assert_eq!(info.get("Orientation"), Some("normal"));
    assert_eq!(info.get("ExposureTime"), Some("1/125"));
    assert_eq!(info.get("Model"), Some("Model 7"));
    assert_eq!(info.get("ResolutionUnit"), Some("inches"));
}

#[test]
fn test_camera_file_nested_tags() {
    let info = info_of(&camera_exif(ByteOrderType::BigEndian).build());

    assert_eq!(info.get("FNumber"), Some("f/2.8"));
    assert_eq!(info.get("ISOSpeedRatings"), Some("200"));
    assert_eq!(info.get("DateTimeOriginal"), Some("2024:05:01 12:30:45"));
    assert_eq!(info.get("ExifVersion"), Some("2.30"));
    assert_eq!(info.get("Flash"), Some("no (manual)"));
    assert_eq!(info.get("FocalLength"), Some("50.0 mm"));
    assert_eq!(info.get("ExposureBiasValue"), Some("-0.33 EV"));
    assert_eq!(info.get("InteroperabilityIndex"), Some("R98"));
    assert_eq!(info.get("GPSLatitudeRef"), Some("N"));
    assert_eq!(info.get("GPSAltitudeRef"), Some("above sea level"));
    assert_eq!(info.get("GPSAltitude"), Some("120.50 m"));
}

#[test]
fn test_entry_order_follows_file_order() {
    let info = info_of(&camera_exif(ByteOrderType::LittleEndian).build());
    let names: Vec<&str> = info.iter().map(|(name, _)| name).collect();

    // Primary entries in file order, then Exif, Interoperability, GPS
    assert_eq!(
        &names[..6],
        &["Make", "Model", "Orientation", "ExposureTime", "XResolution", "ResolutionUnit"]
    );
    let position = |name: &str| names.iter().position(|n| *n == name).unwrap();
    assert!(position("ResolutionUnit") < position("FNumber"));
    assert!(position("ExposureBiasValue") < position("InteroperabilityIndex"));
    assert!(position("InteroperabilityIndex") < position("GPSLatitudeRef"));
}

#[test]
fn test_pointer_and_thumbnail_tags_not_listed() {
    let info = info_of(&camera_exif(ByteOrderType::LittleEndian).build());
    assert!(!info.contains("ExifOffset"));
    assert!(!info.contains("GPSInfo"));
    assert!(!info.contains("InteropOffset"));
    // The secondary directory is only consulted when the primary is empty
    assert!(!info.contains("Compression"));
    assert!(!info.contains("JPEGInterchangeFormat"));
}

#[test]
fn test_gps_decimal_degrees() {
    let info = info_of(&camera_exif(ByteOrderType::LittleEndian).build());

    let latitude: f64 = info.get("GPSLatitude").unwrap().parse().unwrap();
    assert!((latitude - (37.0 + 46.0 / 60.0 + 29.64 / 3600.0)).abs() < 1e-6);

    // Western longitudes are negative
    let longitude: f64 = info.get("GPSLongitude").unwrap().parse().unwrap();
    assert!((longitude + (122.0 + 25.0 / 60.0 + 9.84 / 3600.0)).abs() < 1e-6);
}

#[test]
fn test_gps_southern_hemisphere() {
    let payload = ExifBuilder::new(ByteOrderType::BigEndian)
        .primary(IfdBuilder::new().ascii(0x010F, "Acme"))
        .gps(
            IfdBuilder::new()
                .ascii(0x0001, "S")
                .rationals(0x0002, &[(33, 1), (52, 1), (0, 1)])
                .ascii(0x0003, "E")
                .rationals(0x0004, &[(151, 1), (12, 1), (36, 1)]),
        )
        .build();
    let info = info_of(&payload);

    assert_eq!(info.get("GPSLatitudeRef"), Some("S"));
    assert_eq!(info.get("GPSLatitude"), Some("-33.866667"));
    assert_eq!(info.get("GPSLongitude"), Some("151.210000"));
}

#[test]
fn test_byte_orders_give_identical_tables() {
    let le = info_of(&camera_exif(ByteOrderType::LittleEndian).build());
    let be = info_of(&camera_exif(ByteOrderType::BigEndian).build());
    assert!(!le.is_empty());
    assert_eq!(le, be);
}

#[test]
fn test_repeated_extraction_is_identical() {
    let dir = tempfile::tempdir().unwrap();
    let payload = camera_exif(ByteOrderType::BigEndian).build();
    let path = write_file(dir.path(), "camera.jpg", &wrap_exif(&payload));

    let first = extract_metadata(&path).unwrap();
    let second = extract_metadata(&path).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_json_output_keeps_order() {
    let payload = ExifBuilder::new(ByteOrderType::LittleEndian)
        .primary(IfdBuilder::new().short(0x0112, 3).ascii(0x010F, "Acme"))
        .build();
    let info = info_of(&payload);
    assert_eq!(
        serde_json::to_string(&info).unwrap(),
        r#"{"Orientation":"rotate 180","Make":"Acme"}"#
    );
}

// =============================================================================
// Duplicates and Fallbacks
// =============================================================================

#[test]
fn test_duplicate_tag_last_write_wins() {
    let payload = ExifBuilder::new(ByteOrderType::LittleEndian)
        .primary(
            IfdBuilder::new()
                .ascii(0x010F, "First")
                .ascii(0x0110, "Model")
                .ascii(0x010F, "Second"),
        )
        .build();
    let info = info_of(&payload);

    let entries: Vec<_> = info.iter().collect();
    assert_eq!(entries, vec![("Make", "Second"), ("Model", "Model")]);
}

#[test]
fn test_secondary_used_when_primary_empty() {
    let payload = ExifBuilder::new(ByteOrderType::BigEndian)
        .primary(IfdBuilder::new())
        .secondary(IfdBuilder::new().short(0x0103, 6).long(0x0100, 160))
        .build();
    let info = info_of(&payload);
    assert_eq!(info.get("Compression"), Some("JPEG (old-style)"));
    assert_eq!(info.get("ImageWidth"), Some("160"));
}

#[test]
fn test_unknown_tag_uses_hex_name() {
    let payload = ExifBuilder::new(ByteOrderType::LittleEndian)
        .primary(IfdBuilder::new().short(0xC4A5, 9))
        .build();
    assert_eq!(info_of(&payload).get("Tag 0xC4A5"), Some("9"));
}

// =============================================================================
// Missing or Malformed Metadata
// =============================================================================

#[test]
fn test_jpeg_without_exif() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "plain.jpg", &create_test_rgb_jpeg(16, 16, 80));

    let info = extract_metadata(&path).unwrap();
    assert!(info.is_empty());
}

#[test]
fn test_not_a_jpeg() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "notes.txt", b"just some text, no markers");
    assert!(extract_metadata(&path).unwrap().is_empty());

    let path = write_file(dir.path(), "empty.jpg", b"");
    assert!(extract_metadata(&path).unwrap().is_empty());
}

#[test]
fn test_bad_header_is_no_metadata() {
    let mut payload = camera_exif(ByteOrderType::LittleEndian).build();
    payload[2] = 43;
    assert!(info_of(&payload).is_empty());

    let mut payload = camera_exif(ByteOrderType::LittleEndian).build();
    payload[0..2].copy_from_slice(b"XX");
    assert!(info_of(&payload).is_empty());
}

#[test]
fn test_truncated_segment_keeps_in_bounds_entries() {
    let payload = ExifBuilder::new(ByteOrderType::LittleEndian)
        .primary(
            IfdBuilder::new()
                .short(0x0112, 6)
                .ascii(0x0110, "A model name long enough to be stored out of line"),
        )
        .build();
    let mut file = wrap_exif(&payload);
    // Cut inside the Model string; the APP1 length now overruns the file
    file.truncate(EXIF_PAYLOAD_START + payload.len() - 10);

    let info = image_info_from(&RawFile::from_vec(file));
    assert_eq!(info.get("Orientation"), Some("rotate 90"));
    assert!(!info.contains("Model"));
}

#[test]
fn test_out_of_bounds_value_skipped() {
    let payload = ExifBuilder::new(ByteOrderType::BigEndian)
        .primary(
            IfdBuilder::new()
                .raw(0x010F, 2, 64, 0x00FF_FFFF)
                .short(0x0112, 8),
        )
        .build();
    let info = info_of(&payload);
    assert!(!info.contains("Make"));
    assert_eq!(info.get("Orientation"), Some("rotate 270"));
}

#[test]
fn test_shared_value_bytes_stay_bounded() {
    // Every entry claims the same long run of bytes starting at the header
    let ifd = (0..2000u16).fold(IfdBuilder::new(), |ifd, i| ifd.raw(0xC000 + i, 1, 20_000, 8));
    let payload = ExifBuilder::new(ByteOrderType::LittleEndian)
        .primary(ifd)
        .build();
    let info = info_of(&payload);

    let rendered: usize = info.iter().map(|(name, value)| name.len() + value.len()).sum();
    assert!(rendered < payload.len(), "rendered {rendered} bytes");
    assert!(info.iter().all(|(_, value)| value.ends_with("... (20000 values)")));
}

#[test]
fn test_ascii_padding_preserved() {
    let payload = ExifBuilder::new(ByteOrderType::LittleEndian)
        .primary(IfdBuilder::new().ascii(0x010F, "Acme  "))
        .build();
    assert_eq!(info_of(&payload).get("Make"), Some("Acme  "));
}

#[test]
fn test_cyclic_chain_terminates() {
    // Secondary directory links back to the primary at offset 8
    let payload = camera_exif(ByteOrderType::LittleEndian)
        .secondary_next(8)
        .build();
    let cyclic = info_of(&payload);
    let plain = info_of(&camera_exif(ByteOrderType::LittleEndian).build());
    assert_eq!(cyclic, plain);
}

#[test]
fn test_nested_pointer_to_primary_terminates() {
    let payload = ExifBuilder::new(ByteOrderType::LittleEndian)
        .primary(IfdBuilder::new().ascii(0x010F, "Loop").raw(0x8769, 4, 1, 8))
        .build();
    let info = info_of(&payload);
    let entries: Vec<_> = info.iter().collect();
    assert_eq!(entries, vec![("Make", "Loop")]);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.jpg");

    let err = extract_metadata(&missing).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(get_image_info(missing.to_str().unwrap()).is_err());
}

#[test]
fn test_directory_path_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(extract_metadata(dir.path()).is_err());
}

// =============================================================================
// JPEG Frame Summary
// =============================================================================

#[test]
fn test_describe_jpeg() {
    let dir = tempfile::tempdir().unwrap();
    let payload = camera_exif(ByteOrderType::LittleEndian).build();
    let path = write_file(dir.path(), "camera.jpg", &wrap_exif(&payload));

    let file = wrap_exif(&payload);
    let summary = describe_jpeg(&path).unwrap().unwrap();
    assert_eq!(summary.file_size, file.len());
    // Encoded at quality 80
    let quality = summary.quality.unwrap();
    assert!((75..=85).contains(&quality), "quality {quality}");
    assert_eq!(summary.width, 32);
    assert_eq!(summary.height, 24);
    assert_eq!(summary.components, 3);
    assert!(summary.is_color());
    assert_eq!(summary.precision, 8);

    // The frame summary never leaks into the metadata table
    let info = extract_metadata(&path).unwrap();
    assert!(!info.contains("Width"));
}

#[test]
fn test_describe_non_jpeg() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "notes.txt", b"hello");
    assert!(describe_jpeg(&path).unwrap().is_none());
}
