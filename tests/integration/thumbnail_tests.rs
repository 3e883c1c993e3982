//! End-to-end tests for thumbnail extraction.

use exify::{extract_thumbnail, get_thumbnail, thumbnail_from, RawFile};
use std::io::ErrorKind;

use super::test_utils::{
    camera_exif, create_sized_jpeg, create_test_jpeg, wrap_exif, write_file, ByteOrderType,
    ExifBuilder, IfdBuilder, THUMBNAIL_SIZE,
};

fn thumbnail_of(payload: &[u8]) -> Option<Vec<u8>> {
    thumbnail_from(&RawFile::from_vec(wrap_exif(payload))).map(|bytes| bytes.to_vec())
}

// =============================================================================
// Embedded Thumbnails
// =============================================================================

#[test]
fn test_thumbnail_bytes_returned_exactly() {
    let dir = tempfile::tempdir().unwrap();
    let expected = create_sized_jpeg(THUMBNAIL_SIZE);
    let payload = camera_exif(ByteOrderType::LittleEndian).build();
    let path = write_file(dir.path(), "camera.jpg", &wrap_exif(&payload));

    let thumbnail = get_thumbnail(path.to_str().unwrap()).unwrap();
    assert_eq!(thumbnail.len(), THUMBNAIL_SIZE);
    assert_eq!(thumbnail, expected);
}

#[test]
fn test_thumbnail_is_decodable_jpeg() {
    let thumbnail = thumbnail_of(&camera_exif(ByteOrderType::BigEndian).build()).unwrap();
    assert_eq!(&thumbnail[..2], &[0xFF, 0xD8]);
    assert_eq!(&thumbnail[thumbnail.len() - 2..], &[0xFF, 0xD9]);

    let decoded = image::load_from_memory(&thumbnail).unwrap();
    assert_eq!(decoded.width(), 8);
    assert_eq!(decoded.height(), 8);
}

#[test]
fn test_thumbnail_both_byte_orders() {
    let le = thumbnail_of(&camera_exif(ByteOrderType::LittleEndian).build());
    let be = thumbnail_of(&camera_exif(ByteOrderType::BigEndian).build());
    assert!(le.is_some());
    assert_eq!(le, be);
}

#[test]
fn test_compression_seven_thumbnail() {
    let thumb = create_test_jpeg(16, 16, 60);
    let payload = ExifBuilder::new(ByteOrderType::BigEndian)
        .primary(IfdBuilder::new().ascii(0x010F, "Acme"))
        .secondary(IfdBuilder::new().short(0x0103, 7))
        .thumbnail(thumb.clone())
        .build();
    assert_eq!(thumbnail_of(&payload), Some(thumb));
}

#[test]
fn test_repeated_extraction_is_identical() {
    let dir = tempfile::tempdir().unwrap();
    let payload = camera_exif(ByteOrderType::LittleEndian).build();
    let path = write_file(dir.path(), "camera.jpg", &wrap_exif(&payload));

    let first = extract_thumbnail(&path).unwrap();
    let second = extract_thumbnail(&path).unwrap();
    assert!(first.is_some());
    assert_eq!(first, second);
}

// =============================================================================
// Absent Thumbnails
// =============================================================================

#[test]
fn test_no_exif_no_thumbnail() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "plain.jpg", &create_test_jpeg(16, 16, 80));

    assert_eq!(extract_thumbnail(&path).unwrap(), None);
    assert!(get_thumbnail(path.to_str().unwrap()).unwrap().is_empty());
}

#[test]
fn test_no_secondary_directory() {
    let payload = ExifBuilder::new(ByteOrderType::LittleEndian)
        .primary(IfdBuilder::new().ascii(0x010F, "Acme"))
        .build();
    assert_eq!(thumbnail_of(&payload), None);
}

#[test]
fn test_uncompressed_thumbnail_not_returned() {
    let payload = ExifBuilder::new(ByteOrderType::LittleEndian)
        .primary(IfdBuilder::new().ascii(0x010F, "Acme"))
        .secondary(IfdBuilder::new().short(0x0103, 1))
        .thumbnail(create_test_jpeg(8, 8, 50))
        .build();
    assert_eq!(thumbnail_of(&payload), None);
}

#[test]
fn test_missing_location_tags() {
    let payload = ExifBuilder::new(ByteOrderType::LittleEndian)
        .primary(IfdBuilder::new().ascii(0x010F, "Acme"))
        .secondary(IfdBuilder::new().short(0x0103, 6))
        .build();
    assert_eq!(thumbnail_of(&payload), None);
}

#[test]
fn test_thumbnail_length_past_end_of_file() {
    let payload = camera_exif(ByteOrderType::LittleEndian)
        .thumbnail_length(THUMBNAIL_SIZE as u32 + 1)
        .build();
    assert_eq!(thumbnail_of(&payload), None);

    let payload = camera_exif(ByteOrderType::BigEndian)
        .thumbnail_length(u32::MAX)
        .build();
    assert_eq!(thumbnail_of(&payload), None);
}

#[test]
fn test_thumbnail_cut_off_by_truncated_file() {
    let payload = camera_exif(ByteOrderType::LittleEndian).build();
    let mut file = wrap_exif(&payload);
    let exif_end = 12 + payload.len();
    file.truncate(exif_end - 100);

    assert!(thumbnail_from(&RawFile::from_vec(file)).is_none());
}

#[test]
fn test_bad_header_no_thumbnail() {
    let mut payload = camera_exif(ByteOrderType::BigEndian).build();
    payload[3] = 0;
    assert_eq!(thumbnail_of(&payload), None);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.jpg");

    let err = extract_thumbnail(&missing).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(get_thumbnail(missing.to_str().unwrap()).is_err());
}
