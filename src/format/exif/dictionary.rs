//! Built-in tag dictionary.
//!
//! Maps tag identifiers to a display name and an interpretation rule. Tag
//! numbers are only unique within a namespace: the GPS and Interoperability
//! directories reuse small numbers that mean something else in image
//! directories, so lookups are keyed by [`TagSpace`] as well.
//!
//! The dictionary is built on first use and shared read-only by every caller.

use std::collections::HashMap;
use std::sync::OnceLock;

use super::parser::DirectoryKind;

use self::Rule::*;

// =============================================================================
// Rules
// =============================================================================

/// How a tag's raw value becomes a display string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Render the value as stored
    Plain,
    /// Look the first integer up in a value → label table
    Enumerated(&'static [(u32, &'static str)]),
    /// Literal "YYYY:MM:DD HH:MM:SS" string
    DateTime,
    /// Three rationals (degrees, minutes, seconds) as decimal degrees
    GpsCoordinate,
    /// Three rationals (hours, minutes, seconds) as a clock time
    GpsTimeStamp,
    /// Altitude in metres
    GpsAltitude,
    /// F-number as "f/2.8"
    FNumber,
    /// APEX aperture value converted to an f-number
    ApexAperture,
    /// APEX shutter speed converted to an exposure time
    ApexShutter,
    /// Length in millimetres
    FocalLength,
    /// Signed EV offset
    ExposureBias,
    /// Distance in metres, with the EXIF infinity/unknown sentinels
    SubjectDistance,
    /// Four ASCII digits "0230" shown as "2.30"
    Version,
    /// 8-byte character code prefix followed by text
    EncodedText,
}

/// Dictionary entry for one tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagInfo {
    pub name: &'static str,
    pub rule: Rule,
}

/// Namespace a tag number is interpreted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagSpace {
    /// Image directories and the Exif sub-directory
    Image,
    Gps,
    Interop,
}

impl From<DirectoryKind> for TagSpace {
    fn from(kind: DirectoryKind) -> Self {
        match kind {
            DirectoryKind::Image(_) | DirectoryKind::Exif => TagSpace::Image,
            DirectoryKind::Gps => TagSpace::Gps,
            DirectoryKind::Interop => TagSpace::Interop,
        }
    }
}

// =============================================================================
// Enumerated Value Tables
// =============================================================================

const ORIENTATION: &[(u32, &str)] = &[
    (1, "normal"),
    (2, "flip horizontal"),
    (3, "rotate 180"),
    (4, "flip vertical"),
    (5, "transpose"),
    (6, "rotate 90"),
    (7, "transverse"),
    (8, "rotate 270"),
];

const COMPRESSION: &[(u32, &str)] = &[
    (1, "uncompressed"),
    (6, "JPEG (old-style)"),
    (7, "JPEG"),
];

const PHOTOMETRIC: &[(u32, &str)] = &[
    (0, "white is zero"),
    (1, "black is zero"),
    (2, "RGB"),
    (6, "YCbCr"),
];

const RESOLUTION_UNIT: &[(u32, &str)] = &[(1, "none"), (2, "inches"), (3, "centimeters")];

const PLANAR_CONFIGURATION: &[(u32, &str)] = &[(1, "chunky"), (2, "planar")];

const YCBCR_POSITIONING: &[(u32, &str)] = &[(1, "centered"), (2, "co-sited")];

const EXPOSURE_PROGRAM: &[(u32, &str)] = &[
    (0, "not defined"),
    (1, "manual"),
    (2, "program (auto)"),
    (3, "aperture priority (semi-auto)"),
    (4, "shutter priority (semi-auto)"),
    (5, "creative program (biased towards depth of field)"),
    (6, "action program (biased towards fast shutter speed)"),
    (7, "portrait mode"),
    (8, "landscape mode"),
];

const METERING_MODE: &[(u32, &str)] = &[
    (0, "unknown"),
    (1, "average"),
    (2, "center weighted"),
    (3, "spot"),
    (4, "multi-spot"),
    (5, "pattern"),
    (6, "partial"),
    (255, "other"),
];

const LIGHT_SOURCE: &[(u32, &str)] = &[
    (0, "unknown"),
    (1, "daylight"),
    (2, "fluorescent"),
    (3, "incandescent"),
    (4, "flash"),
    (9, "fine weather"),
    (10, "cloudy weather"),
    (11, "shade"),
    (12, "daylight fluorescent"),
    (13, "day white fluorescent"),
    (14, "cool white fluorescent"),
    (15, "white fluorescent"),
    (17, "standard light A"),
    (18, "standard light B"),
    (19, "standard light C"),
    (20, "D55"),
    (21, "D65"),
    (22, "D75"),
    (23, "D50"),
    (24, "ISO studio tungsten"),
    (255, "other"),
];

const FLASH: &[(u32, &str)] = &[
    (0x00, "no"),
    (0x01, "yes"),
    (0x05, "yes (strobe light not detected)"),
    (0x07, "yes (strobe light detected)"),
    (0x08, "no (on, did not fire)"),
    (0x09, "yes (manual)"),
    (0x0D, "yes (manual, return light not detected)"),
    (0x0F, "yes (manual, return light detected)"),
    (0x10, "no (manual)"),
    (0x18, "no (auto)"),
    (0x19, "yes (auto)"),
    (0x1D, "yes (auto, return light not detected)"),
    (0x1F, "yes (auto, return light detected)"),
    (0x20, "no flash function"),
    (0x41, "yes (red eye reduction mode)"),
    (0x45, "yes (red eye reduction mode, return light not detected)"),
    (0x47, "yes (red eye reduction mode, return light detected)"),
    (0x49, "yes (manual, red eye reduction mode)"),
    (0x4D, "yes (manual, red eye reduction mode, return light not detected)"),
    (0x4F, "yes (manual, red eye reduction mode, return light detected)"),
    (0x58, "no (auto, red eye reduction mode)"),
    (0x59, "yes (auto, red eye reduction mode)"),
    (0x5D, "yes (auto, red eye reduction mode, return light not detected)"),
    (0x5F, "yes (auto, red eye reduction mode, return light detected)"),
];

const COLOR_SPACE: &[(u32, &str)] = &[(1, "sRGB"), (2, "Adobe RGB"), (0xFFFF, "uncalibrated")];

const SENSING_METHOD: &[(u32, &str)] = &[
    (1, "not defined"),
    (2, "one-chip color area sensor"),
    (3, "two-chip color area sensor"),
    (4, "three-chip color area sensor"),
    (5, "color sequential area sensor"),
    (7, "trilinear sensor"),
    (8, "color sequential linear sensor"),
];

const CUSTOM_RENDERED: &[(u32, &str)] = &[(0, "normal process"), (1, "custom process")];

const EXPOSURE_MODE: &[(u32, &str)] = &[(0, "auto"), (1, "manual"), (2, "auto bracketing")];

const WHITE_BALANCE: &[(u32, &str)] = &[(0, "auto"), (1, "manual")];

const SCENE_CAPTURE_TYPE: &[(u32, &str)] = &[
    (0, "standard"),
    (1, "landscape"),
    (2, "portrait"),
    (3, "night scene"),
];

const GAIN_CONTROL: &[(u32, &str)] = &[
    (0, "none"),
    (1, "low gain up"),
    (2, "high gain up"),
    (3, "low gain down"),
    (4, "high gain down"),
];

const CONTRAST: &[(u32, &str)] = &[(0, "normal"), (1, "soft"), (2, "hard")];

const SATURATION: &[(u32, &str)] = &[(0, "normal"), (1, "low"), (2, "high")];

const SHARPNESS: &[(u32, &str)] = &[(0, "normal"), (1, "soft"), (2, "hard")];

const SUBJECT_DISTANCE_RANGE: &[(u32, &str)] = &[
    (0, "unknown"),
    (1, "macro"),
    (2, "close view"),
    (3, "distant view"),
];

const GPS_ALTITUDE_REF: &[(u32, &str)] = &[(0, "above sea level"), (1, "below sea level")];

const GPS_DIFFERENTIAL: &[(u32, &str)] = &[
    (0, "no correction"),
    (1, "differential correction"),
];

// =============================================================================
// Tag Tables
// =============================================================================

const fn tag(id: u16, name: &'static str, rule: Rule) -> (u16, TagInfo) {
    (id, TagInfo { name, rule })
}

const IMAGE_TAGS: &[(u16, TagInfo)] = &[
    // Image structure
    tag(0x0100, "ImageWidth", Plain),
    tag(0x0101, "ImageLength", Plain),
    tag(0x0102, "BitsPerSample", Plain),
    tag(0x0103, "Compression", Enumerated(COMPRESSION)),
    tag(0x0106, "PhotometricInterpretation", Enumerated(PHOTOMETRIC)),
    tag(0x0112, "Orientation", Enumerated(ORIENTATION)),
    tag(0x0115, "SamplesPerPixel", Plain),
    tag(0x011C, "PlanarConfiguration", Enumerated(PLANAR_CONFIGURATION)),
    tag(0x0212, "YCbCrSubSampling", Plain),
    tag(0x0213, "YCbCrPositioning", Enumerated(YCBCR_POSITIONING)),
    tag(0x011A, "XResolution", Plain),
    tag(0x011B, "YResolution", Plain),
    tag(0x0128, "ResolutionUnit", Enumerated(RESOLUTION_UNIT)),
    // Recording offsets
    tag(0x0111, "StripOffsets", Plain),
    tag(0x0116, "RowsPerStrip", Plain),
    tag(0x0117, "StripByteCounts", Plain),
    tag(0x0201, "JPEGInterchangeFormat", Plain),
    tag(0x0202, "JPEGInterchangeFormatLength", Plain),
    // Image data characteristics
    tag(0x012D, "TransferFunction", Plain),
    tag(0x013E, "WhitePoint", Plain),
    tag(0x013F, "PrimaryChromaticities", Plain),
    tag(0x0211, "YCbCrCoefficients", Plain),
    tag(0x0214, "ReferenceBlackWhite", Plain),
    // Descriptive
    tag(0x010E, "ImageDescription", Plain),
    tag(0x010F, "Make", Plain),
    tag(0x0110, "Model", Plain),
    tag(0x0131, "Software", Plain),
    tag(0x0132, "DateTime", DateTime),
    tag(0x013B, "Artist", Plain),
    tag(0x8298, "Copyright", Plain),
    // Directory pointers
    tag(0x8769, "ExifOffset", Plain),
    tag(0x8825, "GPSInfo", Plain),
    tag(0xA005, "InteropOffset", Plain),
    // Exif sub-directory: versions and colour
    tag(0x9000, "ExifVersion", Version),
    tag(0xA000, "FlashpixVersion", Version),
    tag(0xA001, "ColorSpace", Enumerated(COLOR_SPACE)),
    tag(0xA500, "Gamma", Plain),
    tag(0x9101, "ComponentsConfiguration", Plain),
    tag(0x9102, "CompressedBitsPerPixel", Plain),
    tag(0xA002, "PixelXDimension", Plain),
    tag(0xA003, "PixelYDimension", Plain),
    // Exif sub-directory: user information
    tag(0x927C, "MakerNote", Plain),
    tag(0x9286, "UserComment", EncodedText),
    tag(0xA004, "RelatedSoundFile", Plain),
    // Exif sub-directory: dates
    tag(0x9003, "DateTimeOriginal", DateTime),
    tag(0x9004, "DateTimeDigitized", DateTime),
    tag(0x9010, "OffsetTime", Plain),
    tag(0x9011, "OffsetTimeOriginal", Plain),
    tag(0x9012, "OffsetTimeDigitized", Plain),
    tag(0x9290, "SubSecTime", Plain),
    tag(0x9291, "SubSecTimeOriginal", Plain),
    tag(0x9292, "SubSecTimeDigitized", Plain),
    // Exif sub-directory: picture-taking conditions
    tag(0x829A, "ExposureTime", Plain),
    tag(0x829D, "FNumber", FNumber),
    tag(0x8822, "ExposureProgram", Enumerated(EXPOSURE_PROGRAM)),
    tag(0x8824, "SpectralSensitivity", Plain),
    tag(0x8827, "ISOSpeedRatings", Plain),
    tag(0x8830, "SensitivityType", Plain),
    tag(0x9201, "ShutterSpeedValue", ApexShutter),
    tag(0x9202, "ApertureValue", ApexAperture),
    tag(0x9203, "BrightnessValue", Plain),
    tag(0x9204, "ExposureBiasValue", ExposureBias),
    tag(0x9205, "MaxApertureValue", ApexAperture),
    tag(0x9206, "SubjectDistance", SubjectDistance),
    tag(0x9207, "MeteringMode", Enumerated(METERING_MODE)),
    tag(0x9208, "LightSource", Enumerated(LIGHT_SOURCE)),
    tag(0x9209, "Flash", Enumerated(FLASH)),
    tag(0x920A, "FocalLength", FocalLength),
    tag(0x9214, "SubjectArea", Plain),
    tag(0xA20B, "FlashEnergy", Plain),
    tag(0xA20E, "FocalPlaneXResolution", Plain),
    tag(0xA20F, "FocalPlaneYResolution", Plain),
    tag(0xA210, "FocalPlaneResolutionUnit", Enumerated(RESOLUTION_UNIT)),
    tag(0xA214, "SubjectLocation", Plain),
    tag(0xA215, "ExposureIndex", Plain),
    tag(0xA217, "SensingMethod", Enumerated(SENSING_METHOD)),
    tag(0xA300, "FileSource", Plain),
    tag(0xA301, "SceneType", Plain),
    tag(0xA401, "CustomRendered", Enumerated(CUSTOM_RENDERED)),
    tag(0xA402, "ExposureMode", Enumerated(EXPOSURE_MODE)),
    tag(0xA403, "WhiteBalance", Enumerated(WHITE_BALANCE)),
    tag(0xA404, "DigitalZoomRatio", Plain),
    tag(0xA405, "FocalLengthIn35mmFilm", FocalLength),
    tag(0xA406, "SceneCaptureType", Enumerated(SCENE_CAPTURE_TYPE)),
    tag(0xA407, "GainControl", Enumerated(GAIN_CONTROL)),
    tag(0xA408, "Contrast", Enumerated(CONTRAST)),
    tag(0xA409, "Saturation", Enumerated(SATURATION)),
    tag(0xA40A, "Sharpness", Enumerated(SHARPNESS)),
    tag(0xA40C, "SubjectDistanceRange", Enumerated(SUBJECT_DISTANCE_RANGE)),
    // Exif sub-directory: other
    tag(0xA420, "ImageUniqueID", Plain),
    tag(0xA430, "CameraOwnerName", Plain),
    tag(0xA431, "BodySerialNumber", Plain),
    tag(0xA432, "LensSpecification", Plain),
    tag(0xA433, "LensMake", Plain),
    tag(0xA434, "LensModel", Plain),
    tag(0xA435, "LensSerialNumber", Plain),
];

const GPS_TAGS: &[(u16, TagInfo)] = &[
    tag(0x0000, "GPSVersionID", Plain),
    tag(0x0001, "GPSLatitudeRef", Plain),
    tag(0x0002, "GPSLatitude", GpsCoordinate),
    tag(0x0003, "GPSLongitudeRef", Plain),
    tag(0x0004, "GPSLongitude", GpsCoordinate),
    tag(0x0005, "GPSAltitudeRef", Enumerated(GPS_ALTITUDE_REF)),
    tag(0x0006, "GPSAltitude", GpsAltitude),
    tag(0x0007, "GPSTimeStamp", GpsTimeStamp),
    tag(0x0008, "GPSSatellites", Plain),
    tag(0x0009, "GPSStatus", Plain),
    tag(0x000A, "GPSMeasureMode", Plain),
    tag(0x000B, "GPSDOP", Plain),
    tag(0x000C, "GPSSpeedRef", Plain),
    tag(0x000D, "GPSSpeed", Plain),
    tag(0x000E, "GPSTrackRef", Plain),
    tag(0x000F, "GPSTrack", Plain),
    tag(0x0010, "GPSImgDirectionRef", Plain),
    tag(0x0011, "GPSImgDirection", Plain),
    tag(0x0012, "GPSMapDatum", Plain),
    tag(0x0013, "GPSDestLatitudeRef", Plain),
    tag(0x0014, "GPSDestLatitude", GpsCoordinate),
    tag(0x0015, "GPSDestLongitudeRef", Plain),
    tag(0x0016, "GPSDestLongitude", GpsCoordinate),
    tag(0x0017, "GPSDestBearingRef", Plain),
    tag(0x0018, "GPSDestBearing", Plain),
    tag(0x0019, "GPSDestDistanceRef", Plain),
    tag(0x001A, "GPSDestDistance", Plain),
    tag(0x001B, "GPSProcessingMethod", EncodedText),
    tag(0x001C, "GPSAreaInformation", EncodedText),
    tag(0x001D, "GPSDateStamp", DateTime),
    tag(0x001E, "GPSDifferential", Enumerated(GPS_DIFFERENTIAL)),
    tag(0x001F, "GPSHPositioningError", Plain),
];

const INTEROP_TAGS: &[(u16, TagInfo)] = &[
    tag(0x0001, "InteroperabilityIndex", Plain),
    tag(0x0002, "InteroperabilityVersion", Version),
    tag(0x1001, "RelatedImageWidth", Plain),
    tag(0x1002, "RelatedImageLength", Plain),
];

// =============================================================================
// TagDictionary
// =============================================================================

/// Read-only mapping from (namespace, tag) to display name and rule.
#[derive(Debug)]
pub struct TagDictionary {
    tags: HashMap<(TagSpace, u16), TagInfo>,
}

impl TagDictionary {
    fn build() -> Self {
        let spaces = [
            (TagSpace::Image, IMAGE_TAGS),
            (TagSpace::Gps, GPS_TAGS),
            (TagSpace::Interop, INTEROP_TAGS),
        ];
        let tags = spaces
            .iter()
            .flat_map(|&(space, table)| table.iter().map(move |&(id, info)| ((space, id), info)))
            .collect();
        Self { tags }
    }

    /// The process-wide dictionary, built on first access.
    pub fn global() -> &'static TagDictionary {
        static DICTIONARY: OnceLock<TagDictionary> = OnceLock::new();
        DICTIONARY.get_or_init(TagDictionary::build)
    }

    /// Look up a tag in a namespace.
    pub fn lookup(&self, space: TagSpace, tag: u16) -> Option<&TagInfo> {
        self.tags.get(&(space, tag))
    }

    /// Number of known tags across all namespaces.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

/// Label for `value` in an enumerated table.
pub fn enumerated_label(table: &[(u32, &'static str)], value: u32) -> Option<&'static str> {
    table
        .iter()
        .find(|&&(key, _)| key == value)
        .map(|&(_, label)| label)
}

// =============================================================================
// Tests
// =============================================================================
