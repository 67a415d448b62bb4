//! EXIF field types and the tag-name table.
//!
//! This module defines the vocabulary for EXIF decoding:
//! - Field types that determine how many bytes a value occupies and how
//!   those bytes are reinterpreted
//! - Tag IDs for IFD0, the EXIF and GPS sub-IFDs and the Windows XP block,
//!   with their human-readable names

// =============================================================================
// Field Types
// =============================================================================

/// The twelve TIFF field types an IFD entry can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum FieldType {
    /// Unsigned 8-bit integer
    Byte = 1,
    /// 8-bit ASCII character, NUL-terminated string
    Ascii = 2,
    /// Unsigned 16-bit integer
    Short = 3,
    /// Unsigned 32-bit integer
    Long = 4,
    /// Two unsigned 32-bit integers: numerator, denominator
    Rational = 5,
    /// Signed 8-bit integer
    SByte = 6,
    /// Opaque byte
    Undefined = 7,
    /// Signed 16-bit integer
    SShort = 8,
    /// Signed 32-bit integer
    SLong = 9,
    /// Two signed 32-bit integers: numerator, denominator
    SRational = 10,
    /// IEEE-754 single precision
    Float = 11,
    /// IEEE-754 double precision
    Double = 12,
}

/// Flag OR'd into a type id when an entry holds more than one value.
pub const ARRAY_FLAG: u16 = 0x0100;

impl FieldType {
    /// Maximum bytes stored inline in the 4-byte value slot of an entry.
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

    /// Create a FieldType from its numeric value.
    ///
    /// Returns `None` for type ids outside the twelve defined encodings.
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

    /// Check if `count` values of this type fit in the entry's value slot.
    #[inline]
    pub fn fits_inline(self, count: u32) -> bool {
        (self.size_in_bytes() as u64) * (count as u64) <= Self::INLINE_THRESHOLD as u64
    }

    pub const fn name(self) -> &'static str {
        match self {
            FieldType::Byte => "BYTE",
            FieldType::Ascii => "ASCII",
            FieldType::Short => "SHORT",
            FieldType::Long => "LONG",
            FieldType::Rational => "RATIONAL",
            FieldType::SByte => "SBYTE",
            FieldType::Undefined => "UNDEFINED",
            FieldType::SShort => "SSHORT",
            FieldType::SLong => "SLONG",
            FieldType::SRational => "SRATIONAL",
            FieldType::Float => "FLOAT",
            FieldType::Double => "DOUBLE",
        }
    }
}

// =============================================================================
// Tag Groups
// =============================================================================

/// The directory a tag is defined for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagGroup {
    /// IFD0 (primary image) tags
    Primary,
    /// EXIF sub-IFD tags
    Exif,
    /// GPS sub-IFD tags
    Gps,
    /// Microsoft Windows XP tags, stored in IFD0
    WindowsXp,
    /// Tags whose value is the offset of another IFD
    Pointer,
}

impl TagGroup {
    pub const fn name(self) -> &'static str {
        match self {
            TagGroup::Primary => "IFD0",
            TagGroup::Exif => "EXIF",
            TagGroup::Gps => "GPS",
            TagGroup::WindowsXp => "XP",
            TagGroup::Pointer => "Pointer",
        }
    }
}

// =============================================================================
// EXIF Tags
// =============================================================================

macro_rules! exif_tags {
    ($($variant:ident = $id:literal => $group:ident,)*) => {
        /// EXIF tag IDs with their canonical names.
        ///
        /// IDs are unique across all groups listed here, so a tag can be
        /// resolved from its numeric ID alone.
        #[allow(clippy::upper_case_acronyms)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u16)]
        pub enum ExifTag {
            $($variant = $id,)*
        }

        impl ExifTag {
            /// Every tag in the table, in declaration order.
            pub const ALL: &'static [ExifTag] = &[$(ExifTag::$variant,)*];

            /// Look up a tag by its numeric ID.
            pub fn from_u16(value: u16) -> Option<Self> {
                match value {
                    $($id => Some(ExifTag::$variant),)*
                    _ => None,
                }
            }

            /// Canonical EXIF name (e.g. `DateTimeOriginal`).
            pub const fn name(self) -> &'static str {
                match self {
                    $(ExifTag::$variant => stringify!($variant),)*
                }
            }

            /// Directory the tag belongs to.
            pub const fn group(self) -> TagGroup {
                match self {
                    $(ExifTag::$variant => TagGroup::$group,)*
                }
            }
        }
    };
}

exif_tags! {
    // IFD0
    ImageWidth = 0x0100 => Primary,
    ImageLength = 0x0101 => Primary,
    BitsPerSample = 0x0102 => Primary,
    Compression = 0x0103 => Primary,
    PhotometricInterpretation = 0x0106 => Primary,
    ImageDescription = 0x010E => Primary,
    Make = 0x010F => Primary,
    Model = 0x0110 => Primary,
    StripOffsets = 0x0111 => Primary,
    Orientation = 0x0112 => Primary,
    SamplesPerPixel = 0x0115 => Primary,
    RowsPerStrip = 0x0116 => Primary,
    StripByteCounts = 0x0117 => Primary,
    XResolution = 0x011A => Primary,
    YResolution = 0x011B => Primary,
    PlanarConfiguration = 0x011C => Primary,
    ResolutionUnit = 0x0128 => Primary,
    TransferFunction = 0x012D => Primary,
    Software = 0x0131 => Primary,
    DateTime = 0x0132 => Primary,
    Artist = 0x013B => Primary,
    WhitePoint = 0x013E => Primary,
    PrimaryChromaticities = 0x013F => Primary,
    JPEGInterchangeFormat = 0x0201 => Primary,
    JPEGInterchangeFormatLength = 0x0202 => Primary,
    YCbCrCoefficients = 0x0211 => Primary,
    YCbCrSubSampling = 0x0212 => Primary,
    YCbCrPositioning = 0x0213 => Primary,
    ReferenceBlackWhite = 0x0214 => Primary,
    Copyright = 0x8298 => Primary,

    // Sub-IFD pointers
    ExifIFDPointer = 0x8769 => Pointer,
    GPSInfoIFDPointer = 0x8825 => Pointer,
    InteroperabilityIFDPointer = 0xA005 => Pointer,

    // EXIF sub-IFD
    ExposureTime = 0x829A => Exif,
    FNumber = 0x829D => Exif,
    ExposureProgram = 0x8822 => Exif,
    SpectralSensitivity = 0x8824 => Exif,
    PhotographicSensitivity = 0x8827 => Exif,
    OECF = 0x8828 => Exif,
    SensitivityType = 0x8830 => Exif,
    StandardOutputSensitivity = 0x8831 => Exif,
    RecommendedExposureIndex = 0x8832 => Exif,
    ISOSpeed = 0x8833 => Exif,
    ISOSpeedLatitudeyyy = 0x8834 => Exif,
    ISOSpeedLatitudezzz = 0x8835 => Exif,
    ExifVersion = 0x9000 => Exif,
    DateTimeOriginal = 0x9003 => Exif,
    DateTimeDigitized = 0x9004 => Exif,
    ComponentsConfiguration = 0x9101 => Exif,
    CompressedBitsPerPixel = 0x9102 => Exif,
    ShutterSpeedValue = 0x9201 => Exif,
    ApertureValue = 0x9202 => Exif,
    BrightnessValue = 0x9203 => Exif,
    ExposureBiasValue = 0x9204 => Exif,
    MaxApertureValue = 0x9205 => Exif,
    SubjectDistance = 0x9206 => Exif,
    MeteringMode = 0x9207 => Exif,
    LightSource = 0x9208 => Exif,
    Flash = 0x9209 => Exif,
    FocalLength = 0x920A => Exif,
    SubjectArea = 0x9214 => Exif,
    MakerNote = 0x927C => Exif,
    UserComment = 0x9286 => Exif,
    SubsecTime = 0x9290 => Exif,
    SubsecTimeOriginal = 0x9291 => Exif,
    SubsecTimeDigitized = 0x9292 => Exif,
    FlashpixVersion = 0xA000 => Exif,
    ColorSpace = 0xA001 => Exif,
    PixelXDimension = 0xA002 => Exif,
    PixelYDimension = 0xA003 => Exif,
    RelatedSoundFile = 0xA004 => Exif,
    FlashEnergy = 0xA20B => Exif,
    SpatialFrequencyResponse = 0xA20C => Exif,
    FocalPlaneXResolution = 0xA20E => Exif,
    FocalPlaneYResolution = 0xA20F => Exif,
    FocalPlaneResolutionUnit = 0xA210 => Exif,
    SubjectLocation = 0xA214 => Exif,
    ExposureIndex = 0xA215 => Exif,
    SensingMethod = 0xA217 => Exif,
    FileSource = 0xA300 => Exif,
    SceneType = 0xA301 => Exif,
    CFAPattern = 0xA302 => Exif,
    CustomRendered = 0xA401 => Exif,
    ExposureMode = 0xA402 => Exif,
    WhiteBalance = 0xA403 => Exif,
    DigitalZoomRatio = 0xA404 => Exif,
    FocalLengthIn35mmFilm = 0xA405 => Exif,
    SceneCaptureType = 0xA406 => Exif,
    GainControl = 0xA407 => Exif,
    Contrast = 0xA408 => Exif,
    Saturation = 0xA409 => Exif,
    Sharpness = 0xA40A => Exif,
    DeviceSettingDescription = 0xA40B => Exif,
    SubjectDistanceRange = 0xA40C => Exif,
    ImageUniqueID = 0xA420 => Exif,
    CameraOwnerName = 0xA430 => Exif,
    BodySerialNumber = 0xA431 => Exif,
    LensSpecification = 0xA432 => Exif,
    LensMake = 0xA433 => Exif,
    LensModel = 0xA434 => Exif,
    LensSerialNumber = 0xA435 => Exif,

    // GPS sub-IFD
    GPSVersionID = 0x0000 => Gps,
    GPSLatitudeRef = 0x0001 => Gps,
    GPSLatitude = 0x0002 => Gps,
    GPSLongitudeRef = 0x0003 => Gps,
    GPSLongitude = 0x0004 => Gps,
    GPSAltitudeRef = 0x0005 => Gps,
    GPSAltitude = 0x0006 => Gps,
    GPSTimestamp = 0x0007 => Gps,
    GPSSatellites = 0x0008 => Gps,
    GPSStatus = 0x0009 => Gps,
    GPSMeasureMode = 0x000A => Gps,
    GPSDOP = 0x000B => Gps,
    GPSSpeedRef = 0x000C => Gps,
    GPSSpeed = 0x000D => Gps,
    GPSTrackRef = 0x000E => Gps,
    GPSTrack = 0x000F => Gps,
    GPSImgDirectionRef = 0x0010 => Gps,
    GPSImgDirection = 0x0011 => Gps,
    GPSMapDatum = 0x0012 => Gps,
    GPSDestLatitudeRef = 0x0013 => Gps,
    GPSDestLatitude = 0x0014 => Gps,
    GPSDestLongitudeRef = 0x0015 => Gps,
    GPSDestLongitude = 0x0016 => Gps,
    GPSDestBearingRef = 0x0017 => Gps,
    GPSDestBearing = 0x0018 => Gps,
    GPSDestDistanceRef = 0x0019 => Gps,
    GPSDestDistance = 0x001A => Gps,
    GPSProcessingMethod = 0x001B => Gps,
    GPSAreaInformation = 0x001C => Gps,
    GPSDateStamp = 0x001D => Gps,
    GPSDifferential = 0x001E => Gps,
    GPSHPositioningError = 0x001F => Gps,

    // Windows XP, non-standard but ubiquitous
    XPTitle = 0x9C9B => WindowsXp,
    XPComment = 0x9C9C => WindowsXp,
    XPAuthor = 0x9C9D => WindowsXp,
    XPKeywords = 0x9C9E => WindowsXp,
    XPSubject = 0x9C9F => WindowsXp,
}

impl ExifTag {
    /// Get the numeric tag ID.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Look up a tag by name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|tag| tag.name().eq_ignore_ascii_case(name))
    }

    /// All tags of one group.
    pub fn in_group(group: TagGroup) -> impl Iterator<Item = ExifTag> {
        Self::ALL.iter().copied().filter(move |tag| tag.group() == group)
    }
}

/// Look up a tag by name, ignoring ASCII case.
pub fn tag_by_name(name: &str) -> Option<ExifTag> {
    ExifTag::from_name(name)
}

/// Look up a tag by ID within one group.
pub fn tag_by_id(group: TagGroup, id: u16) -> Option<ExifTag> {
    ExifTag::from_u16(id).filter(|tag| tag.group() == group)
}

/// Look up a tag by ID in any group.
pub fn find_by_id(id: u16) -> Option<ExifTag> {
    ExifTag::from_u16(id)
}

/// Parse a tag given either by name (`Orientation`) or by hexadecimal ID
/// (`0x112`).
pub fn parse_tag_id(input: &str) -> Option<u16> {
    let input = input.trim();
    if let Some(hex) = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
    {
        return u16::from_str_radix(hex, 16).ok();
    }
    ExifTag::from_name(input).map(ExifTag::as_u16)
}

// =============================================================================
// Tests
// =============================================================================
