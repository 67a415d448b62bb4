use thiserror::Error;

use crate::meta::Namespace;

/// A checked read that would run past the end of a byte block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("range out of bounds: requested {requested} bytes at offset {offset}, block size is {size}")]
pub struct OutOfBounds {
    pub offset: usize,
    pub requested: usize,
    pub size: usize,
}

/// I/O errors raised while listing or reading image files
#[derive(Debug, Clone, Error)]
pub enum IoError {
    /// Image or directory does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other failure while reading from the source
    #[error("Failed to read {path}: {message}")]
    Read { path: String, message: String },
}

/// Errors that can occur when decoding an EXIF APP1 segment
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExifError {
    /// Block is too short, lacks the `Exif\0\0` identifier, or the TIFF header is invalid
    #[error("Malformed EXIF header: {reason}")]
    MalformedHeader { reason: String },

    /// A computed read would leave the segment
    #[error("EXIF offset out of range: {0}")]
    OffsetOutOfRange(#[from] OutOfBounds),

    /// Entry type id outside the twelve TIFF field types
    #[error("Unsupported EXIF field type: {0}")]
    UnsupportedType(u16),

    /// Tag absent from every reachable IFD
    #[error("EXIF tag 0x{0:04X} not found")]
    NotFound(u16),

    /// A pointer tag leads back to an IFD that was already visited
    #[error("Cyclic IFD reference at offset {0}")]
    CyclicReference(usize),

    /// Entry index beyond the IFD's declared entry count
    #[error("IFD entry index {index} out of range (count {count})")]
    EntryIndexOutOfRange { index: u32, count: u32 },
}

/// Errors that can occur when scanning the JPEG container
#[derive(Debug, Clone, PartialEq, Error)]
pub enum JpegError {
    /// Data does not start with the SOI marker
    #[error("Not a JPEG stream (missing SOI marker)")]
    NotJpeg,

    /// Expected a marker prefix (0xFF) but found another byte
    #[error("Invalid marker at offset {offset}: found 0x{byte:02X}")]
    InvalidMarker { offset: usize, byte: u8 },

    /// A segment length field smaller than the field itself
    #[error("Invalid segment length {length} at offset {offset}")]
    InvalidLength { offset: usize, length: u16 },

    /// A segment length runs past the end of the data
    #[error("Truncated JPEG segment: {0}")]
    Truncated(#[from] OutOfBounds),
}

/// Errors that can occur when decoding IPTC (APP13) data
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IptcError {
    /// Segment lacks the Photoshop identifier or a resource block is corrupt
    #[error("Malformed IPTC segment: {reason}")]
    Malformed { reason: String },

    /// A resource or dataset runs past the end of the segment
    #[error("Truncated IPTC segment: {0}")]
    Truncated(#[from] OutOfBounds),

    /// Dataset not present
    #[error("IPTC dataset {record}:{dataset} not found")]
    NotFound { record: u8, dataset: u8 },
}

/// Errors that can occur when reading XMP properties
#[derive(Debug, Clone, PartialEq, Error)]
pub enum XmpError {
    /// Segment lacks the XMP identifier or is not UTF-8
    #[error("Malformed XMP packet: {reason}")]
    Malformed { reason: String },

    /// Tag id has no entry in the XMP property table
    #[error("Unknown XMP tag: {0}")]
    UnknownTag(u16),

    /// Property not present in the packet
    #[error("XMP property {0} not found")]
    NotFound(&'static str),
}

/// Errors that can occur when reading the JPEG frame header
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SofError {
    /// Frame header shorter than its fixed fields
    #[error("Truncated frame header: {0}")]
    Truncated(#[from] OutOfBounds),

    /// Tag id is not one of the frame header fields
    #[error("Frame header field {0} not found")]
    NotFound(u16),
}

/// Errors surfaced by the image facade
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetaError {
    #[error("EXIF error: {0}")]
    Exif(#[from] ExifError),

    #[error("IPTC error: {0}")]
    Iptc(#[from] IptcError),

    #[error("XMP error: {0}")]
    Xmp(#[from] XmpError),

    #[error("SOF error: {0}")]
    Sof(#[from] SofError),

    /// The image has no segment for the requested namespace
    #[error("Image has no {0} segment")]
    SegmentMissing(Namespace),
}

impl MetaError {
    /// Whether this error only means "the value is absent".
    ///
    /// Absent values are omitted from the index; every other error means the
    /// namespace is malformed for this file.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            MetaError::Exif(ExifError::NotFound(_))
                | MetaError::Iptc(IptcError::NotFound { .. })
                | MetaError::Xmp(XmpError::NotFound(_))
                | MetaError::Sof(SofError::NotFound(_))
                | MetaError::SegmentMissing(_)
        )
    }
}

/// Why a single file was left out of the index
#[derive(Debug, Error)]
pub enum FileError {
    #[error(transparent)]
    Io(#[from] IoError),

    #[error(transparent)]
    Jpeg(#[from] JpegError),

    #[error("Decode task failed: {0}")]
    Task(String),
}

/// Errors that abort a whole indexing run
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    #[error("Failed to serialize index: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Indexing task failed: {0}")]
    Task(String),
}
