//! JPEG container scanning.
//!
//! Metadata lives in marker segments that precede the entropy-coded image
//! data. This module walks those segments once, from SOI up to the first
//! SOS (or EOI), and keeps a zero-copy [`Bytes`] slice of each one.
//!
//! # Segment Layout
//!
//! ```text
//! 2 bytes:  Marker (0xFF, code)
//! 2 bytes:  Length, big-endian, counting itself but not the marker
//! N bytes:  Payload (length - 2 bytes)
//! ```
//!
//! SOI, EOI, TEM and RST0-RST7 are standalone markers with no length.
//! Any number of 0xFF fill bytes may precede a marker code.

use bytes::Bytes;

use crate::error::JpegError;
use crate::io::ByteBlock;

// =============================================================================
// JPEG Markers
// =============================================================================

/// Start Of Image marker
pub const SOI: u16 = 0xFFD8;

/// End Of Image marker
pub const EOI: u16 = 0xFFD9;

/// Start Of Frame (baseline DCT) marker
pub const SOF0: u16 = 0xFFC0;

/// Start Of Frame (extended sequential DCT) marker
pub const SOF1: u16 = 0xFFC1;

/// Start Of Frame (progressive DCT) marker
pub const SOF2: u16 = 0xFFC2;

/// Start Of Scan marker
pub const SOS: u16 = 0xFFDA;

/// Application segment 1 (EXIF, XMP) marker
pub const APP1: u16 = 0xFFE1;

/// Application segment 13 (Photoshop IRB, IPTC) marker
pub const APP13: u16 = 0xFFED;

/// Temporary marker, standalone
const TEM: u16 = 0xFF01;

/// Restart markers RST0-RST7, standalone
const RST0: u16 = 0xFFD0;
const RST7: u16 = 0xFFD7;

/// APP1 payload prefix of an EXIF segment.
pub const EXIF_SIGNATURE: &[u8] = b"Exif\0\0";

/// APP1 payload prefix of an XMP packet.
pub const XMP_SIGNATURE: &[u8] = b"http://ns.adobe.com/xap/1.0/\0";

/// APP13 payload prefix of a Photoshop image resource block.
pub const PHOTOSHOP_SIGNATURE: &[u8] = b"Photoshop 3.0\0";

/// Bytes before a segment's payload: marker and length.
pub const SEGMENT_HEADER_SIZE: usize = 4;

// =============================================================================
// Segment
// =============================================================================

/// One marker segment of a JPEG stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Full marker, e.g. 0xFFE1
    pub marker: u16,

    /// Position of the marker in the stream
    pub offset: usize,

    /// The whole segment: marker, length and payload
    pub data: Bytes,
}

impl Segment {
    /// Segment bytes after the marker and length.
    pub fn payload(&self) -> &[u8] {
        self.data.get(SEGMENT_HEADER_SIZE..).unwrap_or(&[])
    }

    /// Whether the payload starts with `signature`.
    pub fn has_signature(&self, signature: &[u8]) -> bool {
        self.payload().starts_with(signature)
    }
}

/// Whether `marker` stands alone, without a length field.
fn is_standalone(marker: u16) -> bool {
    marker == TEM || (RST0..=RST7).contains(&marker)
}

// =============================================================================
// JpegFile
// =============================================================================

/// The header segments of a JPEG stream.
#[derive(Debug, Clone)]
pub struct JpegFile {
    data: Bytes,
    segments: Vec<Segment>,
}

impl JpegFile {
    /// Scan the marker segments of a JPEG stream.
    ///
    /// Scanning stops after the first SOS segment or at EOI. Entropy-coded
    /// data is never read.
    ///
    /// # Errors
    /// - `NotJpeg` if the data does not start with SOI
    /// - `InvalidMarker` if a segment is not followed by a marker
    /// - `InvalidLength` if a length field is smaller than 2
    /// - `Truncated` if a segment runs past the end of the data
    pub fn parse(data: Bytes) -> Result<Self, JpegError> {
        let block = ByteBlock::new(&data);
        if block.len() < 2 || block.u16_be_at(0)? != SOI {
            return Err(JpegError::NotJpeg);
        }

        let mut segments = Vec::new();
        let mut pos = 2;

        while pos < block.len() {
            let byte = block.u8_at(pos)?;
            if byte != 0xFF {
                return Err(JpegError::InvalidMarker { offset: pos, byte });
            }

            // Skip fill bytes
            let mut code_pos = pos + 1;
            while block.u8_at(code_pos)? == 0xFF {
                code_pos += 1;
            }
            let start = code_pos - 1;
            let marker = 0xFF00 | block.u8_at(code_pos)? as u16;

            if marker == EOI {
                break;
            }
            if is_standalone(marker) {
                pos = code_pos + 1;
                continue;
            }

            let length = block.u16_be_at(code_pos + 1)?;
            if length < 2 {
                return Err(JpegError::InvalidLength {
                    offset: start,
                    length,
                });
            }

            let size = 2 + length as usize;
            block.slice(start, size)?;
            segments.push(Segment {
                marker,
                offset: start,
                data: data.slice(start..start + size),
            });

            if marker == SOS {
                break;
            }
            pos = start + size;
        }

        Ok(Self { data, segments })
    }

    /// The whole stream.
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// All segments in stream order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// First segment with the given marker.
    pub fn find(&self, marker: u16) -> Option<&Segment> {
        self.segments.iter().find(|s| s.marker == marker)
    }

    fn find_signed(&self, marker: u16, signature: &[u8]) -> Option<&Segment> {
        self.segments
            .iter()
            .find(|s| s.marker == marker && s.has_signature(signature))
    }

    /// The EXIF APP1 segment.
    pub fn exif(&self) -> Option<&Segment> {
        self.find_signed(APP1, EXIF_SIGNATURE)
    }

    /// The XMP APP1 segment.
    pub fn xmp(&self) -> Option<&Segment> {
        self.find_signed(APP1, XMP_SIGNATURE)
    }

    /// The Photoshop APP13 segment.
    pub fn photoshop(&self) -> Option<&Segment> {
        self.find_signed(APP13, PHOTOSHOP_SIGNATURE)
    }

    /// The frame header (SOF0, SOF1 or SOF2).
    pub fn frame(&self) -> Option<&Segment> {
        self.segments
            .iter()
            .find(|s| matches!(s.marker, SOF0 | SOF1 | SOF2))
    }
}

// =============================================================================
// Tests
// =============================================================================
