//! Namespace dispatch over the segments of one JPEG file.

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use serde::Serialize;

use crate::error::{ExifError, IptcError, JpegError, MetaError, SofError, XmpError};
use crate::format::jpeg::Segment;
use crate::format::{ExifSegment, IptcSegment, JpegFile, SofSegment, Value, XmpSegment};

// =============================================================================
// Namespace
// =============================================================================

/// A metadata namespace, each backed by one kind of JPEG segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Namespace {
    #[serde(rename = "EXIF")]
    Exif,
    #[serde(rename = "IPTC")]
    Iptc,
    #[serde(rename = "SOF0")]
    Sof0,
    #[serde(rename = "XMP")]
    Xmp,
}

impl Namespace {
    pub const ALL: [Namespace; 4] = [
        Namespace::Exif,
        Namespace::Iptc,
        Namespace::Sof0,
        Namespace::Xmp,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Namespace::Exif => "EXIF",
            Namespace::Iptc => "IPTC",
            Namespace::Sof0 => "SOF0",
            Namespace::Xmp => "XMP",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Namespace {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Namespace::ALL
            .iter()
            .copied()
            .find(|ns| ns.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown namespace '{}' (expected EXIF, IPTC, SOF0 or XMP)", s))
    }
}

// =============================================================================
// TagLookup
// =============================================================================

/// Single-tag lookup shared by every segment decoder.
pub trait TagLookup {
    type Error: Into<MetaError>;

    fn read_tag_value(&self, tag: u16) -> Result<Value, Self::Error>;
}

impl TagLookup for ExifSegment<'_> {
    type Error = ExifError;

    fn read_tag_value(&self, tag: u16) -> Result<Value, ExifError> {
        ExifSegment::read_tag_value(self, tag)
    }
}

impl TagLookup for IptcSegment<'_> {
    type Error = IptcError;

    fn read_tag_value(&self, tag: u16) -> Result<Value, IptcError> {
        IptcSegment::read_tag_value(self, tag)
    }
}

impl TagLookup for XmpSegment<'_> {
    type Error = XmpError;

    fn read_tag_value(&self, tag: u16) -> Result<Value, XmpError> {
        XmpSegment::read_tag_value(self, tag)
    }
}

impl TagLookup for SofSegment<'_> {
    type Error = SofError;

    fn read_tag_value(&self, tag: u16) -> Result<Value, SofError> {
        SofSegment::read_tag_value(self, tag)
    }
}

fn lookup<L: TagLookup>(decoder: L, tag: u16) -> Result<Value, MetaError> {
    decoder.read_tag_value(tag).map_err(Into::into)
}

// =============================================================================
// Image
// =============================================================================

/// A scanned JPEG file.
///
/// The container is scanned once; each lookup decodes from the kept
/// segment slices.
#[derive(Debug, Clone)]
pub struct Image {
    jpeg: JpegFile,
}

impl Image {
    /// Scan a JPEG stream.
    pub fn from_bytes(data: Bytes) -> Result<Self, JpegError> {
        Ok(Self {
            jpeg: JpegFile::parse(data)?,
        })
    }

    pub fn jpeg(&self) -> &JpegFile {
        &self.jpeg
    }

    /// The segment backing a namespace, if present.
    pub fn segment(&self, namespace: Namespace) -> Option<&Segment> {
        match namespace {
            Namespace::Exif => self.jpeg.exif(),
            Namespace::Iptc => self.jpeg.photoshop(),
            Namespace::Sof0 => self.jpeg.frame(),
            Namespace::Xmp => self.jpeg.xmp(),
        }
    }

    pub fn has(&self, namespace: Namespace) -> bool {
        self.segment(namespace).is_some()
    }

    pub fn exif(&self) -> Option<ExifSegment<'_>> {
        self.jpeg.exif().map(|s| ExifSegment::new(&s.data))
    }

    /// Look up one tag of a namespace.
    ///
    /// # Errors
    /// `SegmentMissing` if the file has no segment for the namespace,
    /// otherwise the namespace decoder's error.
    pub fn read_tag_value(&self, namespace: Namespace, tag: u16) -> Result<Value, MetaError> {
        let segment = self
            .segment(namespace)
            .ok_or(MetaError::SegmentMissing(namespace))?;
        let block = &segment.data[..];

        match namespace {
            Namespace::Exif => lookup(ExifSegment::new(block), tag),
            Namespace::Iptc => lookup(IptcSegment::new(block), tag),
            Namespace::Sof0 => lookup(SofSegment::new(block), tag),
            Namespace::Xmp => lookup(XmpSegment::new(block), tag),
        }
    }
}
