//! EXIF decoder for JPEG APP1 segments.
//!
//! This module locates and decodes individual EXIF tags inside one APP1
//! block, without ever materialising the whole tag set.
//!
//! # Key Concepts
//!
//! - **Byte order**: the TIFF header at block offset 10 declares the
//!   endianness ("II" or "MM") of every multi-byte value after it. The APP1
//!   marker and length are always big-endian.
//!
//! - **IFD graph**: IFD0 links to the EXIF and GPS sub-IFDs, the EXIF
//!   sub-IFD links to the Interoperability sub-IFD, and IFD0's next link is
//!   IFD1 (thumbnail). Lookups walk this graph and stop at the first match.
//!
//! - **Inline vs offset values**: values of at most 4 bytes live in the
//!   entry itself, larger ones at an offset relative to the owning IFD.
//!
//! The decoder is pure: it never logs and never panics on malformed input,
//! every failure is an [`ExifError`].

mod describe;
mod parser;
mod tags;
mod values;
mod walker;

pub use describe::{describe, describe_code};
pub use parser::{
    tiff_position, Ifd, IfdEntry, IfdKind, TiffHeader, EXIF_IDENTIFIER, IFD_ENTRY_SIZE,
    TIFF_HEADER_OFFSET, TIFF_HEADER_SIZE,
};
pub use tags::{
    find_by_id, parse_tag_id, tag_by_id, tag_by_name, ExifTag, FieldType, TagGroup, ARRAY_FLAG,
};
pub use values::{decode_xp_text, ValueDecoder};
pub use walker::IfdGraphWalker;

use std::ops::ControlFlow;

use crate::error::ExifError;
use crate::format::Value;
use crate::io::{ByteBlock, ByteCursor};

/// Identifier position inside the APP1 block.
const IDENTIFIER_OFFSET: usize = 4;

// =============================================================================
// ExifSegment
// =============================================================================

/// A borrowed EXIF APP1 block.
///
/// The block starts with the `FF E1` marker. Every call re-reads the header;
/// nothing is cached, so an `ExifSegment` is as cheap to copy as a slice.
#[derive(Debug, Clone, Copy)]
pub struct ExifSegment<'a> {
    block: ByteBlock<'a>,
}

/// One entry reached while enumerating a segment.
#[derive(Debug, Clone, PartialEq)]
pub struct ExifField {
    /// Directory the entry was found in
    pub ifd: IfdKind,

    /// The raw entry
    pub entry: IfdEntry,

    /// Decoded value, or why it could not be decoded
    pub value: Result<Value, ExifError>,
}

impl ExifField {
    /// The tag table entry, if the tag is known.
    pub fn tag(&self) -> Option<ExifTag> {
        ExifTag::from_u16(self.entry.tag_id)
    }
}

impl<'a> ExifSegment<'a> {
    pub fn new(block: &'a [u8]) -> Self {
        Self {
            block: ByteBlock::new(block),
        }
    }

    /// The raw block.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.block.as_slice()
    }

    /// JPEG marker at offset 0 (0xFFE1 for APP1), big-endian.
    pub fn marker(&self) -> Result<u16, ExifError> {
        Ok(self.block.u16_be_at(0)?)
    }

    /// Segment length at offset 2, big-endian.
    ///
    /// Counts the length field and payload but not the marker.
    pub fn length(&self) -> Result<u16, ExifError> {
        Ok(self.block.u16_be_at(2)?)
    }

    /// Whether bytes 4..10 are the `Exif\0\0` identifier.
    pub fn has_identifier(&self) -> bool {
        self.block
            .slice(IDENTIFIER_OFFSET, EXIF_IDENTIFIER.len())
            .map(|id| id == EXIF_IDENTIFIER)
            .unwrap_or(false)
    }

    /// Parse the TIFF header.
    ///
    /// # Errors
    /// `MalformedHeader` if the block is too short, lacks the `Exif\0\0`
    /// identifier, or carries an invalid byte order marker or signature.
    pub fn header(&self) -> Result<TiffHeader, ExifError> {
        if !self.has_identifier() {
            return Err(ExifError::MalformedHeader {
                reason: "missing Exif identifier".to_string(),
            });
        }
        TiffHeader::parse(self.block.as_slice())
    }

    fn walker(&self) -> Result<IfdGraphWalker<'a>, ExifError> {
        let header = self.header()?;
        let cursor = ByteCursor::new(self.block, header.byte_order);
        Ok(IfdGraphWalker::new(cursor, header))
    }

    /// Find and decode one tag.
    ///
    /// IFD0 is searched first, then the sub-IFDs it points to, then IFD1.
    /// The first entry with a matching tag id wins.
    ///
    /// # Errors
    /// - `MalformedHeader` for an invalid APP1/TIFF header
    /// - `NotFound` if no reachable IFD holds the tag
    /// - `OffsetOutOfRange`, `UnsupportedType` or `CyclicReference` for a
    ///   corrupt IFD graph or entry
    pub fn read_tag_value(&self, tag_id: u16) -> Result<Value, ExifError> {
        self.walker()?.find_tag_value(tag_id)
    }

    /// Every entry of every reachable IFD, in traversal order.
    ///
    /// Entries whose value cannot be decoded are still listed, with the
    /// decode error in [`ExifField::value`]. Structural errors abort.
    pub fn tags(&self) -> Result<Vec<ExifField>, ExifError> {
        let header = self.header()?;
        let cursor = ByteCursor::new(self.block, header.byte_order);
        let walker = IfdGraphWalker::new(cursor, header);

        let mut fields = Vec::new();
        walker.walk::<(), _>(|ifd, entry| {
            let value = ValueDecoder::new(cursor, ifd.position()).decode(entry);
            fields.push(ExifField {
                ifd: ifd.kind(),
                entry: *entry,
                value,
            });
            ControlFlow::Continue(())
        })?;
        Ok(fields)
    }
}

/// Decode one tag from an APP1 block.
///
/// Shorthand for `ExifSegment::new(block).read_tag_value(tag_id)`.
pub fn read_tag_value(block: &[u8], tag_id: u16) -> Result<Value, ExifError> {
    ExifSegment::new(block).read_tag_value(tag_id)
}

// =============================================================================
// Tests
// =============================================================================
