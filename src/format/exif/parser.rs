//! APP1 header and IFD structure parsing.
//!
//! # APP1 Layout
//!
//! ```text
//! Bytes 0-1:   APP1 marker (0xFFE1)
//! Bytes 2-3:   Segment length, big-endian
//! Bytes 4-9:   Identifier "Exif\0\0"
//! Bytes 10-11: Byte order ("II" little-endian, "MM" big-endian)
//! Bytes 12-13: Signature (42)
//! Bytes 14-17: Offset of IFD0, relative to byte 10
//! ```
//!
//! # IFD Layout
//!
//! ```text
//! 2 bytes:       Entry count N
//! N * 12 bytes:  Entries (tag, type, count, value-or-offset)
//! 4 bytes:       Offset of the next IFD (0 = none)
//! ```
//!
//! Offsets stored in the TIFF body are relative to byte 10 of the block.
//! The position of the TIFF header is therefore added to IFD0 and sub-IFD
//! pointers to get absolute block positions.

use crate::error::ExifError;
use crate::io::{ByteBlock, ByteCursor, ByteOrder};

use super::tags::{ExifTag, FieldType, ARRAY_FLAG};

// =============================================================================
// Constants
// =============================================================================

/// Identifier that follows the APP1 length field.
pub const EXIF_IDENTIFIER: &[u8; 6] = b"Exif\0\0";

/// Position of the TIFF header inside the APP1 block.
pub const TIFF_HEADER_OFFSET: usize = 10;

/// Size of the TIFF header in bytes.
pub const TIFF_HEADER_SIZE: usize = 8;

/// Size of one IFD entry in bytes.
pub const IFD_ENTRY_SIZE: usize = 12;

/// "II"
const BYTE_ORDER_LITTLE_ENDIAN: [u8; 2] = *b"II";

/// "MM"
const BYTE_ORDER_BIG_ENDIAN: [u8; 2] = *b"MM";

/// TIFF signature
const TIFF_SIGNATURE: u16 = 42;

/// Convert an offset stored in the TIFF body into an absolute block position.
pub fn tiff_position(offset: u32) -> Result<usize, ExifError> {
    TIFF_HEADER_OFFSET
        .checked_add(offset as usize)
        .ok_or_else(|| ExifError::MalformedHeader {
            reason: format!("offset {} overflows the address space", offset),
        })
}

// =============================================================================
// TiffHeader
// =============================================================================

/// Parsed TIFF header of an APP1 block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TiffHeader {
    /// Byte order for every multi-byte value after the header
    pub byte_order: ByteOrder,

    /// Offset of IFD0, relative to the TIFF header
    pub ifd0_offset: u32,
}

impl TiffHeader {
    /// Parse the TIFF header at block offset 10.
    ///
    /// The block is the full APP1 segment, starting with the marker. The
    /// `Exif\0\0` identifier is not checked here; see
    /// [`ExifSegment::header`](super::ExifSegment::header).
    ///
    /// # Errors
    /// `MalformedHeader` if the block is too short for the header, the byte
    /// order marker is neither "II" nor "MM", or the signature is not 42.
    pub fn parse(block: &[u8]) -> Result<Self, ExifError> {
        let required = TIFF_HEADER_OFFSET + TIFF_HEADER_SIZE;
        if block.len() < required {
            return Err(ExifError::MalformedHeader {
                reason: format!("block is {} bytes, need at least {}", block.len(), required),
            });
        }

        let header = &block[TIFF_HEADER_OFFSET..required];

        let byte_order = match [header[0], header[1]] {
            BYTE_ORDER_LITTLE_ENDIAN => ByteOrder::LittleEndian,
            BYTE_ORDER_BIG_ENDIAN => ByteOrder::BigEndian,
            other => {
                return Err(ExifError::MalformedHeader {
                    reason: format!("invalid byte order marker {:02X}{:02X}", other[0], other[1]),
                })
            }
        };

        let signature = byte_order.read_u16(&header[2..4]);
        if signature != TIFF_SIGNATURE {
            return Err(ExifError::MalformedHeader {
                reason: format!("invalid TIFF signature {}", signature),
            });
        }

        Ok(TiffHeader {
            byte_order,
            ifd0_offset: byte_order.read_u32(&header[4..8]),
        })
    }

    /// Absolute block position of IFD0.
    pub fn ifd0_position(&self) -> Result<usize, ExifError> {
        tiff_position(self.ifd0_offset)
    }
}

// =============================================================================
// IfdKind
// =============================================================================

/// Which directory of the IFD graph an [`Ifd`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IfdKind {
    /// IFD0, the primary image directory
    Primary,
    /// EXIF sub-IFD, reached from IFD0
    Exif,
    /// GPS sub-IFD, reached from IFD0
    Gps,
    /// Interoperability sub-IFD, reached from the EXIF sub-IFD
    Interop,
    /// IFD1, the thumbnail directory chained after IFD0
    Thumbnail,
}

impl IfdKind {
    pub const fn name(self) -> &'static str {
        match self {
            IfdKind::Primary => "IFD0",
            IfdKind::Exif => "EXIF",
            IfdKind::Gps => "GPS",
            IfdKind::Interop => "Interop",
            IfdKind::Thumbnail => "IFD1",
        }
    }

    /// The sub-IFD a pointer tag leads to when found in this directory.
    ///
    /// EXIF and GPS pointers are honoured only in IFD0, the Interop pointer
    /// only in the EXIF sub-IFD.
    pub fn child(self, tag_id: u16) -> Option<IfdKind> {
        const EXIF: u16 = ExifTag::ExifIFDPointer.as_u16();
        const GPS: u16 = ExifTag::GPSInfoIFDPointer.as_u16();
        const INTEROP: u16 = ExifTag::InteroperabilityIFDPointer.as_u16();

        match (self, tag_id) {
            (IfdKind::Primary, EXIF) => Some(IfdKind::Exif),
            (IfdKind::Primary, GPS) => Some(IfdKind::Gps),
            (IfdKind::Exif, INTEROP) => Some(IfdKind::Interop),
            _ => None,
        }
    }
}

// =============================================================================
// IfdEntry
// =============================================================================

/// A single 12-byte IFD entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IfdEntry {
    /// Tag identifier
    pub tag_id: u16,

    /// Declared field type id, possibly outside the twelve known types
    pub type_id: u16,

    /// Number of values
    pub count: u32,

    /// Raw 4-byte value slot: inline data or an offset, per `type_id` and `count`
    pub value_slot: [u8; 4],
}

impl IfdEntry {
    /// Parse an entry from its 12 raw bytes.
    pub fn parse(bytes: &[u8; IFD_ENTRY_SIZE], byte_order: ByteOrder) -> Self {
        Self {
            tag_id: byte_order.read_u16(&bytes[0..2]),
            type_id: byte_order.read_u16(&bytes[2..4]),
            count: byte_order.read_u32(&bytes[4..8]),
            value_slot: [bytes[8], bytes[9], bytes[10], bytes[11]],
        }
    }

    /// Field type, if `type_id` is one of the twelve defined encodings.
    pub fn field_type(&self) -> Option<FieldType> {
        FieldType::from_u16(self.type_id)
    }

    /// Whether the entry holds more than one value.
    #[inline]
    pub fn is_array(&self) -> bool {
        self.count > 1
    }

    /// Type id with [`ARRAY_FLAG`] set when the entry holds several values.
    pub fn type_tag(&self) -> u16 {
        if self.is_array() {
            self.type_id | ARRAY_FLAG
        } else {
            self.type_id
        }
    }

    /// The value slot read as an offset in the given byte order.
    #[inline]
    pub fn value_as_offset(&self, byte_order: ByteOrder) -> u32 {
        byte_order.read_u32(&self.value_slot)
    }

    /// Total byte size of the value, or `None` for an unknown type.
    pub fn value_byte_size(&self) -> Option<u64> {
        self.field_type()
            .map(|t| t.size_in_bytes() as u64 * self.count as u64)
    }

    /// Whether the value fits in the 4-byte slot.
    pub fn is_inline(&self) -> bool {
        self.field_type()
            .map(|t| t.fits_inline(self.count))
            .unwrap_or(false)
    }
}

// =============================================================================
// Ifd
// =============================================================================

/// An Image File Directory located inside an APP1 block.
///
/// The entry table is bounds-checked when the IFD is parsed, so the number
/// of readable entries always equals the declared count.
#[derive(Debug, Clone, Copy)]
pub struct Ifd<'a> {
    cursor: ByteCursor<'a>,
    position: usize,
    kind: IfdKind,
    entry_count: u16,
}

impl<'a> Ifd<'a> {
    /// Parse the IFD whose entry count sits at absolute block `position`.
    pub fn parse(cursor: ByteCursor<'a>, position: usize, kind: IfdKind) -> Result<Self, ExifError> {
        let entry_count = cursor.read_u16(position)?;
        cursor.slice(position + 2, entry_count as usize * IFD_ENTRY_SIZE)?;

        Ok(Self {
            cursor,
            position,
            kind,
            entry_count,
        })
    }

    /// Absolute block position of the IFD.
    ///
    /// Out-of-line values of this IFD's entries are located relative to it.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Offset of the IFD relative to the TIFF header.
    #[inline]
    pub fn base_offset(&self) -> usize {
        self.position.saturating_sub(TIFF_HEADER_OFFSET)
    }

    #[inline]
    pub fn kind(&self) -> IfdKind {
        self.kind
    }

    #[inline]
    pub fn byte_order(&self) -> ByteOrder {
        self.cursor.order()
    }

    #[inline]
    pub fn entry_count(&self) -> u32 {
        self.entry_count as u32
    }

    /// Entry at `index`.
    ///
    /// # Errors
    /// `EntryIndexOutOfRange` if `index >= entry_count()`.
    pub fn entry(&self, index: u32) -> Result<IfdEntry, ExifError> {
        if index >= self.entry_count() {
            return Err(ExifError::EntryIndexOutOfRange {
                index,
                count: self.entry_count(),
            });
        }

        let offset = self.position + 2 + index as usize * IFD_ENTRY_SIZE;
        let bytes = self.cursor.block().array::<IFD_ENTRY_SIZE>(offset)?;
        Ok(IfdEntry::parse(&bytes, self.cursor.order()))
    }

    /// Iterate over all entries in storage order.
    pub fn entries(&self) -> impl Iterator<Item = Result<IfdEntry, ExifError>> + '_ {
        (0..self.entry_count()).map(move |i| self.entry(i))
    }

    /// First entry with the given tag id.
    pub fn find_entry(&self, tag_id: u16) -> Result<Option<IfdEntry>, ExifError> {
        for entry in self.entries() {
            let entry = entry?;
            if entry.tag_id == tag_id {
                return Ok(Some(entry));
            }
        }
        Ok(None)
    }

    /// Offset of the next IFD in the chain, relative to the TIFF header.
    /// Zero means no further IFD.
    pub fn next_ifd_offset(&self) -> Result<u32, ExifError> {
        let offset = self.position + 2 + self.entry_count as usize * IFD_ENTRY_SIZE;
        Ok(self.cursor.read_u32(offset)?)
    }

    /// The block this IFD was parsed from.
    pub fn block(&self) -> ByteBlock<'a> {
        self.cursor.block()
    }
}

// =============================================================================
// Tests
// =============================================================================
