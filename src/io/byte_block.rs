//! Bounds-checked access to an in-memory byte block.
//!
//! Every metadata decoder in this crate works on a caller-owned, immutable
//! byte block (one JPEG segment). Offsets found inside the data are untrusted,
//! so all slicing goes through [`ByteBlock`], which turns an out-of-range read
//! into an [`OutOfBounds`] error instead of a panic.

use crate::error::OutOfBounds;

// =============================================================================
// Endian Helper Functions
// =============================================================================
//
// Callers pass slices that were already length-checked by `ByteBlock`.

/// Read a little-endian u16 from a byte slice.
///
/// # Panics
/// Panics if the slice has fewer than 2 bytes.
#[inline]
pub fn read_u16_le(bytes: &[u8]) -> u16 {
    u16::from_le_bytes([bytes[0], bytes[1]])
}

/// Read a big-endian u16 from a byte slice.
///
/// # Panics
/// Panics if the slice has fewer than 2 bytes.
#[inline]
pub fn read_u16_be(bytes: &[u8]) -> u16 {
    u16::from_be_bytes([bytes[0], bytes[1]])
}

/// Read a little-endian u32 from a byte slice.
///
/// # Panics
/// Panics if the slice has fewer than 4 bytes.
#[inline]
pub fn read_u32_le(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Read a big-endian u32 from a byte slice.
///
/// # Panics
/// Panics if the slice has fewer than 4 bytes.
#[inline]
pub fn read_u32_be(bytes: &[u8]) -> u32 {
    u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Read a little-endian u64 from a byte slice.
///
/// # Panics
/// Panics if the slice has fewer than 8 bytes.
#[inline]
pub fn read_u64_le(bytes: &[u8]) -> u64 {
    u64::from_le_bytes([
        bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
    ])
}

/// Read a big-endian u64 from a byte slice.
///
/// # Panics
/// Panics if the slice has fewer than 8 bytes.
#[inline]
pub fn read_u64_be(bytes: &[u8]) -> u64 {
    u64::from_be_bytes([
        bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
    ])
}

// =============================================================================
// ByteOrder
// =============================================================================

/// Byte order (endianness) of a TIFF body.
///
/// Declared once by the "II"/"MM" marker of the TIFF header and applied to
/// every multi-byte read inside that body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Little-endian ("II" = Intel)
    LittleEndian,
    /// Big-endian ("MM" = Motorola)
    BigEndian,
}

impl ByteOrder {
    /// Read a u16 from a byte slice using this byte order.
    #[inline]
    pub fn read_u16(self, bytes: &[u8]) -> u16 {
        match self {
            ByteOrder::LittleEndian => read_u16_le(bytes),
            ByteOrder::BigEndian => read_u16_be(bytes),
        }
    }

    /// Read a u32 from a byte slice using this byte order.
    #[inline]
    pub fn read_u32(self, bytes: &[u8]) -> u32 {
        match self {
            ByteOrder::LittleEndian => read_u32_le(bytes),
            ByteOrder::BigEndian => read_u32_be(bytes),
        }
    }

    /// Read a u64 from a byte slice using this byte order.
    #[inline]
    pub fn read_u64(self, bytes: &[u8]) -> u64 {
        match self {
            ByteOrder::LittleEndian => read_u64_le(bytes),
            ByteOrder::BigEndian => read_u64_be(bytes),
        }
    }
}

// =============================================================================
// ByteBlock
// =============================================================================

/// Immutable view over a byte block with checked slicing.
#[derive(Debug, Clone, Copy)]
pub struct ByteBlock<'a> {
    bytes: &'a [u8],
}

impl<'a> ByteBlock<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The whole underlying slice.
    pub fn as_slice(&self) -> &'a [u8] {
        self.bytes
    }

    /// Borrow `len` bytes starting at `offset`.
    ///
    /// Overflowing offset arithmetic is reported the same way as a read past
    /// the end of the block.
    pub fn slice(&self, offset: usize, len: usize) -> Result<&'a [u8], OutOfBounds> {
        let err = OutOfBounds {
            offset,
            requested: len,
            size: self.bytes.len(),
        };
        let end = offset.checked_add(len).ok_or(err)?;
        self.bytes.get(offset..end).ok_or(err)
    }

    /// Copy a fixed-size window starting at `offset`.
    pub fn array<const N: usize>(&self, offset: usize) -> Result<[u8; N], OutOfBounds> {
        let bytes = self.slice(offset, N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    /// Read a single byte.
    pub fn u8_at(&self, offset: usize) -> Result<u8, OutOfBounds> {
        Ok(self.slice(offset, 1)?[0])
    }

    /// Read a big-endian u16; JPEG marker segments are always big-endian.
    pub fn u16_be_at(&self, offset: usize) -> Result<u16, OutOfBounds> {
        Ok(read_u16_be(self.slice(offset, 2)?))
    }

    /// Read a big-endian u32.
    pub fn u32_be_at(&self, offset: usize) -> Result<u32, OutOfBounds> {
        Ok(read_u32_be(self.slice(offset, 4)?))
    }
}

// =============================================================================
// ByteCursor
// =============================================================================

/// A byte block paired with the byte order of the data inside it.
#[derive(Debug, Clone, Copy)]
pub struct ByteCursor<'a> {
    block: ByteBlock<'a>,
    order: ByteOrder,
}

impl<'a> ByteCursor<'a> {
    pub fn new(block: ByteBlock<'a>, order: ByteOrder) -> Self {
        Self { block, order }
    }

    #[inline]
    pub fn order(&self) -> ByteOrder {
        self.order
    }

    #[inline]
    pub fn block(&self) -> ByteBlock<'a> {
        self.block
    }

    pub fn slice(&self, offset: usize, len: usize) -> Result<&'a [u8], OutOfBounds> {
        self.block.slice(offset, len)
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, OutOfBounds> {
        self.block.u8_at(offset)
    }

    pub fn read_u16(&self, offset: usize) -> Result<u16, OutOfBounds> {
        Ok(self.order.read_u16(self.block.slice(offset, 2)?))
    }

    pub fn read_u32(&self, offset: usize) -> Result<u32, OutOfBounds> {
        Ok(self.order.read_u32(self.block.slice(offset, 4)?))
    }

    pub fn read_u64(&self, offset: usize) -> Result<u64, OutOfBounds> {
        Ok(self.order.read_u64(self.block.slice(offset, 8)?))
    }
}
