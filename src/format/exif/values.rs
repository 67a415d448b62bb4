//! EXIF entry value decoding.
//!
//! A value is stored inline in the entry's 4-byte slot when its total size
//! fits, otherwise the slot holds an offset. Offsets are relative to the IFD
//! that owns the entry, so the decoder carries that IFD's block position.

use crate::error::{ExifError, OutOfBounds};
use crate::format::Value;
use crate::io::{ByteCursor, ByteOrder};

use super::parser::IfdEntry;
use super::tags::FieldType;

// =============================================================================
// ValueDecoder
// =============================================================================

/// Decodes entry values of one IFD.
#[derive(Debug, Clone, Copy)]
pub struct ValueDecoder<'a> {
    cursor: ByteCursor<'a>,
    ifd_position: usize,
}

impl<'a> ValueDecoder<'a> {
    /// Create a decoder for entries of the IFD at absolute block position
    /// `ifd_position`.
    pub fn new(cursor: ByteCursor<'a>, ifd_position: usize) -> Self {
        Self {
            cursor,
            ifd_position,
        }
    }

    #[inline]
    pub fn byte_order(&self) -> ByteOrder {
        self.cursor.order()
    }

    /// Raw bytes of an entry's value.
    ///
    /// # Errors
    /// - `UnsupportedType` for a type id outside the twelve TIFF field types
    /// - `OffsetOutOfRange` if an out-of-line value leaves the block
    pub fn raw_bytes<'e>(&self, entry: &'e IfdEntry) -> Result<&'e [u8], ExifError>
    where
        'a: 'e,
    {
        let field_type = entry
            .field_type()
            .ok_or(ExifError::UnsupportedType(entry.type_id))?;

        let size = field_type
            .size_in_bytes()
            .checked_mul(entry.count as usize)
            .ok_or(OutOfBounds {
                offset: self.ifd_position,
                requested: usize::MAX,
                size: self.cursor.block().len(),
            })?;

        if size <= FieldType::INLINE_THRESHOLD {
            return Ok(&entry.value_slot[..size]);
        }

        let offset = entry.value_as_offset(self.cursor.order()) as usize;
        let position = self.ifd_position.checked_add(offset).ok_or(OutOfBounds {
            offset,
            requested: size,
            size: self.cursor.block().len(),
        })?;
        Ok(self.cursor.slice(position, size)?)
    }

    /// Decode an entry's value.
    ///
    /// ASCII entries become [`Value::Text`] (up to the first NUL). Otherwise
    /// a count of exactly 1 yields a scalar and any other count a
    /// [`Value::Sequence`] with one element per value. UNDEFINED data is
    /// decoded as unsigned bytes.
    pub fn decode(&self, entry: &IfdEntry) -> Result<Value, ExifError> {
        let bytes = self.raw_bytes(entry)?;
        let field_type = entry
            .field_type()
            .ok_or(ExifError::UnsupportedType(entry.type_id))?;
        let order = self.cursor.order();

        if field_type == FieldType::Ascii {
            return Ok(Value::Text(decode_ascii(bytes)));
        }

        if entry.count == 1 {
            return Ok(decode_scalar(field_type, bytes, order));
        }

        let values = bytes
            .chunks_exact(field_type.size_in_bytes())
            .map(|chunk| decode_scalar(field_type, chunk, order))
            .collect();
        Ok(Value::Sequence(values))
    }
}

/// Decode one value of `field_type` from a slice of exactly its size.
fn decode_scalar(field_type: FieldType, bytes: &[u8], order: ByteOrder) -> Value {
    match field_type {
        FieldType::Byte | FieldType::Undefined | FieldType::Ascii => Value::Byte(bytes[0]),
        FieldType::SByte => Value::SByte(bytes[0] as i8),
        FieldType::Short => Value::Short(order.read_u16(bytes)),
        FieldType::SShort => Value::SShort(order.read_u16(bytes) as i16),
        FieldType::Long => Value::Long(order.read_u32(bytes)),
        FieldType::SLong => Value::SLong(order.read_u32(bytes) as i32),
        FieldType::Rational => {
            let numerator = order.read_u32(&bytes[0..4]) as f64;
            let denominator = order.read_u32(&bytes[4..8]) as f64;
            Value::Rational(numerator / denominator)
        }
        FieldType::SRational => {
            let numerator = order.read_u32(&bytes[0..4]) as i32 as f64;
            let denominator = order.read_u32(&bytes[4..8]) as i32 as f64;
            Value::SRational(numerator / denominator)
        }
        FieldType::Float => Value::Float(f32::from_bits(order.read_u32(bytes))),
        FieldType::Double => Value::Double(f64::from_bits(order.read_u64(bytes))),
    }
}

/// ASCII bytes up to the first NUL; invalid UTF-8 is replaced.
fn decode_ascii(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

/// Decode a Windows XP tag (XPTitle, XPKeywords...).
///
/// These are BYTE arrays holding UTF-16LE text terminated by a NUL code
/// unit. Returns `None` if the value is not a byte sequence.
pub fn decode_xp_text(value: &Value) -> Option<String> {
    let bytes = value.as_bytes()?;
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .take_while(|&unit| unit != 0)
        .collect();
    Some(String::from_utf16_lossy(&units))
}

// =============================================================================
// Tests
// =============================================================================
