//! JPEG frame header (SOFn) fields.
//!
//! ```text
//! Bytes 0-1: Marker (0xFFC0 baseline, 0xFFC1 extended, 0xFFC2 progressive)
//! Bytes 2-3: Length
//! Byte  4:   Sample precision
//! Bytes 5-6: Image height (lines)
//! Bytes 7-8: Image width (samples per line)
//! Byte  9:   Number of components
//! ```

use crate::error::SofError;
use crate::format::Value;
use crate::io::ByteBlock;

/// Sample precision in bits
pub const SOF_PRECISION: u16 = 0;

/// Image height
pub const SOF_IMAGE_HEIGHT: u16 = 1;

/// Image width
pub const SOF_IMAGE_WIDTH: u16 = 2;

/// Number of colour components
pub const SOF_COMPONENTS: u16 = 3;

/// Field names, indexed by tag id.
pub const SOF_TAG_NAMES: [&str; 4] = ["Precision", "ImageHeight", "ImageWidth", "Components"];

/// A borrowed frame header segment, starting with its marker.
#[derive(Debug, Clone, Copy)]
pub struct SofSegment<'a> {
    block: ByteBlock<'a>,
}

impl<'a> SofSegment<'a> {
    pub fn new(block: &'a [u8]) -> Self {
        Self {
            block: ByteBlock::new(block),
        }
    }

    /// Read one frame header field.
    pub fn read_tag_value(&self, tag: u16) -> Result<Value, SofError> {
        match tag {
            SOF_PRECISION => Ok(Value::Byte(self.block.u8_at(4)?)),
            SOF_IMAGE_HEIGHT => Ok(Value::Short(self.block.u16_be_at(5)?)),
            SOF_IMAGE_WIDTH => Ok(Value::Short(self.block.u16_be_at(7)?)),
            SOF_COMPONENTS => Ok(Value::Byte(self.block.u8_at(9)?)),
            other => Err(SofError::NotFound(other)),
        }
    }

    pub fn width(&self) -> Result<u16, SofError> {
        Ok(self.block.u16_be_at(7)?)
    }

    pub fn height(&self) -> Result<u16, SofError> {
        Ok(self.block.u16_be_at(5)?)
    }
}
