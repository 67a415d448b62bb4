mod byte_block;
mod source;

pub use byte_block::{
    read_u16_be, read_u16_le, read_u32_be, read_u32_le, read_u64_be, read_u64_le, ByteBlock,
    ByteCursor, ByteOrder,
};
pub use source::{has_image_extension, ImageSource, LocalImageSource, DEFAULT_EXTENSIONS};
