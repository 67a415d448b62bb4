//! # imgindex
//!
//! Reads embedded metadata from JPEG files and indexes whole directory trees
//! into a single JSON document.
//!
//! The core is a bounds-checked EXIF decoder: given a JPEG APP1 block, it
//! parses the TIFF header, walks the IFD graph (IFD0, the EXIF, GPS and
//! Interoperability sub-IFDs, then IFD1) and decodes the first entry with a
//! requested tag id into a typed [`Value`]. Malformed input never panics;
//! every failure is a typed error.
//!
//! ## Architecture
//!
//! - [`io`] - bounds-checked byte access and image sources
//! - [`mod@format`] - JPEG container scanner and the EXIF, IPTC, XMP and SOF
//!   decoders
//! - [`meta`] - the [`Image`] facade and [`BasicInfo`] aggregation
//! - [`index`] - concurrent directory indexing
//! - [`config`] - CLI configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use imgindex::{ExifSegment, ExifTag, Image};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = std::fs::read("photo.jpg")?;
//! let image = Image::from_bytes(data.into())?;
//!
//! if let Some(exif) = image.exif() {
//!     let orientation = exif.read_tag_value(ExifTag::Orientation.as_u16())?;
//!     println!("Orientation: {}", orientation);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod index;
pub mod io;
pub mod meta;

// Re-export commonly used types
pub use config::{Cli, Command, IndexConfig, InspectConfig, LogConfig};
pub use error::{
    ExifError, FileError, IndexError, IoError, IptcError, JpegError, MetaError, OutOfBounds,
    SofError, XmpError,
};
pub use format::exif::{
    describe, read_tag_value, tag_by_id, tag_by_name, FieldType, Ifd, IfdEntry,
    IfdGraphWalker, IfdKind, TagGroup, TiffHeader, ValueDecoder,
};
pub use format::{
    ExifSegment, ExifTag, IptcSegment, IptcTag, JpegFile, Segment, SofSegment, Value,
    XmpSegment, XmpTag,
};
pub use index::{ImageIndex, IndexRecord, Indexer, SkippedImage};
pub use io::{ByteOrder, ImageSource, LocalImageSource};
pub use meta::{BasicInfo, GpsPosition, Image, Namespace};
