//! Metadata format decoders.
//!
//! Each decoder works on one borrowed JPEG segment and looks up a single
//! tag at a time:
//!
//! - **EXIF** (APP1): TIFF-structured directories, see [`exif`]
//! - **XMP** (APP1): RDF/XML packet properties, see [`xmp`]
//! - **IPTC** (APP13): IIM datasets inside Photoshop resources, see [`iptc`]
//! - **SOF0** (frame header): image dimensions, see [`sof`]
//!
//! [`jpeg`] finds the segments; all decoders produce the shared [`Value`].

pub mod exif;
pub mod iptc;
pub mod jpeg;
pub mod sof;
mod value;
pub mod xmp;

pub use exif::{ExifSegment, ExifTag};
pub use iptc::{IptcSegment, IptcTag};
pub use jpeg::{JpegFile, Segment};
pub use sof::SofSegment;
pub use value::Value;
pub use xmp::{XmpSegment, XmpTag};
