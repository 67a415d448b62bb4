//! Image-level metadata access.
//!
//! [`Image`] scans a JPEG once and routes tag lookups to the decoder of the
//! requested [`Namespace`]. [`BasicInfo`] builds the common summary fields
//! on top of it.

mod basic;
mod image;

pub use basic::{dms_to_decimal, BasicInfo, GpsPosition, MetaReader};
pub use image::{Image, Namespace, TagLookup};
