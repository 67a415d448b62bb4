//! Aggregated per-image information.
//!
//! [`BasicInfo`] collects the fields most callers want from whichever
//! namespace has them. Each field has an ordered list of sources; the first
//! one that yields a usable value wins.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::warn;

use crate::format::exif::{decode_xp_text, describe, ExifTag};
use crate::format::sof::{SOF_IMAGE_HEIGHT, SOF_IMAGE_WIDTH};
use crate::format::{IptcTag, Value, XmpTag};

use super::image::{Image, Namespace};

// =============================================================================
// MetaReader
// =============================================================================

/// Reads tags from an image, skipping namespaces that turned out malformed.
///
/// Absent values are silent. The first real decode error of a namespace is
/// logged and the namespace is not consulted again.
pub struct MetaReader<'a> {
    image: &'a Image,
    label: &'a str,
    malformed: BTreeSet<Namespace>,
}

impl<'a> MetaReader<'a> {
    /// `label` names the image in log output.
    pub fn new(image: &'a Image, label: &'a str) -> Self {
        Self {
            image,
            label,
            malformed: BTreeSet::new(),
        }
    }

    pub fn read(&mut self, namespace: Namespace, tag: u16) -> Option<Value> {
        if self.malformed.contains(&namespace) {
            return None;
        }

        match self.image.read_tag_value(namespace, tag) {
            Ok(value) => Some(value),
            Err(e) if e.is_not_found() => None,
            Err(e) => {
                warn!(
                    image = %self.label,
                    namespace = %namespace,
                    error = %e,
                    "Skipping malformed metadata"
                );
                self.malformed.insert(namespace);
                None
            }
        }
    }

    pub fn exif(&mut self, tag: ExifTag) -> Option<Value> {
        self.read(Namespace::Exif, tag.as_u16())
    }

    /// Namespaces that failed to decode, in order.
    pub fn malformed(&self) -> Vec<Namespace> {
        self.malformed.iter().copied().collect()
    }
}

// =============================================================================
// BasicInfo
// =============================================================================

/// GPS position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GpsPosition {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
}

/// The most commonly needed facts about an image.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BasicInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exposure_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub f_number: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iso: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focal_length: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gps: Option<GpsPosition>,
}

impl BasicInfo {
    /// Collect basic info from every namespace of an image.
    pub fn from_image(image: &Image) -> Self {
        let mut reader = MetaReader::new(image, "");
        Self::collect(&mut reader)
    }

    /// Collect basic info through an existing reader, so that malformed
    /// namespaces are shared with any further lookups.
    pub fn collect(r: &mut MetaReader<'_>) -> Self {
        let width = r
            .read(Namespace::Sof0, SOF_IMAGE_WIDTH)
            .or_else(|| r.exif(ExifTag::PixelXDimension))
            .and_then(|v| first(&v).as_u32());
        let height = r
            .read(Namespace::Sof0, SOF_IMAGE_HEIGHT)
            .or_else(|| r.exif(ExifTag::PixelYDimension))
            .and_then(|v| first(&v).as_u32());

        let title = r
            .read(Namespace::Iptc, IptcTag::Caption.as_u16())
            .and_then(|v| text(&v))
            .or_else(|| {
                r.read(Namespace::Iptc, IptcTag::ObjectName.as_u16())
                    .and_then(|v| text(&v))
            })
            .or_else(|| r.read(Namespace::Xmp, XmpTag::Title.as_u16()).and_then(|v| text(&v)))
            .or_else(|| r.exif(ExifTag::XPTitle).and_then(|v| xp_text(&v)));

        let description = r
            .read(Namespace::Iptc, IptcTag::Caption.as_u16())
            .and_then(|v| text(&v))
            .or_else(|| {
                r.read(Namespace::Xmp, XmpTag::Description.as_u16())
                    .and_then(|v| text(&v))
            })
            .or_else(|| r.exif(ExifTag::ImageDescription).and_then(|v| text(&v)));

        let mut keywords = r
            .read(Namespace::Iptc, IptcTag::Keywords.as_u16())
            .map(|v| texts(&v))
            .unwrap_or_default();
        if keywords.is_empty() {
            keywords = r
                .read(Namespace::Xmp, XmpTag::Subject.as_u16())
                .map(|v| texts(&v))
                .unwrap_or_default();
        }
        if keywords.is_empty() {
            keywords = r
                .exif(ExifTag::XPKeywords)
                .and_then(|v| xp_text(&v))
                .map(|s| split_keywords(&s))
                .unwrap_or_default();
        }

        let date_time = r
            .exif(ExifTag::DateTimeOriginal)
            .and_then(|v| text(&v))
            .or_else(|| r.exif(ExifTag::DateTime).and_then(|v| text(&v)));

        let orientation = r
            .exif(ExifTag::Orientation)
            .and_then(|v| v.as_u32())
            .and_then(|o| u16::try_from(o).ok());

        let make = r.exif(ExifTag::Make).and_then(|v| text(&v));
        let model = r.exif(ExifTag::Model).and_then(|v| text(&v));
        let exposure_time = r.exif(ExifTag::ExposureTime).and_then(|v| finite(&v));
        let f_number = r.exif(ExifTag::FNumber).and_then(|v| finite(&v));
        let iso = r
            .exif(ExifTag::PhotographicSensitivity)
            .and_then(|v| first(&v).as_u32());
        let focal_length = r.exif(ExifTag::FocalLength).and_then(|v| finite(&v));
        let flash = r.exif(ExifTag::Flash).and_then(|v| {
            describe(ExifTag::Flash, &v).or_else(|| v.as_u32().map(|code| format!("0x{:02X}", code)))
        });

        let gps = gps_position(r);

        BasicInfo {
            width,
            height,
            title,
            description,
            keywords,
            date_time,
            orientation,
            make,
            model,
            exposure_time,
            f_number,
            iso,
            focal_length,
            flash,
            gps,
        }
    }
}

fn gps_position(r: &mut MetaReader<'_>) -> Option<GpsPosition> {
    let latitude = dms_to_decimal(&r.exif(ExifTag::GPSLatitude)?)?;
    let longitude = dms_to_decimal(&r.exif(ExifTag::GPSLongitude)?)?;

    let south = r
        .exif(ExifTag::GPSLatitudeRef)
        .map(|v| text(&v).as_deref() == Some("S"))
        .unwrap_or(false);
    let west = r
        .exif(ExifTag::GPSLongitudeRef)
        .map(|v| text(&v).as_deref() == Some("W"))
        .unwrap_or(false);

    let altitude = r.exif(ExifTag::GPSAltitude).and_then(|v| finite(&v)).map(|alt| {
        let below_sea_level = r
            .exif(ExifTag::GPSAltitudeRef)
            .and_then(|v| first(&v).as_u32())
            == Some(1);
        if below_sea_level {
            -alt
        } else {
            alt
        }
    });

    Some(GpsPosition {
        latitude: if south { -latitude } else { latitude },
        longitude: if west { -longitude } else { longitude },
        altitude,
    })
}

// =============================================================================
// Value helpers
// =============================================================================

/// Convert a degrees/minutes/seconds triple to decimal degrees.
///
/// Returns `None` unless the value is a sequence of three finite numbers.
pub fn dms_to_decimal(value: &Value) -> Option<f64> {
    let parts = value.as_sequence()?;
    let [d, m, s] = parts else {
        return None;
    };
    let decimal = d.as_f64()? + m.as_f64()? / 60.0 + s.as_f64()? / 3600.0;
    decimal.is_finite().then_some(decimal)
}

/// First element of a sequence, or the value itself.
fn first(value: &Value) -> &Value {
    match value {
        Value::Sequence(items) if !items.is_empty() => &items[0],
        other => other,
    }
}

fn finite(value: &Value) -> Option<f64> {
    first(value).as_f64().filter(|f| f.is_finite())
}

/// Non-empty trimmed text; a sequence yields its first text item.
fn text(value: &Value) -> Option<String> {
    let s = first(value).as_text()?.trim();
    (!s.is_empty()).then(|| s.to_string())
}

fn texts(value: &Value) -> Vec<String> {
    match value {
        Value::Sequence(items) => items.iter().filter_map(text).collect(),
        other => text(other).into_iter().collect(),
    }
}

fn xp_text(value: &Value) -> Option<String> {
    let s = decode_xp_text(value)?;
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

fn split_keywords(s: &str) -> Vec<String> {
    s.split(';')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}
