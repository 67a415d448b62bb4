//! Test utilities for integration tests.
//!
//! This module provides a mock image source and helpers for building JPEG
//! files with EXIF, IPTC and XMP segments in either byte order.

use async_trait::async_trait;
use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::{Rgb, RgbImage};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use imgindex::error::IoError;
use imgindex::io::ImageSource;

// =============================================================================
// Mock Image Source
// =============================================================================

/// An in-memory image source that counts reads.
#[derive(Clone, Default)]
pub struct MockImageSource {
    images: HashMap<String, Bytes>,
    missing: Vec<String>,
    read_count: Arc<AtomicUsize>,
}

impl MockImageSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(mut self, image_id: impl Into<String>, data: Vec<u8>) -> Self {
        self.images.insert(image_id.into(), Bytes::from(data));
        self
    }

    /// List an image that fails to read.
    pub fn with_missing(mut self, image_id: impl Into<String>) -> Self {
        self.missing.push(image_id.into());
        self
    }

    pub fn read_count(&self) -> usize {
        self.read_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageSource for MockImageSource {
    async fn list_images(&self) -> Result<Vec<String>, IoError> {
        let mut ids: Vec<String> = self
            .images
            .keys()
            .chain(self.missing.iter())
            .cloned()
            .collect();
        ids.sort();
        Ok(ids)
    }

    async fn read_image(&self, image_id: &str) -> Result<Bytes, IoError> {
        self.read_count.fetch_add(1, Ordering::SeqCst);
        self.images
            .get(image_id)
            .cloned()
            .ok_or_else(|| IoError::NotFound(image_id.to_string()))
    }

    fn identifier(&self) -> &str {
        "mock"
    }
}

// =============================================================================
// JPEG Helpers
// =============================================================================

/// Create a baseline RGB JPEG image.
pub fn create_test_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });

    let mut buf = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buf, 80);
    encoder.encode_image(&img).unwrap();
    buf
}

/// Create a baseline JPEG with extra segments inserted right after SOI.
pub fn create_jpeg_with_segments(width: u32, height: u32, segments: &[Vec<u8>]) -> Vec<u8> {
    let jpeg = create_test_jpeg(width, height);
    assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);

    let mut out = jpeg[..2].to_vec();
    for segment in segments {
        out.extend_from_slice(segment);
    }
    out.extend_from_slice(&jpeg[2..]);
    out
}

/// Wrap a payload in a JPEG marker segment.
pub fn marker_segment(marker: u8, payload: &[u8]) -> Vec<u8> {
    let length = (payload.len() + 2) as u16;
    let mut out = vec![0xFF, marker];
    out.extend_from_slice(&length.to_be_bytes());
    out.extend_from_slice(payload);
    out
}

// =============================================================================
// EXIF Builder
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrderType {
    LittleEndian,
    BigEndian,
}

impl ByteOrderType {
    pub fn u16(self, value: u16) -> [u8; 2] {
        match self {
            ByteOrderType::LittleEndian => value.to_le_bytes(),
            ByteOrderType::BigEndian => value.to_be_bytes(),
        }
    }

    pub fn u32(self, value: u32) -> [u8; 4] {
        match self {
            ByteOrderType::LittleEndian => value.to_le_bytes(),
            ByteOrderType::BigEndian => value.to_be_bytes(),
        }
    }
}

#[derive(Debug, Clone)]
enum EntryData {
    Bytes(u16, Vec<u8>),
    Ascii(String),
    Shorts(Vec<u16>),
    Longs(Vec<u32>),
    Rationals(Vec<(u32, u32)>),
    SRationals(Vec<(i32, i32)>),
    /// Entry written verbatim: type id, count and the 4-byte slot as a u32
    Raw(u16, u32, u32),
}

#[derive(Debug, Clone)]
struct EntryBuilder {
    tag: u16,
    data: EntryData,
}

impl EntryBuilder {
    fn type_and_count(&self) -> (u16, u32) {
        match &self.data {
            EntryData::Bytes(field_type, bytes) => (*field_type, bytes.len() as u32),
            EntryData::Ascii(s) => (2, s.len() as u32 + 1),
            EntryData::Shorts(v) => (3, v.len() as u32),
            EntryData::Longs(v) => (4, v.len() as u32),
            EntryData::Rationals(v) => (5, v.len() as u32),
            EntryData::SRationals(v) => (10, v.len() as u32),
            EntryData::Raw(field_type, count, _) => (*field_type, *count),
        }
    }

    /// Encoded value bytes; `None` for raw entries.
    fn encode(&self, order: ByteOrderType) -> Option<Vec<u8>> {
        let mut out = Vec::new();
        match &self.data {
            EntryData::Bytes(_, bytes) => out.extend_from_slice(bytes),
            EntryData::Ascii(s) => {
                out.extend_from_slice(s.as_bytes());
                out.push(0);
            }
            EntryData::Shorts(v) => v.iter().for_each(|&x| out.extend(order.u16(x))),
            EntryData::Longs(v) => v.iter().for_each(|&x| out.extend(order.u32(x))),
            EntryData::Rationals(v) => v.iter().for_each(|&(n, d)| {
                out.extend(order.u32(n));
                out.extend(order.u32(d));
            }),
            EntryData::SRationals(v) => v.iter().for_each(|&(n, d)| {
                out.extend(order.u32(n as u32));
                out.extend(order.u32(d as u32));
            }),
            EntryData::Raw(..) => return None,
        }
        Some(out)
    }

    /// Bytes stored outside the entry table.
    fn external_len(&self, order: ByteOrderType) -> usize {
        match self.encode(order) {
            Some(bytes) if bytes.len() > 4 => (bytes.len() + 1) & !1,
            _ => 0,
        }
    }
}

/// Builder for one IFD.
#[derive(Debug, Clone, Default)]
pub struct IfdBuilder {
    entries: Vec<EntryBuilder>,
}

impl IfdBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(mut self, tag: u16, data: EntryData) -> Self {
        self.entries.push(EntryBuilder { tag, data });
        self
    }

    pub fn bytes(self, tag: u16, field_type: u16, data: &[u8]) -> Self {
        self.push(tag, EntryData::Bytes(field_type, data.to_vec()))
    }

    pub fn ascii(self, tag: u16, text: &str) -> Self {
        self.push(tag, EntryData::Ascii(text.to_string()))
    }

    pub fn short(self, tag: u16, values: &[u16]) -> Self {
        self.push(tag, EntryData::Shorts(values.to_vec()))
    }

    pub fn long(self, tag: u16, values: &[u32]) -> Self {
        self.push(tag, EntryData::Longs(values.to_vec()))
    }

    pub fn rational(self, tag: u16, values: &[(u32, u32)]) -> Self {
        self.push(tag, EntryData::Rationals(values.to_vec()))
    }

    pub fn srational(self, tag: u16, values: &[(i32, i32)]) -> Self {
        self.push(tag, EntryData::SRationals(values.to_vec()))
    }

    /// An entry written exactly as given, for corrupt or pointer entries.
    pub fn raw(self, tag: u16, field_type: u16, count: u32, slot: u32) -> Self {
        self.push(tag, EntryData::Raw(field_type, count, slot))
    }

    fn size(&self, order: ByteOrderType, extra_entries: usize) -> usize {
        let table = 2 + 12 * (self.entries.len() + extra_entries) + 4;
        table
            + self
                .entries
                .iter()
                .map(|e| e.external_len(order))
                .sum::<usize>()
    }

    /// Write the IFD at the end of `out`.
    ///
    /// `pointers` are appended as LONG entries after the builder's entries.
    /// Out-of-line values follow the entry table and their stored offsets
    /// are relative to the start of this IFD.
    fn write_to(
        &self,
        out: &mut Vec<u8>,
        order: ByteOrderType,
        pointers: &[(u16, u32)],
        next_ifd: u32,
    ) {
        let start = out.len();
        let count = self.entries.len() + pointers.len();
        let mut external_offset = start + 2 + 12 * count + 4;
        let mut external = Vec::new();

        out.extend(order.u16(count as u16));
        for entry in &self.entries {
            let (field_type, value_count) = entry.type_and_count();
            out.extend(order.u16(entry.tag));
            out.extend(order.u16(field_type));
            out.extend(order.u32(value_count));

            match entry.encode(order) {
                None => {
                    let EntryData::Raw(_, _, slot) = entry.data else {
                        unreachable!()
                    };
                    out.extend(order.u32(slot));
                }
                Some(bytes) if bytes.len() <= 4 => {
                    let mut slot = bytes;
                    slot.resize(4, 0);
                    out.extend(slot);
                }
                Some(mut bytes) => {
                    out.extend(order.u32((external_offset - start) as u32));
                    if bytes.len() % 2 == 1 {
                        bytes.push(0);
                    }
                    external_offset += bytes.len();
                    external.extend(bytes);
                }
            }
        }
        for &(tag, offset) in pointers {
            out.extend(order.u16(tag));
            out.extend(order.u16(4));
            out.extend(order.u32(1));
            out.extend(order.u32(offset));
        }
        out.extend(order.u32(next_ifd));
        out.extend(external);
    }
}

/// Builder for a complete EXIF APP1 segment.
#[derive(Debug, Clone)]
pub struct ExifBuilder {
    byte_order: ByteOrderType,
    ifd0: IfdBuilder,
    exif: Option<IfdBuilder>,
    gps: Option<IfdBuilder>,
    interop: Option<IfdBuilder>,
    ifd1: Option<IfdBuilder>,
}

impl ExifBuilder {
    pub fn new(byte_order: ByteOrderType) -> Self {
        Self {
            byte_order,
            ifd0: IfdBuilder::new(),
            exif: None,
            gps: None,
            interop: None,
            ifd1: None,
        }
    }

    pub fn ifd0(mut self, ifd: IfdBuilder) -> Self {
        self.ifd0 = ifd;
        self
    }

    pub fn exif(mut self, ifd: IfdBuilder) -> Self {
        self.exif = Some(ifd);
        self
    }

    pub fn gps(mut self, ifd: IfdBuilder) -> Self {
        self.gps = Some(ifd);
        self
    }

    /// Interoperability IFD; requires an EXIF IFD to point to it.
    pub fn interop(mut self, ifd: IfdBuilder) -> Self {
        self.interop = Some(ifd);
        self
    }

    pub fn thumbnail(mut self, ifd: IfdBuilder) -> Self {
        self.ifd1 = Some(ifd);
        self
    }

    /// The TIFF structure: header, then IFD0, EXIF, GPS, Interop and IFD1.
    pub fn build_tiff(&self) -> Vec<u8> {
        let order = self.byte_order;
        let has_interop = self.exif.is_some() && self.interop.is_some();

        let ifd0_pointers = usize::from(self.exif.is_some()) + usize::from(self.gps.is_some());
        let ifd0_offset = 8;
        let exif_offset = ifd0_offset + self.ifd0.size(order, ifd0_pointers);
        let exif_size = self
            .exif
            .as_ref()
            .map_or(0, |ifd| ifd.size(order, usize::from(has_interop)));
        let gps_offset = exif_offset + exif_size;
        let gps_size = self.gps.as_ref().map_or(0, |ifd| ifd.size(order, 0));
        let interop_offset = gps_offset + gps_size;
        let interop_size = match (&self.interop, has_interop) {
            (Some(ifd), true) => ifd.size(order, 0),
            _ => 0,
        };
        let ifd1_offset = interop_offset + interop_size;

        let mut out = Vec::new();
        match order {
            ByteOrderType::LittleEndian => out.extend_from_slice(b"II"),
            ByteOrderType::BigEndian => out.extend_from_slice(b"MM"),
        }
        out.extend(order.u16(42));
        out.extend(order.u32(ifd0_offset as u32));

        let mut pointers = Vec::new();
        if self.exif.is_some() {
            pointers.push((0x8769, exif_offset as u32));
        }
        if self.gps.is_some() {
            pointers.push((0x8825, gps_offset as u32));
        }
        let next = if self.ifd1.is_some() { ifd1_offset as u32 } else { 0 };
        self.ifd0.write_to(&mut out, order, &pointers, next);

        if let Some(exif) = &self.exif {
            let pointers: Vec<(u16, u32)> = if has_interop {
                vec![(0xA005, interop_offset as u32)]
            } else {
                vec![]
            };
            exif.write_to(&mut out, order, &pointers, 0);
        }
        if let Some(gps) = &self.gps {
            gps.write_to(&mut out, order, &[], 0);
        }
        if let (Some(interop), true) = (&self.interop, has_interop) {
            interop.write_to(&mut out, order, &[], 0);
        }
        if let Some(ifd1) = &self.ifd1 {
            ifd1.write_to(&mut out, order, &[], 0);
        }
        out
    }

    /// The full APP1 segment, starting with `FF E1`.
    pub fn build(&self) -> Vec<u8> {
        let mut payload = b"Exif\0\0".to_vec();
        payload.extend(self.build_tiff());
        marker_segment(0xE1, &payload)
    }
}

// =============================================================================
// IPTC and XMP Builders
// =============================================================================

/// An APP13 segment holding one IPTC-NAA resource with the given datasets.
pub fn create_iptc_segment(datasets: &[(u8, u8, &str)]) -> Vec<u8> {
    let mut iim = Vec::new();
    for &(record, dataset, text) in datasets {
        iim.extend_from_slice(&[0x1C, record, dataset]);
        iim.extend_from_slice(&(text.len() as u16).to_be_bytes());
        iim.extend_from_slice(text.as_bytes());
    }

    let mut payload = b"Photoshop 3.0\0".to_vec();
    // An unrelated resource first (resolution info, 0x03ED)
    payload.extend_from_slice(b"8BIM");
    payload.extend_from_slice(&0x03EDu16.to_be_bytes());
    payload.extend_from_slice(&[0x00, 0x00]);
    payload.extend_from_slice(&4u32.to_be_bytes());
    payload.extend_from_slice(&[0x00, 0x48, 0x00, 0x01]);

    payload.extend_from_slice(b"8BIM");
    payload.extend_from_slice(&0x0404u16.to_be_bytes());
    payload.extend_from_slice(&[0x00, 0x00]);
    payload.extend_from_slice(&(iim.len() as u32).to_be_bytes());
    payload.extend_from_slice(&iim);
    if iim.len() % 2 == 1 {
        payload.push(0);
    }
    marker_segment(0xED, &payload)
}

/// An APP1 segment holding an XMP packet.
pub fn create_xmp_segment(packet: &str) -> Vec<u8> {
    let mut payload = b"http://ns.adobe.com/xap/1.0/\0".to_vec();
    payload.extend_from_slice(packet.as_bytes());
    marker_segment(0xE1, &payload)
}

/// A typical XMP packet as written by photo editors.
pub fn sample_xmp_packet() -> String {
    r#"<?xpacket begin="" id="W5M0MpCehiHzreSzNTczkc9d"?>
<x:xmpmeta xmlns:x="adobe:ns:meta/">
 <rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
  <rdf:Description rdf:about=""
    xmlns:dc="http://purl.org/dc/elements/1.1/"
    xmlns:xmp="http://ns.adobe.com/xap/1.0/"
    xmp:Rating="4"
    xmp:CreatorTool="Darktable 4.6">
   <dc:title>
    <rdf:Alt>
     <rdf:li xml:lang="x-default">Harbour at dawn</rdf:li>
    </rdf:Alt>
   </dc:title>
   <dc:subject>
    <rdf:Bag>
     <rdf:li>harbour</rdf:li>
     <rdf:li>boats &amp; nets</rdf:li>
    </rdf:Bag>
   </dc:subject>
  </rdf:Description>
 </rdf:RDF>
</x:xmpmeta>
<?xpacket end="w"?>"#
        .to_string()
}

/// Encode text as the UTF-16LE byte array used by Windows XP tags.
pub fn xp_bytes(text: &str) -> Vec<u8> {
    text.encode_utf16()
        .chain(std::iter::once(0))
        .flat_map(|unit| unit.to_le_bytes())
        .collect()
}

/// Check for SOI / EOI markers.
pub fn is_valid_jpeg(data: &[u8]) -> bool {
    data.len() >= 4 && data[..2] == [0xFF, 0xD8] && data[data.len() - 2..] == [0xFF, 0xD9]
}
