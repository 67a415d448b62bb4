//! IPTC decoder for JPEG APP13 segments.
//!
//! # Layout
//!
//! ```text
//! APP13 payload:   "Photoshop 3.0\0" + image resource blocks
//! Resource block:  "8BIM", id (u16), Pascal name (padded to even),
//!                  size (u32), data (padded to even)
//! Resource 0x0404: IPTC-IIM datasets
//! Dataset:         0x1C, record (u8), dataset (u8), length (u16), data
//! ```
//!
//! All integers are big-endian. A tag id is `(record << 8) | dataset`.

use crate::error::IptcError;
use crate::format::jpeg::{PHOTOSHOP_SIGNATURE, SEGMENT_HEADER_SIZE};
use crate::format::Value;
use crate::io::ByteBlock;

/// Photoshop image resource signature.
const RESOURCE_SIGNATURE: &[u8; 4] = b"8BIM";

/// Resource id of the IPTC-NAA record.
const IPTC_RESOURCE_ID: u16 = 0x0404;

/// Dataset tag marker.
const DATASET_MARKER: u8 = 0x1C;

// =============================================================================
// Tags
// =============================================================================

/// Application record (record 2) datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum IptcTag {
    RecordVersion = 0x0200,
    ObjectName = 0x0205,
    Urgency = 0x020A,
    Category = 0x020F,
    SupplementalCategories = 0x0214,
    Keywords = 0x0219,
    SpecialInstructions = 0x0228,
    DateCreated = 0x0237,
    TimeCreated = 0x023C,
    Byline = 0x0250,
    BylineTitle = 0x0255,
    City = 0x025A,
    SubLocation = 0x025C,
    ProvinceState = 0x025F,
    CountryCode = 0x0264,
    Country = 0x0265,
    Headline = 0x0269,
    Credit = 0x026E,
    Source = 0x0273,
    CopyrightNotice = 0x0274,
    Caption = 0x0278,
    Writer = 0x027A,
}

impl IptcTag {
    pub const ALL: &'static [IptcTag] = &[
        IptcTag::RecordVersion,
        IptcTag::ObjectName,
        IptcTag::Urgency,
        IptcTag::Category,
        IptcTag::SupplementalCategories,
        IptcTag::Keywords,
        IptcTag::SpecialInstructions,
        IptcTag::DateCreated,
        IptcTag::TimeCreated,
        IptcTag::Byline,
        IptcTag::BylineTitle,
        IptcTag::City,
        IptcTag::SubLocation,
        IptcTag::ProvinceState,
        IptcTag::CountryCode,
        IptcTag::Country,
        IptcTag::Headline,
        IptcTag::Credit,
        IptcTag::Source,
        IptcTag::CopyrightNotice,
        IptcTag::Caption,
        IptcTag::Writer,
    ];

    #[inline]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    pub fn from_u16(value: u16) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.as_u16() == value)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.name().eq_ignore_ascii_case(name))
    }

    pub const fn name(self) -> &'static str {
        match self {
            IptcTag::RecordVersion => "RecordVersion",
            IptcTag::ObjectName => "ObjectName",
            IptcTag::Urgency => "Urgency",
            IptcTag::Category => "Category",
            IptcTag::SupplementalCategories => "SupplementalCategories",
            IptcTag::Keywords => "Keywords",
            IptcTag::SpecialInstructions => "SpecialInstructions",
            IptcTag::DateCreated => "DateCreated",
            IptcTag::TimeCreated => "TimeCreated",
            IptcTag::Byline => "By-line",
            IptcTag::BylineTitle => "By-lineTitle",
            IptcTag::City => "City",
            IptcTag::SubLocation => "Sub-location",
            IptcTag::ProvinceState => "Province-State",
            IptcTag::CountryCode => "CountryCode",
            IptcTag::Country => "Country",
            IptcTag::Headline => "Headline",
            IptcTag::Credit => "Credit",
            IptcTag::Source => "Source",
            IptcTag::CopyrightNotice => "CopyrightNotice",
            IptcTag::Caption => "Caption-Abstract",
            IptcTag::Writer => "Writer-Editor",
        }
    }
}

/// Split a tag id into (record, dataset).
#[inline]
pub fn split_tag(tag: u16) -> (u8, u8) {
    ((tag >> 8) as u8, tag as u8)
}

// =============================================================================
// Dataset
// =============================================================================

/// One IIM dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dataset<'a> {
    pub record: u8,
    pub dataset: u8,
    pub data: &'a [u8],
}

impl Dataset<'_> {
    pub fn tag_id(&self) -> u16 {
        ((self.record as u16) << 8) | self.dataset as u16
    }

    /// Data as text, without trailing NULs.
    pub fn text(&self) -> String {
        let end = self
            .data
            .iter()
            .rposition(|&b| b != 0)
            .map(|i| i + 1)
            .unwrap_or(0);
        String::from_utf8_lossy(&self.data[..end]).into_owned()
    }
}

// =============================================================================
// IptcSegment
// =============================================================================

/// A borrowed APP13 block, starting with the `FF ED` marker.
#[derive(Debug, Clone, Copy)]
pub struct IptcSegment<'a> {
    block: ByteBlock<'a>,
}

impl<'a> IptcSegment<'a> {
    pub fn new(block: &'a [u8]) -> Self {
        Self {
            block: ByteBlock::new(block),
        }
    }

    /// Locate the IPTC-NAA resource data.
    ///
    /// Returns `Ok(None)` if the segment has no IPTC resource.
    fn iptc_resource(&self) -> Result<Option<ByteBlock<'a>>, IptcError> {
        let start = SEGMENT_HEADER_SIZE + PHOTOSHOP_SIGNATURE.len();
        let signature = self
            .block
            .slice(SEGMENT_HEADER_SIZE, PHOTOSHOP_SIGNATURE.len())
            .map_err(|_| malformed("segment too short for Photoshop identifier"))?;
        if signature != PHOTOSHOP_SIGNATURE {
            return Err(malformed("missing Photoshop 3.0 identifier"));
        }

        let mut pos = start;
        while pos < self.block.len() {
            if self.block.slice(pos, 4)? != RESOURCE_SIGNATURE {
                return Err(malformed(format!("bad resource signature at offset {}", pos)));
            }
            let id = self.block.u16_be_at(pos + 4)?;

            // Pascal string: length byte + name, padded to even total
            let name_len = self.block.u8_at(pos + 6)? as usize;
            let name_size = (1 + name_len + 1) & !1;

            let size_pos = pos + 6 + name_size;
            let size = self.block.u32_be_at(size_pos)? as usize;
            let data_pos = size_pos + 4;
            let data = self.block.slice(data_pos, size)?;

            if id == IPTC_RESOURCE_ID {
                return Ok(Some(ByteBlock::new(data)));
            }
            pos = data_pos + size + (size & 1);
        }

        Ok(None)
    }

    /// All datasets of the IPTC resource, in storage order.
    ///
    /// # Errors
    /// - `Malformed` for a bad identifier, resource signature, dataset
    ///   marker, or an extended-length dataset
    /// - `Truncated` if a resource or dataset runs past the segment
    pub fn datasets(&self) -> Result<Vec<Dataset<'a>>, IptcError> {
        let Some(iim) = self.iptc_resource()? else {
            return Ok(Vec::new());
        };

        let mut out = Vec::new();
        let mut pos = 0;
        while pos < iim.len() {
            let marker = iim.u8_at(pos)?;
            if marker != DATASET_MARKER {
                // Trailing padding after the last dataset
                if iim.slice(pos, iim.len() - pos)?.iter().all(|&b| b == 0) {
                    break;
                }
                return Err(malformed(format!("bad dataset marker at offset {}", pos)));
            }

            let record = iim.u8_at(pos + 1)?;
            let dataset = iim.u8_at(pos + 2)?;
            let length = iim.u16_be_at(pos + 3)?;
            if length & 0x8000 != 0 {
                return Err(malformed(format!(
                    "extended dataset {}:{} not supported",
                    record, dataset
                )));
            }

            let data = iim.slice(pos + 5, length as usize)?;
            out.push(Dataset {
                record,
                dataset,
                data,
            });
            pos += 5 + length as usize;
        }

        Ok(out)
    }

    /// Read one dataset by tag id.
    ///
    /// RecordVersion decodes to `Short`. Any other dataset decodes to
    /// `Text`, or to a `Sequence` of `Text` when it occurs several times.
    pub fn read_tag_value(&self, tag: u16) -> Result<Value, IptcError> {
        let (record, dataset) = split_tag(tag);
        let matches: Vec<Dataset<'a>> = self
            .datasets()?
            .into_iter()
            .filter(|d| d.record == record && d.dataset == dataset)
            .collect();

        match matches.as_slice() {
            [] => Err(IptcError::NotFound { record, dataset }),
            [single] if tag == IptcTag::RecordVersion.as_u16() => {
                let bytes = ByteBlock::new(single.data);
                Ok(Value::Short(bytes.u16_be_at(0)?))
            }
            [single] => Ok(Value::Text(single.text())),
            many => Ok(Value::Sequence(
                many.iter().map(|d| Value::Text(d.text())).collect(),
            )),
        }
    }
}

fn malformed(reason: impl Into<String>) -> IptcError {
    IptcError::Malformed {
        reason: reason.into(),
    }
}

// =============================================================================
// Tests
// =============================================================================
