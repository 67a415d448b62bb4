//! The index document.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::IndexError;
use crate::format::Value;
use crate::meta::{BasicInfo, Namespace};

/// Version of the index document layout.
pub const INDEX_FORMAT_VERSION: u32 = 1;

/// Metadata of one indexed image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexRecord {
    /// Path relative to the index root, forward-slash separated
    pub path: String,

    /// File size in bytes
    pub size: u64,

    #[serde(flatten)]
    pub basic: BasicInfo,

    /// Extra EXIF tags requested on the command line, by tag name
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, Value>,

    /// Namespaces present in the file but failing to decode
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub malformed: Vec<Namespace>,
}

/// A file that could not be indexed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedImage {
    pub path: String,
    pub reason: String,
}

/// The index of one directory tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageIndex {
    pub format_version: u32,

    /// Version of the tool that wrote the index
    pub generator: String,

    /// Source the images were read from
    pub root: String,

    /// When the crawl finished, serialized as RFC 3339
    pub generated_at: DateTime<Utc>,

    /// Indexed images, sorted by path
    pub images: Vec<IndexRecord>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedImage>,
}

impl ImageIndex {
    pub fn to_json(&self, pretty: bool) -> Result<String, IndexError> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}
