//! Directory indexing.
//!
//! [`Indexer`] turns an [`ImageSource`](crate::io::ImageSource) into an
//! [`ImageIndex`] document.

mod crawler;
mod record;

pub use crawler::{decode_record, Indexer, DEFAULT_CONCURRENCY};
pub use record::{ImageIndex, IndexRecord, SkippedImage, INDEX_FORMAT_VERSION};
