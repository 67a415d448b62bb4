//! Concurrent directory indexing.
//!
//! The [`Indexer`] lists every image of an [`ImageSource`], reads each one
//! and decodes its metadata on the blocking pool. At most `concurrency`
//! files are in flight at once. A file that cannot be read or scanned ends
//! up in [`ImageIndex::skipped`]; it never aborts the run.

use std::collections::BTreeMap;
use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::error::{FileError, IndexError, JpegError};
use crate::format::ExifTag;
use crate::io::ImageSource;
use crate::meta::{BasicInfo, Image, MetaReader};

use super::record::{ImageIndex, IndexRecord, SkippedImage, INDEX_FORMAT_VERSION};

/// Default number of files decoded at the same time.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Builds an [`ImageIndex`] from an image source.
pub struct Indexer<S: ImageSource + 'static> {
    source: Arc<S>,
    concurrency: usize,
    fields: Arc<Vec<ExifTag>>,
}

impl<S: ImageSource + 'static> Indexer<S> {
    pub fn new(source: S) -> Self {
        Self {
            source: Arc::new(source),
            concurrency: DEFAULT_CONCURRENCY,
            fields: Arc::new(Vec::new()),
        }
    }

    /// Limit the number of files processed at once. Zero is treated as one.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Extra EXIF tags copied into every record's `fields` map.
    pub fn with_fields(mut self, fields: Vec<ExifTag>) -> Self {
        self.fields = Arc::new(fields);
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Index every image of the source.
    ///
    /// # Errors
    /// Fails only if the source cannot be listed or a worker task panics.
    pub async fn run(&self) -> Result<ImageIndex, IndexError> {
        let ids = self.source.list_images().await?;
        info!(
            root = %self.source.identifier(),
            count = ids.len(),
            concurrency = self.concurrency,
            "Indexing images"
        );

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();

        for id in ids {
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| IndexError::Task(format!("semaphore closed: {}", e)))?;
            let source = Arc::clone(&self.source);
            let fields = Arc::clone(&self.fields);

            tasks.spawn(async move {
                let result = index_file(source.as_ref(), &id, fields).await;
                drop(permit);
                (id, result)
            });
        }

        let mut images = Vec::new();
        let mut skipped = Vec::new();

        while let Some(joined) = tasks.join_next().await {
            let (id, result) = joined.map_err(|e| IndexError::Task(e.to_string()))?;
            match result {
                Ok(record) => images.push(record),
                Err(e) => {
                    warn!(image = %id, error = %e, "Skipping image");
                    skipped.push(SkippedImage {
                        path: id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        images.sort_by(|a, b| a.path.cmp(&b.path));
        skipped.sort_by(|a, b| a.path.cmp(&b.path));

        info!(
            indexed = images.len(),
            skipped = skipped.len(),
            "Indexing finished"
        );

        Ok(ImageIndex {
            format_version: INDEX_FORMAT_VERSION,
            generator: format!("imgindex {}", env!("CARGO_PKG_VERSION")),
            root: self.source.identifier().to_string(),
            generated_at: Utc::now(),
            images,
            skipped,
        })
    }
}

async fn index_file<S: ImageSource>(
    source: &S,
    id: &str,
    fields: Arc<Vec<ExifTag>>,
) -> Result<IndexRecord, FileError> {
    let data = source.read_image(id).await?;
    debug!(image = %id, size = data.len(), "Read image");

    let path = id.to_string();
    tokio::task::spawn_blocking(move || decode_record(path, data, &fields))
        .await
        .map_err(|e| FileError::Task(e.to_string()))?
        .map_err(FileError::from)
}

/// Decode the index record of one file.
///
/// Only a broken JPEG container fails the file; malformed metadata
/// namespaces are recorded in the record itself.
pub fn decode_record(
    path: String,
    data: Bytes,
    fields: &[ExifTag],
) -> Result<IndexRecord, JpegError> {
    let size = data.len() as u64;
    let image = Image::from_bytes(data)?;

    let mut reader = MetaReader::new(&image, &path);
    let basic = BasicInfo::collect(&mut reader);

    let mut extra = BTreeMap::new();
    for &tag in fields {
        if let Some(value) = reader.exif(tag) {
            extra.insert(tag.name().to_string(), value);
        }
    }

    let malformed = reader.malformed();
    drop(reader);

    Ok(IndexRecord {
        path,
        size,
        basic,
        fields: extra,
        malformed,
    })
}
