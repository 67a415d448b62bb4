//! Image sources for the indexer.
//!
//! The indexer never touches the filesystem directly. It asks an
//! [`ImageSource`] for the list of image ids and for the bytes of each image,
//! which keeps crawling testable with in-memory sources.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tracing::{debug, warn};

use crate::error::IoError;

/// Default file extensions treated as JPEG images.
pub const DEFAULT_EXTENSIONS: &[&str] = &["jpg", "jpeg"];

/// Trait for listing and reading images from some storage backend.
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// List the ids of all images, sorted.
    ///
    /// Ids are forward-slash separated paths relative to the source root.
    async fn list_images(&self) -> Result<Vec<String>, IoError>;

    /// Read the full contents of one image.
    async fn read_image(&self, image_id: &str) -> Result<Bytes, IoError>;

    /// Human-readable identifier for logging and the index header.
    fn identifier(&self) -> &str;
}

/// Check whether `path` ends in one of `extensions` (case-insensitive).
pub fn has_image_extension(path: &str, extensions: &[String]) -> bool {
    let lower = path.to_lowercase();
    extensions
        .iter()
        .any(|ext| lower.ends_with(&format!(".{}", ext.trim_start_matches('.').to_lowercase())))
}

// =============================================================================
// LocalImageSource
// =============================================================================

/// Image source backed by a local directory tree.
#[derive(Debug, Clone)]
pub struct LocalImageSource {
    root: PathBuf,
    identifier: String,
    extensions: Vec<String>,
}

impl LocalImageSource {
    /// Create a source rooted at `root` using the default JPEG extensions.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let identifier = root.display().to_string();
        Self {
            root,
            identifier,
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }

    /// Replace the accepted file extensions.
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Collect image ids below the root, descending into subdirectories.
    ///
    /// The root itself must be readable; unreadable subdirectories are logged
    /// and skipped.
    async fn walk(&self) -> Result<Vec<String>, IoError> {
        let mut out = Vec::new();
        let mut pending = vec![self.root.clone()];

        while let Some(dir) = pending.pop() {
            let mut entries = match tokio::fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if dir == self.root => return Err(io_error(&dir, e)),
                Err(e) => {
                    warn!("Cannot read directory {:?}: {}", dir, e);
                    continue;
                }
            };

            while let Some(entry) = entries.next_entry().await.map_err(|e| io_error(&dir, e))? {
                let path = entry.path();
                let file_type = match entry.file_type().await {
                    Ok(t) => t,
                    Err(e) => {
                        warn!("Cannot stat {:?}: {}", path, e);
                        continue;
                    }
                };

                if file_type.is_dir() {
                    pending.push(path);
                } else if file_type.is_file() {
                    let Some(id) = self.relative_id(&path) else {
                        continue;
                    };
                    if has_image_extension(&id, &self.extensions) {
                        out.push(id);
                    } else {
                        debug!("Skipping non-image file {:?}", path);
                    }
                }
            }
        }

        Ok(out)
    }

    fn relative_id(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let parts: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Some(parts.join("/"))
    }
}

fn io_error(path: &Path, e: std::io::Error) -> IoError {
    if e.kind() == std::io::ErrorKind::NotFound {
        IoError::NotFound(path.display().to_string())
    } else {
        IoError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        }
    }
}

#[async_trait]
impl ImageSource for LocalImageSource {
    async fn list_images(&self) -> Result<Vec<String>, IoError> {
        let mut images = self.walk().await?;
        images.sort();
        Ok(images)
    }

    async fn read_image(&self, image_id: &str) -> Result<Bytes, IoError> {
        let path = self.root.join(image_id);
        let data = tokio::fs::read(&path).await.map_err(|e| io_error(&path, e))?;
        Ok(Bytes::from(data))
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }
}
