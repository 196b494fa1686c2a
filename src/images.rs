// src/images.rs
//! Mirrors remote listing images into local storage.
//!
//! Downloads are idempotent (an existing destination file short-circuits
//! the network fetch unless forced), streamed to disk, and cleaned up on
//! partial failure. Batch mirroring preserves input order and degrades
//! per-URL failures to the placeholder reference so one broken image
//! never fails a listing.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::future::join_all;
use futures::StreamExt;
use tokio::io::AsyncWriteExt;
use tokio::sync::Semaphore;
use url::Url;

use crate::constants::{DEFAULT_IMAGE_EXTENSION, MIRRORED_IMAGE_PREFIX};
use crate::error::AppError;
use crate::types::LocalImageRef;

/// The entity kind an image belongs to; becomes part of its filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Hero,
    Gallery,
    Tour,
    Amenity,
    Nearby,
    Developer,
    Pano,
}

impl ImageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageKind::Hero => "hero",
            ImageKind::Gallery => "gallery",
            ImageKind::Tour => "tour",
            ImageKind::Amenity => "amenity",
            ImageKind::Nearby => "nearby",
            ImageKind::Developer => "developer",
            ImageKind::Pano => "pano",
        }
    }
}

/// Downloads remote images into a local directory tree.
pub struct ImageMirror {
    client: reqwest::Client,
    images_dir: PathBuf,
    download_permits: Arc<Semaphore>,
}

impl ImageMirror {
    /// Creates a mirror rooted at `images_dir`, creating the directory
    /// if needed. `max_concurrent` bounds simultaneous downloads.
    pub async fn new(images_dir: impl Into<PathBuf>, max_concurrent: usize) -> Result<Self, AppError> {
        let images_dir = images_dir.into();
        tokio::fs::create_dir_all(&images_dir).await?;
        Ok(Self {
            client: reqwest::Client::new(),
            images_dir,
            download_permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
        })
    }

    /// Mirrors a single URL to `filename` under the images root.
    ///
    /// When `force` is false and the destination already exists, the
    /// existing file's reference is returned without touching the
    /// network. Any transport, status, or write failure deletes the
    /// partially-written file and surfaces as a `Download` error.
    pub async fn mirror_one(
        &self,
        url: &str,
        filename: &str,
        force: bool,
    ) -> Result<LocalImageRef, AppError> {
        let destination = self.images_dir.join(filename);
        let local_ref = LocalImageRef::new(format!("{}/{}", MIRRORED_IMAGE_PREFIX, filename));

        if !force && tokio::fs::try_exists(&destination).await.unwrap_or(false) {
            log::debug!("Image already mirrored, skipping: {}", filename);
            return Ok(local_ref);
        }

        let _permit = self
            .download_permits
            .acquire()
            .await
            .map_err(|e| AppError::download(url, filename, e))?;

        log::info!("Downloading image: {}", filename);
        match self.stream_to_disk(url, &destination).await {
            Ok(()) => Ok(local_ref),
            Err(cause) => {
                let _ = tokio::fs::remove_file(&destination).await;
                Err(match cause {
                    AppError::Download { .. } => cause,
                    other => AppError::Download {
                        url: url.to_string(),
                        filename: filename.to_string(),
                        cause: Box::new(other),
                    },
                })
            }
        }
    }

    async fn stream_to_disk(&self, url: &str, destination: &Path) -> Result<(), AppError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::download(url, destination.display().to_string(), e))?;

        if !response.status().is_success() {
            return Err(AppError::Download {
                url: url.to_string(),
                filename: destination.display().to_string(),
                cause: format!("HTTP status {}", response.status()).into(),
            });
        }

        let mut file = tokio::fs::File::create(destination).await?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| AppError::download(url, destination.display().to_string(), e))?;
            file.write_all(&chunk).await?;
        }
        file.flush().await?;
        Ok(())
    }

    /// Mirrors a batch of URLs named `{slug}-{kind}-{index}{ext}`.
    ///
    /// Output preserves input order and length; a failed entry becomes
    /// the placeholder reference instead of failing the batch.
    pub async fn mirror_many(
        &self,
        urls: &[String],
        slug: &str,
        kind: ImageKind,
        force: bool,
    ) -> Vec<LocalImageRef> {
        let downloads = urls.iter().enumerate().map(|(i, url)| {
            let filename = batch_filename(url, slug, kind, i + 1);
            self.mirror_with_placeholder(url, filename, kind, force)
        });
        join_all(downloads).await
    }

    /// Mirrors child-scoped images named `{slug}-{kind}-{childId}-{index}{ext}`
    /// so sibling children (scenes, amenities, nearby locations) never
    /// collide on filenames.
    pub async fn mirror_for_child(
        &self,
        urls: &[String],
        slug: &str,
        kind: ImageKind,
        child_id: &str,
        force: bool,
    ) -> Vec<LocalImageRef> {
        let downloads = urls.iter().enumerate().map(|(i, url)| {
            let filename = child_filename(url, slug, kind, child_id, i + 1);
            self.mirror_with_placeholder(url, filename, kind, force)
        });
        join_all(downloads).await
    }

    async fn mirror_with_placeholder(
        &self,
        url: &str,
        filename: String,
        kind: ImageKind,
        force: bool,
    ) -> LocalImageRef {
        match self.mirror_one(url, &filename, force).await {
            Ok(local_ref) => local_ref,
            Err(e) => {
                log::warn!("Falling back to placeholder for {} image: {}", kind.as_str(), e);
                LocalImageRef::placeholder()
            }
        }
    }
}

/// Extension taken from the URL's path component, `.webp` if absent.
fn extension_of(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| {
            Path::new(u.path())
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| format!(".{}", e))
        })
        .unwrap_or_else(|| DEFAULT_IMAGE_EXTENSION.to_string())
}

/// `{slug}-{kind}-{index}{ext}`, 1-based index.
pub fn batch_filename(url: &str, slug: &str, kind: ImageKind, index: usize) -> String {
    format!("{}-{}-{}{}", slug, kind.as_str(), index, extension_of(url))
}

/// `{slug}-{kind}-{childId}-{index}{ext}`, 1-based index.
pub fn child_filename(url: &str, slug: &str, kind: ImageKind, child_id: &str, index: usize) -> String {
    format!(
        "{}-{}-{}-{}{}",
        slug,
        kind.as_str(),
        child_id,
        index,
        extension_of(url)
    )
}
