//! Discovery of emoji images in the local image directory

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

use crate::errors::{AppError, AppResult};
use crate::models::{ImageKind, LocalImage};

/// Result of scanning the image directory
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    /// Images in directory-listing order, one per logical name
    pub images: Vec<LocalImage>,
    /// Files skipped because an earlier file already claimed their name
    pub duplicates: Vec<LocalImage>,
}

impl ScanResult {
    pub fn names(&self) -> HashSet<&str> {
        self.images.iter().map(|image| image.name.as_str()).collect()
    }
}

/// Scanner for supported images in a single directory (not recursive)
#[derive(Debug, Clone)]
pub struct ImageScanner {
    directory: PathBuf,
}

impl ImageScanner {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// List every supported image in the directory.
    ///
    /// Order follows the underlying directory listing and is not stable
    /// across platforms.
    pub async fn scan(&self) -> AppResult<ScanResult> {
        debug!("Scanning for images in: {:?}", self.directory);

        let dir_error = |source: std::io::Error| AppError::ImageDirectory {
            path: self.directory.clone(),
            source,
        };

        let mut entries = fs::read_dir(&self.directory).await.map_err(dir_error)?;
        let mut seen = HashSet::new();
        let mut result = ScanResult::default();

        while let Some(entry) = entries.next_entry().await.map_err(dir_error)? {
            let path = entry.path();

            let file_type = entry.file_type().await.map_err(dir_error)?;
            let is_file = if file_type.is_symlink() {
                // Follow the link; dangling links are skipped.
                fs::metadata(&path)
                    .await
                    .is_ok_and(|metadata| metadata.is_file())
            } else {
                file_type.is_file()
            };
            if !is_file {
                continue;
            }

            let Some(image) = Self::classify(&path) else {
                continue;
            };

            if seen.insert(image.name.clone()) {
                result.images.push(image);
            } else {
                warn!(
                    "Skipping {:?}: another image already uses the name '{}'",
                    image.path, image.name
                );
                result.duplicates.push(image);
            }
        }

        debug!("Found {} images", result.images.len());
        Ok(result)
    }

    /// Turn a path into a [`LocalImage`] if it has a supported extension
    fn classify(path: &Path) -> Option<LocalImage> {
        let kind = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(ImageKind::from_extension)?;

        let name = match path.file_stem().and_then(|stem| stem.to_str()) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => {
                warn!("Invalid file name: {:?}", path);
                return None;
            }
        };

        Some(LocalImage {
            name,
            path: path.to_path_buf(),
            kind,
        })
    }
}
