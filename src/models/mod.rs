use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::fingerprint::Fingerprint;

/// What the cache remembers about one synced emoji.
///
/// Serialized as `{"id": "...", "key": "..."}` so existing cache files keep
/// loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    #[serde(rename = "id")]
    pub remote_id: String,
    #[serde(rename = "key")]
    pub fingerprint: Fingerprint,
}

impl CacheEntry {
    pub fn new(remote_id: impl Into<String>, fingerprint: Fingerprint) -> Self {
        Self {
            remote_id: remote_id.into(),
            fingerprint,
        }
    }
}

/// An emoji registered under the application, as reported by the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEmoji {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Supported image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageKind {
    Png,
    Jpeg,
    Gif,
}

impl ImageKind {
    /// Map a file extension to an image kind, ignoring ASCII case
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "gif" => Some(Self::Gif),
            _ => None,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
        }
    }
}

/// An image file found in the image directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalImage {
    /// Logical emoji name: the file name without its extension
    pub name: String,
    pub path: PathBuf,
    pub kind: ImageKind,
}
