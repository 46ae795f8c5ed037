//! Content fingerprints and upload payloads for emoji images
//!
//! A [`Fingerprint`] is the hex MD5 digest of a file's raw bytes. It only has
//! to detect that an image changed since it was last uploaded, so a 128-bit
//! digest is plenty. The same bytes always give the same fingerprint.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tokio::fs;

use crate::errors::{AppError, AppResult};
use crate::models::ImageKind;

/// Hex-encoded MD5 digest of an image's contents
///
/// # Example
///
/// ```rust
/// use emoji_sync::fingerprint::Fingerprint;
///
/// let a = Fingerprint::of_bytes(b"hello");
/// assert_eq!(a, Fingerprint::of_bytes(b"hello"));
/// assert_ne!(a, Fingerprint::of_bytes(b"world"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    #[must_use]
    pub fn of_bytes(data: &[u8]) -> Self {
        Self(format!("{:x}", md5::compute(data)))
    }

    /// Fingerprint the file at `path`
    pub async fn of_file(path: &Path) -> AppResult<Self> {
        let data = fs::read(path)
            .await
            .map_err(|e| AppError::read(path, e))?;
        Ok(Self::of_bytes(&data))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Fingerprint {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Image content ready to be submitted as an emoji
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    data_uri: String,
}

impl EncodedImage {
    pub fn new(data: &[u8], kind: ImageKind) -> Self {
        Self {
            data_uri: format!("data:{};base64,{}", kind.mime_type(), STANDARD.encode(data)),
        }
    }

    pub fn data_uri(&self) -> &str {
        &self.data_uri
    }
}

/// A local image read once. The fingerprint is computed up front, the
/// upload payload only when [`PreparedImage::encode`] is called.
#[derive(Debug, Clone)]
pub struct PreparedImage {
    pub fingerprint: Fingerprint,
    kind: ImageKind,
    data: Vec<u8>,
}

impl PreparedImage {
    pub async fn load(path: &Path, kind: ImageKind) -> AppResult<Self> {
        let data = fs::read(path)
            .await
            .map_err(|e| AppError::read(path, e))?;
        Ok(Self {
            fingerprint: Fingerprint::of_bytes(&data),
            kind,
            data,
        })
    }

    pub fn encode(&self) -> EncodedImage {
        EncodedImage::new(&self.data, self.kind)
    }
}
