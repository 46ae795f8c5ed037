//! Error type definitions for emoji-sync
//!
//! This module defines all error types used throughout the application.
//! Run-level failures (configuration, cache persistence, an unreadable image
//! directory) surface as [`AppError`]. Failures talking to the remote emoji
//! service are [`RemoteError`]s, which the reconciler logs and isolates to the
//! single image they concern.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing or invalid configuration (credentials, paths)
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Cache persistence errors
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// A local image could not be read
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The image directory could not be listed
    #[error("Failed to list image directory {}: {source}", path.display())]
    ImageDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Remote emoji service errors
    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),

    /// HTTP client construction errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Errors raised while loading or saving the emoji cache file
#[derive(Error, Debug)]
pub enum CacheError {
    /// The cache file exists but does not hold a valid cache document
    #[error("Cache file {} is corrupt: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The cache file could not be read or written
    #[error("Cache file {} I/O failure: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors returned by the remote emoji service
#[derive(Error, Debug)]
pub enum RemoteError {
    /// Listing emojis returned a non-success status
    #[error("Failed to list emojis: HTTP {status} - {message}")]
    ListFailed { status: u16, message: String },

    /// Creating an emoji returned a non-success status
    #[error("Failed to create emoji '{name}': HTTP {status} - {message}")]
    CreateFailed {
        name: String,
        status: u16,
        message: String,
    },

    /// The service rejected the emoji name format
    #[error("Invalid emoji name '{name}' (does not match the required format): HTTP {status} - {message}")]
    InvalidName {
        name: String,
        status: u16,
        message: String,
    },

    /// Deleting an emoji returned a non-success status
    #[error("Failed to delete emoji {id}: HTTP {status} - {message}")]
    DeleteFailed {
        id: String,
        status: u16,
        message: String,
    },

    /// The emoji to delete no longer exists remotely
    #[error("Unknown emoji: {id}")]
    UnknownEmoji { id: String },

    /// Connection or protocol failure before a response was received
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A success response carried a body we could not understand
    #[error("Unexpected response body: {message}")]
    Decode { message: String },
}

impl AppError {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a read error for a local image
    pub fn read<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }
}

impl CacheError {
    pub fn io<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl RemoteError {
    /// Marker the service places in validation errors for malformed names
    pub const NAME_FORMAT_SIGNATURE: &'static str = "STRING_TYPE_REGEX";

    /// Classify a failed creation response by inspecting its body
    pub fn from_create_response<N: Into<String>>(name: N, status: u16, message: String) -> Self {
        let name = name.into();
        if Self::is_name_format_error(&message) {
            Self::InvalidName {
                name,
                status,
                message,
            }
        } else {
            Self::CreateFailed {
                name,
                status,
                message,
            }
        }
    }

    /// Whether an error body describes a rejected emoji name
    pub fn is_name_format_error(body: &str) -> bool {
        body.contains("name") && body.contains(Self::NAME_FORMAT_SIGNATURE)
    }

    /// Whether the remote object is already gone
    pub fn is_unknown_emoji(&self) -> bool {
        matches!(self, Self::UnknownEmoji { .. })
    }
}
