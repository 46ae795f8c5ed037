//! Centralized error handling for emoji-sync
//!
//! # Error Categories
//!
//! - **Configuration Errors**: missing credentials, fatal before any network call
//! - **Cache Errors**: the persisted cache is corrupt or cannot be written
//! - **Read Errors**: a single local image could not be read
//! - **Remote Errors**: list, create or delete calls rejected by the service
//!
//! # Usage
//!
//! ```rust
//! use emoji_sync::errors::{AppError, AppResult};
//!
//! fn require(token: Option<&str>) -> AppResult<&str> {
//!     token.ok_or_else(|| AppError::configuration("BOT_TOKEN is required"))
//! }
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for cache Results
pub type CacheResult<T> = Result<T, CacheError>;

/// Convenience type alias for remote service Results
pub type RemoteResult<T> = Result<T, RemoteError>;
