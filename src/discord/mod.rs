//! Remote emoji service
//!
//! [`EmojiApi`] is the seam between the reconciler and the network. Every
//! call makes exactly one request and reports failure through
//! [`RemoteResult`]; deciding whether a failure is fatal is left to the caller.

use async_trait::async_trait;

use crate::errors::RemoteResult;
use crate::fingerprint::EncodedImage;
use crate::models::RemoteEmoji;

pub mod client;

pub use client::DiscordEmojiClient;

/// Operations on the emojis registered under one application
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmojiApi: Send + Sync {
    /// Fetch every emoji currently registered under the application
    async fn list_emojis(&self) -> RemoteResult<Vec<RemoteEmoji>>;

    /// Register a new emoji named `name` with the given image
    async fn create_emoji(&self, name: &str, image: &EncodedImage) -> RemoteResult<RemoteEmoji>;

    /// Remove the emoji with remote id `id`
    async fn delete_emoji(&self, id: &str) -> RemoteResult<()>;
}
