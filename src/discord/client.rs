//! reqwest-backed client for the application emoji endpoints
//!
//! Endpoints, relative to the API base URL:
//!
//! - `GET    /applications/{application_id}/emojis`        200 on success
//! - `POST   /applications/{application_id}/emojis`        201 on success
//! - `DELETE /applications/{application_id}/emojis/{id}`   204 on success
//!
//! All requests carry `Authorization: Bot <token>`. No timeout or retry policy
//! is applied beyond reqwest's defaults.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, header};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::EmojiApi;
use crate::config::Credentials;
use crate::errors::{AppResult, RemoteError, RemoteResult};
use crate::fingerprint::EncodedImage;
use crate::models::RemoteEmoji;

/// Listing responses come either as a bare array or wrapped in `items`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EmojiListResponse {
    Wrapped { items: Vec<RemoteEmoji> },
    Bare(Vec<RemoteEmoji>),
}

impl EmojiListResponse {
    fn into_emojis(self) -> Vec<RemoteEmoji> {
        match self {
            Self::Wrapped { items } => items,
            Self::Bare(emojis) => emojis,
        }
    }
}

#[derive(Debug, Serialize)]
struct CreateEmojiRequest<'a> {
    name: &'a str,
    image: &'a str,
}

#[derive(Clone)]
pub struct DiscordEmojiClient {
    client: Client,
    base_url: String,
    application_id: String,
    authorization: String,
}

impl DiscordEmojiClient {
    pub fn new(base_url: &str, credentials: &Credentials) -> AppResult<Self> {
        let client = Client::builder()
            .user_agent(format!(
                "DiscordBot ({}, {})",
                env!("CARGO_PKG_REPOSITORY"),
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            application_id: credentials.application_id.clone(),
            authorization: format!("Bot {}", credentials.bot_token),
        })
    }

    fn emojis_url(&self) -> String {
        format!(
            "{}/applications/{}/emojis",
            self.base_url, self.application_id
        )
    }

    fn emoji_url(&self, id: &str) -> String {
        format!("{}/{}", self.emojis_url(), id)
    }

    /// Status and body text of a failed response, for error reporting
    async fn failure_details(response: Response) -> (u16, String) {
        let status = response.status().as_u16();
        let message = response
            .text()
            .await
            .unwrap_or_else(|e| format!("<unreadable body: {}>", e));
        (status, message)
    }

    async fn decode_json<T: for<'de> Deserialize<'de>>(response: Response) -> RemoteResult<T> {
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| RemoteError::Decode {
            message: format!("{}: {}", e, body),
        })
    }
}

#[async_trait]
impl EmojiApi for DiscordEmojiClient {
    async fn list_emojis(&self) -> RemoteResult<Vec<RemoteEmoji>> {
        let url = self.emojis_url();
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header(header::AUTHORIZATION, &self.authorization)
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            let (status, message) = Self::failure_details(response).await;
            return Err(RemoteError::ListFailed { status, message });
        }

        let listing: EmojiListResponse = Self::decode_json(response).await?;
        Ok(listing.into_emojis())
    }

    async fn create_emoji(&self, name: &str, image: &EncodedImage) -> RemoteResult<RemoteEmoji> {
        let url = self.emojis_url();
        debug!("POST {} name={}", url, name);

        let response = self
            .client
            .post(&url)
            .header(header::AUTHORIZATION, &self.authorization)
            .json(&CreateEmojiRequest {
                name,
                image: image.data_uri(),
            })
            .send()
            .await?;

        if response.status() != StatusCode::CREATED {
            let (status, message) = Self::failure_details(response).await;
            return Err(RemoteError::from_create_response(name, status, message));
        }

        Self::decode_json(response).await
    }

    async fn delete_emoji(&self, id: &str) -> RemoteResult<()> {
        let url = self.emoji_url(id);
        debug!("DELETE {}", url);

        let response = self
            .client
            .delete(&url)
            .header(header::AUTHORIZATION, &self.authorization)
            .send()
            .await?;

        match response.status() {
            StatusCode::NO_CONTENT => Ok(()),
            StatusCode::NOT_FOUND => Err(RemoteError::UnknownEmoji { id: id.to_string() }),
            _ => {
                let (status, message) = Self::failure_details(response).await;
                Err(RemoteError::DeleteFailed {
                    id: id.to_string(),
                    status,
                    message,
                })
            }
        }
    }
}
