//! LineMessagingClient -- concrete [`MessagingClient`] for the LINE Messaging API.
//!
//! Content downloads go to the data API host, replies to the main API host.
//! The channel access token is wrapped in [`secrecy::SecretString`] and is
//! only exposed when building the `Authorization` header.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use weddingwall_core::ingest::client::MessagingClient;
use weddingwall_types::config::LineApiConfig;
use weddingwall_types::error::MessagingError;

/// Reply request body (`POST /v2/bot/message/reply`).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyRequest<'a> {
    reply_token: &'a str,
    messages: Vec<TextMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct TextMessage<'a> {
    #[serde(rename = "type")]
    message_type: &'static str,
    text: &'a str,
}

/// HTTP client for the LINE Messaging API.
pub struct LineMessagingClient {
    client: reqwest::Client,
    access_token: SecretString,
    api_base_url: String,
    data_api_base_url: String,
}

impl LineMessagingClient {
    pub fn new(access_token: SecretString, config: &LineApiConfig) -> Result<Self, MessagingError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| MessagingError::Http(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            access_token,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            data_api_base_url: config.data_api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn content_url(&self, content_id: &str) -> String {
        format!("{}/v2/bot/message/{content_id}/content", self.data_api_base_url)
    }

    fn reply_url(&self) -> String {
        format!("{}/v2/bot/message/reply", self.api_base_url)
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, MessagingError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(MessagingError::Api {
        status: status.as_u16(),
        body,
    })
}

impl MessagingClient for LineMessagingClient {
    async fn get_message_content(&self, content_id: &str) -> Result<Vec<u8>, MessagingError> {
        let response = self
            .client
            .get(self.content_url(content_id))
            .bearer_auth(self.access_token.expose_secret())
            .send()
            .await
            .map_err(|e| MessagingError::Http(format!("content request failed: {e}")))?;

        let response = check_status(response).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| MessagingError::Http(format!("failed to read content body: {e}")))?;
        tracing::debug!(message_id = content_id, bytes = bytes.len(), "downloaded message content");
        Ok(bytes.to_vec())
    }

    async fn reply_text(&self, reply_token: &str, text: &str) -> Result<(), MessagingError> {
        let body = ReplyRequest {
            reply_token,
            messages: vec![TextMessage {
                message_type: "text",
                text,
            }],
        };

        let response = self
            .client
            .post(self.reply_url())
            .bearer_auth(self.access_token.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| MessagingError::Http(format!("reply request failed: {e}")))?;

        check_status(response).await?;
        Ok(())
    }
}
