//! Messaging platform client trait.
//!
//! Defined in weddingwall-core so the ingest service can download content
//! and send replies without depending on any HTTP client. The LINE adapter
//! lives in weddingwall-infra.

use weddingwall_types::error::MessagingError;

/// The two messaging-platform capabilities the ingest pipeline needs.
pub trait MessagingClient: Send + Sync {
    /// Download the binary content of a media message.
    fn get_message_content(
        &self,
        content_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<u8>, MessagingError>> + Send;

    /// Send a single text reply using a one-shot reply token.
    fn reply_text(
        &self,
        reply_token: &str,
        text: &str,
    ) -> impl std::future::Future<Output = Result<(), MessagingError>> + Send;
}
