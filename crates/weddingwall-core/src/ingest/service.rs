//! Ingest service for LINE webhook calls.
//!
//! Order of operations is part of the contract:
//! 1. Signature header present, else `MissingSignature`.
//! 2. Signature valid over the raw bytes, else `InvalidSignature`.
//!    The body is not parsed before this point.
//! 3. Body parses as a webhook envelope, else `MalformedPayload`.
//! 4. Events are decoded and dispatched one at a time, in order. An event
//!    that does not decode is logged and skipped.
//!
//! Image download/save failures are logged and only change which reply is
//! sent. A reply that cannot be delivered aborts the call with `Dispatch`.

use serde::Serialize;
use weddingwall_types::bucket::Bucket;
use weddingwall_types::error::IngestError;
use weddingwall_types::event::{ChatEvent, ChatEventKind, ImageSetMembership};
use weddingwall_types::image::StoredImage;
use weddingwall_types::line::{WebhookEvent, WebhookPayload};

use super::client::MessagingClient;
use super::policy::plan_image;
use super::replies;
use super::signature::SignatureVerifier;
use crate::naming::generate_image_name_now;
use crate::storage::image_store::ImageStore;

/// Successful acknowledgement of a webhook call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IngestAck {
    /// The payload carried no events.
    NoEvents,
    Processed(DispatchSummary),
}

/// Counters for one webhook call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DispatchSummary {
    pub events: usize,
    /// Undecodable events, non-message events, or events without a reply token.
    pub skipped: usize,
    pub images_saved: usize,
    pub images_failed: usize,
    /// Images beyond the per-set cap.
    pub images_dropped: usize,
    pub replies_sent: usize,
}

/// Handles webhook calls end to end.
pub struct IngestService<S: ImageStore, C: MessagingClient, V: SignatureVerifier> {
    store: S,
    client: C,
    verifier: V,
}

impl<S: ImageStore, C: MessagingClient, V: SignatureVerifier> IngestService<S, C, V> {
    pub fn new(store: S, client: C, verifier: V) -> Self {
        Self {
            store,
            client,
            verifier,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Handle one webhook call given its raw body and signature header.
    pub async fn handle(
        &self,
        body: &[u8],
        signature: Option<&str>,
    ) -> Result<IngestAck, IngestError> {
        let Some(signature) = signature else {
            tracing::error!("webhook call without signature header");
            return Err(IngestError::MissingSignature);
        };

        if !self.verifier.verify(body, signature) {
            tracing::error!("webhook call with invalid signature");
            return Err(IngestError::InvalidSignature);
        }

        let payload: WebhookPayload = serde_json::from_slice(body).map_err(|e| {
            tracing::error!(error = %e, "failed to parse webhook body");
            IngestError::MalformedPayload(e.to_string())
        })?;

        let events = payload.into_events();
        if events.is_empty() {
            tracing::info!("no events in webhook payload");
            return Ok(IngestAck::NoEvents);
        }

        let mut summary = DispatchSummary {
            events: events.len(),
            ..DispatchSummary::default()
        };

        for (position, raw) in events.into_iter().enumerate() {
            let event = match WebhookEvent::from_value(raw) {
                Ok(event) => event,
                Err(e) => {
                    tracing::warn!(position, error = %e, "skipping undecodable webhook event");
                    summary.skipped += 1;
                    continue;
                }
            };
            let Some(chat) = ChatEvent::from_webhook(event) else {
                summary.skipped += 1;
                continue;
            };
            self.dispatch(&chat, &mut summary).await?;
        }

        tracing::info!(
            events = summary.events,
            skipped = summary.skipped,
            saved = summary.images_saved,
            failed = summary.images_failed,
            dropped = summary.images_dropped,
            replies = summary.replies_sent,
            "webhook call processed"
        );
        Ok(IngestAck::Processed(summary))
    }

    async fn dispatch(
        &self,
        event: &ChatEvent,
        summary: &mut DispatchSummary,
    ) -> Result<(), IngestError> {
        tracing::info!(
            kind = event.kind_label(),
            source = event.source_id.as_deref().unwrap_or("-"),
            "processing message event"
        );

        match &event.kind {
            ChatEventKind::Text { .. } => {
                self.reply(event, replies::TEXT_GUIDE, summary).await?;
            }
            ChatEventKind::Image { content_id, set } => {
                self.handle_image(event, content_id, set.as_ref(), summary)
                    .await?;
            }
            ChatEventKind::Other { message_type } => {
                tracing::info!(message_type = %message_type, "unsupported message type");
                self.reply(event, replies::UNSUPPORTED, summary).await?;
            }
        }
        Ok(())
    }

    async fn handle_image(
        &self,
        event: &ChatEvent,
        content_id: &str,
        set: Option<&ImageSetMembership>,
        summary: &mut DispatchSummary,
    ) -> Result<(), IngestError> {
        let plan = plan_image(set);
        let set_id = set.map(|s| s.set_id.as_str()).unwrap_or("-");

        if !plan.process {
            tracing::info!(
                set_id,
                index = plan.index,
                total = plan.total,
                "image beyond per-set cap, skipping"
            );
            summary.images_dropped += 1;
            return Ok(());
        }

        let saved = self.save_image(content_id).await;
        match &saved {
            Some(_) => summary.images_saved += 1,
            None => summary.images_failed += 1,
        }

        if plan.reply {
            tracing::info!(
                set_id,
                index = plan.index,
                last = plan.last_processed_index(),
                "last processed image received, replying"
            );
            let text = if saved.is_some() {
                replies::IMAGE_SAVED
            } else {
                tracing::error!(message_id = content_id, "last processed image failed to save");
                replies::IMAGE_FAILED
            };
            self.reply(event, text, summary).await?;
        } else if saved.is_none() {
            tracing::error!(
                message_id = content_id,
                set_id,
                index = plan.index,
                "intermediate image failed to save, reply deferred to last image"
            );
        }
        Ok(())
    }

    /// Download and store one image in Pending. Failures are logged and yield `None`.
    pub async fn save_image(&self, content_id: &str) -> Option<StoredImage> {
        tracing::debug!(message_id = content_id, "fetching message content");
        let bytes = match self.client.get_message_content(content_id).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!(message_id = content_id, error = %e, "failed to download image");
                return None;
            }
        };

        let name = generate_image_name_now();
        match self.store.write_new(Bucket::Pending, &name, &bytes).await {
            Ok(stored) => {
                tracing::info!(message_id = content_id, image = %stored.name, bytes = stored.size_bytes, "image saved");
                Some(stored)
            }
            Err(e) => {
                tracing::error!(message_id = content_id, image = %name, error = %e, "failed to store image");
                None
            }
        }
    }

    async fn reply(
        &self,
        event: &ChatEvent,
        text: &str,
        summary: &mut DispatchSummary,
    ) -> Result<(), IngestError> {
        self.client
            .reply_text(&event.reply_token, text)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "failed to send reply");
                IngestError::Dispatch(e.to_string())
            })?;
        summary.replies_sent += 1;
        tracing::debug!(text, "reply sent");
        Ok(())
    }
}
