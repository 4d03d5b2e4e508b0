//! LINE Messaging API webhook wire format.
//!
//! Only the fields the photo wall reads are modeled; everything else in the
//! payload is ignored. Field names follow LINE's camelCase JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Header carrying the base64 HMAC-SHA256 signature of the raw body.
pub const SIGNATURE_HEADER: &str = "x-line-signature";

/// Top-level webhook request body.
///
/// Events stay as raw JSON here and are decoded one at a time with
/// [`WebhookEvent::from_value`], so one odd event cannot reject its siblings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub destination: Option<String>,
    /// May be absent or `null`; both read as "no events".
    #[serde(default)]
    pub events: Option<Vec<Value>>,
}

impl WebhookPayload {
    /// Raw events in delivery order (empty when absent).
    pub fn into_events(self) -> Vec<Value> {
        self.events.unwrap_or_default()
    }
}

/// One webhook event. Non-message events (follow, unfollow, postback, ...)
/// deserialize with `message: None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub reply_token: Option<String>,
    #[serde(default)]
    pub source: Option<WebhookSource>,
    #[serde(default)]
    pub message: Option<WebhookMessage>,
}

impl WebhookEvent {
    /// Decode one raw event from the `events` array.
    pub fn from_value(raw: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(raw)
    }
}

/// Who sent the event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookSource {
    #[serde(rename = "type", default)]
    pub source_type: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub room_id: Option<String>,
}

impl WebhookSource {
    /// Most specific identifier available: user, then group, then room.
    pub fn id(&self) -> Option<&str> {
        self.user_id
            .as_deref()
            .or(self.group_id.as_deref())
            .or(self.room_id.as_deref())
    }
}

/// The `message` object of a message event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookMessage {
    /// Empty when LINE omits it; dispatched as an unsupported message.
    #[serde(rename = "type", default)]
    pub message_type: String,
    /// Message id; also the content id for media messages.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub image_set: Option<WireImageSet>,
}

/// `imageSet` grouping LINE attaches to images sent together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireImageSet {
    pub id: String,
    /// 1-based position in the set.
    pub index: u32,
    pub total: u32,
}
