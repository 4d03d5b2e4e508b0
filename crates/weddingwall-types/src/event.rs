//! Chat events as the ingest handler sees them.
//!
//! `ChatEvent` is the domain view of a LINE message event: the reply token
//! needed to answer it, who sent it, and what kind of message it carries.

use serde::{Deserialize, Serialize};

use crate::line::{WebhookEvent, WireImageSet};

/// Grouping metadata for images sent together in one multi-image message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSetMembership {
    pub set_id: String,
    /// 1-based position within the set.
    pub index: u32,
    /// Number of images in the set.
    pub total: u32,
}

impl From<WireImageSet> for ImageSetMembership {
    fn from(set: WireImageSet) -> Self {
        Self {
            set_id: set.id,
            index: set.index,
            total: set.total,
        }
    }
}

/// What a chat event carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChatEventKind {
    Text {
        text: String,
    },
    Image {
        content_id: String,
        set: Option<ImageSetMembership>,
    },
    /// Stickers, video, audio, location, files, ...
    Other {
        message_type: String,
    },
}

/// A message event that can be replied to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatEvent {
    /// Single-use token valid only while handling this webhook call.
    pub reply_token: String,
    pub source_id: Option<String>,
    pub kind: ChatEventKind,
}

impl ChatEvent {
    /// Convert a wire event, returning `None` for events that must be skipped:
    /// anything that is not a `message` event, or that has no reply token.
    pub fn from_webhook(event: WebhookEvent) -> Option<Self> {
        if event.event_type != "message" {
            return None;
        }
        let reply_token = event.reply_token.filter(|t| !t.is_empty())?;
        let message = event.message?;
        let source_id = event
            .source
            .as_ref()
            .and_then(|s| s.id())
            .map(str::to_string);

        let kind = match message.message_type.as_str() {
            "text" => ChatEventKind::Text {
                text: message.text.unwrap_or_default(),
            },
            "image" => ChatEventKind::Image {
                content_id: message.id,
                set: message.image_set.map(ImageSetMembership::from),
            },
            "" => ChatEventKind::Other {
                message_type: "unknown".to_string(),
            },
            other => ChatEventKind::Other {
                message_type: other.to_string(),
            },
        };

        Some(Self {
            reply_token,
            source_id,
            kind,
        })
    }

    /// Short label for logging.
    pub fn kind_label(&self) -> &str {
        match &self.kind {
            ChatEventKind::Text { .. } => "text",
            ChatEventKind::Image { .. } => "image",
            ChatEventKind::Other { message_type } => message_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::WebhookPayload;

    fn first_event(body: &str) -> WebhookEvent {
        let payload: WebhookPayload = serde_json::from_str(body).unwrap();
        WebhookEvent::from_value(payload.into_events().remove(0)).unwrap()
    }

    #[test]
    fn test_text_event() {
        let event = first_event(
            r#"{"events":[{"type":"message","replyToken":"rt","source":{"type":"user","userId":"U1"},
                "message":{"type":"text","id":"1","text":"hello"}}]}"#,
        );
        let chat = ChatEvent::from_webhook(event).unwrap();
        assert_eq!(chat.reply_token, "rt");
        assert_eq!(chat.source_id.as_deref(), Some("U1"));
        assert_eq!(
            chat.kind,
            ChatEventKind::Text {
                text: "hello".to_string()
            }
        );
        assert_eq!(chat.kind_label(), "text");
    }

    #[test]
    fn test_standalone_image_event() {
        let event = first_event(
            r#"{"events":[{"type":"message","replyToken":"rt","message":{"type":"image","id":"m9"}}]}"#,
        );
        let chat = ChatEvent::from_webhook(event).unwrap();
        assert_eq!(
            chat.kind,
            ChatEventKind::Image {
                content_id: "m9".to_string(),
                set: None
            }
        );
    }

    #[test]
    fn test_sticker_is_other() {
        let event = first_event(
            r#"{"events":[{"type":"message","replyToken":"rt","message":{"type":"sticker","id":"s1"}}]}"#,
        );
        let chat = ChatEvent::from_webhook(event).unwrap();
        assert_eq!(chat.kind_label(), "sticker");
    }

    #[test]
    fn test_message_without_type_is_unknown_other() {
        let event = first_event(r#"{"events":[{"type":"message","replyToken":"rt","message":{"id":"2"}}]}"#);
        let chat = ChatEvent::from_webhook(event).unwrap();
        assert_eq!(chat.kind_label(), "unknown");
    }

    #[test]
    fn test_skips_non_message_events() {
        let event = first_event(r#"{"events":[{"type":"follow","replyToken":"rt"}]}"#);
        assert!(ChatEvent::from_webhook(event).is_none());
    }

    #[test]
    fn test_skips_events_without_reply_token() {
        let event = first_event(
            r#"{"events":[{"type":"message","message":{"type":"text","id":"1","text":"x"}}]}"#,
        );
        assert!(ChatEvent::from_webhook(event).is_none());

        let empty = first_event(
            r#"{"events":[{"type":"message","replyToken":"","message":{"type":"text","id":"1","text":"x"}}]}"#,
        );
        assert!(ChatEvent::from_webhook(empty).is_none());
    }
}
