use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Message flag: render no embed/preview cards for links in the content.
pub const SUPPRESS_EMBEDS: u32 = 1 << 2;

/// Body for `POST /channels/{id}/messages`.
#[derive(Debug, Clone, Serialize)]
pub struct OutboundMessage {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<u32>,
}

/// A channel message as returned by the REST API. Only the fields the
/// command listener needs are kept.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub id: String,
    pub content: String,
    pub author: User,
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: String,
    pub username: Option<String>,
    #[serde(default)]
    pub bot: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Channel {
    pub id: String,
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outbound_message_serializes_flags_only_when_set() {
        let with_flags = OutboundMessage {
            content: "hello".to_string(),
            flags: Some(SUPPRESS_EMBEDS),
        };
        let json = serde_json::to_value(&with_flags).unwrap();
        assert_eq!(json["content"], "hello");
        assert_eq!(json["flags"], 4);

        let without_flags = OutboundMessage {
            content: "hello".to_string(),
            flags: None,
        };
        let json = serde_json::to_value(&without_flags).unwrap();
        assert!(json.get("flags").is_none());
    }

    #[test]
    fn message_deserializes_api_payload() {
        let payload = r#"{
            "id": "1139000000000000001",
            "content": "!list",
            "author": { "id": "42", "username": "someone", "bot": false },
            "timestamp": "2026-08-07T21:33:03.000000+00:00"
        }"#;
        let msg: Message = serde_json::from_str(payload).unwrap();
        assert_eq!(msg.id, "1139000000000000001");
        assert_eq!(msg.content, "!list");
        assert_eq!(msg.author.id, "42");
        assert!(!msg.author.bot);
        assert!(msg.timestamp.is_some());
    }

    #[test]
    fn user_bot_flag_defaults_to_false_when_absent() {
        let user: User = serde_json::from_str(r#"{ "id": "7", "username": "x" }"#).unwrap();
        assert!(!user.bot);
    }
}
