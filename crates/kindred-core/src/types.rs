use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Enums
// =============================================================================

/// Author of a message in the conversation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    /// The person chatting.
    User,
    /// The simulated companion. Older histories store it as `"joi"`.
    #[serde(alias = "joi")]
    Companion,
}

impl Sender {
    /// Wire name used in the persisted history.
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Companion => "companion",
        }
    }
}

impl std::fmt::Display for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Message
// =============================================================================

/// A single entry in a conversation history.
///
/// Messages are immutable once created: fields are only reachable through
/// accessors. Insertion order in the history is the conversation order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    id: String,
    content: String,
    sender: Sender,
    #[serde(with = "timestamp_format")]
    timestamp: DateTime<Utc>,
}

impl Message {
    /// Build a message from all of its parts.
    pub fn new(
        id: impl Into<String>,
        content: impl Into<String>,
        sender: Sender,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            sender,
            timestamp,
        }
    }

    /// A user-authored message stamped with the current time.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Uuid::new_v4().to_string(), content, Sender::User, Utc::now())
    }

    /// A companion-authored message stamped with the current time.
    pub fn companion(content: impl Into<String>) -> Self {
        Self::new(
            Uuid::new_v4().to_string(),
            content,
            Sender::Companion,
            Utc::now(),
        )
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn is_from_user(&self) -> bool {
        self.sender == Sender::User
    }
}

/// Timestamps are written as RFC 3339 with millisecond precision and read
/// back from RFC 3339, epoch-millisecond strings, or epoch-millisecond numbers.
pub mod timestamp_format {
    use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTimestamp {
        Text(String),
        Millis(i64),
        Fractional(f64),
    }

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawTimestamp::deserialize(deserializer)? {
            RawTimestamp::Text(text) => parse(&text).ok_or_else(|| {
                de::Error::custom(format!("invalid timestamp: {}", text))
            }),
            RawTimestamp::Millis(ms) => from_millis(ms)
                .ok_or_else(|| de::Error::custom(format!("timestamp out of range: {}", ms))),
            RawTimestamp::Fractional(ms) => from_millis(ms as i64)
                .ok_or_else(|| de::Error::custom(format!("timestamp out of range: {}", ms))),
        }
    }

    /// Parse an RFC 3339 string or an epoch-milliseconds string.
    pub fn parse(text: &str) -> Option<DateTime<Utc>> {
        let text = text.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Some(dt.with_timezone(&Utc));
        }
        text.parse::<i64>().ok().and_then(from_millis)
    }

    fn from_millis(ms: i64) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(ms).single()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 14, 15, 9, 26).unwrap()
    }

    #[test]
    fn test_sender_serialization() {
        assert_eq!(serde_json::to_string(&Sender::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&Sender::Companion).unwrap(),
            "\"companion\""
        );
    }

    #[test]
    fn test_sender_accepts_legacy_name() {
        let sender: Sender = serde_json::from_str("\"joi\"").unwrap();
        assert_eq!(sender, Sender::Companion);
    }

    #[test]
    fn test_sender_rejects_unknown() {
        assert!(serde_json::from_str::<Sender>("\"robot\"").is_err());
    }

    #[test]
    fn test_sender_display() {
        assert_eq!(Sender::User.to_string(), "user");
        assert_eq!(Sender::Companion.to_string(), "companion");
    }

    #[test]
    fn test_user_message_constructor() {
        let msg = Message::user("hello");
        assert_eq!(msg.content(), "hello");
        assert_eq!(msg.sender(), Sender::User);
        assert!(msg.is_from_user());
        assert!(Uuid::parse_str(msg.id()).is_ok());
    }

    #[test]
    fn test_companion_message_constructor() {
        let msg = Message::companion("hi there");
        assert_eq!(msg.sender(), Sender::Companion);
        assert!(!msg.is_from_user());
    }

    #[test]
    fn test_unique_ids() {
        let a = Message::user("a");
        let b = Message::user("a");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_message_serializes_iso_timestamp() {
        let msg = Message::new("1", "hi", Sender::Companion, fixed_time());
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["id"], "1");
        assert_eq!(json["content"], "hi");
        assert_eq!(json["sender"], "companion");
        assert_eq!(json["timestamp"], "2024-03-14T15:09:26.000Z");
    }

    #[test]
    fn test_message_deserializes_browser_timestamp() {
        let json = r#"{"id":"1","content":"hi","sender":"joi","timestamp":"2024-03-14T15:09:26.000Z"}"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        assert_eq!(msg.timestamp(), fixed_time());
        assert_eq!(msg.sender(), Sender::Companion);
    }

    #[test]
    fn test_message_deserializes_epoch_millis() {
        let ms = fixed_time().timestamp_millis();
        let as_number = format!(
            r#"{{"id":"1","content":"hi","sender":"user","timestamp":{}}}"#,
            ms
        );
        let as_string = format!(
            r#"{{"id":"1","content":"hi","sender":"user","timestamp":"{}"}}"#,
            ms
        );
        let a: Message = serde_json::from_str(&as_number).unwrap();
        let b: Message = serde_json::from_str(&as_string).unwrap();
        assert_eq!(a.timestamp(), fixed_time());
        assert_eq!(b.timestamp(), fixed_time());
    }

    #[test]
    fn test_message_rejects_garbage_timestamp() {
        let json = r#"{"id":"1","content":"hi","sender":"user","timestamp":"yesterday"}"#;
        assert!(serde_json::from_str::<Message>(json).is_err());
    }

    #[test]
    fn test_offset_timestamp_normalized_to_utc() {
        let parsed = timestamp_format::parse("2024-03-14T16:09:26+01:00").unwrap();
        assert_eq!(parsed, fixed_time());
    }
}
