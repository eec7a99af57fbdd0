//! Wire message exchanged with clients.
//!
//! Every frame is a UTF-8 JSON object:
//!
//! ```text
//! {"id":"1","type":"chat","name":"Alice","room":"lobby","content":"hi"}
//! ```
//!
//! The relay only needs `room` and `name` from the first frame of a connection.
//! Later frames are parsed to validate and log them, then relayed byte-for-byte.

use std::fmt;

use serde::{
    Deserialize, Deserializer, Serialize,
    de::{self, IgnoredAny, MapAccess, Visitor},
};

/// Sender name used by notices the server synthesizes.
pub const SERVER_NAME: &str = "server";

/// Id used by notices the server synthesizes.
pub const SERVER_MESSAGE_ID: &str = "0";

/// Message type
///
/// `server_message` is reserved for notices from the server. Anything else is
/// client-defined and kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    ServerMessage,
    #[serde(untagged)]
    Other(String),
}

impl Default for MessageType {
    fn default() -> Self {
        MessageType::Other(String::new())
    }
}

/// Wire record
///
/// Decoding is lenient in the same ways Go's `encoding/json` is, which is what
/// existing clients were written against:
///
/// - missing fields, `null` fields and a top-level `null` decode as empty
/// - keys match case-insensitively (`"Room"` sets `room`); the last duplicate wins
/// - unknown keys are ignored
///
/// Only invalid JSON, a non-object document or a field of the wrong JSON type
/// is rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Message {
    pub id: String,
    #[serde(rename = "type")]
    pub r#type: MessageType,
    pub name: String,
    pub room: String,
    pub content: String,
}

impl Message {
    /// Parse one inbound frame.
    pub fn parse(frame: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(frame)
    }

    /// Build the notice announcing that `joiner_name` entered `room`.
    pub fn join_notice(room: &str, joiner_name: &str) -> Self {
        Self {
            id: SERVER_MESSAGE_ID.to_string(),
            r#type: MessageType::ServerMessage,
            name: SERVER_NAME.to_string(),
            room: room.to_string(),
            content: format!("{} joined", joiner_name),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl<'de> Deserialize<'de> for Message {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(MessageVisitor)
    }
}

struct MessageVisitor;

impl<'de> Visitor<'de> for MessageVisitor {
    type Value = Message;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a message object")
    }

    fn visit_unit<E>(self) -> Result<Message, E>
    where
        E: de::Error,
    {
        Ok(Message::default())
    }

    fn visit_map<A>(self, mut map: A) -> Result<Message, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut message = Message::default();

        while let Some(key) = map.next_key::<String>()? {
            let field = match key.to_lowercase().as_str() {
                "id" => &mut message.id,
                "name" => &mut message.name,
                "room" => &mut message.room,
                "content" => &mut message.content,
                "type" => {
                    if let Some(r#type) = map.next_value::<Option<MessageType>>()? {
                        message.r#type = r#type;
                    }
                    continue;
                }
                _ => {
                    map.next_value::<IgnoredAny>()?;
                    continue;
                }
            };

            if let Some(value) = map.next_value::<Option<String>>()? {
                *field = value;
            }
        }

        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_notice_serializes_to_wire_format() {
        // テスト項目: 参加通知が固定のワイヤーフォーマットでシリアライズされる
        // given (前提条件):
        let notice = Message::join_notice("lobby", "Bob");

        // when (操作):
        let json = notice.to_json().unwrap();

        // then (期待する結果):
        assert_eq!(
            json,
            r#"{"id":"0","type":"server_message","name":"server","room":"lobby","content":"Bob joined"}"#
        );
    }

    #[test]
    fn test_parse_join_message() {
        // テスト項目: 最初のメッセージから room と name を取り出せる
        // given (前提条件):
        let frame = r#"{"id":"1","type":"join","name":"Alice","room":"lobby","content":""}"#;

        // when (操作):
        let message = Message::parse(frame).unwrap();

        // then (期待する結果):
        assert_eq!(message.id, "1");
        assert_eq!(message.r#type, MessageType::Other("join".to_string()));
        assert_eq!(message.name, "Alice");
        assert_eq!(message.room, "lobby");
        assert_eq!(message.content, "");
    }

    #[test]
    fn test_parse_server_message_type() {
        // テスト項目: "server_message" は予約済みの型として解釈される
        // given (前提条件):
        let frame = r#"{"type":"server_message"}"#;

        // when (操作):
        let message = Message::parse(frame).unwrap();

        // then (期待する結果):
        assert_eq!(message.r#type, MessageType::ServerMessage);
    }

    #[test]
    fn test_parse_tolerates_missing_and_unknown_fields() {
        // テスト項目: 欠けたフィールドは空文字、未知のフィールドは無視される
        // given (前提条件):
        let frame = r#"{"room":"lobby","extra":42}"#;

        // when (操作):
        let message = Message::parse(frame).unwrap();

        // then (期待する結果):
        assert_eq!(message.room, "lobby");
        assert_eq!(message.name, "");
        assert_eq!(message.r#type, MessageType::default());
    }

    #[test]
    fn test_parse_matches_keys_case_insensitively() {
        // テスト項目: キーは大文字小文字を区別せずに一致し、重複時は後勝ちになる
        // given (前提条件):
        let frame = r#"{"Room":"lobby","NAME":"Alice","Type":"chat","name":"Bob"}"#;

        // when (操作):
        let message = Message::parse(frame).unwrap();

        // then (期待する結果):
        assert_eq!(message.room, "lobby");
        assert_eq!(message.name, "Bob");
        assert_eq!(message.r#type, MessageType::Other("chat".to_string()));
    }

    #[test]
    fn test_parse_treats_null_as_empty() {
        // テスト項目: null のフィールドやトップレベルの null は空として扱われる
        // given (前提条件):
        let frame = r#"{"id":null,"type":null,"room":"lobby"}"#;

        // when (操作):
        let message = Message::parse(frame).unwrap();
        let top_level_null = Message::parse("null").unwrap();

        // then (期待する結果):
        assert_eq!(message.id, "");
        assert_eq!(message.r#type, MessageType::default());
        assert_eq!(message.room, "lobby");
        assert_eq!(top_level_null, Message::default());
    }

    #[test]
    fn test_parse_rejects_non_object() {
        // テスト項目: オブジェクト以外の JSON はエラーになる
        // given (前提条件):
        let frames = [r#""lobby""#, "42", "[]"];

        // when (操作) / then (期待する結果):
        for frame in frames {
            assert!(Message::parse(frame).is_err(), "{} should be rejected", frame);
        }
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        // テスト項目: JSON として不正なフレームはエラーになる
        // given (前提条件):
        let frame = "hello, not json";

        // when (操作):
        let result = Message::parse(frame);

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_rejects_wrong_field_type() {
        // テスト項目: フィールドの型が異なる場合はエラーになる
        // given (前提条件):
        let frame = r#"{"id":1,"room":"lobby"}"#;

        // when (操作):
        let result = Message::parse(frame);

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_client_defined_type_round_trips_verbatim() {
        // テスト項目: クライアント定義の type はそのまま保持される
        // given (前提条件):
        let frame = r#"{"id":"2","type":"chat","name":"Alice","room":"lobby","content":"hi"}"#;

        // when (操作):
        let json = Message::parse(frame).unwrap().to_json().unwrap();

        // then (期待する結果):
        assert_eq!(json, frame);
    }
}
