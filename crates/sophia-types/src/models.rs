use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Title shown for conversations that were never named.
pub const UNTITLED_CONVERSATION: &str = "New Chat";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind}: {value:?}")]
pub struct ParseKindError {
    pub kind: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationType {
    Chat,
    Qa,
    CodeAssist,
}

impl ConversationType {
    pub const ALL: [ConversationType; 3] = [Self::Chat, Self::Qa, Self::CodeAssist];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Qa => "qa",
            Self::CodeAssist => "code_assist",
        }
    }
}

impl fmt::Display for ConversationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConversationType {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ParseKindError {
                kind: "conversation type",
                value: s.to_string(),
            })
    }
}

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            other => Err(ParseKindError {
                kind: "role",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,
    pub username: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub conversation_id: String,
    pub conversation_name: Option<String>,
    pub conversation_type: ConversationType,
    pub user_id: String,
    pub started_at: Option<DateTime<Utc>>,
}

impl Conversation {
    pub fn title(&self) -> &str {
        self.conversation_name
            .as_deref()
            .unwrap_or(UNTITLED_CONVERSATION)
    }
}

/// A single chat turn.
///
/// Timestamps are only absent when a row was written with an explicit NULL.
///
/// `sender_id` is independent of the owning conversation's `user_id`: a message
/// may be attributed to any user, or to nobody once its sender has been deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub conversation_id: String,
    pub sender_id: Option<String>,
    pub role: Role,
    pub content: String,
    pub sent_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversation_type_parses_known_values() {
        for t in ConversationType::ALL {
            assert_eq!(t.as_str().parse::<ConversationType>().unwrap(), t);
        }
    }

    #[test]
    fn conversation_type_rejects_unknown_value() {
        let err = "support".parse::<ConversationType>().unwrap_err();
        assert_eq!(err.kind, "conversation type");
        assert_eq!(err.value, "support");
    }

    #[test]
    fn role_rejects_system() {
        assert!("system".parse::<Role>().is_err());
        assert_eq!("assistant".parse::<Role>().unwrap(), Role::Assistant);
    }

    #[test]
    fn serde_uses_column_values() {
        let json = serde_json::to_string(&ConversationType::CodeAssist).unwrap();
        assert_eq!(json, "\"code_assist\"");
        let role: Role = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(role, Role::User);
    }

    #[test]
    fn unnamed_conversation_has_default_title() {
        let mut conv = Conversation {
            conversation_id: "c1".into(),
            conversation_name: None,
            conversation_type: ConversationType::Chat,
            user_id: "u1".into(),
            started_at: Some(Utc::now()),
        };
        assert_eq!(conv.title(), UNTITLED_CONVERSATION);

        conv.conversation_name = Some("Trip planning".into());
        assert_eq!(conv.title(), "Trip planning");
    }
}
