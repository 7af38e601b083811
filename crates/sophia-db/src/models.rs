//! Database row types. These map directly to SQLite rows.
//! Timestamps stay as SQLite text until converted into sophia-types models.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use sophia_types::{Conversation, ConversationType, Message, Role, User};

/// Format produced by `datetime('now')`.
const SQLITE_TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S";

pub struct UserRow {
    pub user_id: String,
    pub username: Option<String>,
    pub created_at: Option<String>,
}

pub struct ConversationRow {
    pub id: i64,
    pub conversation_id: String,
    pub conversation_name: Option<String>,
    pub conversation_type: ConversationType,
    pub user_id: String,
    pub started_at: Option<String>,
}

pub struct MessageRow {
    pub id: i64,
    pub conversation_id: String,
    pub sender_id: Option<String>,
    pub role: Role,
    pub content: String,
    pub sent_at: Option<String>,
}

pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(raw, SQLITE_TIMESTAMP)
        .with_context(|| format!("Bad timestamp in database: {:?}", raw))?;
    Ok(naive.and_utc())
}

/// Timestamp columns are nullable: an explicit NULL overrides the default.
pub fn parse_optional_timestamp(raw: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    raw.map(parse_timestamp).transpose()
}

impl TryFrom<UserRow> for User {
    type Error = anyhow::Error;

    fn try_from(row: UserRow) -> Result<Self> {
        Ok(User {
            created_at: parse_optional_timestamp(row.created_at.as_deref())?,
            user_id: row.user_id,
            username: row.username,
        })
    }
}

impl TryFrom<ConversationRow> for Conversation {
    type Error = anyhow::Error;

    fn try_from(row: ConversationRow) -> Result<Self> {
        Ok(Conversation {
            started_at: parse_optional_timestamp(row.started_at.as_deref())?,
            conversation_id: row.conversation_id,
            conversation_name: row.conversation_name,
            conversation_type: row.conversation_type,
            user_id: row.user_id,
        })
    }
}

impl TryFrom<MessageRow> for Message {
    type Error = anyhow::Error;

    fn try_from(row: MessageRow) -> Result<Self> {
        Ok(Message {
            sent_at: parse_optional_timestamp(row.sent_at.as_deref())?,
            id: row.id,
            conversation_id: row.conversation_id,
            sender_id: row.sender_id,
            role: row.role,
            content: row.content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parses_sqlite_datetime() {
        let ts = parse_timestamp("2024-03-09 17:45:02").unwrap();
        assert_eq!((ts.year(), ts.month(), ts.day()), (2024, 3, 9));
        assert_eq!((ts.hour(), ts.minute(), ts.second()), (17, 45, 2));
    }

    #[test]
    fn rejects_other_formats() {
        assert!(parse_timestamp("2024-03-09T17:45:02Z").is_err());
    }

    #[test]
    fn null_timestamp_is_none() {
        assert!(parse_optional_timestamp(None).unwrap().is_none());
        assert!(parse_optional_timestamp(Some("2024-03-09 17:45:02")).unwrap().is_some());
        assert!(parse_optional_timestamp(Some("yesterday")).is_err());
    }
}
