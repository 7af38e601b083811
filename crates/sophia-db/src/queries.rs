use std::str::FromStr;

use crate::Database;
use crate::models::{ConversationRow, MessageRow, UserRow};
use anyhow::{Result, bail};
use rusqlite::{Connection, ErrorCode, Row};
use sophia_types::{ConversationType, Role};
use tracing::debug;

impl Database {
    // -- Users --

    /// Fails when a `username` is given but the host `Users` table has no
    /// such column.
    pub fn create_user(&self, user_id: &str, username: Option<&str>) -> Result<()> {
        if username.is_some() && !self.users.username {
            bail!("Users table has no username column");
        }

        self.with_conn(|conn| {
            if self.users.username {
                conn.execute(
                    "INSERT INTO Users (user_id, username) VALUES (?1, ?2)",
                    rusqlite::params![user_id, username],
                )?;
            } else {
                conn.execute("INSERT INTO Users (user_id) VALUES (?1)", [user_id])?;
            }
            Ok(())
        })
    }

    pub fn get_user(&self, user_id: &str) -> Result<Option<UserRow>> {
        // Columns a host-provided table lacks read back as NULL
        let sql = format!(
            "SELECT user_id, {}, {} FROM Users WHERE user_id = ?1",
            if self.users.username { "username" } else { "NULL" },
            if self.users.created_at { "created_at" } else { "NULL" },
        );

        self.with_conn(|conn| {
            conn.query_row(&sql, [user_id], |row| {
                Ok(UserRow {
                    user_id: row.get(0)?,
                    username: row.get(1)?,
                    created_at: row.get(2)?,
                })
            })
            .optional()
        })
    }

    /// Deleting a user removes the conversations they own (and, through them,
    /// those conversations' messages). Messages they sent elsewhere survive
    /// with `sender_id` cleared.
    pub fn delete_user(&self, user_id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let deleted = conn.execute("DELETE FROM Users WHERE user_id = ?1", [user_id])?;
            debug!(user_id, deleted, "delete_user");
            Ok(deleted > 0)
        })
    }

    // -- Conversations --

    pub fn create_conversation(
        &self,
        conversation_id: &str,
        conversation_name: Option<&str>,
        conversation_type: ConversationType,
        user_id: &str,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO Conversations (conversation_id, conversation_name, conversation_type, user_id)
                 VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![
                    conversation_id,
                    conversation_name,
                    conversation_type.as_str(),
                    user_id
                ],
            )?;
            Ok(())
        })
    }

    /// Create a conversation under a freshly generated id and return that id.
    pub fn start_conversation(
        &self,
        user_id: &str,
        conversation_type: ConversationType,
        conversation_name: Option<&str>,
    ) -> Result<String> {
        let conversation_id = uuid::Uuid::new_v4().to_string();
        self.create_conversation(&conversation_id, conversation_name, conversation_type, user_id)?;
        debug!(%conversation_id, user_id, "Conversation started");
        Ok(conversation_id)
    }

    pub fn get_conversation(&self, conversation_id: &str) -> Result<Option<ConversationRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT id, conversation_id, conversation_name, conversation_type, user_id, started_at
                 FROM Conversations WHERE conversation_id = ?1",
                [conversation_id],
                map_conversation,
            )
            .optional()
        })
    }

    /// All conversations owned by `user_id`, newest first.
    pub fn list_conversations_for_user(&self, user_id: &str) -> Result<Vec<ConversationRow>> {
        self.with_conn(|conn| query_conversations_for_user(conn, user_id))
    }

    pub fn rename_conversation(&self, conversation_id: &str, name: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let updated = conn.execute(
                "UPDATE Conversations SET conversation_name = ?2 WHERE conversation_id = ?1",
                [conversation_id, name],
            )?;
            Ok(updated > 0)
        })
    }

    /// Returns false when no such conversation existed. Messages go with it.
    pub fn delete_conversation(&self, conversation_id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let deleted = conn.execute(
                "DELETE FROM Conversations WHERE conversation_id = ?1",
                [conversation_id],
            )?;
            debug!(conversation_id, deleted, "delete_conversation");
            Ok(deleted > 0)
        })
    }

    // -- Messages --

    /// Append a message and return its id.
    pub fn insert_message(
        &self,
        conversation_id: &str,
        sender_id: Option<&str>,
        role: Role,
        content: &str,
    ) -> Result<i64> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO Messages (conversation_id, sender_id, role, content) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![conversation_id, sender_id, role.as_str(), content],
            )?;
            let id = tx.last_insert_rowid();
            tx.commit()?;
            Ok(id)
        })
    }

    /// Messages of a conversation in the order they were sent.
    pub fn get_messages(&self, conversation_id: &str) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| query_messages(conn, conversation_id))
    }
}

/// True when `err` is SQLite refusing a write because of a CHECK, UNIQUE,
/// NOT NULL or FOREIGN KEY constraint.
pub fn is_constraint_violation(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<rusqlite::Error>(),
        Some(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation
    )
}

fn query_conversations_for_user(conn: &Connection, user_id: &str) -> Result<Vec<ConversationRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, conversation_id, conversation_name, conversation_type, user_id, started_at
         FROM Conversations
         WHERE user_id = ?1
         ORDER BY started_at DESC, id DESC",
    )?;

    let rows = stmt
        .query_map([user_id], map_conversation)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn query_messages(conn: &Connection, conversation_id: &str) -> Result<Vec<MessageRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, conversation_id, sender_id, role, content, sent_at
         FROM Messages
         WHERE conversation_id = ?1
         ORDER BY sent_at ASC, id ASC",
    )?;

    let rows = stmt
        .query_map([conversation_id], |row| {
            Ok(MessageRow {
                id: row.get(0)?,
                conversation_id: row.get(1)?,
                sender_id: row.get(2)?,
                role: parse_column(row, 3)?,
                content: row.get(4)?,
                sent_at: row.get(5)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn map_conversation(row: &Row<'_>) -> rusqlite::Result<ConversationRow> {
    Ok(ConversationRow {
        id: row.get(0)?,
        conversation_id: row.get(1)?,
        conversation_name: row.get(2)?,
        conversation_type: parse_column(row, 3)?,
        user_id: row.get(4)?,
        started_at: row.get(5)?,
    })
}

/// Read a text column into an enum via `FromStr`.
fn parse_column<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    raw.parse().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
