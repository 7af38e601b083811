use anyhow::{Result, bail};
use rusqlite::Connection;
use tracing::info;

/// Conversation storage schema, version 1.
///
/// `Users` is owned by whatever system manages accounts. It is only created
/// here when missing, with the single column the foreign keys need plus a
/// display name. A host table only has to provide `user_id`; see
/// [`users_columns`].
pub const SCHEMA_V1: &str = "
    CREATE TABLE IF NOT EXISTS Users (
        user_id     TEXT PRIMARY KEY,
        username    TEXT,
        created_at  TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS Conversations (
        id                  INTEGER PRIMARY KEY AUTOINCREMENT,
        conversation_id     TEXT NOT NULL UNIQUE
                            CHECK (length(conversation_id) <= 100),
        conversation_name   TEXT
                            CHECK (length(conversation_name) <= 255),
        conversation_type   TEXT NOT NULL
                            CHECK (conversation_type IN ('chat', 'qa', 'code_assist')),
        user_id             TEXT NOT NULL
                            CHECK (length(user_id) <= 100)
                            REFERENCES Users(user_id) ON DELETE CASCADE,
        started_at          TEXT DEFAULT (datetime('now'))
    );

    CREATE INDEX IF NOT EXISTS idx_conversations_user
        ON Conversations(user_id, started_at);

    CREATE TABLE IF NOT EXISTS Messages (
        id                  INTEGER PRIMARY KEY AUTOINCREMENT,
        conversation_id     TEXT NOT NULL
                            CHECK (length(conversation_id) <= 100)
                            REFERENCES Conversations(conversation_id) ON DELETE CASCADE,
        sender_id           TEXT
                            CHECK (length(sender_id) <= 100)
                            REFERENCES Users(user_id) ON DELETE SET NULL,
        role                TEXT NOT NULL
                            CHECK (role IN ('user', 'assistant')),
        content             TEXT NOT NULL,
        sent_at             TEXT DEFAULT (datetime('now'))
    );

    CREATE INDEX IF NOT EXISTS idx_messages_conversation
        ON Messages(conversation_id, sent_at);

    -- SET NULL on sender needs an index to avoid full scans on user delete
    CREATE INDEX IF NOT EXISTS idx_messages_sender
        ON Messages(sender_id);
";

pub const LATEST_VERSION: i64 = 1;

/// Optional columns found on the `Users` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsersColumns {
    pub username: bool,
    pub created_at: bool,
}

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version = current_version(conn)?;

    if version < 1 {
        info!("Running migration v1 (conversations and messages)");
        conn.execute_batch(&format!(
            "BEGIN;
             {SCHEMA_V1}
             INSERT INTO schema_version (version) VALUES (1);
             COMMIT;"
        ))?;
    }

    info!("Database migrations complete (schema v{})", LATEST_VERSION);
    Ok(())
}

/// Inspect `Users`, which may predate this schema. Only `user_id` is required.
pub fn users_columns(conn: &Connection) -> Result<UsersColumns> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info('Users')")?;
    let names = stmt
        .query_map([], |r| r.get::<_, String>(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let has = |col: &str| names.iter().any(|n| n.eq_ignore_ascii_case(col));
    if !has("user_id") {
        bail!("Users table has no user_id column; Conversations and Messages reference it");
    }

    let columns = UsersColumns {
        username: has("username"),
        created_at: has("created_at"),
    };
    if !(columns.username && columns.created_at) {
        info!(?columns, "Using host-provided Users table");
    }
    Ok(columns)
}

pub fn current_version(conn: &Connection) -> Result<i64> {
    let version = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;
    Ok(version)
}
