//! Database schema definitions.
//!
//! Two tables: `users` and the `tasks` they own. The schema is applied on
//! every open and only ever creates what is missing.

use rusqlite::{Connection, Result};

/// The complete SQL schema for the missions database.
///
/// `AUTOINCREMENT` keeps IDs of deleted rows from being handed out again.
pub const SCHEMA_SQL: &str = r"
-- Users: identified to the operator by email
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE
);

-- Tasks: always owned by a user, removed with it
CREATE TABLE IF NOT EXISTS tasks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT CHECK (title IS NULL OR length(title) <= 59),
    description TEXT,
    user_id INTEGER NOT NULL,
    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_tasks_user ON tasks(user_id);
";

/// Apply pragmas and the schema to a connection.
///
/// Idempotent: existing tables and rows are left as they are.
///
/// # Errors
///
/// Returns an error if a pragma or the DDL fails.
pub fn apply_schema(conn: &Connection) -> Result<()> {
    // foreign_keys is per-connection, so it must be set on every open
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;

    conn.execute_batch(SCHEMA_SQL)?;

    Ok(())
}
