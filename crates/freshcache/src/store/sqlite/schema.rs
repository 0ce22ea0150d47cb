//! SQLite schema definitions and SQL query constants.
//!
//! Pure data, no I/O.

/// Connection pragmas applied when opening a database.
pub const PRAGMAS: &str = r#"
PRAGMA journal_mode = WAL;
PRAGMA synchronous = NORMAL;
"#;

/// SQL statement to create all tables.
pub const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS records (
    collection TEXT NOT NULL,
    key TEXT NOT NULL,
    body TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    PRIMARY KEY (collection, key)
);
"#;

pub const SELECT_RECORD: &str = "SELECT body FROM records WHERE collection = ?1 AND key = ?2";

pub const SELECT_COLLECTION: &str =
    "SELECT body FROM records WHERE collection = ?1 ORDER BY key";

pub const UPSERT_RECORD: &str = r#"
INSERT INTO records (collection, key, body, updated_at)
VALUES (?1, ?2, ?3, ?4)
ON CONFLICT (collection, key) DO UPDATE SET
    body = excluded.body,
    updated_at = excluded.updated_at
"#;

pub const DELETE_RECORD: &str = "DELETE FROM records WHERE collection = ?1 AND key = ?2";

pub const DELETE_COLLECTION: &str = "DELETE FROM records WHERE collection = ?1";
