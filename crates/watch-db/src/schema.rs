//! Database schema definitions and migrations.

use rusqlite::Connection;
use serde::Deserialize;

use crate::DbError;

/// Settings key under which older builds kept the roster as a JSON list.
pub const LEGACY_AUTO_OPEN_KEY: &str = "AUTO_OPEN_USERS";

pub fn run_migrations(conn: &mut Connection) -> Result<(), DbError> {
    conn.execute_batch(SCHEMA)?;
    migrate_legacy_auto_open_list(conn)?;
    Ok(())
}

#[derive(Deserialize)]
struct LegacyAutoOpenUser {
    #[serde(rename = "userId")]
    user_id: String,
}

/// `AUTO_OPEN_USERS` JSON (`[{"userId": "..."}]`) → auto_open_users table
fn migrate_legacy_auto_open_list(conn: &mut Connection) -> Result<(), DbError> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key = ?1",
            [LEGACY_AUTO_OPEN_KEY],
            |row| row.get(0),
        )
        .map(Some)
        .or_else(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => Ok(None),
            other => Err(other),
        })?;
    let Some(raw) = raw else {
        return Ok(());
    };

    let users: Vec<LegacyAutoOpenUser> = match serde_json::from_str(&raw) {
        Ok(users) => users,
        Err(e) => {
            // left in place so it can be repaired by hand
            tracing::warn!("{LEGACY_AUTO_OPEN_KEY} is not a valid roster, skipping migration: {e}");
            return Ok(());
        }
    };
    tracing::info!(count = users.len(), "Migrating legacy auto-open roster");

    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare("INSERT OR IGNORE INTO auto_open_users (user_id) VALUES (?1)")?;
        for user in users.iter().filter(|u| !u.user_id.is_empty()) {
            stmt.execute([&user.user_id])?;
        }
    }
    tx.execute(
        "DELETE FROM settings WHERE key = ?1",
        [LEGACY_AUTO_OPEN_KEY],
    )?;
    tx.commit()?;
    Ok(())
}

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS tokens (
    id INTEGER PRIMARY KEY,
    access_token TEXT,
    refresh_token TEXT,
    scope TEXT,
    expires_at INTEGER
);

CREATE TABLE IF NOT EXISTS settings (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    setting_type TEXT NOT NULL DEFAULT 'normal',
    updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS auto_open_users (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL UNIQUE,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);
"#;
