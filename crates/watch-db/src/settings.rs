//! `settings` table: one string value per key. `setting_type` marks
//! secrets so listings can mask them; it is rewritten on every write.

use std::collections::HashMap;

use crate::{Database, DbError, OptionalExt};

const UPSERT_SETTING: &str = "INSERT INTO settings (key, value, setting_type, updated_at)
     VALUES (?1, ?2, ?3, CURRENT_TIMESTAMP)
     ON CONFLICT(key) DO UPDATE SET
         value = excluded.value,
         setting_type = excluded.setting_type,
         updated_at = CURRENT_TIMESTAMP";

impl Database {
    pub fn get_setting(&self, key: &str) -> Result<Option<String>, DbError> {
        self.with_conn(|conn| {
            let value = conn
                .query_row("SELECT value FROM settings WHERE key = ?1", [key], |row| {
                    row.get(0)
                })
                .optional()?;
            Ok(value)
        })
    }

    pub fn set_setting(&self, key: &str, value: &str, setting_type: &str) -> Result<(), DbError> {
        self.set_settings([(key, value, setting_type)])
    }

    /// Write `(key, value, setting_type)` entries in one transaction.
    /// Either all of them land or none do.
    pub fn set_settings<'a, I>(&self, entries: I) -> Result<(), DbError>
    where
        I: IntoIterator<Item = (&'a str, &'a str, &'a str)>,
    {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare(UPSERT_SETTING)?;
                for (key, value, setting_type) in entries {
                    stmt.execute(rusqlite::params![key, value, setting_type])?;
                }
            }
            tx.commit()?;
            Ok(())
        })
    }

    pub fn get_all_settings(&self) -> Result<HashMap<String, String>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT key, value FROM settings")?;
            let settings = stmt
                .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
                .collect::<Result<HashMap<String, String>, _>>()?;
            Ok(settings)
        })
    }

    /// Keys currently stored as secrets.
    pub fn get_secret_setting_keys(&self) -> Result<Vec<String>, DbError> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT key FROM settings WHERE setting_type = 'secret' ORDER BY key")?;
            let keys = stmt
                .query_map([], |row| row.get(0))?
                .collect::<Result<Vec<String>, _>>()?;
            Ok(keys)
        })
    }
}
