//! Auto-open roster: broadcasters whose pages open automatically when
//! they go live.

use crate::{Database, DbError};

impl Database {
    pub fn is_auto_open_user(&self, user_id: &str) -> Result<bool, DbError> {
        self.with_conn(|conn| {
            let exists: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM auto_open_users WHERE user_id = ?1)",
                [user_id],
                |row| row.get(0),
            )?;
            Ok(exists)
        })
    }

    /// Roster members in the order they were added.
    pub fn get_auto_open_user_ids(&self) -> Result<Vec<String>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT user_id FROM auto_open_users ORDER BY seq ASC")?;
            let ids = stmt
                .query_map([], |row| row.get(0))?
                .collect::<Result<Vec<String>, _>>()?;
            Ok(ids)
        })
    }

    /// Add or remove a roster member. Repeating either call is a no-op.
    pub fn set_auto_open_user(&self, user_id: &str, enabled: bool) -> Result<(), DbError> {
        if user_id.is_empty() {
            return Err(DbError::InvalidData("user_id must not be empty".into()));
        }
        self.with_conn(|conn| {
            if enabled {
                conn.execute(
                    "INSERT OR IGNORE INTO auto_open_users (user_id) VALUES (?1)",
                    [user_id],
                )?;
            } else {
                conn.execute("DELETE FROM auto_open_users WHERE user_id = ?1", [user_id])?;
            }
            Ok(())
        })
    }
}
