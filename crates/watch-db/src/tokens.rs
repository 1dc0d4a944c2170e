//! OAuth token storage. The newest row is the current token.

use serde::{Deserialize, Serialize};

use crate::{Database, DbError, OptionalExt};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_at: i64,
}

impl Database {
    pub fn save_token(&self, token: &Token) -> Result<(), DbError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO tokens (access_token, refresh_token, scope, expires_at) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![token.access_token, token.refresh_token, token.scope, token.expires_at],
            )?;
            Ok(())
        })
    }

    pub fn get_latest_token(&self) -> Result<Option<Token>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT access_token, refresh_token, scope, expires_at FROM tokens ORDER BY id DESC LIMIT 1",
            )?;
            let token = stmt
                .query_row([], |row| {
                    Ok(Token {
                        access_token: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
                        refresh_token: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                        scope: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                        expires_at: row.get::<_, Option<i64>>(3)?.unwrap_or_default(),
                    })
                })
                .optional()?;
            Ok(token.filter(|t| !t.access_token.is_empty()))
        })
    }

    pub fn delete_all_tokens(&self) -> Result<(), DbError> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM tokens", [])?;
            Ok(())
        })
    }
}
