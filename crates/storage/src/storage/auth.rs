use chrono::Utc;
use rusqlite::{OptionalExtension, params};
use stronger_core::User;
use uuid::Uuid;

use super::users::{USER_COLUMNS, row_to_user};
use super::{Storage, get_conn};
use crate::error::Result;

fn new_key() -> String {
    Uuid::new_v4().simple().to_string()
}

impl Storage {
    /// Return the user's API token, creating one on first use.
    ///
    /// # Errors
    /// Returns error if database query fails.
    pub fn get_or_create_api_token(&self, user_id: i64) -> Result<String> {
        let conn = get_conn(&self.pool)?;
        let existing: Option<String> = conn
            .query_row("SELECT key FROM api_tokens WHERE user_id = ?1", params![user_id], |row| {
                row.get(0)
            })
            .optional()?;
        if let Some(key) = existing {
            return Ok(key);
        }
        let key = new_key();
        conn.execute(
            "INSERT INTO api_tokens (key, user_id, created_at) VALUES (?1, ?2, ?3)",
            params![key, user_id, Utc::now()],
        )?;
        tracing::debug!(user_id, "Issued API token");
        Ok(key)
    }

    /// # Errors
    /// Returns error if database query fails.
    pub fn user_for_token(&self, key: &str) -> Result<Option<User>> {
        let conn = get_conn(&self.pool)?;
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM api_tokens t JOIN users u ON u.id = t.user_id
               WHERE t.key = ?1"
        );
        Ok(conn.query_row(&sql, params![key], row_to_user).optional()?)
    }

    /// Start a browser session and return its id.
    ///
    /// # Errors
    /// Returns error if database insert fails.
    pub fn create_web_session(&self, user_id: i64) -> Result<String> {
        let conn = get_conn(&self.pool)?;
        let id = new_key();
        conn.execute(
            "INSERT INTO web_sessions (id, user_id, created_at) VALUES (?1, ?2, ?3)",
            params![id, user_id, Utc::now()],
        )?;
        Ok(id)
    }

    /// # Errors
    /// Returns error if database query fails.
    pub fn user_for_session(&self, session_id: &str) -> Result<Option<User>> {
        let conn = get_conn(&self.pool)?;
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM web_sessions s JOIN users u ON u.id = s.user_id
               WHERE s.id = ?1"
        );
        Ok(conn.query_row(&sql, params![session_id], row_to_user).optional()?)
    }

    /// # Errors
    /// Returns error if database delete fails.
    pub fn delete_web_session(&self, session_id: &str) -> Result<bool> {
        let conn = get_conn(&self.pool)?;
        let affected =
            conn.execute("DELETE FROM web_sessions WHERE id = ?1", params![session_id])?;
        Ok(affected > 0)
    }
}
