use chrono::Utc;
use rusqlite::{OptionalExtension, params};
use stronger_core::{Friend, User};

use super::users::{USER_COLUMNS, row_to_user};
use super::{Storage, get_conn, log_row_error};
use crate::error::{Result, StorageError};

const FRIEND_COLUMNS: &str = "id, user_id, friend_id, since";

fn row_to_friend(row: &rusqlite::Row<'_>) -> rusqlite::Result<Friend> {
    Ok(Friend { id: row.get(0)?, user_id: row.get(1)?, friend_id: row.get(2)?, since: row.get(3)? })
}

impl Storage {
    /// Record that `user_id` follows `friend_id`.
    ///
    /// # Errors
    /// Returns `Duplicate` if the edge exists, `Constraint` for a self-follow.
    pub fn follow(&self, user_id: i64, friend_id: i64) -> Result<Friend> {
        let conn = get_conn(&self.pool)?;
        conn.execute(
            "INSERT INTO friends (user_id, friend_id, since) VALUES (?1, ?2, ?3)",
            params![user_id, friend_id, Utc::now()],
        )?;
        let id = conn.last_insert_rowid();
        tracing::debug!(user_id, friend_id, "Follow");
        drop(conn);
        self.get_friend(id)
    }

    /// # Errors
    /// Returns error if database delete fails.
    pub fn unfollow(&self, user_id: i64, friend_id: i64) -> Result<bool> {
        let conn = get_conn(&self.pool)?;
        let affected = conn.execute(
            "DELETE FROM friends WHERE user_id = ?1 AND friend_id = ?2",
            params![user_id, friend_id],
        )?;
        Ok(affected > 0)
    }

    /// # Errors
    /// Returns `NotFound` if no edge has this id.
    pub fn get_friend(&self, id: i64) -> Result<Friend> {
        let conn = get_conn(&self.pool)?;
        let sql = format!("SELECT {FRIEND_COLUMNS} FROM friends WHERE id = ?1");
        conn.query_row(&sql, params![id], row_to_friend)
            .map_err(|e| StorageError::from(e).for_entity("friend", id))
    }

    /// The edge from `user_id` to `friend_id`, if any.
    ///
    /// # Errors
    /// Returns error if database query fails.
    pub fn friendship(&self, user_id: i64, friend_id: i64) -> Result<Option<Friend>> {
        let conn = get_conn(&self.pool)?;
        let sql = format!("SELECT {FRIEND_COLUMNS} FROM friends WHERE user_id = ?1 AND friend_id = ?2");
        Ok(conn.query_row(&sql, params![user_id, friend_id], row_to_friend).optional()?)
    }

    /// Follow edges, optionally only those created by one user.
    ///
    /// # Errors
    /// Returns error if database query fails.
    pub fn list_friends(&self, user_id: Option<i64>) -> Result<Vec<Friend>> {
        let conn = get_conn(&self.pool)?;
        let sql = format!(
            "SELECT {FRIEND_COLUMNS} FROM friends WHERE (?1 IS NULL OR user_id = ?1) ORDER BY id"
        );
        let mut stmt = conn.prepare(&sql)?;
        let edges = stmt.query_map(params![user_id], row_to_friend)?.filter_map(log_row_error).collect();
        Ok(edges)
    }

    /// # Errors
    /// Returns error if database delete fails.
    pub fn delete_friend(&self, id: i64) -> Result<bool> {
        let conn = get_conn(&self.pool)?;
        let affected = conn.execute("DELETE FROM friends WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }

    /// Users following `user_id`.
    ///
    /// # Errors
    /// Returns error if database query fails.
    pub fn followers(&self, user_id: i64) -> Result<Vec<User>> {
        let conn = get_conn(&self.pool)?;
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM friends f JOIN users u ON u.id = f.user_id
               WHERE f.friend_id = ?1 ORDER BY u.username"
        );
        let mut stmt = conn.prepare(&sql)?;
        let users = stmt.query_map(params![user_id], row_to_user)?.filter_map(log_row_error).collect();
        Ok(users)
    }

    /// Users that `user_id` follows.
    ///
    /// # Errors
    /// Returns error if database query fails.
    pub fn following(&self, user_id: i64) -> Result<Vec<User>> {
        let conn = get_conn(&self.pool)?;
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM friends f JOIN users u ON u.id = f.friend_id
               WHERE f.user_id = ?1 ORDER BY u.username"
        );
        let mut stmt = conn.prepare(&sql)?;
        let users = stmt.query_map(params![user_id], row_to_user)?.filter_map(log_row_error).collect();
        Ok(users)
    }

    /// Ids of the users `user_id` follows.
    ///
    /// # Errors
    /// Returns error if database query fails.
    pub fn following_ids(&self, user_id: i64) -> Result<Vec<i64>> {
        let conn = get_conn(&self.pool)?;
        let mut stmt = conn.prepare("SELECT friend_id FROM friends WHERE user_id = ?1 ORDER BY friend_id")?;
        let ids = stmt.query_map(params![user_id], |row| row.get(0))?.filter_map(log_row_error).collect();
        Ok(ids)
    }
}
