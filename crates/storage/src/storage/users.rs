use chrono::Utc;
use rusqlite::{OptionalExtension, params};
use stronger_core::constants::DEFAULT_AVATAR_URL;
use stronger_core::{ProfileUpdate, TrainingGoal, User, UserCounts};

use super::{Storage, clamp_limit, get_conn, log_row_error, parse_column};
use crate::error::{Result, StorageError};

pub(crate) const USER_COLUMNS: &str =
    "u.id, u.username, u.email, u.gym, u.goal, u.about, u.height, u.avatar_url, u.date_joined";

pub(crate) fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    let goal: Option<String> = row.get(4)?;
    let goal = goal
        .filter(|g| !g.is_empty())
        .map(|g| parse_column::<TrainingGoal>(4, &g))
        .transpose()?;
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        gym: row.get(3)?,
        goal,
        about: row.get(5)?,
        height: row.get(6)?,
        avatar_url: row.get(7)?,
        date_joined: row.get(8)?,
    })
}

impl Storage {
    /// Insert a new account with the default avatar.
    ///
    /// # Errors
    /// Returns `Duplicate` if the username is taken.
    pub fn create_user(&self, username: &str, email: &str, password_hash: &str) -> Result<User> {
        let conn = get_conn(&self.pool)?;
        conn.execute(
            "INSERT INTO users (username, email, password_hash, avatar_url, date_joined)
               VALUES (?1, ?2, ?3, ?4, ?5)",
            params![username, email, password_hash, DEFAULT_AVATAR_URL, Utc::now()],
        )?;
        let id = conn.last_insert_rowid();
        tracing::info!(user_id = id, username, "Created user");
        drop(conn);
        self.get_user(id)
    }

    /// # Errors
    /// Returns `NotFound` if no user has this id.
    pub fn get_user(&self, id: i64) -> Result<User> {
        let conn = get_conn(&self.pool)?;
        let sql = format!("SELECT {USER_COLUMNS} FROM users u WHERE u.id = ?1");
        conn.query_row(&sql, params![id], row_to_user)
            .map_err(|e| StorageError::from(e).for_entity("user", id))
    }

    /// # Errors
    /// Returns `NotFound` if no user has this username.
    pub fn get_user_by_username(&self, username: &str) -> Result<User> {
        let conn = get_conn(&self.pool)?;
        let sql = format!("SELECT {USER_COLUMNS} FROM users u WHERE u.username = ?1");
        conn.query_row(&sql, params![username], row_to_user)
            .map_err(|e| StorageError::from(e).for_entity("user", username))
    }

    /// User id and bcrypt hash for a login attempt.
    ///
    /// # Errors
    /// Returns error if database query fails.
    pub fn get_credentials(&self, username: &str) -> Result<Option<(i64, String)>> {
        let conn = get_conn(&self.pool)?;
        let creds = conn
            .query_row(
                "SELECT id, password_hash FROM users WHERE username = ?1",
                params![username],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        Ok(creds)
    }

    /// All users, ordered by username.
    ///
    /// # Errors
    /// Returns error if database query fails.
    pub fn list_users(&self) -> Result<Vec<User>> {
        let conn = get_conn(&self.pool)?;
        let sql = format!("SELECT {USER_COLUMNS} FROM users u ORDER BY u.username");
        let mut stmt = conn.prepare(&sql)?;
        let users = stmt.query_map([], row_to_user)?.filter_map(log_row_error).collect();
        Ok(users)
    }

    /// Most recently joined users first.
    ///
    /// # Errors
    /// Returns error if database query fails.
    pub fn newest_users(&self, limit: usize) -> Result<Vec<User>> {
        let conn = get_conn(&self.pool)?;
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users u ORDER BY u.date_joined DESC, u.id DESC LIMIT ?1"
        );
        let mut stmt = conn.prepare(&sql)?;
        let users = stmt
            .query_map(params![clamp_limit(limit)], row_to_user)?
            .filter_map(log_row_error)
            .collect();
        Ok(users)
    }

    /// # Errors
    /// Returns error if database query fails.
    pub fn count_users(&self) -> Result<u64> {
        let conn = get_conn(&self.pool)?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Replace the editable profile fields. A blank avatar keeps the current one.
    ///
    /// # Errors
    /// Returns `NotFound` if the user does not exist.
    pub fn update_profile(&self, user_id: i64, update: &ProfileUpdate) -> Result<User> {
        let conn = get_conn(&self.pool)?;
        let affected = conn.execute(
            "UPDATE users SET
                 avatar_url = CASE WHEN ?1 = '' THEN avatar_url ELSE ?1 END,
                 gym = ?2, goal = ?3, about = ?4, height = ?5
               WHERE id = ?6",
            params![
                update.avatar_url,
                update.gym,
                update.goal.map(|g| g.code()),
                update.about,
                update.height,
                user_id,
            ],
        )?;
        drop(conn);
        if affected == 0 {
            return Err(StorageError::not_found("user", user_id));
        }
        self.get_user(user_id)
    }

    /// # Errors
    /// Returns `NotFound` if the user does not exist.
    pub fn update_email(&self, user_id: i64, email: &str) -> Result<()> {
        let conn = get_conn(&self.pool)?;
        let affected =
            conn.execute("UPDATE users SET email = ?1 WHERE id = ?2", params![email, user_id])?;
        if affected == 0 {
            return Err(StorageError::not_found("user", user_id));
        }
        Ok(())
    }

    /// Delete a user and, through cascades, everything they own.
    ///
    /// # Errors
    /// Returns error if database delete fails.
    pub fn delete_user(&self, user_id: i64) -> Result<bool> {
        let conn = get_conn(&self.pool)?;
        let affected = conn.execute("DELETE FROM users WHERE id = ?1", params![user_id])?;
        if affected > 0 {
            tracing::info!(user_id, "Deleted user");
        }
        Ok(affected > 0)
    }

    /// Profile counters in one round trip.
    ///
    /// # Errors
    /// Returns error if database query fails.
    pub fn user_counts(&self, user_id: i64) -> Result<UserCounts> {
        let conn = get_conn(&self.pool)?;
        let counts = conn.query_row(
            "SELECT
                 (SELECT COUNT(*) FROM friends WHERE user_id = ?1),
                 (SELECT COUNT(*) FROM friends WHERE friend_id = ?1),
                 (SELECT COUNT(*) FROM group_members WHERE user_id = ?1),
                 (SELECT COUNT(*) FROM daily_nutrition WHERE user_id = ?1),
                 (SELECT COUNT(*) FROM workouts WHERE user_id = ?1)",
            params![user_id],
            |row| {
                Ok(UserCounts {
                    following: row.get::<_, i64>(0)? as u64,
                    followers: row.get::<_, i64>(1)? as u64,
                    groups: row.get::<_, i64>(2)? as u64,
                    meals: row.get::<_, i64>(3)? as u64,
                    workouts: row.get::<_, i64>(4)? as u64,
                })
            },
        )?;
        Ok(counts)
    }
}
