use rusqlite::{OptionalExtension, params};
use stronger_core::{BodyWeight, BodyWeightInput};

use super::{Storage, clamp_limit, coerce_to_sql, get_conn, log_row_error, placeholders};
use crate::error::{Result, StorageError};

const BODYWEIGHT_COLUMNS: &str = "b.id, b.user_id, b.date, b.weight";

pub(crate) fn row_to_bodyweight(row: &rusqlite::Row<'_>) -> rusqlite::Result<BodyWeight> {
    Ok(BodyWeight { id: row.get(0)?, user_id: row.get(1)?, date: row.get(2)?, weight: row.get(3)? })
}

impl Storage {
    /// # Errors
    /// Returns `Duplicate` if the user already has a weigh-in on that date.
    pub fn create_bodyweight(&self, user_id: i64, input: &BodyWeightInput) -> Result<BodyWeight> {
        let conn = get_conn(&self.pool)?;
        conn.execute(
            "INSERT INTO bodyweights (user_id, date, weight) VALUES (?1, ?2, ?3)",
            params![user_id, input.date, input.weight],
        )?;
        let id = conn.last_insert_rowid();
        drop(conn);
        self.get_bodyweight(id)
    }

    /// # Errors
    /// Returns `NotFound` if no weigh-in has this id.
    pub fn get_bodyweight(&self, id: i64) -> Result<BodyWeight> {
        let conn = get_conn(&self.pool)?;
        let sql = format!("SELECT {BODYWEIGHT_COLUMNS} FROM bodyweights b WHERE b.id = ?1");
        conn.query_row(&sql, params![id], row_to_bodyweight)
            .map_err(|e| StorageError::from(e).for_entity("bodyweight", id))
    }

    /// # Errors
    /// Returns `NotFound` for an unknown id, `Duplicate` if the new date
    /// collides with another weigh-in.
    pub fn update_bodyweight(&self, id: i64, input: &BodyWeightInput) -> Result<BodyWeight> {
        let conn = get_conn(&self.pool)?;
        let affected = conn.execute(
            "UPDATE bodyweights SET date = ?1, weight = ?2 WHERE id = ?3",
            params![input.date, input.weight, id],
        )?;
        drop(conn);
        if affected == 0 {
            return Err(StorageError::not_found("bodyweight", id));
        }
        self.get_bodyweight(id)
    }

    /// # Errors
    /// Returns error if database delete fails.
    pub fn delete_bodyweight(&self, id: i64) -> Result<bool> {
        let conn = get_conn(&self.pool)?;
        let affected = conn.execute("DELETE FROM bodyweights WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }

    /// Weigh-ins newest first, optionally for one user.
    ///
    /// # Errors
    /// Returns error if database query fails.
    pub fn list_bodyweights(&self, user_id: Option<i64>, limit: usize) -> Result<Vec<BodyWeight>> {
        let conn = get_conn(&self.pool)?;
        let sql = format!(
            "SELECT {BODYWEIGHT_COLUMNS} FROM bodyweights b
               WHERE (?1 IS NULL OR b.user_id = ?1)
               ORDER BY b.date DESC LIMIT ?2"
        );
        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map(params![user_id, clamp_limit(limit)], row_to_bodyweight)?
            .filter_map(log_row_error)
            .collect();
        Ok(records)
    }

    /// Every weigh-in of a user, newest first.
    ///
    /// # Errors
    /// Returns error if database query fails.
    pub fn bodyweight_history(&self, user_id: i64) -> Result<Vec<BodyWeight>> {
        let conn = get_conn(&self.pool)?;
        let sql = format!(
            "SELECT {BODYWEIGHT_COLUMNS} FROM bodyweights b WHERE b.user_id = ?1 ORDER BY b.date DESC"
        );
        let mut stmt = conn.prepare(&sql)?;
        let records =
            stmt.query_map(params![user_id], row_to_bodyweight)?.filter_map(log_row_error).collect();
        Ok(records)
    }

    /// Latest weigh-in by date.
    ///
    /// # Errors
    /// Returns error if database query fails.
    pub fn current_bodyweight(&self, user_id: i64) -> Result<Option<BodyWeight>> {
        let conn = get_conn(&self.pool)?;
        let sql = format!(
            "SELECT {BODYWEIGHT_COLUMNS} FROM bodyweights b WHERE b.user_id = ?1
               ORDER BY b.date DESC LIMIT 1"
        );
        Ok(conn.query_row(&sql, params![user_id], row_to_bodyweight).optional()?)
    }

    /// Newest weigh-ins of any of `user_ids`, paired with the owner's username.
    ///
    /// # Errors
    /// Returns error if database query fails.
    pub fn bodyweights_for_users(
        &self,
        user_ids: &[i64],
        limit: usize,
    ) -> Result<Vec<(BodyWeight, String)>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        let conn = get_conn(&self.pool)?;
        let sql = format!(
            "SELECT {BODYWEIGHT_COLUMNS}, u.username FROM bodyweights b JOIN users u ON u.id = b.user_id
               WHERE b.user_id IN ({}) ORDER BY b.date DESC, b.id DESC LIMIT ?",
            placeholders(user_ids.len())
        );
        let limit = clamp_limit(limit);
        let mut values: Vec<&dyn rusqlite::ToSql> = user_ids.iter().map(coerce_to_sql).collect();
        values.push(coerce_to_sql(&limit));
        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map(values.as_slice(), |row| Ok((row_to_bodyweight(row)?, row.get(4)?)))?
            .filter_map(log_row_error)
            .collect();
        Ok(records)
    }
}
