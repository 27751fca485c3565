use chrono::{NaiveDate, Utc};
use rusqlite::params;
use stronger_core::{DailyNutrition, NutritionInput};

use super::{Storage, clamp_limit, coerce_to_sql, get_conn, log_row_error, placeholders};
use crate::error::{Result, StorageError};
use crate::types::UserCount;

const NUTRITION_COLUMNS: &str =
    "n.id, n.user_id, n.date, n.calories, n.protein, n.carbs, n.fats, n.created_on";

pub(crate) fn row_to_nutrition(row: &rusqlite::Row<'_>) -> rusqlite::Result<DailyNutrition> {
    Ok(DailyNutrition {
        id: row.get(0)?,
        user_id: row.get(1)?,
        date: row.get(2)?,
        calories: row.get(3)?,
        protein: row.get(4)?,
        carbs: row.get(5)?,
        fats: row.get(6)?,
        created_on: row.get(7)?,
    })
}

impl Storage {
    /// # Errors
    /// Returns error if database insert fails.
    pub fn create_nutrition(&self, user_id: i64, input: &NutritionInput) -> Result<DailyNutrition> {
        let conn = get_conn(&self.pool)?;
        conn.execute(
            "INSERT INTO daily_nutrition (user_id, date, calories, protein, carbs, fats, created_on)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                user_id,
                input.date,
                input.calories,
                input.protein,
                input.carbs,
                input.fats,
                Utc::now(),
            ],
        )?;
        let id = conn.last_insert_rowid();
        tracing::debug!(nutrition_id = id, user_id, "Recorded nutrition");
        drop(conn);
        self.get_nutrition(id)
    }

    /// # Errors
    /// Returns `NotFound` if no record has this id.
    pub fn get_nutrition(&self, id: i64) -> Result<DailyNutrition> {
        let conn = get_conn(&self.pool)?;
        let sql = format!("SELECT {NUTRITION_COLUMNS} FROM daily_nutrition n WHERE n.id = ?1");
        conn.query_row(&sql, params![id], row_to_nutrition)
            .map_err(|e| StorageError::from(e).for_entity("nutrition", id))
    }

    /// # Errors
    /// Returns `NotFound` if no record has this id.
    pub fn update_nutrition(&self, id: i64, input: &NutritionInput) -> Result<DailyNutrition> {
        let conn = get_conn(&self.pool)?;
        let affected = conn.execute(
            "UPDATE daily_nutrition SET date = ?1, calories = ?2, protein = ?3, carbs = ?4, fats = ?5
               WHERE id = ?6",
            params![input.date, input.calories, input.protein, input.carbs, input.fats, id],
        )?;
        drop(conn);
        if affected == 0 {
            return Err(StorageError::not_found("nutrition", id));
        }
        self.get_nutrition(id)
    }

    /// # Errors
    /// Returns error if database delete fails.
    pub fn delete_nutrition(&self, id: i64) -> Result<bool> {
        let conn = get_conn(&self.pool)?;
        let affected = conn.execute("DELETE FROM daily_nutrition WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }

    /// Records newest first, optionally for one user.
    ///
    /// # Errors
    /// Returns error if database query fails.
    pub fn list_nutrition(&self, user_id: Option<i64>, limit: usize) -> Result<Vec<DailyNutrition>> {
        let conn = get_conn(&self.pool)?;
        let sql = format!(
            "SELECT {NUTRITION_COLUMNS} FROM daily_nutrition n
               WHERE (?1 IS NULL OR n.user_id = ?1)
               ORDER BY n.date DESC, n.id DESC LIMIT ?2"
        );
        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map(params![user_id, clamp_limit(limit)], row_to_nutrition)?
            .filter_map(log_row_error)
            .collect();
        Ok(records)
    }

    /// Newest records of any of `user_ids`, paired with the owner's username.
    ///
    /// # Errors
    /// Returns error if database query fails.
    pub fn nutrition_for_users(
        &self,
        user_ids: &[i64],
        limit: usize,
    ) -> Result<Vec<(DailyNutrition, String)>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        let conn = get_conn(&self.pool)?;
        let sql = format!(
            "SELECT {NUTRITION_COLUMNS}, u.username FROM daily_nutrition n JOIN users u ON u.id = n.user_id
               WHERE n.user_id IN ({}) ORDER BY n.date DESC, n.id DESC LIMIT ?",
            placeholders(user_ids.len())
        );
        let limit = clamp_limit(limit);
        let mut values: Vec<&dyn rusqlite::ToSql> = user_ids.iter().map(coerce_to_sql).collect();
        values.push(coerce_to_sql(&limit));
        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map(values.as_slice(), |row| Ok((row_to_nutrition(row)?, row.get(8)?)))?
            .filter_map(log_row_error)
            .collect();
        Ok(records)
    }

    /// A user's records dated within `[start, end]`, newest first. Both
    /// bounds are optional.
    ///
    /// # Errors
    /// Returns error if database query fails.
    pub fn nutrition_between(
        &self,
        user_id: i64,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<DailyNutrition>> {
        let conn = get_conn(&self.pool)?;
        let sql = format!(
            "SELECT {NUTRITION_COLUMNS} FROM daily_nutrition n
               WHERE n.user_id = ?1 AND (?2 IS NULL OR n.date >= ?2) AND (?3 IS NULL OR n.date <= ?3)
               ORDER BY n.date DESC, n.id DESC"
        );
        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map(params![user_id, start, end], row_to_nutrition)?
            .filter_map(log_row_error)
            .collect();
        Ok(records)
    }

    /// # Errors
    /// Returns error if database query fails.
    pub fn nutrition_on(&self, user_id: i64, date: NaiveDate) -> Result<Vec<DailyNutrition>> {
        self.nutrition_between(user_id, Some(date), Some(date))
    }

    /// Users with the most nutrition records, busiest first. Ties are
    /// ordered by username.
    ///
    /// # Errors
    /// Returns error if database query fails.
    pub fn most_frequent_nutrition_users(&self, limit: usize) -> Result<Vec<UserCount>> {
        let conn = get_conn(&self.pool)?;
        let mut stmt = conn.prepare(
            "SELECT u.id, u.username, COUNT(*) AS n FROM daily_nutrition d JOIN users u ON u.id = d.user_id
               GROUP BY u.id ORDER BY n DESC, u.username LIMIT ?1",
        )?;
        let users = stmt
            .query_map(params![clamp_limit(limit)], |row| {
                Ok(UserCount {
                    user_id: row.get(0)?,
                    username: row.get(1)?,
                    count: row.get::<_, i64>(2)? as u64,
                })
            })?
            .filter_map(log_row_error)
            .collect();
        Ok(users)
    }
}
