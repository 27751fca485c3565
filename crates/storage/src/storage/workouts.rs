use chrono::NaiveDate;
use rusqlite::{OptionalExtension, params};
use stronger_core::{Muscle, SetDetail, SetInput, Workout, WorkoutInput, WorkoutSet, WorkoutWithSets};

use super::{Storage, clamp_limit, coerce_to_sql, get_conn, log_row_error, parse_column, placeholders};
use crate::error::{Result, StorageError};
use crate::types::{SetFilter, UserCount};

const WORKOUT_COLUMNS: &str = "w.id, w.user_id, w.date, w.description, w.comments";

pub(crate) fn row_to_workout(row: &rusqlite::Row<'_>) -> rusqlite::Result<Workout> {
    Ok(Workout {
        id: row.get(0)?,
        user_id: row.get(1)?,
        date: row.get(2)?,
        description: row.get(3)?,
        comments: row.get(4)?,
    })
}

fn row_to_set(row: &rusqlite::Row<'_>) -> rusqlite::Result<WorkoutSet> {
    Ok(WorkoutSet {
        id: row.get(0)?,
        workout_id: row.get(1)?,
        exercise: row.get(2)?,
        weight: row.get(3)?,
        reps: row.get(4)?,
    })
}

fn row_to_set_detail(row: &rusqlite::Row<'_>) -> rusqlite::Result<SetDetail> {
    let primary: String = row.get(7)?;
    Ok(SetDetail {
        set_id: row.get(0)?,
        workout_id: row.get(1)?,
        user_id: row.get(2)?,
        username: row.get(3)?,
        date: row.get(4)?,
        exercise: row.get(5)?,
        clean_name: row.get(6)?,
        primary: parse_column::<Muscle>(7, &primary)?,
        weight: row.get(8)?,
        reps: row.get(9)?,
    })
}

impl Storage {
    /// Insert a workout and its sets in one transaction. Set exercises are
    /// referenced by name and must already exist.
    ///
    /// # Errors
    /// Returns `InvalidReference` naming the first unknown exercise.
    pub fn create_workout(
        &self,
        user_id: i64,
        input: &WorkoutInput,
        sets: &[SetInput],
    ) -> Result<WorkoutWithSets> {
        let mut conn = get_conn(&self.pool)?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO workouts (user_id, date, description, comments) VALUES (?1, ?2, ?3, ?4)",
            params![user_id, input.date, input.description, input.comments],
        )?;
        let workout_id = tx.last_insert_rowid();
        {
            let mut exists = tx.prepare("SELECT 1 FROM exercises WHERE name = ?1")?;
            let mut insert = tx.prepare(
                "INSERT INTO sets (workout_id, exercise, weight, reps) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for set in sets {
                let known: Option<i64> =
                    exists.query_row(params![set.exercise], |row| row.get(0)).optional()?;
                if known.is_none() {
                    return Err(StorageError::InvalidReference(format!(
                        "unknown exercise '{}'",
                        set.exercise
                    )));
                }
                insert.execute(params![workout_id, set.exercise, set.weight, set.reps])?;
            }
        }
        tx.commit()?;
        tracing::info!(workout_id, user_id, sets = sets.len(), "Recorded workout");
        drop(conn);
        self.get_workout_with_sets(workout_id)
    }

    /// # Errors
    /// Returns `NotFound` if no workout has this id.
    pub fn get_workout(&self, id: i64) -> Result<Workout> {
        let conn = get_conn(&self.pool)?;
        let sql = format!("SELECT {WORKOUT_COLUMNS} FROM workouts w WHERE w.id = ?1");
        conn.query_row(&sql, params![id], row_to_workout)
            .map_err(|e| StorageError::from(e).for_entity("workout", id))
    }

    /// # Errors
    /// Returns `NotFound` if no workout has this id.
    pub fn get_workout_with_sets(&self, id: i64) -> Result<WorkoutWithSets> {
        let workout = self.get_workout(id)?;
        let sets = self.workout_sets(id)?;
        Ok(WorkoutWithSets { workout, sets })
    }

    /// Sets of one workout in the order they were recorded.
    ///
    /// # Errors
    /// Returns error if database query fails.
    pub fn workout_sets(&self, workout_id: i64) -> Result<Vec<WorkoutSet>> {
        let conn = get_conn(&self.pool)?;
        let mut stmt = conn.prepare(
            "SELECT id, workout_id, exercise, weight, reps FROM sets WHERE workout_id = ?1 ORDER BY id",
        )?;
        let sets = stmt.query_map(params![workout_id], row_to_set)?.filter_map(log_row_error).collect();
        Ok(sets)
    }

    /// Workouts newest first, optionally for one user.
    ///
    /// # Errors
    /// Returns error if database query fails.
    pub fn list_workouts(&self, user_id: Option<i64>, limit: usize) -> Result<Vec<Workout>> {
        let conn = get_conn(&self.pool)?;
        let sql = format!(
            "SELECT {WORKOUT_COLUMNS} FROM workouts w
               WHERE (?1 IS NULL OR w.user_id = ?1)
               ORDER BY w.date DESC, w.id DESC LIMIT ?2"
        );
        let mut stmt = conn.prepare(&sql)?;
        let workouts = stmt
            .query_map(params![user_id, clamp_limit(limit)], row_to_workout)?
            .filter_map(log_row_error)
            .collect();
        Ok(workouts)
    }

    /// Newest workouts of any of `user_ids`, paired with the owner's username.
    ///
    /// # Errors
    /// Returns error if database query fails.
    pub fn workouts_for_users(
        &self,
        user_ids: &[i64],
        limit: usize,
    ) -> Result<Vec<(Workout, String)>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        let conn = get_conn(&self.pool)?;
        let sql = format!(
            "SELECT {WORKOUT_COLUMNS}, u.username FROM workouts w JOIN users u ON u.id = w.user_id
               WHERE w.user_id IN ({}) ORDER BY w.date DESC, w.id DESC LIMIT ?",
            placeholders(user_ids.len())
        );
        let limit = clamp_limit(limit);
        let mut values: Vec<&dyn rusqlite::ToSql> = user_ids.iter().map(coerce_to_sql).collect();
        values.push(coerce_to_sql(&limit));
        let mut stmt = conn.prepare(&sql)?;
        let workouts = stmt
            .query_map(values.as_slice(), |row| Ok((row_to_workout(row)?, row.get(5)?)))?
            .filter_map(log_row_error)
            .collect();
        Ok(workouts)
    }

    /// Workouts of one user on one date.
    ///
    /// # Errors
    /// Returns error if database query fails.
    pub fn workouts_on(&self, user_id: i64, date: NaiveDate) -> Result<Vec<Workout>> {
        let conn = get_conn(&self.pool)?;
        let sql = format!(
            "SELECT {WORKOUT_COLUMNS} FROM workouts w WHERE w.user_id = ?1 AND w.date = ?2 ORDER BY w.id"
        );
        let mut stmt = conn.prepare(&sql)?;
        let workouts = stmt
            .query_map(params![user_id, date], row_to_workout)?
            .filter_map(log_row_error)
            .collect();
        Ok(workouts)
    }

    /// Edit a workout's header fields. Sets are untouched.
    ///
    /// # Errors
    /// Returns `NotFound` if the workout does not exist.
    pub fn update_workout(&self, id: i64, input: &WorkoutInput) -> Result<Workout> {
        let conn = get_conn(&self.pool)?;
        let affected = conn.execute(
            "UPDATE workouts SET date = ?1, description = ?2, comments = ?3 WHERE id = ?4",
            params![input.date, input.description, input.comments, id],
        )?;
        drop(conn);
        if affected == 0 {
            return Err(StorageError::not_found("workout", id));
        }
        self.get_workout(id)
    }

    /// Delete a workout; its sets go with it.
    ///
    /// # Errors
    /// Returns error if database delete fails.
    pub fn delete_workout(&self, id: i64) -> Result<bool> {
        let conn = get_conn(&self.pool)?;
        let affected = conn.execute("DELETE FROM workouts WHERE id = ?1", params![id])?;
        if affected > 0 {
            tracing::info!(workout_id = id, "Deleted workout");
        }
        Ok(affected > 0)
    }

    /// Workout dates, ascending, one entry per workout.
    ///
    /// # Errors
    /// Returns error if database query fails.
    pub fn workout_dates(&self, user_id: Option<i64>) -> Result<Vec<NaiveDate>> {
        let conn = get_conn(&self.pool)?;
        let mut stmt = conn.prepare(
            "SELECT date FROM workouts WHERE (?1 IS NULL OR user_id = ?1) ORDER BY date",
        )?;
        let dates = stmt.query_map(params![user_id], |row| row.get(0))?.filter_map(log_row_error).collect();
        Ok(dates)
    }

    /// # Errors
    /// Returns error if database query fails.
    pub fn count_workouts(&self, user_id: Option<i64>) -> Result<u64> {
        let conn = get_conn(&self.pool)?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM workouts WHERE (?1 IS NULL OR user_id = ?1)",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    /// Workouts that include at least one set of the exercise, oldest first.
    /// Restricted to one user when `user_id` is given.
    ///
    /// # Errors
    /// Returns error if database query fails.
    pub fn workouts_including_exercise(
        &self,
        clean_name: &str,
        user_id: Option<i64>,
    ) -> Result<Vec<Workout>> {
        let conn = get_conn(&self.pool)?;
        let sql = format!(
            "SELECT {WORKOUT_COLUMNS} FROM workouts w
               WHERE (?2 IS NULL OR w.user_id = ?2)
                 AND EXISTS (SELECT 1 FROM sets s JOIN exercises e ON e.name = s.exercise
                             WHERE s.workout_id = w.id AND e.clean_name = ?1)
               ORDER BY w.date, w.id"
        );
        let mut stmt = conn.prepare(&sql)?;
        let workouts = stmt
            .query_map(params![clean_name, user_id], row_to_workout)?
            .filter_map(log_row_error)
            .collect();
        Ok(workouts)
    }

    /// Users with the most workouts, busiest first. Ties are ordered by
    /// username.
    ///
    /// # Errors
    /// Returns error if database query fails.
    pub fn most_frequent_workout_users(&self, limit: usize) -> Result<Vec<UserCount>> {
        let conn = get_conn(&self.pool)?;
        let mut stmt = conn.prepare(
            "SELECT u.id, u.username, COUNT(*) AS n FROM workouts w JOIN users u ON u.id = w.user_id
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

    /// Set rows joined with workout, owner and exercise, ordered by workout
    /// date then recording order.
    ///
    /// # Errors
    /// Returns error if database query fails.
    pub fn set_details(&self, filter: &SetFilter) -> Result<Vec<SetDetail>> {
        let mut sql = String::from(
            "SELECT s.id, s.workout_id, w.user_id, u.username, w.date, e.name, e.clean_name,
                    e.primary_muscle, s.weight, s.reps
               FROM sets s
               JOIN workouts w ON w.id = s.workout_id
               JOIN users u ON u.id = w.user_id
               JOIN exercises e ON e.name = s.exercise
               WHERE 1 = 1",
        );
        let mut values: Vec<&dyn rusqlite::ToSql> = Vec::new();

        if let Some(ref workout_id) = filter.workout_id {
            sql.push_str(" AND w.id = ?");
            values.push(coerce_to_sql(workout_id));
        }
        if let Some(ref user_id) = filter.user_id {
            sql.push_str(" AND w.user_id = ?");
            values.push(coerce_to_sql(user_id));
        }
        if let Some(ref user_ids) = filter.user_ids {
            if user_ids.is_empty() {
                return Ok(Vec::new());
            }
            sql.push_str(&format!(" AND w.user_id IN ({})", placeholders(user_ids.len())));
            values.extend(user_ids.iter().map(coerce_to_sql));
        }
        if let Some(ref clean_names) = filter.clean_names {
            if clean_names.is_empty() {
                return Ok(Vec::new());
            }
            sql.push_str(&format!(" AND e.clean_name IN ({})", placeholders(clean_names.len())));
            values.extend(clean_names.iter().map(coerce_to_sql));
        }
        if let Some(ref reps) = filter.reps {
            sql.push_str(" AND s.reps = ?");
            values.push(coerce_to_sql(reps));
        }
        if let Some(ref since) = filter.since {
            sql.push_str(" AND w.date >= ?");
            values.push(coerce_to_sql(since));
        }
        if let Some(ref until) = filter.until {
            sql.push_str(" AND w.date <= ?");
            values.push(coerce_to_sql(until));
        }
        sql.push_str(" ORDER BY w.date, s.workout_id, s.id");

        let conn = get_conn(&self.pool)?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(values.as_slice(), row_to_set_detail)?
            .filter_map(log_row_error)
            .collect();
        Ok(rows)
    }
}
