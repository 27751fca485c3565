use chrono::{NaiveDate, Utc};
use rusqlite::params;
use stronger_core::{Exercise, ExerciseInput, Muscle};

use super::{Storage, clamp_limit, get_conn, log_row_error, parse_column};
use crate::error::{Result, StorageError};
use crate::types::ExerciseCount;

const EXERCISE_COLUMNS: &str =
    "name, clean_name, primary_muscle, secondary_muscle, added_by, added_at";

fn row_to_exercise(row: &rusqlite::Row<'_>) -> rusqlite::Result<Exercise> {
    let primary: String = row.get(2)?;
    let secondary: String = row.get(3)?;
    Ok(Exercise {
        name: row.get(0)?,
        clean_name: row.get(1)?,
        primary: parse_column::<Muscle>(2, &primary)?,
        secondary: parse_column::<Muscle>(3, &secondary)?,
        added_by: row.get(4)?,
        added_at: row.get(5)?,
    })
}

impl Storage {
    /// Add an exercise to the catalog. `clean_name` is derived from the name.
    ///
    /// # Errors
    /// Returns `Duplicate` if the name or its clean name already exists.
    pub fn create_exercise(&self, input: &ExerciseInput, added_by: Option<i64>) -> Result<Exercise> {
        let conn = get_conn(&self.pool)?;
        let clean_name = input.clean_name();
        conn.execute(
            "INSERT INTO exercises (name, clean_name, primary_muscle, secondary_muscle, added_by, added_at)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                input.name,
                clean_name,
                input.primary.as_str(),
                input.secondary.as_str(),
                added_by,
                Utc::now(),
            ],
        )?;
        tracing::info!(name = %input.name, clean_name = %clean_name, "Added exercise");
        drop(conn);
        self.get_exercise(&clean_name)
    }

    /// # Errors
    /// Returns `NotFound` if no exercise has this clean name.
    pub fn get_exercise(&self, clean_name: &str) -> Result<Exercise> {
        let conn = get_conn(&self.pool)?;
        let sql = format!("SELECT {EXERCISE_COLUMNS} FROM exercises WHERE clean_name = ?1");
        conn.query_row(&sql, params![clean_name], row_to_exercise)
            .map_err(|e| StorageError::from(e).for_entity("exercise", clean_name))
    }

    /// # Errors
    /// Returns `NotFound` if no exercise has this exact name.
    pub fn get_exercise_by_name(&self, name: &str) -> Result<Exercise> {
        let conn = get_conn(&self.pool)?;
        let sql = format!("SELECT {EXERCISE_COLUMNS} FROM exercises WHERE name = ?1");
        conn.query_row(&sql, params![name], row_to_exercise)
            .map_err(|e| StorageError::from(e).for_entity("exercise", name))
    }

    /// Whole catalog ordered by primary muscle, then name.
    ///
    /// # Errors
    /// Returns error if database query fails.
    pub fn list_exercises(&self) -> Result<Vec<Exercise>> {
        let conn = get_conn(&self.pool)?;
        let sql =
            format!("SELECT {EXERCISE_COLUMNS} FROM exercises ORDER BY primary_muscle, name");
        let mut stmt = conn.prepare(&sql)?;
        let exercises = stmt.query_map([], row_to_exercise)?.filter_map(log_row_error).collect();
        Ok(exercises)
    }

    /// # Errors
    /// Returns error if database query fails.
    pub fn recently_added_exercises(&self, limit: usize) -> Result<Vec<Exercise>> {
        let conn = get_conn(&self.pool)?;
        let sql = format!(
            "SELECT {EXERCISE_COLUMNS} FROM exercises ORDER BY added_at DESC, name LIMIT ?1"
        );
        let mut stmt = conn.prepare(&sql)?;
        let exercises = stmt
            .query_map(params![clamp_limit(limit)], row_to_exercise)?
            .filter_map(log_row_error)
            .collect();
        Ok(exercises)
    }

    /// # Errors
    /// Returns error if database query fails.
    pub fn count_exercises(&self) -> Result<u64> {
        let conn = get_conn(&self.pool)?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM exercises", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Edit an exercise. Renaming recomputes the clean name and carries
    /// existing sets and goals along through `ON UPDATE CASCADE`.
    ///
    /// # Errors
    /// Returns `NotFound` if the exercise does not exist, `Duplicate` if the
    /// new name collides with another exercise.
    pub fn update_exercise(&self, clean_name: &str, input: &ExerciseInput) -> Result<Exercise> {
        let conn = get_conn(&self.pool)?;
        let new_clean_name = input.clean_name();
        let affected = conn.execute(
            "UPDATE exercises SET name = ?1, clean_name = ?2, primary_muscle = ?3, secondary_muscle = ?4
               WHERE clean_name = ?5",
            params![
                input.name,
                new_clean_name,
                input.primary.as_str(),
                input.secondary.as_str(),
                clean_name,
            ],
        )?;
        drop(conn);
        if affected == 0 {
            return Err(StorageError::not_found("exercise", clean_name));
        }
        self.get_exercise(&new_clean_name)
    }

    /// # Errors
    /// Returns error if database delete fails.
    pub fn delete_exercise(&self, clean_name: &str) -> Result<bool> {
        let conn = get_conn(&self.pool)?;
        let affected =
            conn.execute("DELETE FROM exercises WHERE clean_name = ?1", params![clean_name])?;
        Ok(affected > 0)
    }

    /// Exercises with the most logged sets, most popular first. Ties are
    /// ordered by name.
    ///
    /// # Errors
    /// Returns error if database query fails.
    pub fn most_popular_exercises(&self, limit: usize) -> Result<Vec<ExerciseCount>> {
        let conn = get_conn(&self.pool)?;
        let mut stmt = conn.prepare(
            "SELECT exercise, COUNT(*) AS n FROM sets
               GROUP BY exercise ORDER BY n DESC, exercise LIMIT ?1",
        )?;
        let popular = stmt
            .query_map(params![clamp_limit(limit)], |row| {
                Ok(ExerciseCount { name: row.get(0)?, sets: row.get::<_, i64>(1)? as u64 })
            })?
            .filter_map(log_row_error)
            .collect();
        Ok(popular)
    }

    /// Total reps a user has performed of one exercise, optionally only in
    /// workouts dated after `since`.
    ///
    /// # Errors
    /// Returns error if database query fails.
    pub fn sum_reps(&self, clean_name: &str, user_id: i64, since: Option<NaiveDate>) -> Result<u64> {
        let conn = get_conn(&self.pool)?;
        let total: i64 = conn.query_row(
            "SELECT COALESCE(SUM(s.reps), 0) FROM sets s
               JOIN workouts w ON w.id = s.workout_id
               JOIN exercises e ON e.name = s.exercise
               WHERE e.clean_name = ?1 AND w.user_id = ?2 AND (?3 IS NULL OR w.date > ?3)",
            params![clean_name, user_id, since],
            |row| row.get(0),
        )?;
        Ok(total as u64)
    }
}
