use rusqlite::params;
use stronger_core::{Goal, GoalInput};

use super::{Storage, get_conn, log_row_error};
use crate::error::{Result, StorageError};

const GOAL_COLUMNS: &str = "id, user_id, exercise, weight, reps, objective_date, completed_date";

fn row_to_goal(row: &rusqlite::Row<'_>) -> rusqlite::Result<Goal> {
    Ok(Goal {
        id: row.get(0)?,
        user_id: row.get(1)?,
        exercise: row.get(2)?,
        weight: row.get(3)?,
        reps: row.get(4)?,
        objective_date: row.get(5)?,
        completed_date: row.get(6)?,
    })
}

impl Storage {
    /// # Errors
    /// Returns `InvalidReference` if the exercise does not exist.
    pub fn create_goal(&self, user_id: i64, input: &GoalInput) -> Result<Goal> {
        let conn = get_conn(&self.pool)?;
        conn.execute(
            "INSERT INTO goals (user_id, exercise, weight, reps, objective_date, completed_date)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                user_id,
                input.exercise,
                input.weight,
                input.reps,
                input.objective_date,
                input.completed_date,
            ],
        )?;
        let id = conn.last_insert_rowid();
        drop(conn);
        self.get_goal(id)
    }

    /// # Errors
    /// Returns `NotFound` if no goal has this id.
    pub fn get_goal(&self, id: i64) -> Result<Goal> {
        let conn = get_conn(&self.pool)?;
        let sql = format!("SELECT {GOAL_COLUMNS} FROM goals WHERE id = ?1");
        conn.query_row(&sql, params![id], row_to_goal)
            .map_err(|e| StorageError::from(e).for_entity("goal", id))
    }

    /// Goals ordered by objective date, optionally for one user.
    ///
    /// # Errors
    /// Returns error if database query fails.
    pub fn list_goals(&self, user_id: Option<i64>) -> Result<Vec<Goal>> {
        let conn = get_conn(&self.pool)?;
        let sql = format!(
            "SELECT {GOAL_COLUMNS} FROM goals WHERE (?1 IS NULL OR user_id = ?1)
               ORDER BY objective_date, id"
        );
        let mut stmt = conn.prepare(&sql)?;
        let goals = stmt.query_map(params![user_id], row_to_goal)?.filter_map(log_row_error).collect();
        Ok(goals)
    }

    /// # Errors
    /// Returns `NotFound` for an unknown id, `InvalidReference` for an
    /// unknown exercise.
    pub fn update_goal(&self, id: i64, input: &GoalInput) -> Result<Goal> {
        let conn = get_conn(&self.pool)?;
        let affected = conn.execute(
            "UPDATE goals SET exercise = ?1, weight = ?2, reps = ?3, objective_date = ?4,
                 completed_date = ?5 WHERE id = ?6",
            params![
                input.exercise,
                input.weight,
                input.reps,
                input.objective_date,
                input.completed_date,
                id,
            ],
        )?;
        drop(conn);
        if affected == 0 {
            return Err(StorageError::not_found("goal", id));
        }
        self.get_goal(id)
    }

    /// # Errors
    /// Returns error if database delete fails.
    pub fn delete_goal(&self, id: i64) -> Result<bool> {
        let conn = get_conn(&self.pool)?;
        let affected = conn.execute("DELETE FROM goals WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }
}
