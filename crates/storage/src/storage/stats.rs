use rusqlite::params;
use stronger_core::{Activity, BodyWeight, DailyNutrition, Workout, build_feed};

use super::bodyweight::row_to_bodyweight;
use super::nutrition::row_to_nutrition;
use super::workouts::row_to_workout;
use super::{PooledConn, Storage, clamp_limit, get_conn, log_row_error};
use crate::error::Result;
use crate::types::SiteStats;

/// Newest rows of `table` paired with the owner's username, optionally for
/// one user. The username is selected right after `columns`, at `username_idx`.
fn recent_with_username<T>(
    conn: &PooledConn,
    table: &str,
    columns: &str,
    username_idx: usize,
    user_id: Option<i64>,
    limit: i64,
    map: fn(&rusqlite::Row<'_>) -> rusqlite::Result<T>,
) -> Result<Vec<(T, String)>> {
    let sql = format!(
        "SELECT {columns}, u.username FROM {table} x JOIN users u ON u.id = x.user_id
           WHERE (?1 IS NULL OR x.user_id = ?1)
           ORDER BY x.date DESC, x.id DESC LIMIT ?2"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![user_id, limit], |row| Ok((map(row)?, row.get(username_idx)?)))?
        .filter_map(log_row_error)
        .collect();
    Ok(rows)
}

impl Storage {
    /// Row counts for the CLI `stats` command and the about page.
    ///
    /// # Errors
    /// Returns error if database query fails.
    pub fn site_stats(&self) -> Result<SiteStats> {
        let conn = get_conn(&self.pool)?;
        let count = |table: &str| -> Result<u64> {
            let n: i64 =
                conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
            Ok(n as u64)
        };
        Ok(SiteStats {
            users: count("users")?,
            workouts: count("workouts")?,
            sets: count("sets")?,
            exercises: count("exercises")?,
            nutrition_records: count("daily_nutrition")?,
            bodyweights: count("bodyweights")?,
            groups: count("user_groups")?,
        })
    }

    /// The newest workouts, nutrition records and weigh-ins merged into one
    /// feed, site-wide or for a single user.
    ///
    /// # Errors
    /// Returns error if database query fails.
    pub fn recent_activity(&self, user_id: Option<i64>, limit: usize) -> Result<Vec<Activity>> {
        let conn = get_conn(&self.pool)?;
        let n = clamp_limit(limit);
        let workouts: Vec<(Workout, String)> = recent_with_username(
            &conn,
            "workouts",
            "x.id, x.user_id, x.date, x.description, x.comments",
            5,
            user_id,
            n,
            row_to_workout,
        )?;
        let nutrition: Vec<(DailyNutrition, String)> = recent_with_username(
            &conn,
            "daily_nutrition",
            "x.id, x.user_id, x.date, x.calories, x.protein, x.carbs, x.fats, x.created_on",
            8,
            user_id,
            n,
            row_to_nutrition,
        )?;
        let bodyweights: Vec<(BodyWeight, String)> = recent_with_username(
            &conn,
            "bodyweights",
            "x.id, x.user_id, x.date, x.weight",
            4,
            user_id,
            n,
            row_to_bodyweight,
        )?;
        Ok(build_feed(&workouts, &nutrition, &bodyweights, limit))
    }
}
