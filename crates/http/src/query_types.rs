//! Request/query types (Deserialize)

use serde::Deserialize;
use stronger_core::constants::{DEFAULT_PROGRESSION_REPS, MAX_QUERY_LIMIT};

const fn default_reps() -> u32 {
    DEFAULT_PROGRESSION_REPS
}

/// `?days-back=N` on the chart endpoints. Kept raw so bad values become a
/// field error instead of an extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub struct DaysBackQuery {
    #[serde(rename = "days-back")]
    pub days_back: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RepsQuery {
    #[serde(default = "default_reps")]
    pub reps: u32,
}

/// Search box on the exercises and workouts pages.
#[derive(Debug, Default, Deserialize)]
pub struct NameQuery {
    pub name: Option<String>,
}

/// Search box on the users page.
#[derive(Debug, Default, Deserialize)]
pub struct UsernameQuery {
    pub username: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

/// `?user=<id>` filter and optional `limit` on REST list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub user: Option<i64>,
    pub limit: Option<usize>,
}

impl ListQuery {
    /// Cap limit to prevent unbounded queries. Lists are complete up to the
    /// cap when no limit is given.
    pub fn capped_limit(&self) -> usize {
        self.limit.unwrap_or(MAX_QUERY_LIMIT).min(MAX_QUERY_LIMIT)
    }
}
