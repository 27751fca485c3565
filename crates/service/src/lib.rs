//! Service layer for stronger
//!
//! Centralizes business logic between the HTTP handlers and storage:
//! password hashing, ownership checks, validation messages and the chart
//! assembly that mixes several queries.

#![allow(missing_docs, reason = "Internal crate with self-explanatory API")]
#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]
#![allow(missing_debug_implementations, reason = "Internal types")]
#![allow(clippy::missing_docs_in_private_items, reason = "Internal crate")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]
#![allow(clippy::min_ident_chars, reason = "Short error vars are idiomatic")]

mod account_service;
mod blocking;
pub mod error;
mod exercise_service;
mod nutrition_service;
mod social_service;
mod workout_service;

pub use account_service::{AccountService, AuthSession};
pub use error::{Result, ServiceError};
pub use exercise_service::{ExerciseHistory, ExerciseService};
pub use nutrition_service::{CalorieAverages, NutritionService};
pub use social_service::{GroupDetail, SocialService, UserDay};
pub use workout_service::{AverageWorkoutCount, WorkoutService, WorkoutsSummary};

use stronger_core::{ValidationErrors, env_parse_with_default};
use stronger_storage::Storage;

/// Every service over one shared storage handle.
#[derive(Clone)]
pub struct Services {
    pub accounts: AccountService,
    pub workouts: WorkoutService,
    pub exercises: ExerciseService,
    pub nutrition: NutritionService,
    pub social: SocialService,
}

impl Services {
    /// Build the services, reading the bcrypt cost from
    /// `STRONGER_BCRYPT_COST`.
    #[must_use]
    pub fn new(storage: Storage) -> Self {
        let cost = env_parse_with_default("STRONGER_BCRYPT_COST", bcrypt::DEFAULT_COST);
        Self::with_bcrypt_cost(storage, cost)
    }

    #[must_use]
    pub fn with_bcrypt_cost(storage: Storage, bcrypt_cost: u32) -> Self {
        Self {
            accounts: AccountService::new(storage.clone(), bcrypt_cost),
            workouts: WorkoutService::new(storage.clone()),
            exercises: ExerciseService::new(storage.clone()),
            nutrition: NutritionService::new(storage.clone()),
            social: SocialService::new(storage),
        }
    }
}

/// Reject writes to records owned by someone else.
pub(crate) fn ensure_owner(actor_id: i64, owner_id: i64, what: &str) -> Result<()> {
    if actor_id == owner_id {
        Ok(())
    } else {
        Err(ServiceError::Forbidden(format!("{what} belongs to another user")))
    }
}

/// Parse a `days-back` query value. Missing means `default`; anything else
/// must be a whole number in `1..=max`.
pub fn parse_days_back(raw: Option<&str>, default: i64, max: i64) -> Result<i64> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(default);
    };
    match raw.parse::<i64>() {
        Ok(days) if (1..=max).contains(&days) => Ok(days),
        _ => Err(ValidationErrors::single(
            "days-back",
            format!("Enter a whole number of days between 1 and {max}."),
        )
        .into()),
    }
}
