//! Test utilities and module declarations for storage tests.

use chrono::NaiveDate;
use stronger_core::{ExerciseInput, Muscle, SetInput, User, WorkoutInput, WorkoutWithSets};
use tempfile::TempDir;

use crate::Storage;

#[expect(clippy::unwrap_used, reason = "test code")]
pub fn create_test_storage() -> (Storage, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");
    let storage = Storage::new(&db_path).unwrap();
    (storage, temp_dir)
}

#[expect(clippy::unwrap_used, reason = "test code")]
pub fn create_test_user(storage: &Storage, username: &str) -> User {
    storage.create_user(username, &format!("{username}@example.com"), "hash").unwrap()
}

#[expect(clippy::unwrap_used, reason = "test code")]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Squat, Deadlift and Bench, enough for big-three queries.
#[expect(clippy::unwrap_used, reason = "test code")]
pub fn seed_exercises(storage: &Storage) {
    for (name, primary, secondary) in [
        ("Squat", Muscle::Quads, Muscle::Glutes),
        ("Deadlift", Muscle::Back, Muscle::Hamstrings),
        ("Bench", Muscle::Chest, Muscle::Triceps),
    ] {
        let input = ExerciseInput { name: name.to_owned(), primary, secondary };
        storage.create_exercise(&input, None).unwrap();
    }
}

#[expect(clippy::unwrap_used, reason = "test code")]
pub fn record_workout(
    storage: &Storage,
    user_id: i64,
    on: NaiveDate,
    sets: &[(&str, f64, u32)],
) -> WorkoutWithSets {
    let input = WorkoutInput { date: on, description: String::new(), comments: String::new() };
    let sets: Vec<SetInput> = sets
        .iter()
        .map(|&(exercise, weight, reps)| SetInput { exercise: exercise.to_owned(), weight, reps })
        .collect();
    storage.create_workout(user_id, &input, &sets).unwrap()
}

mod group_tests;
mod nutrition_tests;
mod social_tests;
mod user_tests;
mod workout_tests;

#[test]
#[expect(clippy::unwrap_used, reason = "test code")]
fn migrations_are_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("twice.db");
    let first = Storage::new(&db_path).unwrap();
    create_test_user(&first, "alice");
    drop(first);
    let second = Storage::new(&db_path).unwrap();
    assert_eq!(second.count_users().unwrap(), 1);
}
