#![expect(clippy::unwrap_used, reason = "test code")]

use stronger_core::{ExerciseInput, Muscle, SetInput, WorkoutInput};

use super::{create_test_storage, create_test_user, date, record_workout, seed_exercises};
use crate::{SetFilter, StorageError};

#[test]
fn create_workout_with_sets() {
    let (storage, _temp_dir) = create_test_storage();
    seed_exercises(&storage);
    let user = create_test_user(&storage, "alice");

    let created = record_workout(
        &storage,
        user.id,
        date(2015, 3, 1),
        &[("Squat", 100.0, 5), ("Squat", 90.0, 8), ("Bench", 60.0, 12)],
    );

    let fetched = storage.get_workout_with_sets(created.workout.id).unwrap();
    assert_eq!(fetched, created);
    assert_eq!(fetched.sets.len(), 3);
    assert_eq!(fetched.sets[2].exercise, "Bench");
}

#[test]
fn unknown_exercise_rolls_back() {
    let (storage, _temp_dir) = create_test_storage();
    seed_exercises(&storage);
    let user = create_test_user(&storage, "alice");

    let input = WorkoutInput { date: date(2015, 3, 1), description: String::new(), comments: String::new() };
    let sets = vec![
        SetInput { exercise: "Squat".to_owned(), weight: 100.0, reps: 5 },
        SetInput { exercise: "Zercher".to_owned(), weight: 80.0, reps: 5 },
    ];
    let err = storage.create_workout(user.id, &input, &sets).unwrap_err();

    assert!(matches!(err, StorageError::InvalidReference(_)));
    assert_eq!(storage.count_workouts(None).unwrap(), 0);
}

#[test]
fn deleting_workout_cascades_sets() {
    let (storage, _temp_dir) = create_test_storage();
    seed_exercises(&storage);
    let user = create_test_user(&storage, "alice");
    let created = record_workout(&storage, user.id, date(2015, 3, 1), &[("Squat", 100.0, 5)]);

    assert!(storage.delete_workout(created.workout.id).unwrap());
    assert!(storage.workout_sets(created.workout.id).unwrap().is_empty());
    assert!(!storage.delete_workout(created.workout.id).unwrap());
}

#[test]
fn update_workout_changes_header() {
    let (storage, _temp_dir) = create_test_storage();
    seed_exercises(&storage);
    let user = create_test_user(&storage, "alice");
    let created = record_workout(&storage, user.id, date(2015, 3, 1), &[("Squat", 100.0, 5)]);

    let input = WorkoutInput {
        date: date(2015, 3, 2),
        description: "Leg day".to_owned(),
        comments: "Felt strong".to_owned(),
    };
    let updated = storage.update_workout(created.workout.id, &input).unwrap();
    assert_eq!(updated.date, date(2015, 3, 2));
    assert_eq!(updated.description, "Leg day");
    assert!(storage.update_workout(9999, &input).unwrap_err().is_not_found());
}

#[test]
fn exercise_clean_name_and_rename_cascade() {
    let (storage, _temp_dir) = create_test_storage();
    let user = create_test_user(&storage, "alice");
    let input = ExerciseInput {
        name: "Front Squat".to_owned(),
        primary: Muscle::Quads,
        secondary: Muscle::Abs,
    };
    let exercise = storage.create_exercise(&input, Some(user.id)).unwrap();
    assert_eq!(exercise.clean_name, "frontsquat");
    assert_eq!(exercise.added_by, Some(user.id));
    record_workout(&storage, user.id, date(2015, 3, 1), &[("Front Squat", 80.0, 5)]);

    let renamed = ExerciseInput { name: "Front Squats".to_owned(), ..input };
    let updated = storage.update_exercise("frontsquat", &renamed).unwrap();

    assert_eq!(updated.clean_name, "frontsquats");
    let sets = storage.set_details(&SetFilter::exercise("frontsquats")).unwrap();
    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0].exercise, "Front Squats");
}

#[test]
fn duplicate_exercise_rejected() {
    let (storage, _temp_dir) = create_test_storage();
    seed_exercises(&storage);
    let input = ExerciseInput { name: "Squat".to_owned(), primary: Muscle::Quads, secondary: Muscle::Glutes };

    assert!(storage.create_exercise(&input, None).unwrap_err().is_duplicate());
}

#[test]
fn set_details_filters() {
    let (storage, _temp_dir) = create_test_storage();
    seed_exercises(&storage);
    let alice = create_test_user(&storage, "alice");
    let bob = create_test_user(&storage, "bob");
    record_workout(&storage, alice.id, date(2015, 3, 1), &[("Squat", 100.0, 5), ("Bench", 60.0, 5)]);
    record_workout(&storage, alice.id, date(2015, 3, 8), &[("Squat", 105.0, 3)]);
    record_workout(&storage, bob.id, date(2015, 3, 2), &[("Squat", 140.0, 5)]);

    let alice_squats = storage.set_details(&SetFilter::exercise("squat").for_user(alice.id)).unwrap();
    assert_eq!(alice_squats.len(), 2);
    assert!(alice_squats.iter().all(|s| s.username == "alice" && s.primary == Muscle::Quads));

    let fives = storage
        .set_details(&SetFilter { reps: Some(5), ..SetFilter::exercise("squat") })
        .unwrap();
    assert_eq!(fives.len(), 2);

    let windowed = storage
        .set_details(&SetFilter { since: Some(date(2015, 3, 2)), ..SetFilter::default() })
        .unwrap();
    assert_eq!(windowed.len(), 2);

    let nobody = storage
        .set_details(&SetFilter { user_ids: Some(Vec::new()), ..SetFilter::default() })
        .unwrap();
    assert!(nobody.is_empty());
}

#[test]
fn workout_aggregates() {
    let (storage, _temp_dir) = create_test_storage();
    seed_exercises(&storage);
    let alice = create_test_user(&storage, "alice");
    let bob = create_test_user(&storage, "bob");
    let carol = create_test_user(&storage, "carol");
    record_workout(&storage, alice.id, date(2015, 3, 1), &[("Squat", 100.0, 5)]);
    record_workout(&storage, alice.id, date(2015, 3, 3), &[("Bench", 60.0, 10)]);
    record_workout(&storage, bob.id, date(2015, 3, 2), &[("Squat", 140.0, 5)]);
    record_workout(&storage, carol.id, date(2015, 3, 2), &[("Squat", 120.0, 5)]);

    let frequent = storage.most_frequent_workout_users(10).unwrap();
    let names: Vec<&str> = frequent.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, ["alice", "bob", "carol"]);
    assert_eq!(frequent[0].count, 2);

    let popular = storage.most_popular_exercises(5).unwrap();
    assert_eq!(popular[0].name, "Squat");
    assert_eq!(popular[0].sets, 3);

    assert_eq!(storage.sum_reps("squat", alice.id, None).unwrap(), 5);
    assert_eq!(storage.sum_reps("bench", alice.id, Some(date(2015, 3, 3))).unwrap(), 0);
    assert_eq!(storage.workout_dates(Some(alice.id)).unwrap().len(), 2);

    let including = storage.workouts_including_exercise("squat", None).unwrap();
    let dates: Vec<_> = including.iter().map(|w| w.date).collect();
    assert_eq!(dates, [date(2015, 3, 1), date(2015, 3, 2), date(2015, 3, 2)]);
}

#[test]
fn zero_reps_violates_check() {
    let (storage, _temp_dir) = create_test_storage();
    seed_exercises(&storage);
    let user = create_test_user(&storage, "alice");
    let input = WorkoutInput { date: date(2015, 3, 1), description: String::new(), comments: String::new() };
    let sets = vec![SetInput { exercise: "Squat".to_owned(), weight: 100.0, reps: 0 }];

    let err = storage.create_workout(user.id, &input, &sets).unwrap_err();
    assert!(matches!(err, StorageError::Constraint(_)));
}
