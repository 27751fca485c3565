#![expect(clippy::unwrap_used, reason = "test code")]

use stronger_core::constants::DEFAULT_AVATAR_URL;
use stronger_core::{ProfileUpdate, TrainingGoal};

use super::{create_test_storage, create_test_user, date, record_workout, seed_exercises};
use crate::StorageError;

#[test]
fn create_and_get_user() {
    let (storage, _temp_dir) = create_test_storage();
    let user = create_test_user(&storage, "alice");

    assert_eq!(user.avatar_url, DEFAULT_AVATAR_URL);
    assert_eq!(user.goal, None);
    let by_name = storage.get_user_by_username("alice").unwrap();
    assert_eq!(by_name, user);
}

#[test]
fn duplicate_username_rejected() {
    let (storage, _temp_dir) = create_test_storage();
    create_test_user(&storage, "alice");

    let err = storage.create_user("alice", "other@example.com", "hash").unwrap_err();
    assert!(err.is_duplicate());
}

#[test]
fn unknown_user_is_not_found() {
    let (storage, _temp_dir) = create_test_storage();
    let err = storage.get_user_by_username("ghost").unwrap_err();
    assert!(matches!(err, StorageError::NotFound { entity: "user", .. }));
}

#[test]
fn credentials_return_hash() {
    let (storage, _temp_dir) = create_test_storage();
    let user = create_test_user(&storage, "alice");

    let (id, hash) = storage.get_credentials("alice").unwrap().unwrap();
    assert_eq!(id, user.id);
    assert_eq!(hash, "hash");
    assert!(storage.get_credentials("bob").unwrap().is_none());
}

#[test]
fn profile_update_keeps_avatar_when_blank() {
    let (storage, _temp_dir) = create_test_storage();
    let user = create_test_user(&storage, "alice");

    let update = ProfileUpdate {
        avatar_url: String::new(),
        gym: "Iron Temple".to_owned(),
        goal: Some(TrainingGoal::Powerlifting),
        about: "Lifts heavy".to_owned(),
        height: Some(180),
    };
    let updated = storage.update_profile(user.id, &update).unwrap();

    assert_eq!(updated.avatar_url, DEFAULT_AVATAR_URL);
    assert_eq!(updated.gym, "Iron Temple");
    assert_eq!(updated.goal, Some(TrainingGoal::Powerlifting));
    assert_eq!(updated.height, Some(180));
}

#[test]
fn api_token_is_stable_per_user() {
    let (storage, _temp_dir) = create_test_storage();
    let user = create_test_user(&storage, "alice");

    let token = storage.get_or_create_api_token(user.id).unwrap();
    assert_eq!(storage.get_or_create_api_token(user.id).unwrap(), token);
    assert_eq!(storage.user_for_token(&token).unwrap().unwrap().id, user.id);
    assert!(storage.user_for_token("nope").unwrap().is_none());
}

#[test]
fn web_session_lifecycle() {
    let (storage, _temp_dir) = create_test_storage();
    let user = create_test_user(&storage, "alice");

    let session = storage.create_web_session(user.id).unwrap();
    assert_eq!(storage.user_for_session(&session).unwrap().unwrap().username, "alice");
    assert!(storage.delete_web_session(&session).unwrap());
    assert!(storage.user_for_session(&session).unwrap().is_none());
}

#[test]
fn deleting_user_cascades() {
    let (storage, _temp_dir) = create_test_storage();
    seed_exercises(&storage);
    let user = create_test_user(&storage, "alice");
    let workout = record_workout(&storage, user.id, date(2015, 3, 1), &[("Squat", 100.0, 5)]);

    assert!(storage.delete_user(user.id).unwrap());

    assert!(storage.get_workout(workout.workout.id).unwrap_err().is_not_found());
    assert_eq!(storage.count_workouts(None).unwrap(), 0);
    assert_eq!(storage.site_stats().unwrap().sets, 0);
}

#[test]
fn newest_users_first() {
    let (storage, _temp_dir) = create_test_storage();
    create_test_user(&storage, "alice");
    create_test_user(&storage, "bob");

    let newest = storage.newest_users(1).unwrap();
    assert_eq!(newest.len(), 1);
    assert_eq!(newest[0].username, "bob");
}
