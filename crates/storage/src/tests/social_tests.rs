#![expect(clippy::unwrap_used, reason = "test code")]

use super::{create_test_storage, create_test_user};
use crate::StorageError;

#[test]
fn follow_and_unfollow() {
    let (storage, _temp_dir) = create_test_storage();
    let alice = create_test_user(&storage, "alice");
    let bob = create_test_user(&storage, "bob");

    let edge = storage.follow(alice.id, bob.id).unwrap();
    assert_eq!(edge.user_id, alice.id);
    assert_eq!(edge.friend_id, bob.id);
    assert!(storage.friendship(alice.id, bob.id).unwrap().is_some());
    assert!(storage.friendship(bob.id, alice.id).unwrap().is_none());

    let followers: Vec<String> =
        storage.followers(bob.id).unwrap().into_iter().map(|u| u.username).collect();
    assert_eq!(followers, ["alice"]);
    let following: Vec<String> =
        storage.following(alice.id).unwrap().into_iter().map(|u| u.username).collect();
    assert_eq!(following, ["bob"]);
    assert_eq!(storage.following_ids(alice.id).unwrap(), [bob.id]);

    assert!(storage.unfollow(alice.id, bob.id).unwrap());
    assert!(storage.followers(bob.id).unwrap().is_empty());
}

#[test]
fn follow_twice_is_duplicate() {
    let (storage, _temp_dir) = create_test_storage();
    let alice = create_test_user(&storage, "alice");
    let bob = create_test_user(&storage, "bob");
    storage.follow(alice.id, bob.id).unwrap();

    assert!(storage.follow(alice.id, bob.id).unwrap_err().is_duplicate());
}

#[test]
fn cannot_follow_self() {
    let (storage, _temp_dir) = create_test_storage();
    let alice = create_test_user(&storage, "alice");

    let err = storage.follow(alice.id, alice.id).unwrap_err();
    assert!(matches!(err, StorageError::Constraint(_)));
}

#[test]
fn follow_unknown_user_is_invalid_reference() {
    let (storage, _temp_dir) = create_test_storage();
    let alice = create_test_user(&storage, "alice");

    let err = storage.follow(alice.id, 999).unwrap_err();
    assert!(matches!(err, StorageError::InvalidReference(_)));
}

#[test]
fn profile_counts() {
    let (storage, _temp_dir) = create_test_storage();
    let alice = create_test_user(&storage, "alice");
    let bob = create_test_user(&storage, "bob");
    let carol = create_test_user(&storage, "carol");
    storage.follow(alice.id, bob.id).unwrap();
    storage.follow(alice.id, carol.id).unwrap();
    storage.follow(bob.id, alice.id).unwrap();

    let counts = storage.user_counts(alice.id).unwrap();
    assert_eq!(counts.following, 2);
    assert_eq!(counts.followers, 1);
    assert_eq!(counts.workouts, 0);

    assert_eq!(storage.list_friends(Some(alice.id)).unwrap().len(), 2);
    assert_eq!(storage.list_friends(None).unwrap().len(), 3);
}
