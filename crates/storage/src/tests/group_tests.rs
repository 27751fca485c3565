#![expect(clippy::unwrap_used, reason = "test code")]

use stronger_core::GroupInput;
use stronger_core::constants::DEFAULT_GROUP_BACKGROUND_URL;

use super::{create_test_storage, create_test_user};

fn group(name: &str) -> GroupInput {
    GroupInput { name: name.to_owned(), about: "We lift.".to_owned() }
}

#[test]
fn creator_joins_as_approved_admin() {
    let (storage, _temp_dir) = create_test_storage();
    let alice = create_test_user(&storage, "alice");

    let created = storage.create_group(&group("lifters"), Some(alice.id)).unwrap();
    assert_eq!(created.background_url, DEFAULT_GROUP_BACKGROUND_URL);

    let admins = storage.admins("lifters").unwrap();
    assert_eq!(admins.len(), 1);
    assert_eq!(admins[0].username, "alice");
    assert!(admins[0].approved);
    assert_eq!(storage.count_members("lifters").unwrap(), 1);
    assert_eq!(storage.user_counts(alice.id).unwrap().groups, 1);
}

#[test]
fn duplicate_group_name_rejected() {
    let (storage, _temp_dir) = create_test_storage();
    storage.create_group(&group("lifters"), None).unwrap();

    assert!(storage.create_group(&group("lifters"), None).unwrap_err().is_duplicate());
}

#[test]
fn membership_unique_per_user_and_group() {
    let (storage, _temp_dir) = create_test_storage();
    let bob = create_test_user(&storage, "bob");
    storage.create_group(&group("lifters"), None).unwrap();

    storage.add_member(bob.id, "lifters", true, false).unwrap();
    assert!(storage.add_member(bob.id, "lifters", false, false).unwrap_err().is_duplicate());
}

#[test]
fn pending_and_approved_members() {
    let (storage, _temp_dir) = create_test_storage();
    let alice = create_test_user(&storage, "alice");
    let bob = create_test_user(&storage, "bob");
    storage.create_group(&group("lifters"), Some(alice.id)).unwrap();
    let pending = storage.add_member(bob.id, "lifters", false, false).unwrap();

    assert_eq!(storage.pending_members("lifters").unwrap()[0].username, "bob");
    assert_eq!(storage.count_members("lifters").unwrap(), 1);

    storage.set_member_flags(pending.id, true, false).unwrap();
    assert!(storage.pending_members("lifters").unwrap().is_empty());
    assert_eq!(storage.members("lifters").unwrap().len(), 2);
    assert!(storage.membership(bob.id, "lifters").unwrap().unwrap().approved);
}

#[test]
fn renaming_group_carries_members() {
    let (storage, _temp_dir) = create_test_storage();
    let alice = create_test_user(&storage, "alice");
    storage.create_group(&group("lifters"), Some(alice.id)).unwrap();

    let renamed = storage.update_group("lifters", &group("heavy-lifters")).unwrap();
    assert_eq!(renamed.name, "heavy-lifters");
    assert_eq!(storage.members("heavy-lifters").unwrap().len(), 1);
    assert!(storage.get_group("lifters").unwrap_err().is_not_found());
}

#[test]
fn deleting_group_removes_memberships() {
    let (storage, _temp_dir) = create_test_storage();
    let alice = create_test_user(&storage, "alice");
    storage.create_group(&group("lifters"), Some(alice.id)).unwrap();

    assert!(storage.delete_group("lifters").unwrap());
    assert!(storage.list_members(Some(alice.id)).unwrap().is_empty());
    assert!(storage.groups_for_user(alice.id).unwrap().is_empty());
}
