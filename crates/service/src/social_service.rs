use chrono::NaiveDate;
use stronger_core::{
    Activity, DailyNutrition, Friend, Group, GroupInput, GroupMember, MemberSummary, User,
    ValidationErrors, Workout,
};
use stronger_storage::{Storage, StorageError};

use crate::blocking::{blocking, delegate};
use crate::ensure_owner;
use crate::error::{Result, ServiceError};

/// A group with its member lists, as shown on the group page.
#[derive(Debug, Clone)]
pub struct GroupDetail {
    pub group: Group,
    pub members: Vec<MemberSummary>,
    pub pending: Vec<MemberSummary>,
    pub admins: Vec<MemberSummary>,
}

/// Meals and workouts of one user on one date.
#[derive(Debug, Clone)]
pub struct UserDay {
    pub user: User,
    pub date: NaiveDate,
    pub meals: Vec<DailyNutrition>,
    pub workouts: Vec<Workout>,
}

#[derive(Clone)]
pub struct SocialService {
    storage: Storage,
}

impl SocialService {
    #[must_use]
    pub const fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Follow another user. Following twice or following yourself is a
    /// field error on `friend`.
    pub async fn follow(&self, user_id: i64, friend_id: i64) -> Result<Friend> {
        if user_id == friend_id {
            return Err(ValidationErrors::single("friend", "You cannot follow yourself.").into());
        }
        let storage = self.storage.clone();
        blocking(move || {
            storage.follow(user_id, friend_id).map_err(|e| match e {
                StorageError::InvalidReference(_) => {
                    ServiceError::Validation(ValidationErrors::single("friend", "No such user."))
                },
                other => ServiceError::from(other)
                    .duplicate_as_field("friend", "You already follow this user."),
            })
        })
        .await
    }

    pub async fn unfollow(&self, user_id: i64, friend_id: i64) -> Result<bool> {
        delegate!(self, unfollow, @val user_id, @val friend_id)
    }

    pub async fn get_friend(&self, id: i64) -> Result<Friend> {
        delegate!(self, get_friend, @val id)
    }

    pub async fn delete_friend(&self, actor_id: i64, id: i64) -> Result<bool> {
        let edge = self.get_friend(id).await?;
        ensure_owner(actor_id, edge.user_id, "friendship")?;
        delegate!(self, delete_friend, @val id)
    }

    pub async fn list_friends(&self, user_id: Option<i64>) -> Result<Vec<Friend>> {
        delegate!(self, list_friends, @val user_id)
    }

    pub async fn friendship(&self, user_id: i64, friend_id: i64) -> Result<Option<Friend>> {
        delegate!(self, friendship, @val user_id, @val friend_id)
    }

    pub async fn followers(&self, user_id: i64) -> Result<Vec<User>> {
        delegate!(self, followers, @val user_id)
    }

    pub async fn following(&self, user_id: i64) -> Result<Vec<User>> {
        delegate!(self, following, @val user_id)
    }

    /// Create a group; the creator joins as an approved admin.
    pub async fn create_group(&self, creator_id: i64, input: &GroupInput) -> Result<Group> {
        let errors = input.validate();
        if !errors.is_empty() {
            return Err(errors.into());
        }
        let storage = self.storage.clone();
        let input = input.clone();
        blocking(move || {
            storage.create_group(&input, Some(creator_id)).map_err(|e| {
                ServiceError::from(e).duplicate_as_field("name", "Group with this Name already exists.")
            })
        })
        .await
    }

    /// Update a group. Only its admins may do this.
    pub async fn edit_group(&self, actor_id: i64, name: &str, input: &GroupInput) -> Result<Group> {
        let errors = input.validate();
        if !errors.is_empty() {
            return Err(errors.into());
        }
        self.ensure_admin(actor_id, name).await?;
        let storage = self.storage.clone();
        let name = name.to_owned();
        let input = input.clone();
        blocking(move || {
            storage.update_group(&name, &input).map_err(|e| {
                ServiceError::from(e).duplicate_as_field("name", "Group with this Name already exists.")
            })
        })
        .await
    }

    pub async fn delete_group(&self, actor_id: i64, name: &str) -> Result<bool> {
        self.ensure_admin(actor_id, name).await?;
        delegate!(self, delete_group, @str name)
    }

    async fn ensure_admin(&self, actor_id: i64, name: &str) -> Result<()> {
        let membership = delegate!(self, membership, @val actor_id, @str name)?;
        if membership.is_some_and(|m| m.admin) {
            Ok(())
        } else {
            Err(ServiceError::Forbidden(format!("not an admin of group '{name}'")))
        }
    }

    pub async fn get_group(&self, name: &str) -> Result<Group> {
        delegate!(self, get_group, @str name)
    }

    pub async fn list_groups(&self) -> Result<Vec<Group>> {
        delegate!(self, list_groups)
    }

    pub async fn groups_for_user(&self, user_id: i64) -> Result<Vec<Group>> {
        delegate!(self, groups_for_user, @val user_id)
    }

    pub async fn group_detail(&self, name: &str) -> Result<GroupDetail> {
        let storage = self.storage.clone();
        let name = name.to_owned();
        blocking(move || {
            Ok::<_, StorageError>(GroupDetail {
                group: storage.get_group(&name)?,
                members: storage.members(&name)?,
                pending: storage.pending_members(&name)?,
                admins: storage.admins(&name)?,
            })
        })
        .await
    }

    /// Join a group. Joins are approved immediately and never grant admin.
    pub async fn join_group(&self, user_id: i64, name: &str) -> Result<GroupMember> {
        let storage = self.storage.clone();
        let name = name.to_owned();
        blocking(move || {
            storage.get_group(&name)?;
            storage.add_member(user_id, &name, true, false).map_err(|e| {
                ServiceError::from(e).duplicate_as_field("group", "You are already a member of this group.")
            })
        })
        .await
    }

    pub async fn get_member(&self, id: i64) -> Result<GroupMember> {
        delegate!(self, get_member, @val id)
    }

    pub async fn list_members(&self, user_id: Option<i64>) -> Result<Vec<GroupMember>> {
        delegate!(self, list_members, @val user_id)
    }

    /// Leave a group, or remove someone else as a group admin.
    pub async fn delete_member(&self, actor_id: i64, id: i64) -> Result<bool> {
        let member = self.get_member(id).await?;
        if member.user_id != actor_id {
            self.ensure_admin(actor_id, &member.group_name).await?;
        }
        delegate!(self, delete_member, @val id)
    }

    /// Set the approval and admin flags of a membership. Admins only.
    pub async fn update_member(
        &self,
        actor_id: i64,
        id: i64,
        approved: bool,
        admin: bool,
    ) -> Result<GroupMember> {
        let member = self.get_member(id).await?;
        self.ensure_admin(actor_id, &member.group_name).await?;
        delegate!(self, set_member_flags, @val id, @val approved, @val admin)
    }

    pub async fn count_members(&self, name: &str) -> Result<u64> {
        delegate!(self, count_members, @str name)
    }

    /// Site-wide or single-user newsfeed.
    pub async fn activity_feed(&self, user_id: Option<i64>, limit: usize) -> Result<Vec<Activity>> {
        delegate!(self, recent_activity, @val user_id, @val limit)
    }

    pub async fn user_day(&self, username: &str, date: NaiveDate) -> Result<UserDay> {
        let storage = self.storage.clone();
        let username = username.to_owned();
        blocking(move || {
            let user = storage.get_user_by_username(&username)?;
            let meals = storage.nutrition_on(user.id, date)?;
            let workouts = storage.workouts_on(user.id, date)?;
            Ok::<_, StorageError>(UserDay { user, date, meals, workouts })
        })
        .await
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "test code")]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn setup() -> (SocialService, TempDir) {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(&dir.path().join("test.db")).unwrap();
        storage.create_user("alice", "a@example.com", "x").unwrap();
        storage.create_user("bob", "b@example.com", "x").unwrap();
        (SocialService::new(storage), dir)
    }

    fn group(name: &str) -> GroupInput {
        GroupInput { name: name.to_owned(), about: String::new() }
    }

    #[tokio::test]
    async fn follow_errors_are_field_errors() {
        let (social, _dir) = setup();
        social.follow(1, 2).await.unwrap();

        for (user, friend) in [(1, 2), (1, 1), (1, 99)] {
            let err = social.follow(user, friend).await.unwrap_err();
            let ServiceError::Validation(errors) = err else { panic!("expected validation error") };
            assert!(errors.for_field("friend").is_some());
        }
    }

    #[tokio::test]
    async fn only_admins_edit_groups() {
        let (social, _dir) = setup();
        social.create_group(1, &group("lifters")).await.unwrap();
        social.join_group(2, "lifters").await.unwrap();

        let err = social.edit_group(2, "lifters", &group("lifters2")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
        let renamed = social.edit_group(1, "lifters", &group("lifters2")).await.unwrap();
        assert_eq!(renamed.name, "lifters2");

        let detail = social.group_detail("lifters2").await.unwrap();
        assert_eq!(detail.members.len(), 2);
        assert_eq!(detail.admins.len(), 1);

        let bob = social.list_members(Some(2)).await.unwrap().remove(0);
        let err = social.update_member(2, bob.id, true, true).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
        let promoted = social.update_member(1, bob.id, true, true).await.unwrap();
        assert!(promoted.admin);
    }

    #[tokio::test]
    async fn joining_twice_is_field_error() {
        let (social, _dir) = setup();
        social.create_group(1, &group("lifters")).await.unwrap();
        social.join_group(2, "lifters").await.unwrap();

        let err = social.join_group(2, "lifters").await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert!(social.join_group(2, "nope").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn user_day_for_unknown_user_is_not_found() {
        let (social, _dir) = setup();
        let date = NaiveDate::from_ymd_opt(2015, 3, 1).unwrap();

        assert!(social.user_day("ghost", date).await.unwrap_err().is_not_found());
        let day = social.user_day("alice", date).await.unwrap();
        assert!(day.meals.is_empty() && day.workouts.is_empty());
    }
}
