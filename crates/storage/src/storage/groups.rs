use chrono::Utc;
use rusqlite::{OptionalExtension, params};
use stronger_core::constants::DEFAULT_GROUP_BACKGROUND_URL;
use stronger_core::{Group, GroupInput, GroupMember, MemberSummary};

use super::{Storage, get_conn, log_row_error};
use crate::error::{Result, StorageError};

const GROUP_COLUMNS: &str = "g.name, g.about, g.created, g.background_url";
const MEMBER_COLUMNS: &str = "id, user_id, group_name, joined, approved, admin";

fn row_to_group(row: &rusqlite::Row<'_>) -> rusqlite::Result<Group> {
    Ok(Group {
        name: row.get(0)?,
        about: row.get(1)?,
        created: row.get(2)?,
        background_url: row.get(3)?,
    })
}

fn row_to_member(row: &rusqlite::Row<'_>) -> rusqlite::Result<GroupMember> {
    Ok(GroupMember {
        id: row.get(0)?,
        user_id: row.get(1)?,
        group_name: row.get(2)?,
        joined: row.get(3)?,
        approved: row.get(4)?,
        admin: row.get(5)?,
    })
}

fn row_to_summary(row: &rusqlite::Row<'_>) -> rusqlite::Result<MemberSummary> {
    Ok(MemberSummary {
        user_id: row.get(0)?,
        username: row.get(1)?,
        avatar_url: row.get(2)?,
        approved: row.get(3)?,
        admin: row.get(4)?,
    })
}

impl Storage {
    /// Create a group. When `creator` is given they join in the same
    /// transaction as an approved admin.
    ///
    /// # Errors
    /// Returns `Duplicate` if the name is taken.
    pub fn create_group(&self, input: &GroupInput, creator: Option<i64>) -> Result<Group> {
        let mut conn = get_conn(&self.pool)?;
        let tx = conn.transaction()?;
        let now = Utc::now();
        tx.execute(
            "INSERT INTO user_groups (name, about, created, background_url) VALUES (?1, ?2, ?3, ?4)",
            params![input.name, input.about, now, DEFAULT_GROUP_BACKGROUND_URL],
        )?;
        if let Some(user_id) = creator {
            tx.execute(
                "INSERT INTO group_members (user_id, group_name, joined, approved, admin)
                   VALUES (?1, ?2, ?3, 1, 1)",
                params![user_id, input.name, now],
            )?;
        }
        tx.commit()?;
        tracing::info!(group = %input.name, creator = ?creator, "Created group");
        drop(conn);
        self.get_group(&input.name)
    }

    /// # Errors
    /// Returns `NotFound` if no group has this name.
    pub fn get_group(&self, name: &str) -> Result<Group> {
        let conn = get_conn(&self.pool)?;
        let sql = format!("SELECT {GROUP_COLUMNS} FROM user_groups g WHERE g.name = ?1");
        conn.query_row(&sql, params![name], row_to_group)
            .map_err(|e| StorageError::from(e).for_entity("group", name))
    }

    /// # Errors
    /// Returns error if database query fails.
    pub fn list_groups(&self) -> Result<Vec<Group>> {
        let conn = get_conn(&self.pool)?;
        let sql = format!("SELECT {GROUP_COLUMNS} FROM user_groups g ORDER BY g.name");
        let mut stmt = conn.prepare(&sql)?;
        let groups = stmt.query_map([], row_to_group)?.filter_map(log_row_error).collect();
        Ok(groups)
    }

    /// Groups the user belongs to, approved or not.
    ///
    /// # Errors
    /// Returns error if database query fails.
    pub fn groups_for_user(&self, user_id: i64) -> Result<Vec<Group>> {
        let conn = get_conn(&self.pool)?;
        let sql = format!(
            "SELECT {GROUP_COLUMNS} FROM user_groups g
               JOIN group_members m ON m.group_name = g.name
               WHERE m.user_id = ?1 ORDER BY g.name"
        );
        let mut stmt = conn.prepare(&sql)?;
        let groups = stmt.query_map(params![user_id], row_to_group)?.filter_map(log_row_error).collect();
        Ok(groups)
    }

    /// Rename or re-describe a group. Memberships follow a rename through
    /// `ON UPDATE CASCADE`.
    ///
    /// # Errors
    /// Returns `NotFound` for an unknown group, `Duplicate` if the new name
    /// is taken.
    pub fn update_group(&self, name: &str, input: &GroupInput) -> Result<Group> {
        let conn = get_conn(&self.pool)?;
        let affected = conn.execute(
            "UPDATE user_groups SET name = ?1, about = ?2 WHERE name = ?3",
            params![input.name, input.about, name],
        )?;
        drop(conn);
        if affected == 0 {
            return Err(StorageError::not_found("group", name));
        }
        self.get_group(&input.name)
    }

    /// # Errors
    /// Returns error if database delete fails.
    pub fn delete_group(&self, name: &str) -> Result<bool> {
        let conn = get_conn(&self.pool)?;
        let affected = conn.execute("DELETE FROM user_groups WHERE name = ?1", params![name])?;
        Ok(affected > 0)
    }

    /// # Errors
    /// Returns `Duplicate` if the user is already a member, `InvalidReference`
    /// for an unknown user or group.
    pub fn add_member(
        &self,
        user_id: i64,
        group_name: &str,
        approved: bool,
        admin: bool,
    ) -> Result<GroupMember> {
        let conn = get_conn(&self.pool)?;
        conn.execute(
            "INSERT INTO group_members (user_id, group_name, joined, approved, admin)
               VALUES (?1, ?2, ?3, ?4, ?5)",
            params![user_id, group_name, Utc::now(), approved, admin],
        )?;
        let id = conn.last_insert_rowid();
        tracing::debug!(user_id, group = group_name, approved, "Added group member");
        drop(conn);
        self.get_member(id)
    }

    /// # Errors
    /// Returns `NotFound` if no membership has this id.
    pub fn get_member(&self, id: i64) -> Result<GroupMember> {
        let conn = get_conn(&self.pool)?;
        let sql = format!("SELECT {MEMBER_COLUMNS} FROM group_members WHERE id = ?1");
        conn.query_row(&sql, params![id], row_to_member)
            .map_err(|e| StorageError::from(e).for_entity("group member", id))
    }

    /// The membership of `user_id` in `group_name`, if any.
    ///
    /// # Errors
    /// Returns error if database query fails.
    pub fn membership(&self, user_id: i64, group_name: &str) -> Result<Option<GroupMember>> {
        let conn = get_conn(&self.pool)?;
        let sql = format!(
            "SELECT {MEMBER_COLUMNS} FROM group_members WHERE user_id = ?1 AND group_name = ?2"
        );
        Ok(conn.query_row(&sql, params![user_id, group_name], row_to_member).optional()?)
    }

    /// Membership rows, optionally only those of one user.
    ///
    /// # Errors
    /// Returns error if database query fails.
    pub fn list_members(&self, user_id: Option<i64>) -> Result<Vec<GroupMember>> {
        let conn = get_conn(&self.pool)?;
        let sql = format!(
            "SELECT {MEMBER_COLUMNS} FROM group_members WHERE (?1 IS NULL OR user_id = ?1) ORDER BY id"
        );
        let mut stmt = conn.prepare(&sql)?;
        let members = stmt.query_map(params![user_id], row_to_member)?.filter_map(log_row_error).collect();
        Ok(members)
    }

    /// # Errors
    /// Returns `NotFound` if no membership has this id.
    pub fn set_member_flags(&self, id: i64, approved: bool, admin: bool) -> Result<GroupMember> {
        let conn = get_conn(&self.pool)?;
        let affected = conn.execute(
            "UPDATE group_members SET approved = ?1, admin = ?2 WHERE id = ?3",
            params![approved, admin, id],
        )?;
        drop(conn);
        if affected == 0 {
            return Err(StorageError::not_found("group member", id));
        }
        self.get_member(id)
    }

    /// # Errors
    /// Returns error if database delete fails.
    pub fn delete_member(&self, id: i64) -> Result<bool> {
        let conn = get_conn(&self.pool)?;
        let affected = conn.execute("DELETE FROM group_members WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }

    fn member_summaries(&self, group_name: &str, filter: &str) -> Result<Vec<MemberSummary>> {
        let conn = get_conn(&self.pool)?;
        let sql = format!(
            "SELECT u.id, u.username, u.avatar_url, m.approved, m.admin
               FROM group_members m JOIN users u ON u.id = m.user_id
               WHERE m.group_name = ?1 AND {filter} ORDER BY m.joined, u.username"
        );
        let mut stmt = conn.prepare(&sql)?;
        let members =
            stmt.query_map(params![group_name], row_to_summary)?.filter_map(log_row_error).collect();
        Ok(members)
    }

    /// Approved members of a group.
    ///
    /// # Errors
    /// Returns error if database query fails.
    pub fn members(&self, group_name: &str) -> Result<Vec<MemberSummary>> {
        self.member_summaries(group_name, "m.approved = 1")
    }

    /// Members awaiting approval.
    ///
    /// # Errors
    /// Returns error if database query fails.
    pub fn pending_members(&self, group_name: &str) -> Result<Vec<MemberSummary>> {
        self.member_summaries(group_name, "m.approved = 0")
    }

    /// # Errors
    /// Returns error if database query fails.
    pub fn admins(&self, group_name: &str) -> Result<Vec<MemberSummary>> {
        self.member_summaries(group_name, "m.admin = 1")
    }

    /// Number of approved members.
    ///
    /// # Errors
    /// Returns error if database query fails.
    pub fn count_members(&self, group_name: &str) -> Result<u64> {
        let conn = get_conn(&self.pool)?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM group_members WHERE group_name = ?1 AND approved = 1",
            params![group_name],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}
