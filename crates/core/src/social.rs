use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::validation::{ValidationErrors, check_max_len, require};

pub const GROUP_NAME_MAX_LEN: usize = 20;
pub const GROUP_ABOUT_MAX_LEN: usize = 500;

static GROUP_NAME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-a-zA-Z0-9]+$").unwrap());

/// Directed follow edge: `user_id` follows `friend_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Friend {
    pub id: i64,
    #[serde(rename = "user")]
    pub user_id: i64,
    #[serde(rename = "friend")]
    pub friend_id: i64,
    pub since: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Group {
    pub name: String,
    pub about: String,
    pub created: DateTime<Utc>,
    pub background_url: String,
}

impl Group {
    #[must_use]
    pub fn path(&self) -> String {
        format!("/groups/{}", self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GroupInput {
    pub name: String,
    #[serde(default)]
    pub about: String,
}

impl GroupInput {
    pub fn from_fields(name: &str, about: &str) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let name = require("name", name, &mut errors);
        let input = Self { name: name.unwrap_or_default(), about: about.trim().to_owned() };
        if !errors.is_empty() {
            return Err(errors);
        }
        errors.extend(input.validate());
        errors.finish(input)
    }

    #[must_use]
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if !GROUP_NAME_RE.is_match(&self.name) {
            errors.add("name", "Group names may only contain letters, digits and hyphens.");
        }
        check_max_len("name", &self.name, GROUP_NAME_MAX_LEN, &mut errors);
        check_max_len("about", &self.about, GROUP_ABOUT_MAX_LEN, &mut errors);
        errors
    }
}

/// Membership of a user in a group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupMember {
    pub id: i64,
    #[serde(rename = "user")]
    pub user_id: i64,
    #[serde(rename = "group")]
    pub group_name: String,
    pub joined: DateTime<Utc>,
    pub approved: bool,
    pub admin: bool,
}

/// A member row joined with the username, for group pages.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MemberSummary {
    pub user_id: i64,
    pub username: String,
    pub avatar_url: String,
    pub approved: bool,
    pub admin: bool,
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "test code")]
mod tests {
    use super::*;

    #[test]
    fn group_name_must_be_url_safe() {
        let errors = GroupInput::from_fields("heavy lifters", "").unwrap_err();
        assert!(errors.for_field("name").is_some());
        assert!(GroupInput::from_fields("heavy-lifters", "We lift.").is_ok());
    }

    #[test]
    fn group_name_length_capped() {
        let errors = GroupInput::from_fields(&"a".repeat(21), "").unwrap_err();
        assert_eq!(
            errors.for_field("name"),
            Some("Ensure this value has at most 20 characters.")
        );
    }

    #[test]
    fn blank_group_name_is_required() {
        let errors = GroupInput::from_fields("  ", "").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.for_field("name"), Some("This field is required."));
    }
}
