use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::validation::{
    ValidationErrors, check_max_len, parse_optional_number, require,
};

static USERNAME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-a-zA-Z0-9]+$").unwrap());

pub const USERNAME_MAX_LEN: usize = 30;
pub const GYM_MAX_LEN: usize = 30;
pub const ABOUT_MAX_LEN: usize = 200;

/// Usernames appear in URLs, so only letters, digits and hyphens are allowed.
#[must_use]
pub fn is_valid_username(username: &str) -> bool {
    username.len() <= USERNAME_MAX_LEN && USERNAME_RE.is_match(username)
}

/// Training focus a user can pick on their profile.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TrainingGoal {
    #[serde(rename = "bb")]
    BodyBuilding,
    #[serde(rename = "pl")]
    Powerlifting,
    #[serde(rename = "ft")]
    Fitness,
    #[serde(rename = "sm")]
    Strongman,
}

impl TrainingGoal {
    pub const ALL: [Self; 4] =
        [Self::BodyBuilding, Self::Powerlifting, Self::Fitness, Self::Strongman];

    #[must_use]
    pub const fn code(&self) -> &'static str {
        match *self {
            Self::BodyBuilding => "bb",
            Self::Powerlifting => "pl",
            Self::Fitness => "ft",
            Self::Strongman => "sm",
        }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match *self {
            Self::BodyBuilding => "Body Building",
            Self::Powerlifting => "Powerlifting",
            Self::Fitness => "Fitness",
            Self::Strongman => "Strongman",
        }
    }
}

impl FromStr for TrainingGoal {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|g| g.code().eq_ignore_ascii_case(s) || g.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| CoreError::invalid("training goal", s))
    }
}

impl fmt::Display for TrainingGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A registered account and its public profile. The password hash never
/// leaves the storage layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub gym: String,
    pub goal: Option<TrainingGoal>,
    pub about: String,
    pub height: Option<u32>,
    pub avatar_url: String,
    pub date_joined: DateTime<Utc>,
}

impl User {
    #[must_use]
    pub fn profile_path(&self) -> String {
        format!("/users/{}/", self.username)
    }
}

/// Signup submission.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl NewUser {
    /// Validate raw signup fields. All three are required.
    pub fn from_fields(
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let username = require("username", username, &mut errors);
        if let Some(ref name) = username {
            if !is_valid_username(name) {
                errors.add(
                    "username",
                    "Usernames may only contain letters, digits and hyphens (max 30).",
                );
            }
        }
        let email = require("email", email, &mut errors);
        if let Some(ref address) = email {
            if !address.contains('@') {
                errors.add("email", "Enter a valid email address.");
            }
        }
        if password.is_empty() {
            errors.add("password", "This field is required.");
        }
        match (username, email) {
            (Some(username), Some(email)) => {
                errors.finish(Self { username, email, password: password.to_owned() })
            },
            _ => Err(errors),
        }
    }
}

/// Editable profile settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub avatar_url: String,
    pub gym: String,
    pub goal: Option<TrainingGoal>,
    pub about: String,
    pub height: Option<u32>,
}

impl ProfileUpdate {
    pub fn from_fields(
        avatar_url: &str,
        gym: &str,
        goal: &str,
        about: &str,
        height: &str,
    ) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let goal = if goal.trim().is_empty() {
            None
        } else if let Ok(g) = goal.trim().parse() {
            Some(g)
        } else {
            errors.add("goals", "Select a valid choice.");
            None
        };
        let height = parse_optional_number("height", height, &mut errors);
        let update = Self {
            avatar_url: avatar_url.trim().to_owned(),
            gym: gym.trim().to_owned(),
            goal,
            about: about.trim().to_owned(),
            height,
        };
        errors.extend(update.validate());
        errors.finish(update)
    }

    /// Length checks shared by the settings form and the REST API.
    #[must_use]
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        check_max_len("gym", &self.gym, GYM_MAX_LEN, &mut errors);
        check_max_len("about", &self.about, ABOUT_MAX_LEN, &mut errors);
        errors
    }
}

/// Profile counters shown on profile and dashboard pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UserCounts {
    pub following: u64,
    pub followers: u64,
    pub groups: u64,
    pub meals: u64,
    pub workouts: u64,
}
