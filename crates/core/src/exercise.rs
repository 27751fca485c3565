use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::validation::{ValidationErrors, check_max_len, require};

pub const EXERCISE_NAME_MAX_LEN: usize = 50;

/// Clean names double as URL path segments.
static CLEAN_NAME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-a-z0-9]+$").unwrap());

/// Clean names of the lifts that make up a powerlifting total.
pub const BIG_THREE: [&str; 3] = ["squat", "deadlift", "bench"];

/// Muscle groups an exercise can target.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub enum Muscle {
    Triceps,
    Biceps,
    Back,
    Glutes,
    Hamstrings,
    Calves,
    Quads,
    Abs,
    Forearms,
    Chest,
    Shoulders,
    Traps,
}

impl Muscle {
    pub const ALL: [Self; 12] = [
        Self::Triceps,
        Self::Biceps,
        Self::Back,
        Self::Glutes,
        Self::Hamstrings,
        Self::Calves,
        Self::Quads,
        Self::Abs,
        Self::Forearms,
        Self::Chest,
        Self::Shoulders,
        Self::Traps,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match *self {
            Self::Triceps => "Triceps",
            Self::Biceps => "Biceps",
            Self::Back => "Back",
            Self::Glutes => "Glutes",
            Self::Hamstrings => "Hamstrings",
            Self::Calves => "Calves",
            Self::Quads => "Quads",
            Self::Abs => "Abs",
            Self::Forearms => "Forearms",
            Self::Chest => "Chest",
            Self::Shoulders => "Shoulders",
            Self::Traps => "Traps",
        }
    }
}

impl FromStr for Muscle {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CoreError::invalid("muscle", s))
    }
}

impl fmt::Display for Muscle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// URL slug for an exercise: whitespace removed, lower-cased.
#[must_use]
pub fn clean_exercise_name(name: &str) -> String {
    name.split_whitespace().collect::<String>().to_lowercase()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Exercise {
    pub name: String,
    pub clean_name: String,
    #[serde(rename = "primary_muscle")]
    pub primary: Muscle,
    #[serde(rename = "secondary_muscles")]
    pub secondary: Muscle,
    pub added_by: Option<i64>,
    pub added_at: DateTime<Utc>,
}

impl Exercise {
    #[must_use]
    pub fn path(&self) -> String {
        format!("/exercises/{}", self.clean_name)
    }
}

/// Validated create/edit payload. `clean_name` is always derived from
/// `name`, never accepted from the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseInput {
    pub name: String,
    pub primary: Muscle,
    pub secondary: Muscle,
}

impl ExerciseInput {
    pub fn from_fields(
        name: &str,
        primary: &str,
        secondary: &str,
    ) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let name = require("name", name, &mut errors);
        if let Some(ref n) = name {
            check_max_len("name", n, EXERCISE_NAME_MAX_LEN, &mut errors);
            let clean = clean_exercise_name(n);
            if clean.is_empty() {
                errors.add("name", "This field is required.");
            } else if !CLEAN_NAME_RE.is_match(&clean) {
                errors.add(
                    "name",
                    "Exercise names may only contain letters, numbers, spaces and hyphens.",
                );
            }
        }
        let primary = parse_muscle("primary", primary, &mut errors);
        let secondary = parse_muscle("secondary", secondary, &mut errors);
        match (name, primary, secondary) {
            (Some(name), Some(primary), Some(secondary)) => {
                errors.finish(Self { name, primary, secondary })
            },
            _ => Err(errors),
        }
    }

    #[must_use]
    pub fn clean_name(&self) -> String {
        clean_exercise_name(&self.name)
    }
}

fn parse_muscle(field: &str, raw: &str, errors: &mut ValidationErrors) -> Option<Muscle> {
    if raw.trim().is_empty() {
        errors.add(field, "This field is required.");
        return None;
    }
    match raw.parse() {
        Ok(m) => Some(m),
        Err(_) => {
            errors.add(field, "Select a valid choice.");
            None
        },
    }
}

/// Exercises grouped by primary muscle, each group sorted by name.
#[must_use]
pub fn categorise(exercises: &[Exercise]) -> BTreeMap<Muscle, Vec<&Exercise>> {
    let mut groups: BTreeMap<Muscle, Vec<&Exercise>> = BTreeMap::new();
    for exercise in exercises {
        groups.entry(exercise.primary).or_default().push(exercise);
    }
    for group in groups.values_mut() {
        group.sort_by(|a, b| a.name.cmp(&b.name));
    }
    groups
}
