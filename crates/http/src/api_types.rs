//! REST request bodies (Deserialize) and small response shapes (Serialize)

use serde::{Deserialize, Serialize};
use stronger_core::{ExerciseInput, NewUser, ProfileUpdate, SetInput, TrainingGoal, ValidationErrors, WorkoutInput};

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct UserCreateRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl UserCreateRequest {
    pub fn validate(&self) -> Result<NewUser, ValidationErrors> {
        NewUser::from_fields(&self.username, &self.email, &self.password)
    }
}

/// Account fields a user may change about themselves. Omitted fields are
/// cleared, except `email` which is kept when absent.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UserUpdateRequest {
    pub email: Option<String>,
    pub avatar_url: String,
    pub gym: String,
    pub goal: Option<TrainingGoal>,
    pub about: String,
    pub height: Option<u32>,
}

impl UserUpdateRequest {
    pub fn profile(&self) -> ProfileUpdate {
        ProfileUpdate {
            avatar_url: self.avatar_url.trim().to_owned(),
            gym: self.gym.trim().to_owned(),
            goal: self.goal,
            about: self.about.trim().to_owned(),
            height: self.height,
        }
    }
}

/// Exercise payload in the serialized field names.
#[derive(Debug, Deserialize)]
pub struct ExerciseRequest {
    pub name: String,
    pub primary_muscle: String,
    pub secondary_muscles: String,
}

impl ExerciseRequest {
    pub fn validate(&self) -> Result<ExerciseInput, ValidationErrors> {
        ExerciseInput::from_fields(&self.name, &self.primary_muscle, &self.secondary_muscles)
    }
}

/// A workout header with the sets performed in it.
#[derive(Debug, Deserialize)]
pub struct WorkoutRequest {
    #[serde(flatten)]
    pub workout: WorkoutInput,
    #[serde(default)]
    pub sets: Vec<SetInput>,
}

#[derive(Debug, Deserialize)]
pub struct FriendRequest {
    pub friend: i64,
}

#[derive(Debug, Deserialize)]
pub struct GroupMemberRequest {
    pub group: String,
}

#[derive(Debug, Deserialize)]
pub struct GroupMemberUpdate {
    pub approved: bool,
    #[serde(default)]
    pub admin: bool,
}
