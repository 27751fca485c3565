use stronger_core::{NewUser, ProfileUpdate, User, UserCounts, ValidationErrors};
use stronger_storage::{SiteStats, Storage};

use crate::blocking::{blocking, delegate};
use crate::error::{Result, ServiceError};

/// What a successful signup or login hands back to the web layer.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub session_id: String,
}

#[derive(Clone)]
pub struct AccountService {
    storage: Storage,
    bcrypt_cost: u32,
}

impl AccountService {
    #[must_use]
    pub const fn new(storage: Storage, bcrypt_cost: u32) -> Self {
        Self { storage, bcrypt_cost }
    }

    /// Create an account from raw form fields. Also issues the API token and
    /// opens a web session.
    pub async fn signup(&self, username: &str, email: &str, password: &str) -> Result<AuthSession> {
        let new_user = NewUser::from_fields(username, email, password)?;
        let user = self.create_user(new_user).await?;
        let storage = self.storage.clone();
        let user_id = user.id;
        let session_id = blocking(move || {
            storage.get_or_create_api_token(user_id)?;
            storage.create_web_session(user_id)
        })
        .await?;
        Ok(AuthSession { user, session_id })
    }

    /// Hash the password and insert the user. Used by signup and the CLI.
    pub async fn create_user(&self, new_user: NewUser) -> Result<User> {
        let storage = self.storage.clone();
        let cost = self.bcrypt_cost;
        let user = blocking(move || -> Result<User> {
            let hash = bcrypt::hash(&new_user.password, cost)?;
            storage
                .create_user(&new_user.username, &new_user.email, &hash)
                .map_err(|e| {
                    ServiceError::from(e)
                        .duplicate_as_field("username", "A user with that username already exists.")
                })
        })
        .await?;
        tracing::info!(user_id = user.id, username = %user.username, "Signed up");
        Ok(user)
    }

    /// Check a username and password without opening a session.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User> {
        let storage = self.storage.clone();
        let username = username.to_owned();
        let password = password.to_owned();
        blocking(move || -> Result<User> {
            let Some((user_id, hash)) = storage.get_credentials(&username)? else {
                return Err(ServiceError::Unauthorized("invalid username or password".to_owned()));
            };
            if !bcrypt::verify(&password, &hash)? {
                tracing::warn!(username = %username, "Failed login attempt");
                return Err(ServiceError::Unauthorized("invalid username or password".to_owned()));
            }
            Ok(storage.get_user(user_id)?)
        })
        .await
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<AuthSession> {
        let user = self.authenticate(username, password).await?;
        let user_id = user.id;
        let session_id = delegate!(self, create_web_session, @val user_id)?;
        Ok(AuthSession { user, session_id })
    }

    pub async fn logout(&self, session_id: &str) -> Result<bool> {
        delegate!(self, delete_web_session, @str session_id)
    }

    /// Exchange credentials for the user's API token.
    pub async fn obtain_auth_token(&self, username: &str, password: &str) -> Result<String> {
        let user = self.authenticate(username, password).await?;
        let user_id = user.id;
        delegate!(self, get_or_create_api_token, @val user_id)
    }

    pub async fn user_for_session(&self, session_id: &str) -> Result<Option<User>> {
        delegate!(self, user_for_session, @str session_id)
    }

    pub async fn user_for_token(&self, key: &str) -> Result<Option<User>> {
        delegate!(self, user_for_token, @str key)
    }

    pub async fn get_user(&self, user_id: i64) -> Result<User> {
        delegate!(self, get_user, @val user_id)
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<User> {
        delegate!(self, get_user_by_username, @str username)
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        delegate!(self, list_users)
    }

    pub async fn newest_users(&self, limit: usize) -> Result<Vec<User>> {
        delegate!(self, newest_users, @val limit)
    }

    pub async fn site_stats(&self) -> Result<SiteStats> {
        delegate!(self, site_stats)
    }

    pub async fn user_counts(&self, user_id: i64) -> Result<UserCounts> {
        delegate!(self, user_counts, @val user_id)
    }

    pub async fn update_settings(&self, user_id: i64, update: &ProfileUpdate) -> Result<User> {
        let errors = update.validate();
        if !errors.is_empty() {
            return Err(errors.into());
        }
        delegate!(self, update_profile, @val user_id, @ref update)
    }

    pub async fn update_email(&self, user_id: i64, email: &str) -> Result<()> {
        if !email.contains('@') {
            return Err(ValidationErrors::single("email", "Enter a valid email address.").into());
        }
        delegate!(self, update_email, @val user_id, @str email)
    }

    /// Delete an account. Only the account holder may do this.
    pub async fn delete_user(&self, actor_id: i64, user_id: i64) -> Result<bool> {
        if actor_id != user_id {
            return Err(ServiceError::Forbidden("cannot delete another user".to_owned()));
        }
        delegate!(self, delete_user, @val user_id)
    }
}
