use std::sync::Arc;

use anyhow::anyhow;
use bcrypt::{hash, verify};

use crate::changeset::{compose_user, UserChangeset};
use crate::errors::{ApiError, Result};
use crate::model::{Sanitize, User, UserWithoutPassword};
use crate::validate::{validate_credentials, validate_user, UpdateMode};

pub trait UserStorage: Send + Sync {
    /// Registers a user unless the email is taken.
    fn add_user(&self, email: &str, password_hash: &str) -> Result<UserWithoutPassword>;
    fn get_user(&self, user_id: i64) -> Result<UserWithoutPassword>;
    fn get_user_by_email(&self, email: &str) -> Result<User>;
    fn update_user(&self, user_id: i64, changes: &UserChangeset) -> Result<()>;
    fn delete_user(&self, user_id: i64) -> Result<()>;
}

#[derive(Clone)]
pub struct UserService {
    storage: Arc<dyn UserStorage>,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(storage: Arc<dyn UserStorage>, bcrypt_cost: u32) -> Self {
        Self {
            storage,
            bcrypt_cost,
        }
    }

    fn hash_password(&self, password: &str) -> Result<String> {
        hash(password, self.bcrypt_cost)
            .map_err(|e| anyhow!("Failed to hash password: {}", e).into())
    }

    pub fn sign_up(&self, body: &[u8]) -> Result<UserWithoutPassword> {
        let draft = validate_user(body, UpdateMode::Full)?;
        let (email, password) = draft.credentials()?;
        let hashed_password = self.hash_password(password)?;

        let mut user = self.storage.add_user(email, &hashed_password)?;
        user.sanitize();
        Ok(user)
    }

    /// Unknown emails and wrong passwords are indistinguishable to the caller.
    pub fn sign_in(&self, body: &[u8]) -> Result<UserWithoutPassword> {
        let draft = validate_credentials(body)?;
        let (email, password) = draft.credentials()?;

        let user = self.storage.get_user_by_email(email).map_err(|e| match e {
            ApiError::NotFound(_) => ApiError::InvalidCredentials,
            other => other,
        })?;
        let matches = verify(password, &user.password)
            .map_err(|e| anyhow!("Failed to verify password: {}", e))?;
        if !matches {
            log::info!("wrong password for user {}", user.id);
            return Err(ApiError::InvalidCredentials);
        }

        let mut user = UserWithoutPassword::from(user);
        user.sanitize();
        Ok(user)
    }

    pub fn get_user(&self, user_id: i64) -> Result<UserWithoutPassword> {
        let mut user = self.storage.get_user(user_id)?;
        user.sanitize();
        Ok(user)
    }

    pub fn update_user(&self, body: &[u8], mode: UpdateMode, user_id: i64) -> Result<()> {
        let draft = validate_user(body, mode)?;
        let mut changes = compose_user(draft)?;
        if let Some(password) = changes.password.take() {
            changes.password = Some(self.hash_password(&password)?);
        }
        self.storage.update_user(user_id, &changes)
    }

    pub fn delete_user(&self, user_id: i64) -> Result<()> {
        self.storage.delete_user(user_id)
    }
}
