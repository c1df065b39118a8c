//! User account management.

use std::sync::Arc;

use tracing::info;

use taskhub_core::error::AppError;
use taskhub_core::types::{PageRequest, PageResponse, UserId};
use taskhub_database::UserStore;
use taskhub_entity::user::{CreateUser, UpdateUser, User, UserFilter};

/// Handles user management operations.
#[derive(Debug, Clone)]
pub struct UserService {
    /// User store.
    users: Arc<dyn UserStore>,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Creates a new active user.
    pub async fn create(&self, data: CreateUser) -> Result<User, AppError> {
        if data.username.trim().is_empty() {
            return Err(AppError::validation("Username must not be empty"));
        }
        self.ensure_username_free(&data.username).await?;
        self.ensure_email_free(&data.email).await?;

        let user = self.users.create(data).await?;
        info!(user_id = %user.id, username = %user.username, "User created");
        Ok(user)
    }

    /// Gets a single user by ID.
    pub async fn get(&self, id: UserId) -> Result<User, AppError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Lists users matching `filter`, newest first.
    pub async fn list(
        &self,
        filter: &UserFilter,
        page: PageRequest,
    ) -> Result<PageResponse<User>, AppError> {
        let items = self.users.find(filter, &page).await?;
        let total = self.users.count(filter).await?;
        Ok(PageResponse::new(items, &page, total))
    }

    /// Updates a user, re-checking uniqueness of a changed username or email.
    pub async fn update(&self, id: UserId, changes: UpdateUser) -> Result<User, AppError> {
        let current = self.get(id).await?;

        if let Some(username) = changes.username.as_deref() {
            if username != current.username {
                self.ensure_username_free(username).await?;
            }
        }
        if let Some(email) = changes.email.as_deref() {
            if email != current.email {
                self.ensure_email_free(email).await?;
            }
        }

        let user = self.users.update(id, &changes).await?;
        info!(user_id = %id, "User updated");
        Ok(user)
    }

    /// Deletes a user.
    pub async fn delete(&self, id: UserId) -> Result<(), AppError> {
        if !self.users.delete(id).await? {
            return Err(AppError::not_found("User not found"));
        }
        info!(user_id = %id, "User deleted");
        Ok(())
    }

    async fn ensure_username_free(&self, username: &str) -> Result<(), AppError> {
        if self.users.find_by_username(username).await?.is_some() {
            return Err(AppError::conflict("Username already exists"));
        }
        Ok(())
    }

    async fn ensure_email_free(&self, email: &str) -> Result<(), AppError> {
        if self.users.find_by_email(email).await?.is_some() {
            return Err(AppError::conflict("Email already exists"));
        }
        Ok(())
    }
}
