//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taskhub_core::types::UserId;

/// A registered user account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,
    /// Unique login name.
    pub username: String,
    /// Unique email address.
    pub email: String,
    /// Full display name.
    pub full_name: String,
    /// Whether the account is active.
    pub is_active: bool,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Build a new active user.
    pub fn new(data: CreateUser) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            username: data.username,
            email: data.email,
            full_name: data.full_name,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge the present fields of `changes`, bumping `updated_at`.
    pub fn apply_update(&mut self, changes: &UpdateUser) {
        if let Some(username) = &changes.username {
            self.username = username.clone();
        }
        if let Some(email) = &changes.email {
            self.email = email.clone();
        }
        if let Some(full_name) = &changes.full_name {
            self.full_name = full_name.clone();
        }
        if let Some(is_active) = changes.is_active {
            self.is_active = is_active;
        }
        self.updated_at = Utc::now();
    }
}

/// Data required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Desired username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Full name.
    pub full_name: String,
}

/// Partial update for a user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUser {
    /// New username.
    pub username: Option<String>,
    /// New email.
    pub email: Option<String>,
    /// New full name.
    pub full_name: Option<String>,
    /// New active flag.
    pub is_active: Option<bool>,
}

/// Filter for user listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFilter {
    /// Only users with this active flag.
    pub is_active: Option<bool>,
}

impl UserFilter {
    /// Check whether `user` satisfies the filter.
    pub fn matches(&self, user: &User) -> bool {
        self.is_active.is_none_or(|a| a == user.is_active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_is_active() {
        let user = User::new(CreateUser {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            full_name: "Alice Liddell".to_string(),
        });
        assert!(user.is_active);
        assert!(UserFilter { is_active: Some(true) }.matches(&user));
        assert!(!UserFilter { is_active: Some(false) }.matches(&user));
    }

    #[test]
    fn test_apply_update_deactivates() {
        let mut user = User::new(CreateUser {
            username: "bob".to_string(),
            email: "bob@example.com".to_string(),
            full_name: "Bob".to_string(),
        });
        user.apply_update(&UpdateUser {
            is_active: Some(false),
            ..Default::default()
        });
        assert!(!user.is_active);
        assert_eq!(user.username, "bob");
    }
}
