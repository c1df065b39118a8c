//! In-memory user store.

use std::sync::Mutex;

use async_trait::async_trait;
use dashmap::DashMap;

use taskhub_core::error::AppError;
use taskhub_core::result::AppResult;
use taskhub_core::types::{PageRequest, UserId};
use taskhub_entity::user::{CreateUser, UpdateUser, User, UserFilter};

use crate::store::UserStore;

/// User store keyed by user id.
///
/// Writes that touch the unique columns are serialized through `write_lock`
/// so the duplicate check and the insert cannot interleave.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: DashMap<UserId, User>,
    write_lock: Mutex<()>,
}

impl MemoryUserStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn check_unique(&self, username: &str, email: &str, except: Option<UserId>) -> AppResult<()> {
        for user in self.users.iter() {
            if Some(user.id) == except {
                continue;
            }
            if user.username == username {
                return Err(AppError::conflict("Username already exists"));
            }
            if user.email == email {
                return Err(AppError::conflict("Email already exists"));
            }
        }
        Ok(())
    }

    fn lock(&self) -> AppResult<std::sync::MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| AppError::internal("User store lock poisoned"))
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, data: CreateUser) -> AppResult<User> {
        let _guard = self.lock()?;
        self.check_unique(&data.username, &data.email, None)?;
        let user = User::new(data);
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.username == username)
            .map(|u| u.value().clone()))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.email == email)
            .map(|u| u.value().clone()))
    }

    async fn find(&self, filter: &UserFilter, page: &PageRequest) -> AppResult<Vec<User>> {
        let mut matching: Vec<User> = self
            .users
            .iter()
            .filter(|u| filter.matches(u.value()))
            .map(|u| u.value().clone())
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page.apply(matching))
    }

    async fn count(&self, filter: &UserFilter) -> AppResult<u64> {
        Ok(self.users.iter().filter(|u| filter.matches(u.value())).count() as u64)
    }

    async fn update(&self, id: UserId, changes: &UpdateUser) -> AppResult<User> {
        let _guard = self.lock()?;
        let mut updated = self
            .users
            .get(&id)
            .map(|u| u.value().clone())
            .ok_or_else(|| AppError::not_found("User not found"))?;
        updated.apply_update(changes);
        self.check_unique(&updated.username, &updated.email, Some(id))?;
        self.users.insert(id, updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: UserId) -> AppResult<bool> {
        Ok(self.users.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> CreateUser {
        CreateUser {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            full_name: "Alice".to_string(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_username_and_email_conflict() {
        let store = MemoryUserStore::new();
        store.create(alice()).await.unwrap();

        let err = store.create(alice()).await.unwrap_err();
        assert_eq!(err.message, "Username already exists");

        let err = store
            .create(CreateUser {
                username: "alice2".to_string(),
                ..alice()
            })
            .await
            .unwrap_err();
        assert_eq!(err.message, "Email already exists");
    }

    #[tokio::test]
    async fn test_update_checks_uniqueness_against_others_only() {
        let store = MemoryUserStore::new();
        let a = store.create(alice()).await.unwrap();
        store
            .create(CreateUser {
                username: "bob".to_string(),
                email: "bob@example.com".to_string(),
                full_name: "Bob".to_string(),
            })
            .await
            .unwrap();

        // Re-saving the same username is fine.
        let same = store
            .update(
                a.id,
                &UpdateUser {
                    username: Some("alice".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(same.username, "alice");

        let err = store
            .update(
                a.id,
                &UpdateUser {
                    username: Some("bob".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, taskhub_core::error::ErrorKind::Conflict);
        assert_eq!(store.find_by_id(a.id).await.unwrap().unwrap().username, "alice");
    }

    #[tokio::test]
    async fn test_filter_by_active() {
        let store = MemoryUserStore::new();
        let a = store.create(alice()).await.unwrap();
        store
            .update(
                a.id,
                &UpdateUser {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let inactive = UserFilter {
            is_active: Some(false),
        };
        assert_eq!(store.count(&inactive).await.unwrap(), 1);
        assert_eq!(store.count(&UserFilter::default()).await.unwrap(), 1);
        assert!(
            store
                .find(&UserFilter { is_active: Some(true) }, &PageRequest::default())
                .await
                .unwrap()
                .is_empty()
        );
    }
}
