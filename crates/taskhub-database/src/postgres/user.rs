//! User store backed by the `users` table.

use async_trait::async_trait;
use sqlx::PgPool;

use taskhub_core::error::{AppError, ErrorKind};
use taskhub_core::result::AppResult;
use taskhub_core::types::{PageRequest, UserId};
use taskhub_entity::user::{CreateUser, UpdateUser, User, UserFilter};

use super::{count_to_u64, db_err};
use crate::store::UserStore;

/// PostgreSQL user store.
#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    /// Create a new user store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Map unique-constraint violations to `Conflict`, everything else to `Database`.
fn write_err(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| {
        let constraint = e
            .as_database_error()
            .filter(|db| db.is_unique_violation())
            .map(|db| db.constraint().unwrap_or_default().to_string());
        match constraint.as_deref() {
            Some("users_username_key") => AppError::conflict("Username already exists"),
            Some("users_email_key") => AppError::conflict("Email already exists"),
            Some(_) => AppError::with_source(ErrorKind::Conflict, "User already exists", e),
            None => AppError::with_source(ErrorKind::Database, context, e),
        }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, data: CreateUser) -> AppResult<User> {
        let user = User::new(data);
        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, username, email, full_name, is_active, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.full_name)
        .bind(user.is_active)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(write_err("Failed to create user"))
    }

    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find user by id"))
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find user by username"))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find user by email"))
    }

    async fn find(&self, filter: &UserFilter, page: &PageRequest) -> AppResult<Vec<User>> {
        sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE ($1::bool IS NULL OR is_active = $1) \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(filter.is_active)
        .bind(page.sql_limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to list users"))
    }

    async fn count(&self, filter: &UserFilter) -> AppResult<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE ($1::bool IS NULL OR is_active = $1)")
                .bind(filter.is_active)
                .fetch_one(&self.pool)
                .await
                .map_err(db_err("Failed to count users"))?;
        Ok(count_to_u64(count))
    }

    async fn update(&self, id: UserId, changes: &UpdateUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET \
                username = COALESCE($2, username), \
                email = COALESCE($3, email), \
                full_name = COALESCE($4, full_name), \
                is_active = COALESCE($5, is_active), \
                updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&changes.username)
        .bind(&changes.email)
        .bind(&changes.full_name)
        .bind(changes.is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(write_err("Failed to update user"))?
        .ok_or_else(|| AppError::not_found("User not found"))
    }

    async fn delete(&self, id: UserId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err("Failed to delete user"))?;
        Ok(result.rows_affected() > 0)
    }
}
