//! 用户存储

use async_trait::async_trait;
use sqlx::PgPool;

use super::model::{NewUser, UpdateUserRequest, User};
use crate::{core::error::CoreError, infrastructure::memory::MemoryStore};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn all(&self) -> Result<Vec<User>, CoreError>;
    async fn get(&self, id: i32) -> Result<Option<User>, CoreError>;
    /// 按用户名或邮箱查找
    async fn find_by_login(&self, login: &str) -> Result<Option<User>, CoreError>;
    async fn insert(&self, user: &NewUser) -> Result<User, CoreError>;
    async fn update(&self, id: i32, changes: &UpdateUserRequest) -> Result<bool, CoreError>;
    async fn delete(&self, id: i32) -> Result<bool, CoreError>;
}

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const USER_COLUMNS: &str = "id, username, email, full_name, password_hash, created_at";

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn all(&self) -> Result<Vec<User>, CoreError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users ORDER BY id",
            USER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn get(&self, id: i32) -> Result<Option<User>, CoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_login(&self, login: &str) -> Result<Option<User>, CoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE username = $1 OR email = $1 LIMIT 1",
            USER_COLUMNS
        ))
        .bind(login)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn insert(&self, user: &NewUser) -> Result<User, CoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (username, email, full_name, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.full_name)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    async fn update(&self, id: i32, changes: &UpdateUserRequest) -> Result<bool, CoreError> {
        let result = sqlx::query("UPDATE users SET email = $1, full_name = $2 WHERE id = $3")
            .bind(&changes.email)
            .bind(&changes.full_name)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i32) -> Result<bool, CoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn all(&self) -> Result<Vec<User>, CoreError> {
        Ok(self.tables.read().await.users.values().cloned().collect())
    }

    async fn get(&self, id: i32) -> Result<Option<User>, CoreError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_by_login(&self, login: &str) -> Result<Option<User>, CoreError> {
        Ok(self
            .tables
            .read()
            .await
            .users
            .values()
            .find(|u| u.username == login || u.email == login)
            .cloned())
    }

    async fn insert(&self, user: &NewUser) -> Result<User, CoreError> {
        let mut tables = self.tables.write().await;
        if let Some(existing) = tables
            .users
            .values()
            .find(|u| u.username == user.username || u.email == user.email)
        {
            let constraint = if existing.username == user.username {
                "users_username_key"
            } else {
                "users_email_key"
            };
            return Err(CoreError::Conflict(format!(
                "record already exists ({})",
                constraint
            )));
        }

        let user = User {
            id: tables.next_user_id(),
            username: user.username.clone(),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            password_hash: user.password_hash.clone(),
            created_at: chrono::Utc::now(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, id: i32, changes: &UpdateUserRequest) -> Result<bool, CoreError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&id) {
            return Ok(false);
        }
        if tables
            .users
            .values()
            .any(|u| u.id != id && u.email == changes.email)
        {
            return Err(CoreError::Conflict(
                "record already exists (users_email_key)".to_string(),
            ));
        }

        if let Some(user) = tables.users.get_mut(&id) {
            user.email = changes.email.clone();
            user.full_name = changes.full_name.clone();
        }
        Ok(true)
    }

    async fn delete(&self, id: i32) -> Result<bool, CoreError> {
        Ok(self.tables.write().await.users.remove(&id).is_some())
    }
}
