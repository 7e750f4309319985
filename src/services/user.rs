use crate::{
    error::{AppError, Result},
    models::user::*,
    services::Database,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};
use validator::Validate;

#[derive(Clone)]
pub struct UserService {
    db: Arc<Database>,
}

impl UserService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn create_user(&self, request: CreateUserRequest) -> Result<User> {
        debug!("Creating user: {}", request.username);

        request.validate()?;

        let created_at = Utc::now();
        let result = sqlx::query("INSERT INTO users (username, created_at) VALUES (?, ?)")
            .bind(&request.username)
            .bind(created_at)
            .execute(self.db.pool())
            .await
            .map_err(AppError::from);

        let result = match result {
            Err(e) if e.is_unique_violation() => {
                return Err(AppError::Conflict(format!(
                    "Username {} is already taken",
                    request.username
                )));
            }
            other => other?,
        };

        info!("User {} created", request.username);

        Ok(User {
            id: result.last_insert_rowid(),
            username: request.username,
            created_at,
        })
    }

    pub async fn get_by_id(&self, user_id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT id, username, created_at FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(self.db.pool())
            .await?;
        Ok(user)
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, created_at FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(self.db.pool())
        .await?;
        Ok(user)
    }

    /// 按用户名查找，不存在时返回 NotFound
    pub async fn require_by_username(&self, username: &str) -> Result<User> {
        self.get_by_username(username)
            .await?
            .ok_or_else(|| AppError::not_found("User"))
    }

    /// 删除用户，其帖子、评论与关注关系级联删除
    pub async fn delete_user(&self, user_id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(user_id)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("User"));
        }

        info!("User {} deleted", user_id);
        Ok(())
    }
}
