use crate::{
    error::{AppError, Result},
    models::{comment::*, user::User},
    services::Database,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};
use validator::Validate;

#[derive(Clone)]
pub struct CommentService {
    db: Arc<Database>,
}

impl CommentService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn add_comment(&self, author: &User, post_id: i64, form: CommentForm) -> Result<Comment> {
        debug!("Adding comment to post {} by {}", post_id, author.username);

        let post_exists: Option<i64> = sqlx::query_scalar("SELECT id FROM posts WHERE id = ?")
            .bind(post_id)
            .fetch_optional(self.db.pool())
            .await?;
        if post_exists.is_none() {
            return Err(AppError::not_found("Post"));
        }

        form.validate()?;
        let text = form.text.trim().to_string();

        let created = Utc::now();
        let result = sqlx::query(
            "INSERT INTO comments (text, created, post_id, author_id) VALUES (?, ?, ?, ?)",
        )
        .bind(&text)
        .bind(created)
        .bind(post_id)
        .bind(author.id)
        .execute(self.db.pool())
        .await?;

        let comment = Comment {
            id: result.last_insert_rowid(),
            text,
            created,
            post_id: Some(post_id),
            author_id: author.id,
        };

        info!("Comment {} added to post {}", comment.id, post_id);
        Ok(comment)
    }

    /// 帖子的评论，最新的在前
    pub async fn list_for_post(&self, post_id: i64) -> Result<Vec<CommentWithAuthor>> {
        let comments = sqlx::query_as::<_, CommentWithAuthor>(
            r#"
            SELECT c.id, c.text, c.created, c.post_id, c.author_id, u.username AS author_username
            FROM comments c
            JOIN users u ON u.id = c.author_id
            WHERE c.post_id = ?
            ORDER BY c.created DESC, c.id DESC
            "#,
        )
        .bind(post_id)
        .fetch_all(self.db.pool())
        .await?;
        Ok(comments)
    }

    pub async fn count_for_post(&self, post_id: i64) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM comments WHERE post_id = ?")
            .bind(post_id)
            .fetch_one(self.db.pool())
            .await?;
        Ok(count)
    }
}
