use crate::{
    error::{AppError, Result},
    models::{follow::*, page::Page, post::{PostFilter, PostWithAuthor}},
    services::{Database, PostService},
};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Clone)]
pub struct FollowService {
    db: Arc<Database>,
    post_service: PostService,
}

impl FollowService {
    pub fn new(db: Arc<Database>, post_service: PostService) -> Self {
        Self { db, post_service }
    }

    /// 关注作者；重复关注不产生新记录，返回是否新建了关注关系
    pub async fn follow(&self, user_id: i64, author_id: i64) -> Result<bool> {
        debug!("User {} following user {}", user_id, author_id);

        // 防止自己关注自己
        if user_id == author_id {
            return Err(AppError::validation("Cannot follow yourself"));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO follows (user_id, author_id) VALUES (?, ?)
            ON CONFLICT (user_id, author_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(author_id)
        .execute(self.db.pool())
        .await?;

        let created = result.rows_affected() > 0;
        if created {
            info!("User {} followed user {}", user_id, author_id);
        }
        Ok(created)
    }

    /// 取消关注；未关注时什么也不做，返回是否删除了记录
    pub async fn unfollow(&self, user_id: i64, author_id: i64) -> Result<bool> {
        debug!("User {} unfollowing user {}", user_id, author_id);

        let result = sqlx::query("DELETE FROM follows WHERE user_id = ? AND author_id = ?")
            .bind(user_id)
            .bind(author_id)
            .execute(self.db.pool())
            .await?;

        let removed = result.rows_affected() > 0;
        if removed {
            info!("User {} unfollowed user {}", user_id, author_id);
        }
        Ok(removed)
    }

    /// 匿名访问者永远返回 false
    pub async fn is_following(&self, user_id: Option<i64>, author_id: i64) -> Result<bool> {
        let Some(user_id) = user_id else {
            return Ok(false);
        };

        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM follows WHERE user_id = ? AND author_id = ?",
        )
        .bind(user_id)
        .bind(author_id)
        .fetch_one(self.db.pool())
        .await?;

        Ok(count > 0)
    }

    /// 关注作者的帖子流，分页规则与普通列表一致
    pub async fn feed_for(&self, user_id: i64, page: Option<i64>) -> Result<Page<PostWithAuthor>> {
        self.post_service
            .list_posts(&PostFilter::Followed(user_id), page)
            .await
    }

    pub async fn get_follow_stats(&self, user_id: i64) -> Result<FollowStats> {
        debug!("Getting follow stats for user: {}", user_id);

        let followers_count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM follows WHERE author_id = ?",
        )
        .bind(user_id)
        .fetch_one(self.db.pool())
        .await?;

        let following_count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM follows WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_one(self.db.pool())
        .await?;

        Ok(FollowStats {
            followers_count,
            following_count,
        })
    }

    pub async fn list_follows(&self, user_id: i64) -> Result<Vec<Follow>> {
        let follows = sqlx::query_as::<_, Follow>(
            "SELECT id, user_id, author_id FROM follows WHERE user_id = ? ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;
        Ok(follows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestContext;

    #[tokio::test]
    async fn test_follow_is_idempotent() {
        let ctx = TestContext::new().await;
        let reader = ctx.user("Reader").await;
        let writer = ctx.user("Writer").await;
        let follows = &ctx.state.follow_service;

        assert!(follows.follow(reader.id, writer.id).await.unwrap());
        assert!(!follows.follow(reader.id, writer.id).await.unwrap());

        assert!(follows.is_following(Some(reader.id), writer.id).await.unwrap());
        assert!(!follows.is_following(Some(writer.id), reader.id).await.unwrap());

        let edges = follows.list_follows(reader.id).await.unwrap();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].author_id, writer.id);
    }

    #[tokio::test]
    async fn test_self_follow_is_rejected() {
        let ctx = TestContext::new().await;
        let reader = ctx.user("Reader").await;
        let follows = &ctx.state.follow_service;

        let err = follows.follow(reader.id, reader.id).await.unwrap_err();
        assert!(err.is_validation());
        assert!(follows.list_follows(reader.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unfollow_without_follow_is_noop() {
        let ctx = TestContext::new().await;
        let reader = ctx.user("Reader").await;
        let writer = ctx.user("Writer").await;
        let follows = &ctx.state.follow_service;

        assert!(!follows.unfollow(reader.id, writer.id).await.unwrap());
        assert_eq!(follows.get_follow_stats(reader.id).await.unwrap().following_count, 0);

        follows.follow(reader.id, writer.id).await.unwrap();
        assert!(follows.unfollow(reader.id, writer.id).await.unwrap());
        assert!(!follows.is_following(Some(reader.id), writer.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_anonymous_is_never_following() {
        let ctx = TestContext::new().await;
        let writer = ctx.user("Writer").await;
        assert!(!ctx.state.follow_service.is_following(None, writer.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_feed_tracks_follow_state() {
        let ctx = TestContext::new().await;
        let reader = ctx.user("Reader").await;
        let writer = ctx.user("Writer").await;
        let other = ctx.user("Other").await;
        let follows = &ctx.state.follow_service;

        let followed_post = ctx.post(&writer, "from writer").await;
        ctx.post(&other, "from other").await;

        assert!(follows.feed_for(reader.id, None).await.unwrap().is_empty());

        follows.follow(reader.id, writer.id).await.unwrap();
        let feed = follows.feed_for(reader.id, None).await.unwrap();
        let ids: Vec<i64> = feed.data.iter().map(|p| p.post.id).collect();
        assert_eq!(ids, vec![followed_post.id]);

        // 未关注者的帖子流不受影响
        assert!(follows.feed_for(other.id, None).await.unwrap().is_empty());

        follows.unfollow(reader.id, writer.id).await.unwrap();
        assert!(follows.feed_for(reader.id, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_follow_stats() {
        let ctx = TestContext::new().await;
        let a = ctx.user("a").await;
        let b = ctx.user("b").await;
        let c = ctx.user("c").await;
        let follows = &ctx.state.follow_service;

        follows.follow(a.id, c.id).await.unwrap();
        follows.follow(b.id, c.id).await.unwrap();
        follows.follow(c.id, a.id).await.unwrap();

        let stats = follows.get_follow_stats(c.id).await.unwrap();
        assert_eq!(stats.followers_count, 2);
        assert_eq!(stats.following_count, 1);
    }

    #[tokio::test]
    async fn test_follows_removed_with_user() {
        let ctx = TestContext::new().await;
        let reader = ctx.user("Reader").await;
        let writer = ctx.user("Writer").await;
        let follows = &ctx.state.follow_service;

        follows.follow(reader.id, writer.id).await.unwrap();
        ctx.state.user_service.delete_user(writer.id).await.unwrap();
        assert!(follows.list_follows(reader.id).await.unwrap().is_empty());
    }
}
