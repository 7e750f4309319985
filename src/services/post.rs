use crate::{
    error::{AppError, Result},
    models::{page::Page, post::*, user::User},
    services::Database,
    utils::{
        cache::PageCache,
        pagination::Paginator,
        validation::check_image_extension,
    },
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};
use validator::Validate;

const POST_VIEW_SELECT: &str = r#"
    SELECT
        p.id, p.text, p.pub_date, p.author_id, p.group_id, p.image,
        u.username AS author_username,
        g.title AS group_title,
        g.slug AS group_slug
    FROM posts p
    JOIN users u ON u.id = p.author_id
    LEFT JOIN post_groups g ON g.id = p.group_id
"#;

#[derive(Clone)]
pub struct PostService {
    db: Arc<Database>,
    paginator: Paginator,
    page_cache: Arc<PageCache>,
    image_extensions: Vec<String>,
}

impl PostService {
    pub fn new(
        db: Arc<Database>,
        paginator: Paginator,
        page_cache: Arc<PageCache>,
        image_extensions: Vec<String>,
    ) -> Self {
        Self {
            db,
            paginator,
            page_cache,
            image_extensions,
        }
    }

    /// 按过滤条件分页列出帖子，按发布时间倒序
    pub async fn list_posts(
        &self,
        filter: &PostFilter,
        page: Option<i64>,
    ) -> Result<Page<PostWithAuthor>> {
        debug!("Listing posts with filter {:?}, page {:?}", filter, page);

        let (condition, param) = self.resolve_filter(filter).await?;

        let count_sql = format!("SELECT COUNT(*) FROM posts p WHERE {}", condition);
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        if let Some(value) = param {
            count_query = count_query.bind(value);
        }
        let total = count_query.fetch_one(self.db.pool()).await?;

        let window = self.paginator.window(page, total);
        if total == 0 {
            return Ok(self.paginator.page(window, 0, Vec::new()));
        }

        let list_sql = format!(
            "{} WHERE {} ORDER BY p.pub_date DESC, p.id DESC LIMIT ? OFFSET ?",
            POST_VIEW_SELECT, condition
        );
        let mut list_query = sqlx::query_as::<_, PostWithAuthor>(&list_sql);
        if let Some(value) = param {
            list_query = list_query.bind(value);
        }
        let posts = list_query
            .bind(window.limit)
            .bind(window.offset)
            .fetch_all(self.db.pool())
            .await?;

        Ok(self.paginator.page(window, total, posts))
    }

    /// 把过滤条件转换为 SQL 条件和参数；分组和作者不存在时返回 NotFound
    async fn resolve_filter(&self, filter: &PostFilter) -> Result<(&'static str, Option<i64>)> {
        match filter {
            PostFilter::All => Ok(("1 = 1", None)),
            PostFilter::Group(slug) => {
                let group_id: i64 = sqlx::query_scalar("SELECT id FROM post_groups WHERE slug = ?")
                    .bind(slug)
                    .fetch_optional(self.db.pool())
                    .await?
                    .ok_or_else(|| AppError::not_found("Group"))?;
                Ok(("p.group_id = ?", Some(group_id)))
            }
            PostFilter::Author(username) => {
                let author_id: i64 = sqlx::query_scalar("SELECT id FROM users WHERE username = ?")
                    .bind(username)
                    .fetch_optional(self.db.pool())
                    .await?
                    .ok_or_else(|| AppError::not_found("User"))?;
                Ok(("p.author_id = ?", Some(author_id)))
            }
            PostFilter::Followed(user_id) => Ok((
                "p.author_id IN (SELECT author_id FROM follows WHERE user_id = ?)",
                Some(*user_id),
            )),
        }
    }

    pub async fn get_post(&self, post_id: i64) -> Result<PostWithAuthor> {
        let sql = format!("{} WHERE p.id = ?", POST_VIEW_SELECT);
        sqlx::query_as::<_, PostWithAuthor>(&sql)
            .bind(post_id)
            .fetch_optional(self.db.pool())
            .await?
            .ok_or_else(|| AppError::not_found("Post"))
    }

    async fn find_post(&self, post_id: i64) -> Result<Post> {
        sqlx::query_as::<_, Post>(
            "SELECT id, text, pub_date, author_id, group_id, image FROM posts WHERE id = ?",
        )
        .bind(post_id)
        .fetch_optional(self.db.pool())
        .await?
        .ok_or_else(|| AppError::not_found("Post"))
    }

    pub async fn create_post(&self, author: &User, form: PostForm) -> Result<Post> {
        debug!("Creating post for author: {}", author.username);

        self.validate_form(&form).await?;
        let text = form.text.trim().to_string();

        let pub_date = Utc::now();
        let result = sqlx::query(
            "INSERT INTO posts (text, pub_date, author_id, group_id, image) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&text)
        .bind(pub_date)
        .bind(author.id)
        .bind(form.group)
        .bind(&form.image)
        .execute(self.db.pool())
        .await?;

        let post = Post {
            id: result.last_insert_rowid(),
            text,
            pub_date,
            author_id: author.id,
            group_id: form.group,
            image: form.image,
        };

        self.page_cache.invalidate_listings();
        info!("Post {} created by {}", post.id, author.username);

        Ok(post)
    }

    /// 只有作者本人可以编辑
    pub async fn check_edit_access(
        &self,
        editor: &User,
        post_id: i64,
    ) -> Result<EditAccess<PostWithAuthor>> {
        let post = self.get_post(post_id).await?;
        if post.post.author_id != editor.id {
            debug!("User {} is not the author of post {}", editor.id, post_id);
            return Ok(EditAccess::Forbidden);
        }
        Ok(EditAccess::Authorized(post))
    }

    /// 编辑帖子；发布时间与 ID 不变，未提交新图片时保留原图
    pub async fn edit_post(
        &self,
        editor: &User,
        post_id: i64,
        form: PostForm,
    ) -> Result<EditAccess<Post>> {
        debug!("User {} editing post {}", editor.id, post_id);

        let existing = self.find_post(post_id).await?;
        if existing.author_id != editor.id {
            debug!("User {} is not the author of post {}", editor.id, post_id);
            return Ok(EditAccess::Forbidden);
        }

        self.validate_form(&form).await?;
        let text = form.text.trim().to_string();

        let image = form.image.or(existing.image);
        sqlx::query("UPDATE posts SET text = ?, group_id = ?, image = ? WHERE id = ?")
            .bind(&text)
            .bind(form.group)
            .bind(&image)
            .bind(post_id)
            .execute(self.db.pool())
            .await?;

        self.page_cache.invalidate_listings();
        info!("Post {} updated by {}", post_id, editor.username);

        Ok(EditAccess::Authorized(Post {
            id: existing.id,
            text,
            pub_date: existing.pub_date,
            author_id: existing.author_id,
            group_id: form.group,
            image,
        }))
    }

    async fn validate_form(&self, form: &PostForm) -> Result<()> {
        form.validate()?;

        if let Some(image) = &form.image {
            check_image_extension(image, &self.image_extensions)?;
        }

        if let Some(group_id) = form.group {
            let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM post_groups WHERE id = ?")
                .bind(group_id)
                .fetch_optional(self.db.pool())
                .await?;
            if exists.is_none() {
                return Err(AppError::not_found("Group"));
            }
        }

        Ok(())
    }
}
