use crate::{
    error::{AppError, Result},
    models::group::*,
    services::Database,
    utils::slug::{is_valid_slug, normalize_slug},
};
use std::sync::Arc;
use tracing::{debug, info};
use validator::Validate;

#[derive(Clone)]
pub struct GroupService {
    db: Arc<Database>,
}

impl GroupService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn create_group(&self, request: CreateGroupRequest) -> Result<Group> {
        debug!("Creating group: {}", request.title);

        request.validate()?;

        let slug = normalize_slug(request.slug.as_deref());
        if let Some(slug) = &slug {
            if !is_valid_slug(slug) {
                return Err(AppError::Validation(format!("Invalid slug: {}", slug)));
            }
        }

        let result = sqlx::query("INSERT INTO post_groups (title, slug, description) VALUES (?, ?, ?)")
            .bind(&request.title)
            .bind(&slug)
            .bind(&request.description)
            .execute(self.db.pool())
            .await
            .map_err(AppError::from);

        let result = match result {
            Err(e) if e.is_unique_violation() => {
                return Err(AppError::conflict("A group with this slug already exists"));
            }
            other => other?,
        };

        info!("Group {} created", request.title);

        Ok(Group {
            id: result.last_insert_rowid(),
            title: request.title,
            slug,
            description: request.description,
        })
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Group> {
        sqlx::query_as::<_, Group>(
            "SELECT id, title, slug, description FROM post_groups WHERE slug = ?",
        )
        .bind(slug)
        .fetch_optional(self.db.pool())
        .await?
        .ok_or_else(|| AppError::not_found("Group"))
    }

    /// 帖子表单的分组选项
    pub async fn list_groups(&self) -> Result<Vec<GroupChoice>> {
        let groups = sqlx::query_as::<_, GroupChoice>(
            "SELECT id, title FROM post_groups ORDER BY title, id",
        )
        .fetch_all(self.db.pool())
        .await?;
        Ok(groups)
    }

    /// 删除分组；其下帖子保留，分组字段置空
    pub async fn delete_group(&self, group_id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM post_groups WHERE id = ?")
            .bind(group_id)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Group"));
        }

        info!("Group {} deleted", group_id);
        Ok(())
    }
}
