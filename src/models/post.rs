use crate::utils::validation::{validate_image_path, validate_not_blank};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Post {
    pub id: i64,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author_id: i64,
    pub group_id: Option<i64>,
    pub image: Option<String>,
}

/// 列表和详情页使用的帖子视图（附带作者与分组信息）
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PostWithAuthor {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub post: Post,
    pub author_username: String,
    pub group_title: Option<String>,
    pub group_slug: Option<String>,
}

/// 创建与编辑共用的帖子表单
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PostForm {
    #[serde(default)]
    #[validate(custom = "validate_not_blank")]
    pub text: String,

    pub group: Option<i64>,

    #[validate(length(max = 255), custom = "validate_image_path")]
    pub image: Option<String>,
}

/// 列表查询的过滤条件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostFilter {
    All,
    Group(String),
    Author(String),
    Followed(i64),
}

/// 编辑权限检查结果，由调用方决定跳转还是报错
#[derive(Debug, Clone, PartialEq)]
pub enum EditAccess<T> {
    Authorized(T),
    Forbidden,
}

impl<T> EditAccess<T> {
    pub fn is_authorized(&self) -> bool {
        matches!(self, Self::Authorized(_))
    }
}
