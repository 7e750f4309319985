use crate::utils::validation::validate_not_blank;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// 帖子所属的主题分组
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Group {
    pub id: i64,
    pub title: String,
    pub slug: Option<String>,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateGroupRequest {
    #[validate(length(max = 200), custom = "validate_not_blank")]
    pub title: String,

    #[validate(length(max = 250))]
    pub slug: Option<String>,

    #[serde(default)]
    pub description: String,
}

/// 创建帖子表单中的分组选项
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GroupChoice {
    pub id: i64,
    pub title: String,
}
