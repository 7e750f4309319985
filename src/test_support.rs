use crate::{
    config::Config,
    models::{
        group::{CreateGroupRequest, Group},
        post::{Post, PostForm},
        user::{CreateUserRequest, User},
    },
    services::Database,
    state::AppState,
};
use std::sync::Arc;

/// 基于内存数据库的测试上下文
pub(crate) struct TestContext {
    pub state: Arc<AppState>,
}

impl TestContext {
    pub async fn new() -> Self {
        Self::with_config(Config::default()).await
    }

    pub async fn with_config(config: Config) -> Self {
        let db = Arc::new(Database::in_memory().await.expect("in-memory database"));
        let state = AppState::new(config, db).expect("application state");
        Self {
            state: Arc::new(state),
        }
    }

    pub async fn user(&self, username: &str) -> User {
        self.state
            .user_service
            .create_user(CreateUserRequest {
                username: username.to_string(),
            })
            .await
            .expect("create user")
    }

    pub async fn group(&self, slug: &str) -> Group {
        self.state
            .group_service
            .create_group(CreateGroupRequest {
                title: format!("Group {}", slug),
                slug: Some(slug.to_string()),
                description: "Тестовое описание".to_string(),
            })
            .await
            .expect("create group")
    }

    pub async fn post(&self, author: &User, text: &str) -> Post {
        self.state
            .post_service
            .create_post(
                author,
                PostForm {
                    text: text.to_string(),
                    ..PostForm::default()
                },
            )
            .await
            .expect("create post")
    }
}
