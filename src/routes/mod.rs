pub mod comments;
pub mod follows;
pub mod groups;
pub mod posts;
pub mod profiles;

use crate::{
    state::AppState,
    utils::middleware::{auth_middleware, request_id_middleware},
};
use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// 组装全部路由；CORS 与压缩层在 main 中添加
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(posts::router())
        .merge(groups::router())
        .merge(profiles::router())
        .merge(comments::router())
        .merge(follows::router())
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "Yatube is running!"
}

pub fn profile_path(username: &str) -> String {
    format!("/profile/{}/", urlencoding::encode(username))
}

pub fn post_detail_path(post_id: i64) -> String {
    format!("/posts/{}/", post_id)
}
