use crate::{
    error::Result,
    models::{page::PageQuery, post::PostFilter, response::ApiResponse},
    state::AppState,
    utils::middleware::OptionalAuth,
};
use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/profile/:username/", get(profile))
}

/// 作者主页：作者的帖子以及当前访问者是否已关注
/// GET /profile/:username/
async fn profile(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
    Query(query): Query<PageQuery>,
    viewer: OptionalAuth,
) -> Result<Json<ApiResponse<Value>>> {
    debug!("Rendering profile of {}", username);

    let author = state.user_service.require_by_username(&username).await?;
    let following = state
        .follow_service
        .is_following(viewer.user_id(), author.id)
        .await?;
    let stats = state.follow_service.get_follow_stats(author.id).await?;
    let page = state
        .post_service
        .list_posts(&PostFilter::Author(username), query.page_number())
        .await?;

    Ok(Json(ApiResponse::success(json!({
        "author": author,
        "following": following,
        "stats": stats,
        "page": page,
    }))))
}
