use crate::{
    error::Result,
    models::{page::PageQuery, response::ApiResponse},
    routes::profile_path,
    state::AppState,
    utils::middleware::RequireAuth,
};
use axum::{
    extract::{Path, Query, State},
    response::{Json, Redirect},
    routing::get,
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/follow/", get(follow_index))
        .route("/profile/:username/follow/", get(profile_follow))
        .route("/profile/:username/unfollow/", get(profile_unfollow))
}

/// 关注作者的帖子流
/// GET /follow/
async fn follow_index(
    State(state): State<Arc<AppState>>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<Value>>> {
    let page = state.follow_service.feed_for(user.id, query.page_number()).await?;

    Ok(Json(ApiResponse::success(json!({
        "is_index": false,
        "page": page,
    }))))
}

/// 关注作者，自己关注自己被忽略
/// GET /profile/:username/follow/
async fn profile_follow(
    State(state): State<Arc<AppState>>,
    RequireAuth(user): RequireAuth,
    Path(username): Path<String>,
) -> Result<Redirect> {
    let author = state.user_service.require_by_username(&username).await?;

    match state.follow_service.follow(user.id, author.id).await {
        Ok(_) => {}
        Err(e) if e.is_validation() => {
            debug!("Ignoring follow request of {} for {}: {}", user.username, username, e);
        }
        Err(e) => return Err(e),
    }

    Ok(Redirect::to(&profile_path(&username)))
}

/// 取消关注
/// GET /profile/:username/unfollow/
async fn profile_unfollow(
    State(state): State<Arc<AppState>>,
    RequireAuth(user): RequireAuth,
    Path(username): Path<String>,
) -> Result<Redirect> {
    let author = state.user_service.require_by_username(&username).await?;
    state.follow_service.unfollow(user.id, author.id).await?;

    Ok(Redirect::to(&profile_path(&username)))
}
