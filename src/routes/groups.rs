use crate::{
    error::Result,
    models::{page::PageQuery, post::PostFilter, response::ApiResponse},
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/group/:slug/", get(group_posts))
}

/// 分组下的帖子
/// GET /group/:slug/
async fn group_posts(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<Value>>> {
    let group = state.group_service.get_by_slug(&slug).await?;
    let page = state
        .post_service
        .list_posts(&PostFilter::Group(slug), query.page_number())
        .await?;

    Ok(Json(ApiResponse::success(json!({
        "group": group,
        "page": page,
    }))))
}
