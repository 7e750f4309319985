use crate::{
    error::Result,
    models::{
        page::PageQuery,
        post::{EditAccess, PostFilter, PostForm},
        response::ApiResponse,
    },
    routes::{post_detail_path, profile_path},
    state::AppState,
    utils::{cache::PageCache, middleware::RequireAuth},
};
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json, Redirect, Response},
    routing::get,
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/posts/:post_id/", get(post_detail))
        .route("/create/", get(create_form).post(create_post))
        .route("/posts/:post_id/edit/", get(edit_form).post(edit_post))
}

/// 首页：全部帖子，整页结果按页码缓存
/// GET /
async fn index(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Value>> {
    let requested = query.page_number();

    // 只按解析后的页码写入；越界页码查不到缓存，查询后写入末页的键
    if let Some(cached) = state.page_cache.get(&PageCache::index_key(requested.unwrap_or(1))) {
        debug!("Serving index page {:?} from cache", requested);
        return Ok(Json(cached));
    }

    let page = state.post_service.list_posts(&PostFilter::All, requested).await?;
    let cache_key = PageCache::index_key(page.page);
    let body = serde_json::to_value(ApiResponse::success(page))?;
    state.page_cache.put(cache_key, body.clone());

    Ok(Json(body))
}

/// 帖子详情及评论
/// GET /posts/:post_id/
async fn post_detail(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<i64>,
) -> Result<Json<ApiResponse<Value>>> {
    let post = state.post_service.get_post(post_id).await?;
    let comments = state.comment_service.list_for_post(post_id).await?;

    Ok(Json(ApiResponse::success(json!({
        "post": post,
        "comments_count": comments.len(),
        "comments": comments,
    }))))
}

/// 新建帖子表单上下文
/// GET /create/
async fn create_form(
    State(state): State<Arc<AppState>>,
    RequireAuth(_user): RequireAuth,
) -> Result<Json<ApiResponse<Value>>> {
    let groups = state.group_service.list_groups().await?;

    Ok(Json(ApiResponse::success(json!({
        "is_edit": false,
        "groups": groups,
    }))))
}

/// 新建帖子，成功后跳转到作者主页
/// POST /create/
async fn create_post(
    State(state): State<Arc<AppState>>,
    RequireAuth(user): RequireAuth,
    Json(form): Json<PostForm>,
) -> Result<Redirect> {
    let post = state.post_service.create_post(&user, form).await?;
    info!("Post {} published, redirecting to profile", post.id);

    Ok(Redirect::to(&profile_path(&user.username)))
}

/// 编辑表单；非作者跳转回详情页
/// GET /posts/:post_id/edit/
async fn edit_form(
    State(state): State<Arc<AppState>>,
    RequireAuth(user): RequireAuth,
    Path(post_id): Path<i64>,
) -> Result<Response> {
    match state.post_service.check_edit_access(&user, post_id).await? {
        EditAccess::Authorized(post) => {
            let groups = state.group_service.list_groups().await?;
            Ok(Json(ApiResponse::success(json!({
                "is_edit": true,
                "post_id": post_id,
                "post": post,
                "groups": groups,
            })))
            .into_response())
        }
        EditAccess::Forbidden => Ok(Redirect::to(&post_detail_path(post_id)).into_response()),
    }
}

/// 保存编辑；无论是否为作者都跳转回详情页
/// POST /posts/:post_id/edit/
async fn edit_post(
    State(state): State<Arc<AppState>>,
    RequireAuth(user): RequireAuth,
    Path(post_id): Path<i64>,
    Json(form): Json<PostForm>,
) -> Result<Redirect> {
    if let EditAccess::Forbidden = state.post_service.edit_post(&user, post_id, form).await? {
        debug!("Edit of post {} by {} ignored", post_id, user.username);
    }

    Ok(Redirect::to(&post_detail_path(post_id)))
}
