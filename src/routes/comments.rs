use crate::{
    error::Result,
    models::comment::CommentForm,
    routes::post_detail_path,
    state::AppState,
    utils::middleware::RequireAuth,
};
use axum::{
    extract::{Path, State},
    response::{Json, Redirect},
    routing::post,
    Router,
};
use std::sync::Arc;
use tracing::debug;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/posts/:post_id/comment/", post(add_comment))
}

/// 添加评论；无效输入直接丢弃，始终跳转回详情页
/// POST /posts/:post_id/comment/
async fn add_comment(
    State(state): State<Arc<AppState>>,
    RequireAuth(user): RequireAuth,
    Path(post_id): Path<i64>,
    form: Option<Json<CommentForm>>,
) -> Result<Redirect> {
    let form = form.map(|Json(form)| form).unwrap_or_default();

    match state.comment_service.add_comment(&user, post_id, form).await {
        Ok(_) => {}
        Err(e) if e.is_validation() => {
            debug!("Discarding invalid comment on post {}: {}", post_id, e);
        }
        Err(e) => return Err(e),
    }

    Ok(Redirect::to(&post_detail_path(post_id)))
}
