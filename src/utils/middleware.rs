use crate::{error::AppError, models::user::User, state::AppState};
use async_trait::async_trait;
use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{request::Parts, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// 认证中间件
///
/// 解析 `Authorization: Bearer` 令牌并把对应用户放入请求扩展。
/// 令牌缺失或无效时请求按匿名用户继续处理。
pub async fn auth_middleware(
    State(app_state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next<Body>,
) -> Response {
    let token = request
        .headers()
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string);

    if let Some(token) = token {
        match app_state.auth_service.verify_jwt(&token) {
            Ok(claims) => match claims.user_id() {
                Some(user_id) => match app_state.user_service.get_by_id(user_id).await {
                    Ok(Some(user)) => {
                        debug!("Authenticated user: {} ({})", user.username, user.id);
                        request.extensions_mut().insert(user);
                    }
                    Ok(None) => {
                        debug!("Token subject {} no longer exists", user_id);
                    }
                    Err(e) => {
                        warn!("Failed to load user {}: {}", user_id, e);
                    }
                },
                None => debug!("Token subject is not a user id: {}", claims.sub),
            },
            Err(e) => {
                debug!("JWT verification failed: {}", e);
            }
        }
    }

    next.run(request).await
}

/// 请求 ID 中间件
pub async fn request_id_middleware(request: Request<Body>, next: Next<Body>) -> Response {
    let request_id = uuid::Uuid::new_v4().to_string();
    debug!("{} {} [{}]", request.method(), request.uri().path(), request_id);

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert("x-request-id", value);
    }

    response
}

/// 可选认证提取器
pub struct OptionalAuth(pub Option<User>);

#[async_trait]
impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts.extensions.get::<User>().cloned();
        Ok(OptionalAuth(user))
    }
}

impl OptionalAuth {
    pub fn user_id(&self) -> Option<i64> {
        self.0.as_ref().map(|u| u.id)
    }
}

/// 必须登录的提取器；未登录时跳转到登录页并带上 `next` 参数
pub struct RequireAuth(pub User);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<User>() {
            Some(user) => Ok(RequireAuth(user.clone())),
            None => {
                let next = parts
                    .uri
                    .path_and_query()
                    .map(|pq| pq.as_str())
                    .unwrap_or("/");
                debug!("Anonymous request to protected route {}", next);
                Err(AppError::LoginRequired(login_redirect(&state.config.login_url, next)))
            }
        }
    }
}

pub fn login_redirect(login_url: &str, next: &str) -> String {
    format!("{}?next={}", login_url, urlencoding::encode(next))
}
