use crate::{
    config::Config,
    error::Result,
    services::{
        AuthService, CommentService, Database, FollowService, GroupService, PostService,
        UserService,
    },
    utils::{cache::PageCache, pagination::Paginator},
};
use std::sync::Arc;
use std::time::Duration;

/// 应用程序的共享状态
/// 包含所有服务和配置的引用
#[derive(Clone)]
pub struct AppState {
    /// 应用配置
    pub config: Config,

    /// 数据库连接
    pub db: Arc<Database>,

    /// 首页列表缓存
    pub page_cache: Arc<PageCache>,

    /// 认证服务
    pub auth_service: AuthService,

    /// 用户服务
    pub user_service: UserService,

    /// 分组服务
    pub group_service: GroupService,

    /// 帖子服务
    pub post_service: PostService,

    /// 评论服务
    pub comment_service: CommentService,

    /// 关注服务
    pub follow_service: FollowService,
}

impl AppState {
    /// 用已连接的数据库组装全部服务
    pub fn new(config: Config, db: Arc<Database>) -> Result<Self> {
        let page_cache = Arc::new(PageCache::new(Duration::from_secs(config.index_cache_ttl)));
        let paginator = Paginator::new(config.posts_per_page);

        let auth_service = AuthService::new(&config)?;
        let user_service = UserService::new(db.clone());
        let group_service = GroupService::new(db.clone());
        let post_service = PostService::new(
            db.clone(),
            paginator,
            page_cache.clone(),
            config.image_extensions(),
        );
        let comment_service = CommentService::new(db.clone());
        let follow_service = FollowService::new(db.clone(), post_service.clone());

        Ok(Self {
            config,
            db,
            page_cache,
            auth_service,
            user_service,
            group_service,
            post_service,
            comment_service,
            follow_service,
        })
    }
}
