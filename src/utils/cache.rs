use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::debug;

/// 缓存项
#[derive(Debug, Clone)]
struct CacheItem<T> {
    value: T,
    expires_at: Instant,
}

type Entries<T> = Arc<RwLock<HashMap<String, CacheItem<T>>>>;

/// 简单的内存缓存实现
#[derive(Debug, Clone)]
pub struct Cache<T: Clone + Send + Sync> {
    data: Entries<T>,
    default_ttl: Duration,
}

impl<T: Clone + Send + Sync + 'static> Cache<T> {
    /// 创建新的缓存实例
    pub fn new(default_ttl: Duration) -> Self {
        let cache = Self {
            data: Arc::new(RwLock::new(HashMap::new())),
            default_ttl,
        };

        // 在运行时内启动后台清理任务，缓存被释放后任务随之退出
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let data_ref = Arc::downgrade(&cache.data);
            let interval = default_ttl.max(Duration::from_secs(60));
            handle.spawn(async move {
                loop {
                    sleep(interval).await;
                    if !Self::cleanup_expired(&data_ref) {
                        break;
                    }
                }
            });
        }

        cache
    }

    /// 设置缓存项
    pub fn set(&self, key: String, value: T) {
        self.set_with_ttl(key, value, self.default_ttl)
    }

    /// 设置带有自定义TTL的缓存项
    pub fn set_with_ttl(&self, key: String, value: T, ttl: Duration) {
        let item = CacheItem {
            value,
            expires_at: Instant::now() + ttl,
        };
        self.data.write().insert(key, item);
    }

    /// 获取缓存项
    pub fn get(&self, key: &str) -> Option<T> {
        let data = self.data.read();
        data.get(key)
            .filter(|item| item.expires_at > Instant::now())
            .map(|item| item.value.clone())
    }

    /// 删除指定前缀的所有缓存项，返回删除数量
    pub fn delete_prefix(&self, prefix: &str) -> usize {
        let mut data = self.data.write();
        let before = data.len();
        data.retain(|key, _| !key.starts_with(prefix));
        before - data.len()
    }

    /// 获取缓存大小
    pub fn size(&self) -> usize {
        self.data.read().len()
    }

    /// 清理过期项；缓存已被释放时返回 false
    fn cleanup_expired(data: &Weak<RwLock<HashMap<String, CacheItem<T>>>>) -> bool {
        let Some(data) = data.upgrade() else {
            return false;
        };
        let now = Instant::now();
        data.write().retain(|_, item| item.expires_at > now);
        true
    }
}

/// 列表页缓存：首页列表按页码缓存整页上下文，写操作后显式失效
#[derive(Debug, Clone)]
pub struct PageCache {
    pages: Cache<serde_json::Value>,
}

const LISTING_PREFIX: &str = "listing:";

impl PageCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            pages: Cache::new(ttl),
        }
    }

    /// 首页缓存键，使用解析后的页码，条目数不超过总页数
    pub fn index_key(page: i64) -> String {
        format!("{}index:{}", LISTING_PREFIX, page)
    }

    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        self.pages.get(key)
    }

    pub fn put(&self, key: String, page: serde_json::Value) {
        self.pages.set(key, page);
        debug!("Cached listing page ({} entries)", self.len());
    }

    pub fn len(&self) -> usize {
        self.pages.size()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 帖子创建或编辑后调用，使所有列表页缓存失效
    pub fn invalidate_listings(&self) {
        let removed = self.pages.delete_prefix(LISTING_PREFIX);
        debug!("Invalidated {} cached listing pages", removed);
    }
}
