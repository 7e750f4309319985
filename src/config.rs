use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Server configuration
    pub server_host: String,
    pub server_port: u16,
    pub environment: String,
    pub log_level: String,

    // Database configuration
    pub database_url: String,
    pub database_max_connections: u32,

    // Authentication configuration
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    pub login_url: String,

    // Content settings
    pub posts_per_page: usize,
    pub index_cache_ttl: u64,
    pub allowed_image_types: String,

    // CORS configuration
    pub cors_allowed_origins: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Config {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .context("SERVER_PORT must be a port number")?,
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            log_level: env::var("LOG_LEVEL")
                .unwrap_or_else(|_| "yatube=debug,tower_http=debug".to_string()),

            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://yatube.db?mode=rwc".to_string()),
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("DATABASE_MAX_CONNECTIONS must be an integer")?,

            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_expiry_hours: env::var("JWT_EXPIRY_HOURS")
                .unwrap_or_else(|_| "168".to_string())
                .parse()
                .context("JWT_EXPIRY_HOURS must be an integer")?,
            login_url: env::var("LOGIN_URL").unwrap_or_else(|_| "/auth/login/".to_string()),

            posts_per_page: env::var("POSTS_PER_PAGE")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("POSTS_PER_PAGE must be an integer")?,
            index_cache_ttl: env::var("INDEX_CACHE_TTL")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .context("INDEX_CACHE_TTL must be a number of seconds")?,
            allowed_image_types: env::var("ALLOWED_IMAGE_TYPES")
                .unwrap_or_else(|_| "jpeg,jpg,png,gif,webp".to_string()),

            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn image_extensions(&self) -> Vec<String> {
        self.allowed_image_types
            .split(',')
            .map(|ext| ext.trim().to_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect()
    }
}

impl Default for Config {
    /// 开发与测试用的默认配置（内存数据库）
    fn default() -> Self {
        Self {
            server_host: "127.0.0.1".to_string(),
            server_port: 8000,
            environment: "development".to_string(),
            log_level: "yatube=debug".to_string(),
            database_url: "sqlite::memory:".to_string(),
            database_max_connections: 1,
            jwt_secret: "development-secret".to_string(),
            jwt_expiry_hours: 168,
            login_url: "/auth/login/".to_string(),
            posts_per_page: 10,
            index_cache_ttl: 20,
            allowed_image_types: "jpeg,jpg,png,gif,webp".to_string(),
            cors_allowed_origins: "http://localhost:3000".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_extensions_are_normalized() {
        let config = Config {
            allowed_image_types: "JPG, png,,gif ".to_string(),
            ..Config::default()
        };
        assert_eq!(config.image_extensions(), vec!["jpg", "png", "gif"]);
    }

    #[test]
    fn test_default_is_not_production() {
        let config = Config::default();
        assert_eq!(config.environment, "development");
        assert!(!config.is_production());
        assert_eq!(config.posts_per_page, 10);
        assert_eq!(config.index_cache_ttl, 20);
    }
}
