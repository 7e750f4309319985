use crate::{config::Config, error::{AppError, Result}, models::user::User};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Clone)]
pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl: Duration,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,        // 用户ID
    pub exp: i64,           // 过期时间
    pub iat: i64,           // 签发时间
    pub username: Option<String>,
}

impl Claims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

impl AuthService {
    pub fn new(config: &Config) -> Result<Self> {
        if config.jwt_secret.is_empty() {
            return Err(AppError::internal("JWT secret must not be empty"));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            token_ttl: Duration::hours(config.jwt_expiry_hours.max(1)),
        })
    }

    pub fn verify_jwt(&self, token: &str) -> Result<Claims> {
        let validation = Validation::new(Algorithm::HS256);

        match decode::<Claims>(token, &self.decoding_key, &validation) {
            Ok(token_data) => {
                debug!("JWT token verified for user: {}", token_data.claims.sub);
                Ok(token_data.claims)
            }
            Err(e) => {
                warn!("JWT verification failed: {}", e);
                Err(AppError::Authentication("Invalid token".to_string()))
            }
        }
    }

    /// 为用户签发访问令牌（登录流程在外部完成）
    pub fn issue_token(&self, user: &User) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            exp: (now + self.token_ttl).timestamp(),
            iat: now.timestamp(),
            username: Some(user.username.clone()),
        };

        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: 42,
            username: "leo".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_issue_and_verify() {
        let auth = AuthService::new(&Config::default()).unwrap();
        let token = auth.issue_token(&user()).unwrap();

        let claims = auth.verify_jwt(&token).unwrap();
        assert_eq!(claims.user_id(), Some(42));
        assert_eq!(claims.username.as_deref(), Some("leo"));
    }

    #[test]
    fn test_foreign_secret_is_rejected() {
        let auth = AuthService::new(&Config::default()).unwrap();
        let other = AuthService::new(&Config {
            jwt_secret: "another-secret".to_string(),
            ..Config::default()
        })
        .unwrap();

        let token = other.issue_token(&user()).unwrap();
        assert!(matches!(auth.verify_jwt(&token), Err(AppError::Authentication(_))));
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let auth = AuthService::new(&Config::default()).unwrap();
        assert!(auth.verify_jwt("not-a-jwt").is_err());
    }

    #[test]
    fn test_empty_secret_is_refused() {
        let config = Config {
            jwt_secret: String::new(),
            ..Config::default()
        };
        assert!(AuthService::new(&config).is_err());
    }
}
