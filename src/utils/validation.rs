use crate::error::{AppError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use validator::ValidationError;

static USERNAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    // 与常见账户系统一致：字母、数字以及 @ . + - _
    Regex::new(r"^[\w.@+-]+$").expect("username pattern is valid")
});

fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// 必填文本字段：去除空白后不能为空
pub fn validate_not_blank(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(field_error("required", "This field is required."));
    }
    Ok(())
}

pub fn validate_username_chars(username: &str) -> std::result::Result<(), ValidationError> {
    if !USERNAME_REGEX.is_match(username) {
        return Err(field_error(
            "invalid_username",
            "Username may contain only letters, digits and @/./+/-/_ characters.",
        ));
    }
    Ok(())
}

/// 图片路径必须位于 posts/ 目录下且不能跳出该目录
pub fn validate_image_path(path: &str) -> std::result::Result<(), ValidationError> {
    let Some(name) = path.strip_prefix("posts/") else {
        return Err(field_error("invalid_image", "Image must be stored under posts/."));
    };

    if name.is_empty() || name.split('/').any(|part| part.is_empty() || part == "..") {
        return Err(field_error("invalid_image", "Image path is malformed."));
    }

    Ok(())
}

/// 检查图片扩展名是否在允许列表中
pub fn check_image_extension(path: &str, allowed: &[String]) -> Result<()> {
    let extension = path
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();

    if !allowed.iter().any(|a| *a == extension) {
        return Err(AppError::Validation(format!(
            "Unsupported image type: {}",
            if extension.is_empty() { "none" } else { &extension }
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("hello").is_ok());
        assert!(validate_not_blank("  hi  ").is_ok());

        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank(" \n\t ").is_err());
    }

    #[test]
    fn test_validate_username_chars() {
        assert!(validate_username_chars("TestUser").is_ok());
        assert!(validate_username_chars("user.name+tag@x").is_ok());
        assert!(validate_username_chars("user_name-1").is_ok());

        assert!(validate_username_chars("user name").is_err());
        assert!(validate_username_chars("user/name").is_err());
    }

    #[test]
    fn test_validate_image_path() {
        assert!(validate_image_path("posts/small.gif").is_ok());
        assert!(validate_image_path("posts/2024/a.png").is_ok());

        assert!(validate_image_path("small.gif").is_err());
        assert!(validate_image_path("posts/").is_err());
        assert!(validate_image_path("posts/../secret.png").is_err());
        assert!(validate_image_path("posts//a.png").is_err());
    }

    #[test]
    fn test_check_image_extension() {
        let allowed = vec!["gif".to_string(), "png".to_string()];
        assert!(check_image_extension("posts/small.gif", &allowed).is_ok());
        assert!(check_image_extension("posts/SMALL.PNG", &allowed).is_ok());
        assert!(check_image_extension("posts/small.exe", &allowed).is_err());
        assert!(check_image_extension("posts/noext", &allowed).is_err());
    }
}
