use once_cell::sync::Lazy;
use regex::Regex;

static SLUG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9\-_]+$").expect("slug pattern is valid")
});

pub const MAX_SLUG_LENGTH: usize = 250;

/// 验证 slug 格式是否正确：只允许字母、数字、连字符和下划线
pub fn is_valid_slug(slug: &str) -> bool {
    if slug.is_empty() || slug.len() > MAX_SLUG_LENGTH {
        return false;
    }

    SLUG_REGEX.is_match(slug)
}

/// 去除首尾空白，空 slug 视为未设置
pub fn normalize_slug(slug: Option<&str>) -> Option<String> {
    slug.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_slug() {
        assert!(is_valid_slug("hello-world"));
        assert!(is_valid_slug("hello_world"));
        assert!(is_valid_slug("hello123"));
        assert!(is_valid_slug("test-slug"));

        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("hello world"));
        assert!(!is_valid_slug("hello@world"));
        assert!(!is_valid_slug("привет"));
        assert!(!is_valid_slug(&"a".repeat(251)));
    }

    #[test]
    fn test_normalize_slug() {
        assert_eq!(normalize_slug(None), None);
        assert_eq!(normalize_slug(Some("   ")), None);
        assert_eq!(normalize_slug(Some(" cats ")), Some("cats".to_string()));
    }
}
