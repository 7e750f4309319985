use serde::{Deserialize, Serialize};
use std::num::IntErrorKind;

/// 分页结果结构
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl<T> Page<T> {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// `?page=` 查询参数；非数字按未指定处理
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    /// 超出 i64 范围的整数按越界处理，最终落到末页
    pub fn page_number(&self) -> Option<i64> {
        let raw = self.page.as_deref()?.trim();
        match raw.parse::<i64>() {
            Ok(number) => Some(number),
            Err(e) => match e.kind() {
                IntErrorKind::PosOverflow => Some(i64::MAX),
                IntErrorKind::NegOverflow => Some(i64::MIN),
                _ => None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_number_parsing() {
        let query = |raw: Option<&str>| PageQuery {
            page: raw.map(str::to_string),
        };
        assert_eq!(query(None).page_number(), None);
        assert_eq!(query(Some("2")).page_number(), Some(2));
        assert_eq!(query(Some(" 3 ")).page_number(), Some(3));
        assert_eq!(query(Some("abc")).page_number(), None);
        assert_eq!(query(Some("")).page_number(), None);
        assert_eq!(query(Some("-1")).page_number(), Some(-1));
        assert_eq!(query(Some("99999999999999999999")).page_number(), Some(i64::MAX));
        assert_eq!(query(Some("-99999999999999999999")).page_number(), Some(i64::MIN));
        assert_eq!(query(Some("12abc")).page_number(), None);
    }
}
