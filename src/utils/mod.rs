pub mod cache;
pub mod middleware;
pub mod pagination;
pub mod slug;
pub mod validation;
