pub mod comment;
pub mod follow;
pub mod group;
pub mod page;
pub mod post;
pub mod response;
pub mod user;
