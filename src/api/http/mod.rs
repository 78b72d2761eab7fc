pub mod admin_comments;
pub mod client;
pub mod comments;
