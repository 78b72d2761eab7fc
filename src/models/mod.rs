pub mod admins;
pub mod comments;
pub mod posts;
pub mod spam;
