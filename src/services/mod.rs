pub mod email;
pub mod notifications;
pub mod spam_filter;
