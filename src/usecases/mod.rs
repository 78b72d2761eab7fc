pub mod antispam;
pub mod comments;
