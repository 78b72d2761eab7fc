use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Post status mapping for post_status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "post_status", rename_all = "UPPERCASE")]
pub enum PostStatus {
    Draft,
    Published,
    Archived,
}

/// The slice of a post the comment pipeline reads.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct PostSummary {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub status: PostStatus,
}
