use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::comments::{AdminCommentRow, Comment, CommentStatus};

/// Public submission. Missing text fields deserialize as empty so the
/// lifecycle can report which one is absent.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub post_id: Uuid,
    pub parent_id: Option<Uuid>,
    #[serde(default)]
    pub author_name: String,
    #[serde(default)]
    pub author_email: String,
    #[serde(default)]
    pub content: String,
    /// Hidden form field. Anything typed here marks the sender as a bot.
    #[serde(default, alias = "website")]
    pub honeypot: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApprovedCommentsQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AdminCommentsQuery {
    pub status: Option<CommentStatus>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCommentStatusRequest {
    pub status: CommentStatus,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteCommentQuery {
    #[serde(default)]
    pub hard: bool,
}

#[derive(Debug, Deserialize)]
pub struct AdminReplyRequest {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchAction {
    Approve,
    Spam,
    Delete,
}

impl BatchAction {
    /// Batch delete is always a soft delete.
    pub fn target_status(self) -> CommentStatus {
        match self {
            BatchAction::Approve => CommentStatus::Approved,
            BatchAction::Spam => CommentStatus::Spam,
            BatchAction::Delete => CommentStatus::Deleted,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BatchUpdateRequest {
    #[serde(default)]
    pub ids: Vec<Uuid>,
    pub action: BatchAction,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct BatchUpdateResponse {
    pub count: u64,
}

/// What readers see. Email and network details stay server side.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PublicCommentResponse {
    pub id: Uuid,
    pub post_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub author_name: String,
    pub content: String,
    pub status: CommentStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Comment> for PublicCommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            post_id: comment.post_id,
            parent_id: comment.parent_id,
            author_name: comment.author_name,
            content: comment.content,
            status: comment.status,
            created_at: comment.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ThreadedCommentResponse {
    #[serde(flatten)]
    pub comment: PublicCommentResponse,
    pub replies: Vec<PublicCommentResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovedCommentsResponse {
    pub comments: Vec<ThreadedCommentResponse>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PostRefResponse {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminCommentResponse {
    #[serde(flatten)]
    pub comment: Comment,
    pub post: PostRefResponse,
}

impl From<AdminCommentRow> for AdminCommentResponse {
    fn from(row: AdminCommentRow) -> Self {
        let post = PostRefResponse {
            id: row.comment.post_id,
            title: row.post_title,
            slug: row.post_slug,
        };
        Self {
            comment: row.comment,
            post,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminCommentsResponse {
    pub comments: Vec<AdminCommentResponse>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: i64,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CommentStatsResponse {
    pub pending: i64,
    pub today_new: i64,
    pub approved: i64,
    pub spam: i64,
}
