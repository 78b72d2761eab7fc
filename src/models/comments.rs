use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Comment status mapping for comment_status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "comment_status", rename_all = "UPPERCASE")]
pub enum CommentStatus {
    Pending,
    Approved,
    Spam,
    Deleted,
}

impl CommentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommentStatus::Pending => "PENDING",
            CommentStatus::Approved => "APPROVED",
            CommentStatus::Spam => "SPAM",
            CommentStatus::Deleted => "DELETED",
        }
    }
}

/// Comment model mapped to comments.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub author_name: String,
    pub author_email: String,
    pub content: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub status: CommentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }
}

/// Row handed to the store when a comment is persisted.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub post_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub author_name: String,
    pub author_email: String,
    pub content: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub status: CommentStatus,
}

/// Comment joined with the owning post, used by the moderation list.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AdminCommentRow {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub comment: Comment,
    pub post_title: String,
    pub post_slug: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_uppercase() {
        let json = serde_json::to_string(&CommentStatus::Approved).unwrap();
        assert_eq!(json, "\"APPROVED\"");
        let parsed: CommentStatus = serde_json::from_str("\"SPAM\"").unwrap();
        assert_eq!(parsed, CommentStatus::Spam);
    }

    #[test]
    fn lowercase_status_is_rejected() {
        assert!(serde_json::from_str::<CommentStatus>("\"approved\"").is_err());
    }

    #[test]
    fn comment_serializes_camel_case_and_knows_replies() {
        let now = Utc::now();
        let mut comment = Comment {
            id: Uuid::new_v4(),
            post_id: Uuid::new_v4(),
            parent_id: None,
            author_name: "Ann".to_string(),
            author_email: "ann@example.com".to_string(),
            content: "Nice post".to_string(),
            ip_address: Some("192.0.2.1".to_string()),
            user_agent: None,
            status: CommentStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        assert!(!comment.is_reply());

        let json = serde_json::to_value(&comment).unwrap();
        assert_eq!(json["authorName"], "Ann");
        assert_eq!(json["ipAddress"], "192.0.2.1");
        assert!(json.get("author_name").is_none());

        comment.parent_id = Some(Uuid::new_v4());
        assert!(comment.is_reply());
    }
}
