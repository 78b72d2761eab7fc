use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::models::{comments::CommentStatus, spam::SpamReason};

#[derive(Debug, Serialize)]
#[serde(tag = "event_type")]
pub enum BusinessEvent {
    CommentSubmitted {
        comment_id: Uuid,
        post_id: Uuid,
        parent_id: Option<Uuid>,
        status: CommentStatus,
        email_redacted: String,
    },
    CommentRejected {
        reason: SpamReason,
        ip_address: String,
    },
    CommentStatusChanged {
        comment_id: Uuid,
        from: CommentStatus,
        to: CommentStatus,
    },
    CommentDeleted {
        comment_id: Uuid,
        hard: bool,
    },
    CommentsBatchUpdated {
        requested: usize,
        updated: u64,
        status: CommentStatus,
    },
    AdminReplied {
        comment_id: Uuid,
        parent_id: Uuid,
        admin_id: Uuid,
    },
    AdminLoginLockedOut {
        ip_address: String,
        remaining_secs: u64,
    },
    NotificationSuppressed {
        comment_id: Uuid,
        reason: String,
    },
    NotificationFailed {
        comment_id: Uuid,
        error: String,
    },
}

pub fn redact_email(email: &str) -> String {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return "***".to_string();
    }
    let mut parts = trimmed.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let domain = parts.next().unwrap_or("");
    if local.is_empty() || domain.is_empty() {
        return "***".to_string();
    }
    let first_char = local.chars().next().unwrap_or('*');
    format!("{first_char}***@{domain}")
}

impl BusinessEvent {
    pub fn log(&self) {
        let event_json = serde_json::to_string(self).unwrap_or_else(|_| format!("{:?}", self));
        info!(
            target: "business_events",
            event = %event_json,
            "Business event occurred"
        );
    }
}
