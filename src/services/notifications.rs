//! Detached email notifications for new comments and replies.
//!
//! Nothing here can fail a request: tasks run after the handler has its
//! result, and every outcome is logged.

use std::sync::Arc;

use crate::{
    models::comments::{Comment, CommentStatus},
    repositories::comments::CommentStore,
    services::{email::EmailService, spam_filter::check_honeypot},
    telemetry::BusinessEvent,
};

/// Returns why a comment must not trigger mail, if it must not.
pub fn suppression_reason(comment: &Comment, honeypot: Option<&str>) -> Option<&'static str> {
    if comment.status == CommentStatus::Spam {
        return Some("spam_status");
    }
    if !check_honeypot(honeypot).pass {
        return Some("honeypot");
    }
    None
}

/// Nobody gets mail about answering themselves.
pub fn is_self_reply(parent: &Comment, reply: &Comment) -> bool {
    parent
        .author_email
        .trim()
        .eq_ignore_ascii_case(reply.author_email.trim())
}

fn suppressed(comment: &Comment, honeypot: Option<&str>) -> bool {
    match suppression_reason(comment, honeypot) {
        Some(reason) => {
            BusinessEvent::NotificationSuppressed {
                comment_id: comment.id,
                reason: reason.to_string(),
            }
            .log();
            true
        }
        None => false,
    }
}

/// Mails the site owner about a public comment, and the parent author when
/// the comment is a reply.
pub fn spawn_new_comment_notification(
    email: Option<EmailService>,
    store: Arc<dyn CommentStore>,
    comment: Comment,
    honeypot: Option<String>,
) {
    let Some(email) = email else {
        return;
    };
    if suppressed(&comment, honeypot.as_deref()) {
        return;
    }

    tokio::spawn(async move {
        let post = match store.find_post(comment.post_id).await {
            Ok(Some(post)) => post,
            Ok(None) => return,
            Err(err) => {
                log_failure(&comment, err.to_string());
                return;
            }
        };

        if let Err(err) = email
            .send_new_comment_notification(&comment, &post.title, &post.slug)
            .await
        {
            log_failure(&comment, err.to_string());
        }

        if comment.is_reply() {
            notify_parent_author(&email, store.as_ref(), &comment, &post.title, &post.slug).await;
        }
    });
}

/// Mails the author of the comment an admin just answered.
pub fn spawn_reply_notification(
    email: Option<EmailService>,
    store: Arc<dyn CommentStore>,
    reply: Comment,
) {
    let Some(email) = email else {
        return;
    };
    if suppressed(&reply, None) {
        return;
    }

    tokio::spawn(async move {
        match store.find_post(reply.post_id).await {
            Ok(Some(post)) => {
                notify_parent_author(&email, store.as_ref(), &reply, &post.title, &post.slug)
                    .await;
            }
            Ok(None) => {}
            Err(err) => log_failure(&reply, err.to_string()),
        }
    });
}

async fn notify_parent_author(
    email: &EmailService,
    store: &dyn CommentStore,
    reply: &Comment,
    post_title: &str,
    post_slug: &str,
) {
    let Some(parent_id) = reply.parent_id else {
        return;
    };
    let parent = match store.find_comment(parent_id).await {
        Ok(Some(parent)) => parent,
        Ok(None) => return,
        Err(err) => {
            log_failure(reply, err.to_string());
            return;
        }
    };

    if is_self_reply(&parent, reply) {
        BusinessEvent::NotificationSuppressed {
            comment_id: reply.id,
            reason: "self_reply".to_string(),
        }
        .log();
        return;
    }

    if let Err(err) = email
        .send_reply_notification(&parent, reply, post_title, post_slug)
        .await
    {
        log_failure(reply, err.to_string());
    }
}

fn log_failure(comment: &Comment, error: String) {
    BusinessEvent::NotificationFailed {
        comment_id: comment.id,
        error,
    }
    .log();
}
