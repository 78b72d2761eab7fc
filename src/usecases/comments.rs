use std::{collections::HashMap, sync::Arc, sync::LazyLock};

use chrono::{DateTime, NaiveTime, Utc};
use regex::Regex;
use uuid::Uuid;

use crate::{
    dto::comments::{
        AdminCommentsQuery, AdminCommentsResponse, ApprovedCommentsQuery,
        ApprovedCommentsResponse, BatchAction, BatchUpdateResponse, CommentStatsResponse,
        PublicCommentResponse, ThreadedCommentResponse,
    },
    error::AppError,
    models::{
        admins::AdminUser,
        comments::{Comment, CommentStatus, NewComment},
        posts::PostStatus,
    },
    repositories::{comments::CommentStore, settings::COMMENT_AUTO_APPROVE},
    telemetry::{BusinessEvent, redact_email},
};

const DEFAULT_PUBLIC_PAGE_SIZE: u32 = 10;
const MAX_PUBLIC_PAGE_SIZE: u32 = 50;
const DEFAULT_ADMIN_PAGE_SIZE: u32 = 20;
const MAX_ADMIN_PAGE_SIZE: u32 = 100;

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

#[derive(Debug, Clone)]
pub struct CreateCommentParams {
    pub post_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub author_name: String,
    pub author_email: String,
    pub content: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AdminReplyParams {
    pub comment_id: Uuid,
    pub content: String,
    pub admin: AdminUser,
}

/// Comment creation, threading, moderation and reporting.
pub struct CommentService {
    store: Arc<dyn CommentStore>,
    batch_limit: usize,
}

impl CommentService {
    pub fn new(store: Arc<dyn CommentStore>, batch_limit: usize) -> Self {
        Self { store, batch_limit }
    }

    pub fn store(&self) -> &Arc<dyn CommentStore> {
        &self.store
    }

    pub async fn create_comment(&self, params: CreateCommentParams) -> Result<Comment, AppError> {
        validate_comment_fields(&params)?;

        let post = self
            .store
            .find_post(params.post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("post not found".to_string()))?;
        if post.status != PostStatus::Published {
            return Err(AppError::NotFound(
                "cannot comment on unpublished post".to_string(),
            ));
        }

        let parent_id = match params.parent_id {
            Some(parent_id) => {
                let parent = self
                    .store
                    .find_comment(parent_id)
                    .await?
                    .ok_or_else(|| AppError::NotFound("parent comment not found".to_string()))?;
                Some(resolve_effective_parent(&parent))
            }
            None => None,
        };

        let auto_approve = self.store.find_setting(COMMENT_AUTO_APPROVE).await?;
        let status = initial_status(auto_approve.as_deref());

        let comment = self
            .store
            .insert_comment(NewComment {
                post_id: post.id,
                parent_id,
                author_name: params.author_name.trim().to_string(),
                author_email: params.author_email.trim().to_string(),
                content: params.content,
                ip_address: params.ip_address,
                user_agent: params.user_agent,
                status,
            })
            .await?;

        BusinessEvent::CommentSubmitted {
            comment_id: comment.id,
            post_id: comment.post_id,
            parent_id: comment.parent_id,
            status: comment.status,
            email_redacted: redact_email(&comment.author_email),
        }
        .log();

        Ok(comment)
    }

    pub async fn get_approved_comments(
        &self,
        post_id: Uuid,
        query: ApprovedCommentsQuery,
    ) -> Result<ApprovedCommentsResponse, AppError> {
        let page = normalize_page(query.page);
        let limit = normalize_limit(query.limit, DEFAULT_PUBLIC_PAGE_SIZE, MAX_PUBLIC_PAGE_SIZE);

        let top_level = self
            .store
            .list_top_level_approved(post_id, page_offset(page, limit), i64::from(limit))
            .await?;
        let total = self.store.count_top_level_approved(post_id).await?;

        if top_level.is_empty() {
            return Ok(ApprovedCommentsResponse {
                comments: Vec::new(),
                total,
                page,
                limit,
                total_pages: total_pages(total, limit),
            });
        }

        let parent_ids: Vec<Uuid> = top_level.iter().map(|comment| comment.id).collect();
        let replies = self.store.list_approved_replies(&parent_ids).await?;

        Ok(ApprovedCommentsResponse {
            comments: group_replies(top_level, replies),
            total,
            page,
            limit,
            total_pages: total_pages(total, limit),
        })
    }

    pub async fn get_admin_comments(
        &self,
        query: AdminCommentsQuery,
    ) -> Result<AdminCommentsResponse, AppError> {
        let page = normalize_page(query.page);
        let limit = normalize_limit(query.limit, DEFAULT_ADMIN_PAGE_SIZE, MAX_ADMIN_PAGE_SIZE);

        let rows = self
            .store
            .list_admin_comments(query.status, page_offset(page, limit), i64::from(limit))
            .await?;
        let total = self.store.count_comments(query.status).await?;

        Ok(AdminCommentsResponse {
            comments: rows.into_iter().map(Into::into).collect(),
            total,
            page,
            limit,
            total_pages: total_pages(total, limit),
        })
    }

    /// `Ok(None)` when the comment does not exist; nothing is written then.
    /// Every status can move to every other status.
    pub async fn update_comment_status(
        &self,
        id: Uuid,
        status: CommentStatus,
    ) -> Result<Option<Comment>, AppError> {
        let Some(existing) = self.store.find_comment(id).await? else {
            return Ok(None);
        };

        let updated = self.store.set_status(id, status).await?;
        BusinessEvent::CommentStatusChanged {
            comment_id: id,
            from: existing.status,
            to: updated.status,
        }
        .log();

        Ok(Some(updated))
    }

    /// Soft delete by default. A hard delete returns the row as it was and
    /// takes its direct replies with it.
    pub async fn delete_comment(&self, id: Uuid, hard: bool) -> Result<Comment, AppError> {
        let existing = self
            .store
            .find_comment(id)
            .await?
            .ok_or_else(|| AppError::NotFound("comment not found".to_string()))?;

        let result = if hard {
            self.store.delete_comment(id).await?;
            existing
        } else {
            self.store.set_status(id, CommentStatus::Deleted).await?
        };

        BusinessEvent::CommentDeleted {
            comment_id: id,
            hard,
        }
        .log();

        Ok(result)
    }

    /// Admin replies attach to exactly the comment they answer and skip
    /// moderation.
    pub async fn create_admin_reply(&self, params: AdminReplyParams) -> Result<Comment, AppError> {
        let parent = self
            .store
            .find_comment(params.comment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("parent comment not found".to_string()))?;

        let reply = self
            .store
            .insert_comment(NewComment {
                post_id: parent.post_id,
                parent_id: Some(parent.id),
                author_name: params.admin.name,
                author_email: params.admin.email,
                content: params.content,
                ip_address: None,
                user_agent: None,
                status: CommentStatus::Approved,
            })
            .await?;

        BusinessEvent::AdminReplied {
            comment_id: reply.id,
            parent_id: parent.id,
            admin_id: params.admin.id,
        }
        .log();

        Ok(reply)
    }

    pub async fn batch_update_comments(
        &self,
        ids: &[Uuid],
        action: BatchAction,
    ) -> Result<BatchUpdateResponse, AppError> {
        if ids.len() > self.batch_limit {
            return Err(AppError::ValidationError(format!(
                "cannot batch update more than {} comments at once",
                self.batch_limit
            )));
        }

        let status = action.target_status();
        let count = self.store.set_status_many(ids, status).await?;

        BusinessEvent::CommentsBatchUpdated {
            requested: ids.len(),
            updated: count,
            status,
        }
        .log();

        Ok(BatchUpdateResponse { count })
    }

    /// Four independent counts; not a consistent snapshot.
    pub async fn get_comment_stats(&self) -> Result<CommentStatsResponse, AppError> {
        let today = start_of_day_utc(Utc::now());
        let (pending, today_new, approved, spam) = tokio::try_join!(
            self.store.count_comments(Some(CommentStatus::Pending)),
            self.store.count_created_since(today),
            self.store.count_comments(Some(CommentStatus::Approved)),
            self.store.count_comments(Some(CommentStatus::Spam)),
        )?;

        Ok(CommentStatsResponse {
            pending,
            today_new,
            approved,
            spam,
        })
    }
}

/// Threads are two tiers deep: a reply to a reply hangs off the top-level
/// comment instead.
pub fn resolve_effective_parent(target: &Comment) -> Uuid {
    target.parent_id.unwrap_or(target.id)
}

fn initial_status(auto_approve: Option<&str>) -> CommentStatus {
    match auto_approve {
        Some("true") => CommentStatus::Approved,
        _ => CommentStatus::Pending,
    }
}

fn validate_comment_fields(params: &CreateCommentParams) -> Result<(), AppError> {
    if params.author_name.trim().is_empty() {
        return Err(AppError::ValidationError("author name required".to_string()));
    }
    if params.author_email.trim().is_empty() {
        return Err(AppError::ValidationError("email required".to_string()));
    }
    if params.content.trim().is_empty() {
        return Err(AppError::ValidationError("content required".to_string()));
    }
    if !is_valid_email(params.author_email.trim()) {
        return Err(AppError::ValidationError("invalid email format".to_string()));
    }
    Ok(())
}

fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

fn group_replies(
    top_level: Vec<Comment>,
    replies: Vec<Comment>,
) -> Vec<ThreadedCommentResponse> {
    let mut by_parent: HashMap<Uuid, Vec<PublicCommentResponse>> = HashMap::new();
    for reply in replies {
        if let Some(parent_id) = reply.parent_id {
            by_parent.entry(parent_id).or_default().push(reply.into());
        }
    }

    top_level
        .into_iter()
        .map(|comment| {
            let replies = by_parent.remove(&comment.id).unwrap_or_default();
            ThreadedCommentResponse {
                comment: comment.into(),
                replies,
            }
        })
        .collect()
}

fn normalize_page(page: Option<u32>) -> u32 {
    page.unwrap_or(1).max(1)
}

fn normalize_limit(limit: Option<u32>, default: u32, max: u32) -> u32 {
    limit.unwrap_or(default).clamp(1, max)
}

fn page_offset(page: u32, limit: u32) -> i64 {
    i64::from(page - 1) * i64::from(limit)
}

fn total_pages(total: i64, limit: u32) -> i64 {
    let limit = i64::from(limit);
    (total + limit - 1) / limit
}

fn start_of_day_utc(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive().and_time(NaiveTime::MIN).and_utc()
}
