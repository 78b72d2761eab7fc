use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{
        comments::{AdminCommentRow, Comment, CommentStatus, NewComment},
        posts::PostSummary,
    },
    repositories::{posts as post_repo, settings as setting_repo},
};

/// Storage contract the comment lifecycle runs against.
#[async_trait]
pub trait CommentStore: Send + Sync {
    async fn find_post(&self, post_id: Uuid) -> Result<Option<PostSummary>, AppError>;
    async fn find_setting(&self, key: &str) -> Result<Option<String>, AppError>;
    async fn find_comment(&self, id: Uuid) -> Result<Option<Comment>, AppError>;
    async fn insert_comment(&self, comment: NewComment) -> Result<Comment, AppError>;

    /// Approved comments without a parent, oldest first.
    async fn list_top_level_approved(
        &self,
        post_id: Uuid,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Comment>, AppError>;
    async fn count_top_level_approved(&self, post_id: Uuid) -> Result<i64, AppError>;

    /// Approved replies to any of `parent_ids`, oldest first.
    async fn list_approved_replies(&self, parent_ids: &[Uuid]) -> Result<Vec<Comment>, AppError>;

    /// Every comment (optionally one status) joined with its post, newest first.
    async fn list_admin_comments(
        &self,
        status: Option<CommentStatus>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<AdminCommentRow>, AppError>;
    async fn count_comments(&self, status: Option<CommentStatus>) -> Result<i64, AppError>;
    async fn count_created_since(&self, since: DateTime<Utc>) -> Result<i64, AppError>;

    async fn set_status(&self, id: Uuid, status: CommentStatus) -> Result<Comment, AppError>;
    async fn set_status_many(&self, ids: &[Uuid], status: CommentStatus)
    -> Result<u64, AppError>;

    /// Removes the row; direct replies go with it.
    async fn delete_comment(&self, id: Uuid) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct PgCommentStore {
    pool: PgPool,
}

impl PgCommentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const COMMENT_COLUMNS: &str = r#"
    c.id,
    c.post_id,
    c.parent_id,
    c.author_name,
    c.author_email,
    c.content,
    c.ip_address,
    c.user_agent,
    c.status,
    c.created_at,
    c.updated_at
"#;

#[async_trait]
impl CommentStore for PgCommentStore {
    async fn find_post(&self, post_id: Uuid) -> Result<Option<PostSummary>, AppError> {
        post_repo::find_post_summary(&self.pool, post_id).await
    }

    async fn find_setting(&self, key: &str) -> Result<Option<String>, AppError> {
        setting_repo::find_setting(&self.pool, key).await
    }

    async fn find_comment(&self, id: Uuid) -> Result<Option<Comment>, AppError> {
        let sql = format!("SELECT {COMMENT_COLUMNS} FROM comments c WHERE c.id = $1");
        let row = crate::log_query_fetch_optional!(
            "comments.find_comment",
            sqlx::query_as::<_, Comment>(&sql).bind(id).fetch_optional(&self.pool)
        )?;
        Ok(row)
    }

    async fn insert_comment(&self, comment: NewComment) -> Result<Comment, AppError> {
        let row = crate::log_query_fetch_one!(
            "comments.insert_comment",
            sqlx::query_as::<_, Comment>(
                r#"
                INSERT INTO comments (
                    post_id,
                    parent_id,
                    author_name,
                    author_email,
                    content,
                    ip_address,
                    user_agent,
                    status
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING
                    id,
                    post_id,
                    parent_id,
                    author_name,
                    author_email,
                    content,
                    ip_address,
                    user_agent,
                    status,
                    created_at,
                    updated_at
                "#,
            )
            .bind(comment.post_id)
            .bind(comment.parent_id)
            .bind(comment.author_name)
            .bind(comment.author_email)
            .bind(comment.content)
            .bind(comment.ip_address)
            .bind(comment.user_agent)
            .bind(comment.status)
            .fetch_one(&self.pool)
        )?;
        Ok(row)
    }

    async fn list_top_level_approved(
        &self,
        post_id: Uuid,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Comment>, AppError> {
        let sql = format!(
            r#"
            SELECT {COMMENT_COLUMNS}
            FROM comments c
            WHERE c.post_id = $1
            AND c.parent_id IS NULL
            AND c.status = 'APPROVED'
            ORDER BY c.created_at ASC, c.id ASC
            OFFSET $2
            LIMIT $3
            "#
        );
        let rows = crate::log_query_fetch_all!(
            "comments.list_top_level_approved",
            sqlx::query_as::<_, Comment>(&sql)
                .bind(post_id)
                .bind(offset)
                .bind(limit)
                .fetch_all(&self.pool)
        )?;
        Ok(rows)
    }

    async fn count_top_level_approved(&self, post_id: Uuid) -> Result<i64, AppError> {
        let total = crate::log_query_fetch_one!(
            "comments.count_top_level_approved",
            sqlx::query_scalar::<_, i64>(
                r#"
                SELECT COUNT(*)
                FROM comments
                WHERE post_id = $1
                AND parent_id IS NULL
                AND status = 'APPROVED'
                "#,
            )
            .bind(post_id)
            .fetch_one(&self.pool)
        )?;
        Ok(total)
    }

    async fn list_approved_replies(&self, parent_ids: &[Uuid]) -> Result<Vec<Comment>, AppError> {
        if parent_ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            r#"
            SELECT {COMMENT_COLUMNS}
            FROM comments c
            WHERE c.parent_id = ANY($1)
            AND c.status = 'APPROVED'
            ORDER BY c.created_at ASC, c.id ASC
            "#
        );
        let rows = crate::log_query_fetch_all!(
            "comments.list_approved_replies",
            sqlx::query_as::<_, Comment>(&sql)
                .bind(parent_ids)
                .fetch_all(&self.pool)
        )?;
        Ok(rows)
    }

    async fn list_admin_comments(
        &self,
        status: Option<CommentStatus>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<AdminCommentRow>, AppError> {
        let sql = format!(
            r#"
            SELECT
                {COMMENT_COLUMNS},
                p.title AS post_title,
                p.slug AS post_slug
            FROM comments c
            JOIN posts p ON p.id = c.post_id
            WHERE ($1::comment_status IS NULL OR c.status = $1)
            ORDER BY c.created_at DESC, c.id DESC
            OFFSET $2
            LIMIT $3
            "#
        );
        let rows = crate::log_query_fetch_all!(
            "comments.list_admin_comments",
            sqlx::query_as::<_, AdminCommentRow>(&sql)
                .bind(status)
                .bind(offset)
                .bind(limit)
                .fetch_all(&self.pool)
        )?;
        Ok(rows)
    }

    async fn count_comments(&self, status: Option<CommentStatus>) -> Result<i64, AppError> {
        let total = crate::log_query_fetch_one!(
            "comments.count_comments",
            sqlx::query_scalar::<_, i64>(
                r#"
                SELECT COUNT(*)
                FROM comments
                WHERE ($1::comment_status IS NULL OR status = $1)
                "#,
            )
            .bind(status)
            .fetch_one(&self.pool)
        )?;
        Ok(total)
    }

    async fn count_created_since(&self, since: DateTime<Utc>) -> Result<i64, AppError> {
        let total = crate::log_query_fetch_one!(
            "comments.count_created_since",
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM comments WHERE created_at >= $1")
                .bind(since)
                .fetch_one(&self.pool)
        )?;
        Ok(total)
    }

    async fn set_status(&self, id: Uuid, status: CommentStatus) -> Result<Comment, AppError> {
        let row = crate::log_query_fetch_one!(
            "comments.set_status",
            sqlx::query_as::<_, Comment>(
                r#"
                UPDATE comments
                SET status = $2,
                    updated_at = NOW()
                WHERE id = $1
                RETURNING
                    id,
                    post_id,
                    parent_id,
                    author_name,
                    author_email,
                    content,
                    ip_address,
                    user_agent,
                    status,
                    created_at,
                    updated_at
                "#,
            )
            .bind(id)
            .bind(status)
            .fetch_one(&self.pool)
        )?;
        Ok(row)
    }

    async fn set_status_many(
        &self,
        ids: &[Uuid],
        status: CommentStatus,
    ) -> Result<u64, AppError> {
        let result = crate::log_query_execute!(
            "comments.set_status_many",
            sqlx::query(
                r#"
                UPDATE comments
                SET status = $2,
                    updated_at = NOW()
                WHERE id = ANY($1)
                "#,
            )
            .bind(ids)
            .bind(status)
            .execute(&self.pool)
        )?;
        Ok(result.rows_affected())
    }

    async fn delete_comment(&self, id: Uuid) -> Result<(), AppError> {
        // comments.parent_id is ON DELETE CASCADE
        crate::log_query_execute!(
            "comments.delete_comment",
            sqlx::query("DELETE FROM comments WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
        )?;
        Ok(())
    }
}
