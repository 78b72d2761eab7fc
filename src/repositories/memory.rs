//! In-process `CommentStore` used by unit and router tests.

use std::{
    collections::HashMap,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{
        comments::{AdminCommentRow, Comment, CommentStatus, NewComment},
        posts::{PostStatus, PostSummary},
    },
    repositories::comments::CommentStore,
};

struct MemoryState {
    posts: HashMap<Uuid, PostSummary>,
    settings: HashMap<String, String>,
    comments: Vec<Comment>,
    base_time: DateTime<Utc>,
    ticks: i64,
}

pub struct MemoryCommentStore {
    state: Mutex<MemoryState>,
    writes: AtomicUsize,
}

impl Default for MemoryCommentStore {
    fn default() -> Self {
        Self {
            state: Mutex::new(MemoryState {
                posts: HashMap::new(),
                settings: HashMap::new(),
                comments: Vec::new(),
                base_time: Utc::now(),
                ticks: 0,
            }),
            writes: AtomicUsize::new(0),
        }
    }
}

impl MemoryCommentStore {
    pub fn add_post(&self, status: PostStatus) -> PostSummary {
        let id = Uuid::new_v4();
        let post = PostSummary {
            id,
            title: format!("Post {}", &id.to_string()[..8]),
            slug: format!("post-{}", &id.to_string()[..8]),
            status,
        };
        self.state
            .lock()
            .unwrap()
            .posts
            .insert(id, post.clone());
        post
    }

    pub fn set_setting(&self, key: &str, value: &str) {
        self.state
            .lock()
            .unwrap()
            .settings
            .insert(key.to_string(), value.to_string());
    }

    /// Inserts a row directly, bypassing the write counter.
    pub fn seed_comment(
        &self,
        post_id: Uuid,
        parent_id: Option<Uuid>,
        status: CommentStatus,
        created_at: DateTime<Utc>,
    ) -> Comment {
        let comment = Comment {
            id: Uuid::new_v4(),
            post_id,
            parent_id,
            author_name: "Seeded Reader".to_string(),
            author_email: "seeded@example.com".to_string(),
            content: "seeded comment".to_string(),
            ip_address: Some("127.0.0.1".to_string()),
            user_agent: None,
            status,
            created_at,
            updated_at: created_at,
        };
        self.state.lock().unwrap().comments.push(comment.clone());
        comment
    }

    pub fn get(&self, id: Uuid) -> Option<Comment> {
        self.state
            .lock()
            .unwrap()
            .comments
            .iter()
            .find(|comment| comment.id == id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.state.lock().unwrap().comments.len()
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

fn paginate<T>(items: Vec<T>, offset: i64, limit: i64) -> Vec<T> {
    items
        .into_iter()
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .collect()
}

#[async_trait]
impl CommentStore for MemoryCommentStore {
    async fn find_post(&self, post_id: Uuid) -> Result<Option<PostSummary>, AppError> {
        Ok(self.state.lock().unwrap().posts.get(&post_id).cloned())
    }

    async fn find_setting(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.state.lock().unwrap().settings.get(key).cloned())
    }

    async fn find_comment(&self, id: Uuid) -> Result<Option<Comment>, AppError> {
        Ok(self.get(id))
    }

    async fn insert_comment(&self, comment: NewComment) -> Result<Comment, AppError> {
        self.record_write();
        let mut state = self.state.lock().unwrap();
        state.ticks += 1;
        let created_at = state.base_time + Duration::milliseconds(state.ticks);
        let row = Comment {
            id: Uuid::new_v4(),
            post_id: comment.post_id,
            parent_id: comment.parent_id,
            author_name: comment.author_name,
            author_email: comment.author_email,
            content: comment.content,
            ip_address: comment.ip_address,
            user_agent: comment.user_agent,
            status: comment.status,
            created_at,
            updated_at: created_at,
        };
        state.comments.push(row.clone());
        Ok(row)
    }

    async fn list_top_level_approved(
        &self,
        post_id: Uuid,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Comment>, AppError> {
        let state = self.state.lock().unwrap();
        let mut rows: Vec<Comment> = state
            .comments
            .iter()
            .filter(|c| {
                c.post_id == post_id && c.parent_id.is_none() && c.status == CommentStatus::Approved
            })
            .cloned()
            .collect();
        rows.sort_by_key(|c| c.created_at);
        Ok(paginate(rows, offset, limit))
    }

    async fn count_top_level_approved(&self, post_id: Uuid) -> Result<i64, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .comments
            .iter()
            .filter(|c| {
                c.post_id == post_id && c.parent_id.is_none() && c.status == CommentStatus::Approved
            })
            .count() as i64)
    }

    async fn list_approved_replies(&self, parent_ids: &[Uuid]) -> Result<Vec<Comment>, AppError> {
        let state = self.state.lock().unwrap();
        let mut rows: Vec<Comment> = state
            .comments
            .iter()
            .filter(|c| {
                c.status == CommentStatus::Approved
                    && c.parent_id.is_some_and(|parent| parent_ids.contains(&parent))
            })
            .cloned()
            .collect();
        rows.sort_by_key(|c| c.created_at);
        Ok(rows)
    }

    async fn list_admin_comments(
        &self,
        status: Option<CommentStatus>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<AdminCommentRow>, AppError> {
        let state = self.state.lock().unwrap();
        let mut rows: Vec<AdminCommentRow> = state
            .comments
            .iter()
            .filter(|c| status.is_none_or(|status| c.status == status))
            .filter_map(|c| {
                state.posts.get(&c.post_id).map(|post| AdminCommentRow {
                    comment: c.clone(),
                    post_title: post.title.clone(),
                    post_slug: post.slug.clone(),
                })
            })
            .collect();
        rows.sort_by(|a, b| b.comment.created_at.cmp(&a.comment.created_at));
        Ok(paginate(rows, offset, limit))
    }

    async fn count_comments(&self, status: Option<CommentStatus>) -> Result<i64, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .comments
            .iter()
            .filter(|c| status.is_none_or(|status| c.status == status))
            .count() as i64)
    }

    async fn count_created_since(&self, since: DateTime<Utc>) -> Result<i64, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .comments
            .iter()
            .filter(|c| c.created_at >= since)
            .count() as i64)
    }

    async fn set_status(&self, id: Uuid, status: CommentStatus) -> Result<Comment, AppError> {
        self.record_write();
        let mut state = self.state.lock().unwrap();
        let comment = state
            .comments
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::NotFound("Data not found".to_string()))?;
        comment.status = status;
        comment.updated_at = Utc::now();
        Ok(comment.clone())
    }

    async fn set_status_many(
        &self,
        ids: &[Uuid],
        status: CommentStatus,
    ) -> Result<u64, AppError> {
        self.record_write();
        let mut state = self.state.lock().unwrap();
        let mut updated = 0;
        for comment in state.comments.iter_mut().filter(|c| ids.contains(&c.id)) {
            comment.status = status;
            comment.updated_at = Utc::now();
            updated += 1;
        }
        Ok(updated)
    }

    async fn delete_comment(&self, id: Uuid) -> Result<(), AppError> {
        self.record_write();
        let mut state = self.state.lock().unwrap();
        state
            .comments
            .retain(|c| c.id != id && c.parent_id != Some(id));
        Ok(())
    }
}
