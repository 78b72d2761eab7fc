use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    app::state::AppState,
    dto::comments::{
        AdminCommentsQuery, AdminCommentsResponse, AdminReplyRequest, BatchUpdateRequest,
        BatchUpdateResponse, CommentStatsResponse, DeleteCommentQuery, UpdateCommentStatusRequest,
    },
    error::AppError,
    models::{admins::AdminUser, comments::Comment},
    services::notifications,
    usecases::comments::AdminReplyParams,
};

pub async fn list_comments_handle(
    State(state): State<AppState>,
    Query(query): Query<AdminCommentsQuery>,
) -> Result<Json<AdminCommentsResponse>, AppError> {
    let response = state.comments.get_admin_comments(query).await?;
    Ok(Json(response))
}

pub async fn comment_stats_handle(
    State(state): State<AppState>,
) -> Result<Json<CommentStatsResponse>, AppError> {
    let stats = state.comments.get_comment_stats().await?;
    Ok(Json(stats))
}

pub async fn update_comment_status_handle(
    State(state): State<AppState>,
    Path(comment_id): Path<Uuid>,
    Json(req): Json<UpdateCommentStatusRequest>,
) -> Result<Json<Comment>, AppError> {
    let comment = state
        .comments
        .update_comment_status(comment_id, req.status)
        .await?
        .ok_or_else(|| AppError::NotFound("comment not found".to_string()))?;
    Ok(Json(comment))
}

pub async fn delete_comment_handle(
    State(state): State<AppState>,
    Path(comment_id): Path<Uuid>,
    Query(query): Query<DeleteCommentQuery>,
) -> Result<Json<Comment>, AppError> {
    let comment = state.comments.delete_comment(comment_id, query.hard).await?;
    Ok(Json(comment))
}

pub async fn reply_to_comment_handle(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminUser>,
    Path(comment_id): Path<Uuid>,
    Json(req): Json<AdminReplyRequest>,
) -> Result<(StatusCode, Json<Comment>), AppError> {
    if req.content.trim().is_empty() {
        return Err(AppError::ValidationError("content required".to_string()));
    }

    let reply = state
        .comments
        .create_admin_reply(AdminReplyParams {
            comment_id,
            content: req.content,
            admin,
        })
        .await?;

    notifications::spawn_reply_notification(
        state.email_service.clone(),
        state.store(),
        reply.clone(),
    );

    Ok((StatusCode::CREATED, Json(reply)))
}

pub async fn batch_update_handle(
    State(state): State<AppState>,
    Json(req): Json<BatchUpdateRequest>,
) -> Result<Json<BatchUpdateResponse>, AppError> {
    let response = state
        .comments
        .batch_update_comments(&req.ids, req.action)
        .await?;
    Ok(Json(response))
}
