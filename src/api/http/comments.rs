use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    api::http::client::ClientInfo,
    app::state::AppState,
    dto::comments::{
        ApprovedCommentsQuery, ApprovedCommentsResponse, CreateCommentRequest,
        PublicCommentResponse,
    },
    error::AppError,
    models::spam::SpamReason,
    services::notifications,
    telemetry::BusinessEvent,
    usecases::{antispam::AntiSpamInput, comments::CreateCommentParams},
};

pub const REJECTED_MESSAGE: &str = "comment did not pass validation";

pub async fn submit_comment_handle(
    State(state): State<AppState>,
    client: ClientInfo,
    Json(req): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<PublicCommentResponse>), AppError> {
    let check = state.antispam.check_anti_spam(AntiSpamInput {
        content: &req.content,
        honeypot: req.honeypot.as_deref(),
        ip_address: &client.ip_address,
    });

    if let Some(reason) = check.reason.filter(|_| !check.pass) {
        BusinessEvent::CommentRejected {
            reason,
            ip_address: client.ip_address,
        }
        .log();
        return Err(match reason {
            SpamReason::RateLimit => AppError::RateLimited(
                "too many comments, slow down".to_string(),
                None,
            ),
            _ => AppError::BadRequest(REJECTED_MESSAGE.to_string()),
        });
    }

    let comment = state
        .comments
        .create_comment(CreateCommentParams {
            post_id: req.post_id,
            parent_id: req.parent_id,
            author_name: req.author_name,
            author_email: req.author_email,
            content: req.content,
            ip_address: Some(client.ip_address),
            user_agent: client.user_agent,
        })
        .await?;

    notifications::spawn_new_comment_notification(
        state.email_service.clone(),
        state.store(),
        comment.clone(),
        req.honeypot,
    );

    Ok((StatusCode::CREATED, Json(comment.into())))
}

pub async fn list_post_comments_handle(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
    Query(query): Query<ApprovedCommentsQuery>,
) -> Result<Json<ApprovedCommentsResponse>, AppError> {
    let response = state.comments.get_approved_comments(post_id, query).await?;
    Ok(Json(response))
}
