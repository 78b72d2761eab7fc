use axum::{
    Json, Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, patch, post},
};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;

use crate::{
    api::http::{admin_comments as admin_http, comments as comments_http},
    app::{middleware::security_headers, state::AppState},
    auth::middleware::admin_auth_middleware,
    error::AppError,
    telemetry::request_logging_middleware,
};

pub fn cors_layer(origin: &str) -> Result<CorsLayer, AppError> {
    let origin = origin
        .parse::<HeaderValue>()
        .map_err(|_| AppError::Internal(format!("CORS_ORIGIN is invalid: {}", origin)))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]))
}

pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let public_routes = Router::new()
        .route("/api/comments", post(comments_http::submit_comment_handle))
        .route(
            "/api/posts/{post_id}/comments",
            get(comments_http::list_post_comments_handle),
        );

    let admin_routes = Router::new()
        .route("/api/admin/comments", get(admin_http::list_comments_handle))
        .route(
            "/api/admin/comments/stats",
            get(admin_http::comment_stats_handle),
        )
        .route(
            "/api/admin/comments/batch",
            post(admin_http::batch_update_handle),
        )
        .route(
            "/api/admin/comments/{comment_id}",
            patch(admin_http::update_comment_status_handle)
                .delete(admin_http::delete_comment_handle),
        )
        .route(
            "/api/admin/comments/{comment_id}/reply",
            post(admin_http::reply_to_comment_handle),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            admin_auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_handle))
        .merge(public_routes)
        .merge(admin_routes)
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(cors)
        .with_state(state)
}

async fn health_handle() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
