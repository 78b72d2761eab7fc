use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::{
    api::http::client::client_ip, app::state::AppState, error::AppError,
    telemetry::BusinessEvent,
};

fn bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Guards the admin surface. Every rejected token counts against the caller's
/// IP; once locked out, the IP gets 429 until the lockout expires, even with
/// a valid token.
pub async fn admin_auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ip = client_ip(req.headers(), req.extensions(), state.trust_proxy_headers);

    let remaining = state.login_limiter.remaining_lockout(&ip);
    if !remaining.is_zero() {
        // round up so clients never retry a second early
        let remaining_secs = remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0);
        BusinessEvent::AdminLoginLockedOut {
            ip_address: ip,
            remaining_secs,
        }
        .log();
        return Err(AppError::RateLimited(
            "Too many failed attempts, try again later".to_string(),
            Some(remaining_secs),
        ));
    }

    let token = bearer_token(&req)
        .ok_or(AppError::Unauthorized(
            "Missing authorization token".to_string(),
        ))?
        .to_string();

    let admin = match state.jwt_config.verify_token(&token) {
        Ok(claims) => claims.admin_user(),
        Err(err) => {
            tracing::debug!(error = %err, "admin token rejected");
            None
        }
    };

    let Some(admin) = admin else {
        state.login_limiter.record_failed_attempt(&ip);
        return Err(AppError::Unauthorized("Invalid token".to_string()));
    };

    state.login_limiter.clear_attempts(&ip);
    req.extensions_mut().insert(admin);

    Ok(next.run(req).await)
}
