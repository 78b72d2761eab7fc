use std::sync::Arc;

use tracing::warn;

use crate::{
    app::config::AppConfig,
    auth::{jwt::JwtConfig, rate_limit::LoginLimiter},
    repositories::comments::CommentStore,
    services::email::EmailService,
    usecases::{antispam::AntiSpamService, comments::CommentService},
};

#[derive(Clone)]
pub struct AppState {
    pub comments: Arc<CommentService>,
    pub antispam: Arc<AntiSpamService>,
    pub login_limiter: Arc<LoginLimiter>,
    pub jwt_config: JwtConfig,
    pub email_service: Option<EmailService>,
    pub trust_proxy_headers: bool,
}

impl AppState {
    pub fn new(config: &AppConfig, store: Arc<dyn CommentStore>) -> Self {
        let email_service = match EmailService::from_env() {
            Ok(service) => Some(service),
            Err(message) => {
                warn!("Email service not configured: {}", message);
                None
            }
        };

        Self {
            comments: Arc::new(CommentService::new(store, config.limits.batch_max)),
            antispam: Arc::new(AntiSpamService::from_config(&config.spam)),
            login_limiter: Arc::new(LoginLimiter::from_config(&config.limits)),
            jwt_config: JwtConfig::from_env(config.jwt_secret.clone()),
            email_service,
            trust_proxy_headers: config.trust_proxy_headers,
        }
    }

    pub fn store(&self) -> Arc<dyn CommentStore> {
        self.comments.store().clone()
    }
}

#[cfg(test)]
impl AppState {
    pub fn for_tests() -> Self {
        Self::with_store(Arc::new(
            crate::repositories::memory::MemoryCommentStore::default(),
        ))
    }

    pub fn with_store(store: Arc<crate::repositories::memory::MemoryCommentStore>) -> Self {
        use crate::app::config::{DEFAULT_BATCH_MAX, LimitsConfig};

        Self {
            comments: Arc::new(CommentService::new(store, DEFAULT_BATCH_MAX)),
            antispam: Arc::new(AntiSpamService::default()),
            login_limiter: Arc::new(LoginLimiter::from_config(&LimitsConfig::default())),
            jwt_config: JwtConfig {
                secret: "test-secret".to_string(),
                expiration_hours: 1,
                issuer: None,
                audience: None,
            },
            email_service: None,
            trust_proxy_headers: false,
        }
    }
}
