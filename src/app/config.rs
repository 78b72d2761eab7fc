use std::{env, net::SocketAddr, time::Duration};

use crate::error::AppError;

pub const DEFAULT_FORBIDDEN_WORDS: &[&str] = &["spam", "viagra"];
pub const DEFAULT_MIN_COMMENT_LENGTH: usize = 2;
pub const DEFAULT_MAX_COMMENT_LENGTH: usize = 5000;
pub const DEFAULT_MAX_LINKS: usize = 3;
pub const DEFAULT_COMMENT_RATE_WINDOW_SECS: u64 = 60;
pub const DEFAULT_COMMENT_RATE_MAX: u32 = 3;
pub const DEFAULT_LOGIN_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_LOGIN_LOCKOUT_SECS: u64 = 15 * 60;
pub const DEFAULT_BATCH_MAX: usize = 50;

/// Thresholds for the public comment anti-spam pipeline.
#[derive(Debug, Clone)]
pub struct SpamConfig {
    pub forbidden_words: Vec<String>,
    pub min_length: usize,
    pub max_length: usize,
    pub max_links: usize,
    pub rate_window: Duration,
    pub rate_max: u32,
}

impl Default for SpamConfig {
    fn default() -> Self {
        Self {
            forbidden_words: DEFAULT_FORBIDDEN_WORDS
                .iter()
                .map(|word| word.to_string())
                .collect(),
            min_length: DEFAULT_MIN_COMMENT_LENGTH,
            max_length: DEFAULT_MAX_COMMENT_LENGTH,
            max_links: DEFAULT_MAX_LINKS,
            rate_window: Duration::from_secs(DEFAULT_COMMENT_RATE_WINDOW_SECS),
            rate_max: DEFAULT_COMMENT_RATE_MAX,
        }
    }
}

impl SpamConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let forbidden_words = env::var("SPAM_FORBIDDEN_WORDS")
            .ok()
            .map(|value| parse_word_list(&value))
            .unwrap_or(defaults.forbidden_words);

        Self {
            forbidden_words,
            min_length: read_env_usize("COMMENT_MIN_LENGTH").unwrap_or(defaults.min_length),
            max_length: read_env_usize("COMMENT_MAX_LENGTH").unwrap_or(defaults.max_length),
            max_links: read_env_usize("COMMENT_MAX_LINKS").unwrap_or(defaults.max_links),
            rate_window: read_env_u64("COMMENT_RATE_WINDOW_SECS")
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.rate_window),
            rate_max: read_env_u32("COMMENT_RATE_MAX")
                .filter(|max| *max > 0)
                .unwrap_or(defaults.rate_max),
        }
    }
}

/// Admin lockout and moderation limits.
#[derive(Debug, Clone)]
pub struct LimitsConfig {
    pub login_max_attempts: u32,
    pub login_lockout: Duration,
    pub batch_max: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            login_max_attempts: DEFAULT_LOGIN_MAX_ATTEMPTS,
            login_lockout: Duration::from_secs(DEFAULT_LOGIN_LOCKOUT_SECS),
            batch_max: DEFAULT_BATCH_MAX,
        }
    }
}

impl LimitsConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            login_max_attempts: read_env_u32("LOGIN_MAX_ATTEMPTS")
                .filter(|max| *max > 0)
                .unwrap_or(defaults.login_max_attempts),
            login_lockout: read_env_u64("LOGIN_LOCKOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.login_lockout),
            batch_max: read_env_usize("COMMENT_BATCH_MAX").unwrap_or(defaults.batch_max),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub bind_addr: SocketAddr,
    pub cors_origin: String,
    pub jwt_secret: String,
    /// Off unless the service sits behind a proxy that overwrites
    /// `X-Forwarded-For`; otherwise callers could pick their own rate-limit key.
    pub trust_proxy_headers: bool,
    pub spam: SpamConfig,
    pub limits: LimitsConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|err| AppError::Internal(format!("DATABASE_URL missing: {}", err)))?;
        let jwt_secret = env::var("JWT_SECRET")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| AppError::Internal("JWT_SECRET missing".to_string()))?;
        let bind_addr = match env::var("BIND_ADDR") {
            Ok(value) => value
                .parse()
                .map_err(|_| AppError::Internal(format!("BIND_ADDR is invalid: {}", value)))?,
            Err(_) => SocketAddr::from(([0, 0, 0, 0], 3000)),
        };

        Ok(Self {
            database_url,
            max_connections: read_env_u32("DATABASE_MAX_CONNECTIONS").unwrap_or(20),
            min_connections: read_env_u32("DATABASE_MIN_CONNECTIONS").unwrap_or(1),
            acquire_timeout: Duration::from_secs(
                read_env_u64("DATABASE_ACQUIRE_TIMEOUT_SECS").unwrap_or(15),
            ),
            bind_addr,
            cors_origin: env::var("CORS_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            jwt_secret,
            trust_proxy_headers: read_env_bool("TRUST_PROXY_HEADERS").unwrap_or(false),
            spam: SpamConfig::from_env(),
            limits: LimitsConfig::from_env(),
        })
    }
}

fn parse_word_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|word| word.trim().to_lowercase())
        .filter(|word| !word.is_empty())
        .collect()
}

fn read_env_u32(key: &str) -> Option<u32> {
    env::var(key).ok().and_then(|value| value.trim().parse::<u32>().ok())
}

fn read_env_u64(key: &str) -> Option<u64> {
    env::var(key).ok().and_then(|value| value.trim().parse::<u64>().ok())
}

fn read_env_usize(key: &str) -> Option<usize> {
    env::var(key).ok().and_then(|value| value.trim().parse::<usize>().ok())
}

fn read_env_bool(key: &str) -> Option<bool> {
    match env::var(key).ok()?.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}
