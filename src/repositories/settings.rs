use sqlx::PgPool;

use crate::error::AppError;

pub const COMMENT_AUTO_APPROVE: &str = "comment_auto_approve";

pub async fn find_setting(pool: &PgPool, key: &str) -> Result<Option<String>, AppError> {
    let value = crate::log_query_fetch_optional!(
        "settings.find_setting",
        sqlx::query_scalar::<_, String>("SELECT value FROM site_settings WHERE key = $1")
            .bind(key)
            .fetch_optional(pool)
    )?;

    Ok(value)
}
