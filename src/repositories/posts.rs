use sqlx::PgPool;
use uuid::Uuid;

use crate::{error::AppError, models::posts::PostSummary};

pub async fn find_post_summary(pool: &PgPool, post_id: Uuid) -> Result<Option<PostSummary>, AppError> {
    let row = crate::log_query_fetch_optional!(
        "posts.find_post_summary",
        sqlx::query_as::<_, PostSummary>(
            r#"
            SELECT id, title, slug, status
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(post_id)
        .fetch_optional(pool)
    )?;

    Ok(row)
}
