use sqlx::PgPool;
use tracing::instrument;

use crate::error::Result;
use crate::models::post::Post;

#[derive(Clone)]
pub struct ContentService {
    pool: PgPool,
}

impl ContentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// First post titled `title`, if any.
    #[instrument(skip(self))]
    pub async fn page(&self, title: &str) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, title, content, created_at
            FROM posts
            WHERE title = $1
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(title)
        .fetch_optional(&self.pool)
        .await?;

        if post.is_none() {
            tracing::debug!(title, "No post stored for page");
        }
        Ok(post)
    }
}
