//! PostgreSQL implementation of the click-event log.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::NewClick;
use crate::domain::repositories::ClickLog;
use crate::error::AppError;

/// Appends classified clicks to the `clicks` table.
///
/// The table has no foreign key to `links`, so history survives link deletion.
pub struct PgClickLog {
    pool: Arc<PgPool>,
}

impl PgClickLog {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClickLog for PgClickLog {
    async fn append(&self, click: NewClick) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO clicks
                (code, ip, country, city, device_type, browser, os, referrer, clicked_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(click.code)
        .bind(click.ip)
        .bind(click.country)
        .bind(click.city)
        .bind(click.device_type)
        .bind(click.browser)
        .bind(click.os)
        .bind(click.referrer)
        .bind(click.clicked_at)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn count_by_code(&self, code: &str) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clicks WHERE code = $1")
            .bind(code)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn purge_by_code(&self, code: &str) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM clicks WHERE code = $1")
            .bind(code)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }
}
