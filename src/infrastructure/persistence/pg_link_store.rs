//! PostgreSQL implementation of the link store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Link, LinkPage, NewLink};
use crate::domain::repositories::LinkStore;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct LinkRow {
    code: String,
    target_url: String,
    is_alias: bool,
    expires_at: Option<DateTime<Utc>>,
    owner_id: i64,
    click_count: i64,
    created_at: DateTime<Utc>,
}

impl From<LinkRow> for Link {
    fn from(r: LinkRow) -> Self {
        Link {
            code: r.code,
            target_url: r.target_url,
            is_alias: r.is_alias,
            expires_at: r.expires_at,
            owner_id: r.owner_id,
            click_count: r.click_count,
            created_at: r.created_at,
        }
    }
}

/// PostgreSQL link store.
///
/// Code uniqueness is enforced by the `links_code_key` unique constraint;
/// a violation on insert surfaces as [`AppError::AliasConflict`] carrying the
/// rejected code.
pub struct PgLinkStore {
    pool: Arc<PgPool>,
}

impl PgLinkStore {
    /// Creates a new store with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkStore for PgLinkStore {
    async fn get_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT code, target_url, is_alias, expires_at, owner_id, click_count, created_at
            FROM links
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn exists(&self, code: &str) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM links WHERE code = $1)")
                .bind(code)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(exists)
    }

    async fn insert_unique(&self, new_link: NewLink) -> Result<Link, AppError> {
        let code = new_link.code.clone();

        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            INSERT INTO links (code, target_url, is_alias, expires_at, owner_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING code, target_url, is_alias, expires_at, owner_id, click_count, created_at
            "#,
        )
        .bind(new_link.code)
        .bind(new_link.target_url)
        .bind(new_link.is_alias)
        .bind(new_link.expires_at)
        .bind(new_link.owner_id)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| insert_error(e, code))?;

        Ok(row.into())
    }

    async fn increment_counter(&self, code: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE links SET click_count = click_count + 1 WHERE code = $1")
            .bind(code)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    async fn delete_by_code(&self, code: &str, owner_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM links WHERE code = $1 AND owner_id = $2")
            .bind(code)
            .bind(owner_id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_by_owner(
        &self,
        owner_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<LinkPage, AppError> {
        let (rows, total) = tokio::try_join!(
            sqlx::query_as::<_, LinkRow>(
                r#"
                SELECT code, target_url, is_alias, expires_at, owner_id, click_count, created_at
                FROM links
                WHERE owner_id = $1
                ORDER BY created_at DESC, code ASC
                LIMIT $2 OFFSET $3
                "#,
            )
            .bind(owner_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool.as_ref()),
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM links WHERE owner_id = $1")
                .bind(owner_id)
                .fetch_one(self.pool.as_ref()),
        )?;

        Ok(LinkPage {
            links: rows.into_iter().map(Link::from).collect(),
            total,
        })
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .is_ok()
    }
}

/// Maps a failed insert. A unique violation means `code` is taken; anything
/// else is a store failure.
fn insert_error(e: sqlx::Error, code: String) -> AppError {
    if e.as_database_error().is_some_and(|db| db.is_unique_violation()) {
        return AppError::alias_conflict(code);
    }
    AppError::from(e)
}
