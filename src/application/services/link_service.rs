//! Link creation, deletion and owner-scoped lookup and listing.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::application::services::CodeGenerator;
use crate::domain::entities::{Link, LinkPage, NewLink};
use crate::domain::repositories::{HotRanking, HotScore, LinkStore};
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;

/// Input for [`LinkService::create`].
#[derive(Debug, Clone)]
pub struct CreateLink {
    pub target_url: String,
    pub alias: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub owner_id: i64,
}

/// Service for creating, deleting and reading owned short links.
pub struct LinkService {
    links: Arc<dyn LinkStore>,
    cache: Arc<dyn CacheService>,
    ranking: Arc<dyn HotRanking>,
    generator: CodeGenerator,
}

impl LinkService {
    pub fn new(
        links: Arc<dyn LinkStore>,
        cache: Arc<dyn CacheService>,
        ranking: Arc<dyn HotRanking>,
        generator: CodeGenerator,
    ) -> Self {
        Self {
            links,
            cache,
            ranking,
            generator,
        }
    }

    /// Creates a short link.
    ///
    /// # Code Selection
    ///
    /// - With an alias, the alias becomes the code (or the call fails)
    /// - Without one, a random code is drawn; if the insert still hits the
    ///   unique constraint, another code is drawn from the same attempt budget
    ///
    /// # Errors
    ///
    /// Returns [`AppError::AliasTooLong`], [`AppError::Validation`],
    /// [`AppError::AliasConflict`], [`AppError::GenerationExhausted`] or
    /// [`AppError::StoreUnavailable`].
    pub async fn create(&self, request: CreateLink) -> Result<Link, AppError> {
        let mut budget = self.generator.budget();

        loop {
            let code = self
                .generator
                .generate_within(request.alias.as_deref(), &mut budget)
                .await?;

            let new_link = NewLink {
                code,
                target_url: request.target_url.clone(),
                is_alias: request.alias.is_some(),
                expires_at: request.expires_at,
                owner_id: request.owner_id,
            };

            match self.links.insert_unique(new_link).await {
                Ok(link) => {
                    info!(code = %link.code, owner_id = link.owner_id, alias = link.is_alias, "Link created");
                    return Ok(link);
                }
                Err(AppError::AliasConflict { code }) if request.alias.is_none() => {
                    warn!(code = %code, attempt = budget.used(), "Insert raced on generated code, retrying");
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Deletes a link owned by `owner_id` and invalidates its cache entry.
    ///
    /// Returns `Ok(false)` when the code does not exist or belongs to someone else.
    pub async fn delete(&self, code: &str, owner_id: i64) -> Result<bool, AppError> {
        if !self.links.delete_by_code(code, owner_id).await? {
            return Ok(false);
        }

        if let Err(e) = self.cache.invalidate(code).await {
            warn!(code, error = %e, "Cache invalidation failed");
            metrics::counter!("cache_errors_total", "op" => "invalidate").increment(1);
        }

        if let Err(e) = self.ranking.remove(code).await {
            warn!(code, error = %e, "Failed to remove code from hot ranking");
        }

        info!(code, owner_id, "Link deleted");
        Ok(true)
    }

    /// Returns a link if it exists and belongs to `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for unknown codes and for links of other owners.
    pub async fn get_owned(&self, code: &str, owner_id: i64) -> Result<Link, AppError> {
        self.links
            .get_by_code(code)
            .await?
            .filter(|link| link.owner_id == owner_id)
            .ok_or_else(|| AppError::not_found(code))
    }

    /// One page of the links owned by `owner_id`, newest first.
    pub async fn list_owned(
        &self,
        owner_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<LinkPage, AppError> {
        self.links.list_by_owner(owner_id, offset, limit).await
    }

    /// The `k` most clicked codes.
    pub async fn hot(&self, k: usize) -> Result<Vec<HotScore>, AppError> {
        self.ranking
            .top(k)
            .await
            .map_err(|e| AppError::StoreUnavailable(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::{MockHotRanking, MockLinkStore, RankingError};
    use crate::infrastructure::cache::{CacheError, MockCacheService};

    fn request(alias: Option<&str>) -> CreateLink {
        CreateLink {
            target_url: "https://example.com/path".to_string(),
            alias: alias.map(str::to_string),
            expires_at: None,
            owner_id: 42,
        }
    }

    fn service(
        links: MockLinkStore,
        cache: MockCacheService,
        ranking: MockHotRanking,
    ) -> LinkService {
        let links: Arc<dyn LinkStore> = Arc::new(links);
        LinkService::new(
            links.clone(),
            Arc::new(cache),
            Arc::new(ranking),
            CodeGenerator::new(links, 6, 3),
        )
    }

    #[tokio::test]
    async fn test_create_with_alias() {
        let mut links = MockLinkStore::new();
        links.expect_exists().times(1).returning(|_| Ok(false));
        links
            .expect_insert_unique()
            .withf(|new_link| new_link.code == "promo" && new_link.is_alias && new_link.owner_id == 42)
            .times(1)
            .returning(|new_link| Ok(new_link.into_link(Utc::now())));

        let service = service(links, MockCacheService::new(), MockHotRanking::new());
        let link = service.create(request(Some("promo"))).await.unwrap();

        assert_eq!(link.code, "promo");
        assert_eq!(link.target_url, "https://example.com/path");
    }

    #[tokio::test]
    async fn test_create_alias_insert_conflict_is_not_retried() {
        let mut links = MockLinkStore::new();
        links.expect_exists().times(1).returning(|_| Ok(false));
        links
            .expect_insert_unique()
            .times(1)
            .returning(|new_link| Err(AppError::alias_conflict(new_link.code)));

        let service = service(links, MockCacheService::new(), MockHotRanking::new());
        let result = service.create(request(Some("promo"))).await;

        assert!(matches!(result, Err(AppError::AliasConflict { code }) if code == "promo"));
    }

    #[tokio::test]
    async fn test_create_random_retries_insert_race() {
        let mut links = MockLinkStore::new();
        links.expect_exists().times(2).returning(|_| Ok(false));
        let mut inserts = 0;
        links.expect_insert_unique().times(2).returning(move |new_link| {
            inserts += 1;
            if inserts == 1 {
                Err(AppError::alias_conflict(new_link.code))
            } else {
                Ok(new_link.into_link(Utc::now()))
            }
        });

        let service = service(links, MockCacheService::new(), MockHotRanking::new());
        let link = service.create(request(None)).await.unwrap();

        assert!(!link.is_alias);
        assert_eq!(link.code.len(), 6);
    }

    #[tokio::test]
    async fn test_create_random_races_share_attempt_budget() {
        let mut links = MockLinkStore::new();
        links.expect_exists().times(3).returning(|_| Ok(false));
        links
            .expect_insert_unique()
            .times(3)
            .returning(|new_link| Err(AppError::alias_conflict(new_link.code)));

        let service = service(links, MockCacheService::new(), MockHotRanking::new());
        let result = service.create(request(None)).await;

        assert!(matches!(
            result,
            Err(AppError::GenerationExhausted { attempts: 3 })
        ));
    }

    #[tokio::test]
    async fn test_delete_invalidates_cache_and_ranking() {
        let mut links = MockLinkStore::new();
        links
            .expect_delete_by_code()
            .withf(|code, owner| code == "promo" && *owner == 42)
            .times(1)
            .returning(|_, _| Ok(true));

        let mut cache = MockCacheService::new();
        cache
            .expect_invalidate()
            .withf(|code| code == "promo")
            .times(1)
            .returning(|_| Ok(()));

        let mut ranking = MockHotRanking::new();
        ranking.expect_remove().times(1).returning(|_| Ok(()));

        let service = service(links, cache, ranking);

        assert!(service.delete("promo", 42).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_absent_leaves_cache_alone() {
        let mut links = MockLinkStore::new();
        links.expect_delete_by_code().returning(|_, _| Ok(false));

        let mut cache = MockCacheService::new();
        cache.expect_invalidate().never();

        let service = service(links, cache, MockHotRanking::new());

        assert!(!service.delete("promo", 42).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_succeeds_when_cache_and_ranking_fail() {
        let mut links = MockLinkStore::new();
        links.expect_delete_by_code().returning(|_, _| Ok(true));

        let mut cache = MockCacheService::new();
        cache
            .expect_invalidate()
            .returning(|_| Err(CacheError::OperationError("timeout".to_string())));

        let mut ranking = MockHotRanking::new();
        ranking
            .expect_remove()
            .returning(|_| Err(RankingError::Unavailable("timeout".to_string())));

        let service = service(links, cache, ranking);

        assert!(service.delete("promo", 42).await.unwrap());
    }

    #[tokio::test]
    async fn test_get_owned_hides_other_owners() {
        let mut links = MockLinkStore::new();
        links.expect_get_by_code().returning(|code| {
            Ok(Some(
                NewLink {
                    code: code.to_string(),
                    target_url: "https://example.com".to_string(),
                    is_alias: false,
                    expires_at: None,
                    owner_id: 7,
                }
                .into_link(Utc::now()),
            ))
        });

        let service = service(links, MockCacheService::new(), MockHotRanking::new());

        assert!(service.get_owned("abc123", 7).await.is_ok());
        assert!(matches!(
            service.get_owned("abc123", 8).await,
            Err(AppError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_owned_passes_window_through() {
        let mut links = MockLinkStore::new();
        links
            .expect_list_by_owner()
            .withf(|owner, offset, limit| *owner == 42 && *offset == 20 && *limit == 10)
            .times(1)
            .returning(|_, _, _| {
                Ok(LinkPage {
                    links: Vec::new(),
                    total: 25,
                })
            });

        let service = service(links, MockCacheService::new(), MockHotRanking::new());
        let page = service.list_owned(42, 20, 10).await.unwrap();

        assert!(page.links.is_empty());
        assert_eq!(page.total, 25);
    }

    #[tokio::test]
    async fn test_hot_maps_ranking_errors() {
        let mut ranking = MockHotRanking::new();
        ranking
            .expect_top()
            .returning(|_| Err(RankingError::Unavailable("down".to_string())));

        let service = service(MockLinkStore::new(), MockCacheService::new(), ranking);

        assert!(matches!(
            service.hot(10).await,
            Err(AppError::StoreUnavailable(_))
        ));
    }
}
