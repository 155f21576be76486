//! Process-local implementations of the storage collaborators.
//!
//! Used by integration tests and for running the service without a database.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Mutex;

use crate::domain::entities::{Link, LinkPage, NewClick, NewLink};
use crate::domain::repositories::{ClickLog, LinkStore};
use crate::error::AppError;

/// In-memory link store backed by a [`DashMap`].
///
/// Inserts go through the entry API, so two concurrent inserts of the same
/// code cannot both succeed.
#[derive(Debug, Default)]
pub struct InMemoryLinkStore {
    links: DashMap<String, Link>,
}

impl InMemoryLinkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored links.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

#[async_trait]
impl LinkStore for InMemoryLinkStore {
    async fn get_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        Ok(self.links.get(code).map(|l| l.value().clone()))
    }

    async fn exists(&self, code: &str) -> Result<bool, AppError> {
        Ok(self.links.contains_key(code))
    }

    async fn insert_unique(&self, new_link: NewLink) -> Result<Link, AppError> {
        match self.links.entry(new_link.code.clone()) {
            Entry::Occupied(_) => Err(AppError::alias_conflict(new_link.code)),
            Entry::Vacant(slot) => {
                let link = new_link.into_link(Utc::now());
                slot.insert(link.clone());
                Ok(link)
            }
        }
    }

    async fn increment_counter(&self, code: &str) -> Result<(), AppError> {
        if let Some(mut link) = self.links.get_mut(code) {
            link.click_count += 1;
        }
        Ok(())
    }

    async fn delete_by_code(&self, code: &str, owner_id: i64) -> Result<bool, AppError> {
        Ok(self
            .links
            .remove_if(code, |_, link| link.owner_id == owner_id)
            .is_some())
    }

    async fn list_by_owner(
        &self,
        owner_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<LinkPage, AppError> {
        let mut owned: Vec<Link> = self
            .links
            .iter()
            .filter(|entry| entry.owner_id == owner_id)
            .map(|entry| entry.value().clone())
            .collect();
        owned.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.code.cmp(&b.code))
        });

        let total = owned.len() as i64;
        let links = owned
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect();

        Ok(LinkPage { links, total })
    }

    async fn health_check(&self) -> bool {
        true
    }
}

/// In-memory append-only click log.
#[derive(Debug, Default)]
pub struct InMemoryClickLog {
    events: Mutex<Vec<NewClick>>,
}

impl InMemoryClickLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every stored event, oldest first.
    pub fn events(&self) -> Vec<NewClick> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    fn poisoned() -> AppError {
        AppError::StoreUnavailable("click log lock poisoned".to_string())
    }
}

#[async_trait]
impl ClickLog for InMemoryClickLog {
    async fn append(&self, click: NewClick) -> Result<(), AppError> {
        self.events.lock().map_err(|_| Self::poisoned())?.push(click);
        Ok(())
    }

    async fn count_by_code(&self, code: &str) -> Result<i64, AppError> {
        let events = self.events.lock().map_err(|_| Self::poisoned())?;
        Ok(events.iter().filter(|c| c.code == code).count() as i64)
    }

    async fn purge_by_code(&self, code: &str) -> Result<u64, AppError> {
        let mut events = self.events.lock().map_err(|_| Self::poisoned())?;
        let before = events.len();
        events.retain(|c| c.code != code);
        Ok((before - events.len()) as u64)
    }
}
