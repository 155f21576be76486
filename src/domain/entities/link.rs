//! Short link entity and its cacheable snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A short link as held by the durable link store.
///
/// `code` is globally unique. `click_count` only ever grows and is written
/// exclusively by the click recorder; `expires_at` never changes after
/// creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    pub code: String,
    pub target_url: String,
    pub is_alias: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub owner_id: i64,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
}

impl Link {
    /// Returns true if the link has passed its expiry time.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|e| e < Utc::now())
    }

    /// Snapshot of the fields the redirect path needs, for caching.
    pub fn snapshot(&self) -> LinkSnapshot {
        LinkSnapshot {
            target_url: self.target_url.clone(),
            expires_at: self.expires_at,
            click_count: self.click_count,
        }
    }
}

/// Input data for inserting a new link.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLink {
    pub code: String,
    pub target_url: String,
    pub is_alias: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub owner_id: i64,
}

impl NewLink {
    /// Materializes the record the store persists, with a zero counter.
    pub fn into_link(self, created_at: DateTime<Utc>) -> Link {
        Link {
            code: self.code,
            target_url: self.target_url,
            is_alias: self.is_alias,
            expires_at: self.expires_at,
            owner_id: self.owner_id,
            click_count: 0,
            created_at,
        }
    }
}

/// One page of an owner's links, newest first, plus the owner's total.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LinkPage {
    pub links: Vec<Link>,
    pub total: i64,
}

/// The cached view of a link used by the redirect path.
///
/// Expiry is evaluated from `expires_at` on every read, independently of how
/// long the snapshot has been cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkSnapshot {
    pub target_url: String,
    pub expires_at: Option<DateTime<Utc>>,
    /// Counter value at the time the snapshot was taken. Informational only.
    pub click_count: i64,
}

impl LinkSnapshot {
    /// Returns true if the snapshot's expiry lies strictly before `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|e| e < now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_link(expires_at: Option<DateTime<Utc>>) -> Link {
        NewLink {
            code: "abc123".to_string(),
            target_url: "https://example.com".to_string(),
            is_alias: false,
            expires_at,
            owner_id: 7,
        }
        .into_link(Utc::now())
    }

    #[test]
    fn test_new_link_starts_with_zero_clicks() {
        let link = sample_link(None);

        assert_eq!(link.code, "abc123");
        assert_eq!(link.owner_id, 7);
        assert_eq!(link.click_count, 0);
        assert!(!link.is_expired());
    }

    #[test]
    fn test_link_is_expired() {
        let link = sample_link(Some(Utc::now() - Duration::seconds(1)));
        assert!(link.is_expired());

        let link = sample_link(Some(Utc::now() + Duration::hours(1)));
        assert!(!link.is_expired());
    }

    #[test]
    fn test_snapshot_keeps_expiry() {
        let expiry = Utc::now() - Duration::minutes(5);
        let snapshot = sample_link(Some(expiry)).snapshot();

        assert_eq!(snapshot.expires_at, Some(expiry));
        assert!(snapshot.is_expired_at(Utc::now()));
        assert!(!snapshot.is_expired_at(expiry - Duration::seconds(1)));
    }

    #[test]
    fn test_snapshot_json_shape() {
        let snapshot = sample_link(None).snapshot();
        let json = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(json["target_url"], "https://example.com");
        assert!(json["expires_at"].is_null());
        assert_eq!(json["click_count"], 0);
    }
}
