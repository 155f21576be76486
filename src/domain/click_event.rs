//! Click event model for asynchronous click recording.

use chrono::{DateTime, Utc};

use crate::domain::entities::NewClick;
use crate::utils::geo::{GeoLookup, classify_ip};
use crate::utils::user_agent::parse_user_agent;

/// Raw request metadata captured when a short link resolves.
///
/// Built by the redirect path and classified into a [`NewClick`] before it is
/// queued, so the background worker never repeats request parsing.
///
/// # Usage Flow
///
/// 1. Created by [`crate::application::services::RedirectPipeline`] on a successful resolve
/// 2. Classified (geo + device) by [`crate::application::services::ClickRecorder`]
/// 3. Queued and processed by [`crate::domain::click_worker::run_click_worker`]
#[derive(Debug, Clone)]
pub struct ClickEvent {
    pub code: String,
    pub ip: String,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub clicked_at: DateTime<Utc>,
}

impl ClickEvent {
    /// Creates a new click event timestamped now.
    ///
    /// Blank `user_agent` and `referrer` values are treated as absent.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let event = ClickEvent::new(
    ///     "abc123".to_string(),
    ///     "203.0.113.7".to_string(),
    ///     Some("Mozilla/5.0"),
    ///     Some("https://google.com"),
    /// );
    /// ```
    pub fn new(
        code: String,
        ip: String,
        user_agent: Option<&str>,
        referrer: Option<&str>,
    ) -> Self {
        Self {
            code,
            ip,
            user_agent: non_blank(user_agent),
            referrer: non_blank(referrer),
            clicked_at: Utc::now(),
        }
    }

    /// Resolves geo and device fields, producing the record the click log stores.
    pub fn classify(self, geo: &dyn GeoLookup) -> NewClick {
        let location = classify_ip(&self.ip, geo);
        let device = parse_user_agent(self.user_agent.as_deref().unwrap_or_default());

        NewClick {
            code: self.code,
            ip: self.ip,
            country: location.country,
            city: location.city,
            device_type: device.device_type.to_string(),
            browser: device.browser,
            os: device.os,
            referrer: self.referrer,
            clicked_at: self.clicked_at,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::geo::{GeoLocation, NoGeoDatabase};
    use std::net::IpAddr;

    #[test]
    fn test_click_event_creation_full() {
        let event = ClickEvent::new(
            "abc123".to_string(),
            "192.168.1.1".to_string(),
            Some("Mozilla/5.0"),
            Some("https://google.com"),
        );

        assert_eq!(event.code, "abc123");
        assert_eq!(event.ip, "192.168.1.1");
        assert_eq!(event.user_agent.as_deref(), Some("Mozilla/5.0"));
        assert_eq!(event.referrer.as_deref(), Some("https://google.com"));
    }

    #[test]
    fn test_click_event_blank_headers_are_absent() {
        let event = ClickEvent::new("xyz".to_string(), "10.0.0.1".to_string(), Some("  "), Some(""));

        assert!(event.user_agent.is_none());
        assert!(event.referrer.is_none());
    }

    #[test]
    fn test_classify_local_request_without_user_agent() {
        let click = ClickEvent::new("xyz".to_string(), "127.0.0.1".to_string(), None, None)
            .classify(&NoGeoDatabase);

        assert_eq!(click.code, "xyz");
        assert_eq!(click.country, "Local");
        assert_eq!(click.city, "Local");
        assert_eq!(click.device_type, "desktop");
        assert_eq!(click.browser, "Unknown");
        assert_eq!(click.os, "Unknown");
        assert!(click.referrer.is_none());
    }

    #[test]
    fn test_classify_uses_geo_lookup_and_keeps_timestamp() {
        let lookup = |_: IpAddr| Some(GeoLocation::new("DE", "Berlin"));
        let event = ClickEvent::new(
            "promo".to_string(),
            "203.0.113.7".to_string(),
            Some("Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1"),
            Some("https://news.example.org"),
        );
        let clicked_at = event.clicked_at;

        let click = event.classify(&lookup);

        assert_eq!(click.country, "DE");
        assert_eq!(click.city, "Berlin");
        assert_eq!(click.device_type, "mobile");
        assert_eq!(click.referrer.as_deref(), Some("https://news.example.org"));
        assert_eq!(click.clicked_at, clicked_at);
    }
}
