//! Device, browser and OS classification of User-Agent strings.

use std::fmt;
use woothee::parser::Parser;

const UNKNOWN: &str = "Unknown";

/// Coarse device class of a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceType {
    Mobile,
    Tablet,
    SmartTv,
    Wearable,
    Console,
    Desktop,
}

impl DeviceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Mobile => "mobile",
            DeviceType::Tablet => "tablet",
            DeviceType::SmartTv => "smart-tv",
            DeviceType::Wearable => "wearable",
            DeviceType::Console => "console",
            DeviceType::Desktop => "desktop",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of a single User-Agent header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub device_type: DeviceType,
    pub browser: String,
    pub os: String,
}

// Checked in order; the first matching class wins.
const TABLET_MARKERS: &[&str] = &["ipad", "tablet", "kindle", "silk/", "playbook"];
const SMART_TV_MARKERS: &[&str] = &[
    "smart-tv", "smarttv", "googletv", "appletv", "hbbtv", "roku", "crkey", "bravia", "tizen tv",
    "webos tv", "netcast",
];
const WEARABLE_MARKERS: &[&str] = &["watch os", "watchos", "wear os", "smartwatch", "glass"];
const CONSOLE_MARKERS: &[&str] = &["playstation", "xbox", "nintendo", "ouya"];

/// Parses a User-Agent string into device class, browser name and OS name.
///
/// Empty or unrecognized input yields `desktop` with `Unknown` browser and OS.
///
/// # Examples
///
/// ```ignore
/// let info = parse_user_agent("Mozilla/5.0 (iPad; CPU OS 17_0 like Mac OS X) ...");
/// assert_eq!(info.device_type, DeviceType::Tablet);
/// ```
pub fn parse_user_agent(user_agent: &str) -> DeviceInfo {
    let user_agent = user_agent.trim();
    if user_agent.is_empty() {
        return DeviceInfo {
            device_type: DeviceType::Desktop,
            browser: UNKNOWN.to_string(),
            os: UNKNOWN.to_string(),
        };
    }

    let parsed = Parser::new().parse(user_agent);

    let (browser, os, category) = match &parsed {
        Some(result) => (
            known_or_unknown(result.name),
            known_or_unknown(result.os),
            result.category,
        ),
        None => (UNKNOWN.to_string(), UNKNOWN.to_string(), ""),
    };

    DeviceInfo {
        device_type: device_type(user_agent, category),
        browser,
        os,
    }
}

fn device_type(user_agent: &str, category: &str) -> DeviceType {
    let lowered = user_agent.to_ascii_lowercase();
    let contains_any = |markers: &[&str]| markers.iter().any(|m| lowered.contains(m));

    if contains_any(TABLET_MARKERS) {
        return DeviceType::Tablet;
    }
    if contains_any(SMART_TV_MARKERS) {
        return DeviceType::SmartTv;
    }
    if contains_any(WEARABLE_MARKERS) {
        return DeviceType::Wearable;
    }
    if contains_any(CONSOLE_MARKERS) {
        return DeviceType::Console;
    }

    // Android tablets omit "Mobile" from their UA; phones always carry it.
    if lowered.contains("android") && !lowered.contains("mobile") {
        return DeviceType::Tablet;
    }

    match category {
        "smartphone" | "mobilephone" => DeviceType::Mobile,
        "appliance" => DeviceType::Console,
        _ => DeviceType::Desktop,
    }
}

fn known_or_unknown(value: &str) -> String {
    if value.is_empty() || value == "UNKNOWN" {
        UNKNOWN.to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHROME_WINDOWS: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
    const SAFARI_IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";
    const SAFARI_IPAD: &str = "Mozilla/5.0 (iPad; CPU OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";
    const ANDROID_TABLET: &str = "Mozilla/5.0 (Linux; Android 13; SM-X700) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
    const SAMSUNG_TV: &str = "Mozilla/5.0 (SMART-TV; Linux; Tizen 6.0) AppleWebKit/537.36 (KHTML, like Gecko) SamsungBrowser/4.0 Chrome/76.0.3809.146 TV Safari/537.36";
    const PLAYSTATION: &str = "Mozilla/5.0 (PlayStation; PlayStation 5/2.26) AppleWebKit/605.1.15 (KHTML, like Gecko)";
    const APPLE_WATCH: &str = "server-bag [Watch OS,10.0,21R356,Watch6,2]";

    #[test]
    fn test_desktop_chrome() {
        let info = parse_user_agent(CHROME_WINDOWS);

        assert_eq!(info.device_type, DeviceType::Desktop);
        assert_eq!(info.browser, "Chrome");
        assert!(info.os.starts_with("Windows"));
    }

    #[test]
    fn test_iphone_is_mobile() {
        let info = parse_user_agent(SAFARI_IPHONE);

        assert_eq!(info.device_type, DeviceType::Mobile);
        assert_eq!(info.browser, "Safari");
        assert_eq!(info.os, "iPhone");
    }

    #[test]
    fn test_ipad_is_tablet() {
        assert_eq!(parse_user_agent(SAFARI_IPAD).device_type, DeviceType::Tablet);
    }

    #[test]
    fn test_android_without_mobile_is_tablet() {
        assert_eq!(
            parse_user_agent(ANDROID_TABLET).device_type,
            DeviceType::Tablet
        );
    }

    #[test]
    fn test_smart_tv() {
        assert_eq!(parse_user_agent(SAMSUNG_TV).device_type, DeviceType::SmartTv);
    }

    #[test]
    fn test_console() {
        assert_eq!(parse_user_agent(PLAYSTATION).device_type, DeviceType::Console);
    }

    #[test]
    fn test_wearable() {
        assert_eq!(parse_user_agent(APPLE_WATCH).device_type, DeviceType::Wearable);
    }

    #[test]
    fn test_empty_user_agent_defaults() {
        let info = parse_user_agent("");

        assert_eq!(info.device_type, DeviceType::Desktop);
        assert_eq!(info.browser, "Unknown");
        assert_eq!(info.os, "Unknown");
    }

    #[test]
    fn test_garbage_user_agent_is_desktop() {
        let info = parse_user_agent("totally-opaque-agent");

        assert_eq!(info.device_type, DeviceType::Desktop);
        assert_eq!(info.browser, "Unknown");
    }

    #[test]
    fn test_device_type_labels() {
        assert_eq!(DeviceType::SmartTv.to_string(), "smart-tv");
        assert_eq!(DeviceType::Desktop.as_str(), "desktop");
    }
}
