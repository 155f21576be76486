//! Client IP extraction from HTTP request metadata.

use axum::http::HeaderMap;
use std::net::SocketAddr;

/// Determines the client IP for a request.
///
/// When `behind_proxy` is true the first entry of `X-Forwarded-For` wins,
/// then `X-Real-IP`; otherwise, and as a final fallback, the socket peer
/// address is used.
///
/// # Examples
///
/// ```ignore
/// let mut headers = HeaderMap::new();
/// headers.insert("x-forwarded-for", "203.0.113.7, 10.0.0.1".parse().unwrap());
///
/// let ip = extract_client_ip(&headers, "10.0.0.1:4000".parse().unwrap(), true);
/// assert_eq!(ip, "203.0.113.7");
/// ```
pub fn extract_client_ip(headers: &HeaderMap, peer: SocketAddr, behind_proxy: bool) -> String {
    if behind_proxy {
        if let Some(ip) = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|xff| xff.split(',').next())
            .map(str::trim)
            .filter(|ip| !ip.is_empty())
        {
            return ip.to_owned();
        }

        if let Some(ip) = headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|ip| !ip.is_empty())
        {
            return ip.to_owned();
        }
    }

    peer.ip().to_string()
}
