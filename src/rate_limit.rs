use axum::http::HeaderMap;
use std::net::IpAddr;

use crate::config::Limits;
use crate::store::{StoreError, SupporterStore};

/// Client address: first `X-Forwarded-For` hop, else the peer, else `unknown`.
pub fn client_ip(headers: &HeaderMap, peer: Option<IpAddr>) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());

    match (forwarded, peer) {
        (Some(ip), _) => ip.to_string(),
        (None, Some(peer)) => peer.to_string(),
        (None, None) => "unknown".to_string(),
    }
}

pub fn rate_key(ip: &str) -> String {
    format!("rate:{ip}")
}

/// Count one request from `ip`. Returns `false` once the window's limit is exceeded.
pub async fn check_rate_limit(
    store: &dyn SupporterStore,
    ip: &str,
    limits: &Limits,
) -> Result<bool, StoreError> {
    let count = store
        .incr_with_expiry(&rate_key(ip), limits.rate_window)
        .await?;
    Ok(count <= limits.rate_limit)
}
