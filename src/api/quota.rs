//! Quota usage extraction from provider response headers.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::transport::RawResponse;

pub const HEADER_REQUESTS_USED: &str = "x-requests-used";
pub const HEADER_REQUESTS_REMAINING: &str = "x-requests-remaining";
pub const HEADER_REQUESTS_LAST: &str = "x-requests-last";

/// Latest observed quota usage. Derived fresh from every response; never
/// persisted, the newest snapshot always wins.
#[derive(Debug, Clone, Serialize)]
pub struct QuotaSnapshot {
    pub requests_used: u64,
    pub requests_remaining: u64,
    pub requests_last: DateTime<Utc>,
}

impl Default for QuotaSnapshot {
    fn default() -> Self {
        Self {
            requests_used: 0,
            requests_remaining: 0,
            requests_last: Utc::now(),
        }
    }
}

impl QuotaSnapshot {
    /// Read the three quota headers, defaulting missing or malformed values
    /// to 0 / the current time.
    pub fn from_response(response: &RawResponse) -> Self {
        let count = |name: &str| {
            response
                .header(name)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .unwrap_or(0)
        };
        let last = response
            .header(HEADER_REQUESTS_LAST)
            .and_then(|v| v.parse::<DateTime<Utc>>().ok())
            .unwrap_or_else(Utc::now);

        Self {
            requests_used: count(HEADER_REQUESTS_USED),
            requests_remaining: count(HEADER_REQUESTS_REMAINING),
            requests_last: last,
        }
    }
}
