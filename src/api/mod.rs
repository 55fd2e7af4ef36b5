//! Request engine for the odds provider.
//!
//! The sole component that talks to the remote provider. Every public
//! operation funnels through one routine that checks the cache, waits out the
//! rate limit, issues the HTTP call, classifies failures, retries the
//! provider's frequency limit with exponential backoff, extracts quota
//! headers and writes the cache.
//!
//! Construct one client at startup and pass it to consumers; the client owns
//! the rate limiter and cache, so sharing the instance shares both.

pub mod cache;
pub mod cost;
pub mod error;
pub mod pacer;
pub mod params;
pub mod quota;
pub mod transport;

use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::OddsConfig;
use crate::error::Result;
use crate::migration;
use crate::types::{
    EventMarkets, EventSummary, GameEvent, HistoricalSnapshot, Participant, ScoreEvent, SportInfo,
};

use cache::ResponseCache;
use cost::estimate_cost;
use error::OddsApiError;
use pacer::RequestPacer;
use params::QueryParams;
use quota::QuotaSnapshot;
use transport::{OddsTransport, RawResponse, ReqwestTransport};

/// Backoff ladder for the provider's frequency limit: up to 4 retries
const RETRY_DELAYS: [Duration; 4] = [
    Duration::from_secs(1),
    Duration::from_secs(2),
    Duration::from_secs(4),
    Duration::from_secs(8),
];

// Designed cache lifetimes per operation
const TTL_SPORTS: Duration = Duration::from_secs(6 * 60 * 60);
const TTL_ODDS: Duration = Duration::from_secs(60);
const TTL_SCORES: Duration = Duration::from_secs(30);
const TTL_EVENTS: Duration = Duration::from_secs(120);
const TTL_EVENT_ODDS: Duration = Duration::from_secs(60);
const TTL_EVENT_MARKETS: Duration = Duration::from_secs(300);
const TTL_PARTICIPANTS: Duration = Duration::from_secs(24 * 60 * 60);

/// Odds display format requested from the provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OddsFormat {
    #[default]
    American,
    Decimal,
}

impl OddsFormat {
    fn as_str(&self) -> &'static str {
        match self {
            OddsFormat::American => "american",
            OddsFormat::Decimal => "decimal",
        }
    }
}

/// Market/region/bookmaker selection for an odds call
#[derive(Debug, Clone, Default)]
pub struct OddsQuery {
    /// Region keys; falls back to the configured default regions
    pub regions: Vec<String>,
    /// Market keys, legacy aliases accepted; defaults to h2h
    pub markets: Vec<String>,
    /// Bookmaker keys, legacy aliases accepted; empty = all in region
    pub bookmakers: Vec<String>,
    pub odds_format: OddsFormat,
}

/// Successful call result with quota and cost metadata attached
#[derive(Debug, Clone)]
pub struct ApiResult<T> {
    pub data: T,
    pub quota: QuotaSnapshot,
    /// Estimated quota cost of the call; 0 when served from cache
    pub cost: u64,
    pub cached: bool,
}

/// Client for the odds provider
pub struct OddsApiClient {
    config: OddsConfig,
    transport: Arc<dyn OddsTransport>,
    pacer: RequestPacer,
    cache: ResponseCache,
}

impl OddsApiClient {
    /// Build a client with the production HTTP transport
    pub fn new(config: OddsConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(Duration::from_millis(config.timeout_ms))?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Build a client over an arbitrary transport (tests inject fakes here)
    pub fn with_transport(config: OddsConfig, transport: Arc<dyn OddsTransport>) -> Self {
        let pacer = RequestPacer::new(config.rate_limit_per_sec);
        Self {
            config,
            transport,
            pacer,
            cache: ResponseCache::new(),
        }
    }

    /// List available sports. Free call, cached for 6 hours.
    pub async fn get_sports(&self, include_inactive: bool) -> Result<ApiResult<Vec<SportInfo>>> {
        let mut params = self.base_params();
        if include_inactive {
            params.push("all", true);
        }
        self.request("/sports", params, Some(TTL_SPORTS)).await
    }

    /// Featured odds for a sport via the bulk odds endpoint. Cached 60s.
    ///
    /// Non-featured markets are accepted but warned about: the provider only
    /// serves them through the per-event endpoint.
    pub async fn get_odds(
        &self,
        sport: &str,
        query: &OddsQuery,
    ) -> Result<ApiResult<Vec<GameEvent>>> {
        let (params, markets) = self.odds_params(query);
        if migration::requires_event_odds_endpoint(&markets) {
            warn!(
                ?markets,
                "non-featured markets requested from the bulk odds endpoint; use get_event_odds"
            );
        }
        let path = format!("/sports/{sport}/odds");
        let result = self.request::<Vec<GameEvent>>(&path, params, Some(TTL_ODDS)).await;
        if let Ok(ref ok) = result {
            info!(sport, events = ok.data.len(), cached = ok.cached, "fetched odds");
        }
        result
    }

    /// Live and recent scores for a sport. Cached 30s.
    pub async fn get_scores(
        &self,
        sport: &str,
        days_from: Option<u32>,
    ) -> Result<ApiResult<Vec<ScoreEvent>>> {
        let mut params = self.base_params();
        params.push_opt("daysFrom", days_from);
        let path = format!("/sports/{sport}/scores");
        self.request(&path, params, Some(TTL_SCORES)).await
    }

    /// Upcoming events for a sport. Free call, cached 120s.
    pub async fn get_events(&self, sport: &str) -> Result<ApiResult<Vec<EventSummary>>> {
        let path = format!("/sports/{sport}/events");
        self.request(&path, self.base_params(), Some(TTL_EVENTS))
            .await
    }

    /// Odds for a single event; the only route to non-featured markets.
    /// Cached 60s. Costs 10x the bulk endpoint per market/region.
    pub async fn get_event_odds(
        &self,
        sport: &str,
        event_id: &str,
        query: &OddsQuery,
    ) -> Result<ApiResult<GameEvent>> {
        let (params, _) = self.odds_params(query);
        let path = format!("/sports/{sport}/events/{event_id}/odds");
        self.request(&path, params, Some(TTL_EVENT_ODDS)).await
    }

    /// Discover which markets bookmakers currently price for an event.
    /// Cached 300s.
    pub async fn get_event_markets(
        &self,
        sport: &str,
        event_id: &str,
        regions: &[String],
    ) -> Result<ApiResult<EventMarkets>> {
        let mut params = self.base_params();
        params.push_list("regions", self.regions_or_default(regions));
        let path = format!("/sports/{sport}/events/{event_id}/markets");
        self.request(&path, params, Some(TTL_EVENT_MARKETS)).await
    }

    /// Teams/players for a sport. Cached 24 hours.
    pub async fn get_participants(&self, sport: &str) -> Result<ApiResult<Vec<Participant>>> {
        let path = format!("/sports/{sport}/participants");
        self.request(&path, self.base_params(), Some(TTL_PARTICIPANTS))
            .await
    }

    /// Historical bulk odds snapshot. Paid tier; never cached.
    pub async fn get_historical_odds(
        &self,
        sport: &str,
        date: &str,
        query: &OddsQuery,
    ) -> Result<ApiResult<HistoricalSnapshot<Vec<GameEvent>>>> {
        let (mut params, _) = self.odds_params(query);
        params.push("date", date);
        let path = format!("/historical/sports/{sport}/odds");
        self.request(&path, params, None).await
    }

    /// Historical event listing snapshot. Paid tier; never cached.
    pub async fn get_historical_events(
        &self,
        sport: &str,
        date: &str,
    ) -> Result<ApiResult<HistoricalSnapshot<Vec<EventSummary>>>> {
        let mut params = self.base_params();
        params.push("date", date);
        let path = format!("/historical/sports/{sport}/events");
        self.request(&path, params, None).await
    }

    /// Historical odds snapshot for one event. Paid tier; never cached.
    pub async fn get_historical_event_odds(
        &self,
        sport: &str,
        event_id: &str,
        date: &str,
        query: &OddsQuery,
    ) -> Result<ApiResult<HistoricalSnapshot<GameEvent>>> {
        let (mut params, _) = self.odds_params(query);
        params.push("date", date);
        let path = format!("/historical/sports/{sport}/events/{event_id}/odds");
        self.request(&path, params, None).await
    }

    /// Drop every cache entry unconditionally
    pub fn clear_cache(&self) {
        self.cache.clear();
        debug!("response cache cleared");
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }

    fn base_params(&self) -> QueryParams {
        QueryParams::new(&self.config.api_key)
    }

    fn regions_or_default<'a>(&'a self, regions: &'a [String]) -> &'a [String] {
        if regions.is_empty() {
            &self.config.default_regions
        } else {
            regions
        }
    }

    /// Common parameter assembly for odds calls: migrate legacy keys, apply
    /// configured defaults, serialize lists. Returns the migrated market keys
    /// so callers can inspect them.
    fn odds_params(&self, query: &OddsQuery) -> (QueryParams, Vec<String>) {
        let markets = if query.markets.is_empty() {
            vec!["h2h".to_string()]
        } else {
            migration::migrate_market_keys(&query.markets)
        };
        let bookmakers = if query.bookmakers.is_empty() {
            migration::migrate_bookmaker_keys(&self.config.default_bookmakers)
        } else {
            migration::migrate_bookmaker_keys(&query.bookmakers)
        };

        let mut params = self.base_params();
        params.push_list("regions", self.regions_or_default(&query.regions));
        params.push_list("markets", &markets);
        params.push_list("bookmakers", &bookmakers);
        params.push("oddsFormat", query.odds_format.as_str());
        (params, markets)
    }

    /// Core request routine: cache check, pacing, HTTP, classification,
    /// retry/backoff, quota extraction, cache write.
    async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        params: QueryParams,
        ttl: Option<Duration>,
    ) -> Result<ApiResult<T>> {
        let cache_key = params.cache_key(path);

        if ttl.is_some() {
            if let Some(entry) = self.cache.get(&cache_key) {
                match serde_json::from_value::<T>(entry.data) {
                    Ok(data) => {
                        debug!(path, "cache hit");
                        return Ok(ApiResult {
                            data,
                            quota: entry.quota,
                            cost: 0,
                            cached: true,
                        });
                    }
                    Err(e) => {
                        // Undecodable entry counts as a miss; refetch below
                        debug!(path, error = %e, "cache entry failed to decode");
                    }
                }
            }
        }

        let cost = estimate_cost(path, params.list_len("markets"), params.list_len("regions"));
        debug!(path, cost, "estimated request cost");

        let url = format!("{}{}", self.config.base_url, path);
        let mut attempt: usize = 0;

        loop {
            self.pacer.acquire().await;

            let response = match self.transport.get(&url, params.pairs()).await {
                Ok(response) => response,
                Err(e) => {
                    return Err(OddsApiError::unknown(format!("network error: {e}")).into());
                }
            };

            let quota = QuotaSnapshot::from_response(&response);
            debug!(
                used = quota.requests_used,
                remaining = quota.requests_remaining,
                status = response.status,
                "provider response"
            );

            if response.is_success() {
                return self.finish(path, &cache_key, ttl, response, quota, cost);
            }

            let err = OddsApiError::from_response(response.status, &response.body);
            if err.retryable && attempt < RETRY_DELAYS.len() {
                let delay = RETRY_DELAYS[attempt];
                warn!(
                    path,
                    attempt = attempt + 1,
                    delay_secs = delay.as_secs(),
                    "provider frequency limit hit, backing off"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
                continue;
            }

            return Err(err.into());
        }
    }

    fn finish<T: DeserializeOwned>(
        &self,
        path: &str,
        cache_key: &str,
        ttl: Option<Duration>,
        response: RawResponse,
        quota: QuotaSnapshot,
        cost: u64,
    ) -> Result<ApiResult<T>> {
        let value: serde_json::Value = serde_json::from_str(&response.body)
            .map_err(|e| OddsApiError::unknown(format!("invalid JSON from provider: {e}")))?;

        if let Some(ttl) = ttl {
            self.cache
                .put(cache_key.to_string(), value.clone(), ttl, quota.clone());
        }

        let data = serde_json::from_value(value).map_err(|e| {
            OddsApiError::unknown(format!("unexpected response shape from {path}: {e}"))
        })?;

        Ok(ApiResult {
            data,
            quota,
            cost,
            cached: false,
        })
    }
}
