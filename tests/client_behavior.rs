//! Behavior tests for the request engine: caching, pacing, retry/backoff and
//! quota extraction, all against a scripted in-memory transport under paused
//! tokio time.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use oddsline::api::transport::{OddsTransport, RawResponse};
use oddsline::{ApiErrorCode, OddsApiClient, OddsApiError, OddsConfig, OddsLineError, OddsQuery};

type RecordedCall = (String, Vec<(String, String)>);

/// Scripted provider: serves queued responses, then an optional repeating
/// response, and records every call it sees.
#[derive(Default)]
struct FakeTransport {
    queue: Mutex<VecDeque<RawResponse>>,
    repeat: Mutex<Option<RawResponse>>,
    fail_all: Mutex<bool>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl FakeTransport {
    fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn ok(body: &str) -> RawResponse {
        RawResponse {
            status: 200,
            headers: vec![
                ("x-requests-used".to_string(), "5".to_string()),
                ("x-requests-remaining".to_string(), "495".to_string()),
                (
                    "x-requests-last".to_string(),
                    "2026-08-01T12:00:00Z".to_string(),
                ),
            ],
            body: body.to_string(),
        }
    }

    fn error(status: u16, code: &str) -> RawResponse {
        RawResponse {
            status,
            headers: vec![],
            body: format!(r#"{{"code":"{code}","message":"scripted failure"}}"#),
        }
    }

    fn push(&self, response: RawResponse) {
        self.queue.lock().unwrap().push_back(response);
    }

    fn always(&self, response: RawResponse) {
        *self.repeat.lock().unwrap() = Some(response);
    }

    fn fail_all(&self) {
        *self.fail_all.lock().unwrap() = true;
    }

    fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl OddsTransport for FakeTransport {
    async fn get(
        &self,
        url: &str,
        query: &[(String, String)],
    ) -> oddsline::Result<RawResponse> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), query.to_vec()));

        if *self.fail_all.lock().unwrap() {
            return Err(OddsLineError::Internal("connection refused".into()));
        }
        if let Some(response) = self.queue.lock().unwrap().pop_front() {
            return Ok(response);
        }
        if let Some(response) = self.repeat.lock().unwrap().clone() {
            return Ok(response);
        }
        panic!("unexpected call to {url}");
    }
}

fn client_with(transport: Arc<FakeTransport>) -> OddsApiClient {
    OddsApiClient::with_transport(OddsConfig::with_api_key("test-key"), transport)
}

const TWO_EVENTS: &str = r#"[
  {"id":"e1","sport_key":"basketball_nba","sport_title":"NBA",
   "commence_time":"2026-08-02T00:00:00Z","home_team":"Lakers","away_team":"Celtics",
   "bookmakers":[]},
  {"id":"e2","sport_key":"basketball_nba","sport_title":"NBA",
   "commence_time":"2026-08-02T02:00:00Z","home_team":"Suns","away_team":"Nuggets",
   "bookmakers":[]}
]"#;

#[tokio::test(start_paused = true)]
async fn end_to_end_featured_odds() {
    let transport = FakeTransport::new();
    transport.push(FakeTransport::ok(TWO_EVENTS));
    let client = client_with(transport.clone());

    let query = OddsQuery {
        regions: vec!["us".to_string()],
        markets: vec!["h2h".to_string(), "spreads".to_string()],
        ..Default::default()
    };

    let first = client.get_odds("basketball_nba", &query).await.unwrap();
    assert_eq!(first.cost, 2); // 2 markets x 1 region
    assert!(!first.cached);
    assert_eq!(first.data.len(), 2);
    assert_eq!(first.quota.requests_used, 5);
    assert_eq!(first.quota.requests_remaining, 495);

    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    let (url, params) = &calls[0];
    assert!(url.ends_with("/v4/sports/basketball_nba/odds"), "{url}");
    assert_eq!(params[0], ("apiKey".to_string(), "test-key".to_string()));
    assert!(params.contains(&("regions".to_string(), "us".to_string())));
    assert!(params.contains(&("markets".to_string(), "h2h,spreads".to_string())));
    assert!(params.contains(&("oddsFormat".to_string(), "american".to_string())));

    // Second identical call within the 60s TTL: no network, cost 0
    let second = client.get_odds("basketball_nba", &query).await.unwrap();
    assert!(second.cached);
    assert_eq!(second.cost, 0);
    assert_eq!(second.data.len(), 2);
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn cache_expires_after_ttl() {
    let transport = FakeTransport::new();
    transport.always(FakeTransport::ok(TWO_EVENTS));
    let client = client_with(transport.clone());
    let query = OddsQuery::default();

    client.get_odds("basketball_nba", &query).await.unwrap();
    client.get_odds("basketball_nba", &query).await.unwrap();
    assert_eq!(transport.call_count(), 1);

    tokio::time::advance(Duration::from_secs(61)).await;

    let third = client.get_odds("basketball_nba", &query).await.unwrap();
    assert!(!third.cached);
    assert_eq!(transport.call_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn cache_key_includes_parameters() {
    let transport = FakeTransport::new();
    transport.always(FakeTransport::ok("[]"));
    let client = client_with(transport.clone());

    client.get_scores("baseball_mlb", Some(1)).await.unwrap();
    client.get_scores("baseball_mlb", Some(2)).await.unwrap();
    client.get_scores("baseball_mlb", Some(1)).await.unwrap();

    // Different daysFrom means a different cache entry; the repeat of the
    // first call is served from cache.
    assert_eq!(transport.call_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn clear_cache_forces_refetch() {
    let transport = FakeTransport::new();
    transport.always(FakeTransport::ok("[]"));
    let client = client_with(transport.clone());

    client.get_events("basketball_nba").await.unwrap();
    assert_eq!(client.cache_size(), 1);

    client.clear_cache();
    assert_eq!(client.cache_size(), 0);

    client.get_events("basketball_nba").await.unwrap();
    assert_eq!(transport.call_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn retry_ladder_on_frequency_limit() {
    let transport = FakeTransport::new();
    transport.always(FakeTransport::error(429, "EXCEEDED_FREQ_LIMIT"));
    let client = client_with(transport.clone());

    let start = Instant::now();
    let err = client.get_sports(false).await.unwrap_err();

    // 1 initial attempt + 4 retries, with 1+2+4+8 = 15s of backoff
    assert_eq!(transport.call_count(), 5);
    assert!(start.elapsed() >= Duration::from_secs(15));

    match err {
        OddsLineError::Api(api_err) => {
            assert_eq!(api_err.code, ApiErrorCode::ExceededFreqLimit);
            assert!(api_err.retryable);
            assert_eq!(api_err.status, 429);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test(start_paused = true)]
async fn terminal_errors_do_not_retry() {
    let transport = FakeTransport::new();
    transport.always(FakeTransport::error(401, "INVALID_KEY"));
    let client = client_with(transport.clone());

    let err = client.get_sports(false).await.unwrap_err();
    assert_eq!(transport.call_count(), 1);
    assert!(!OddsApiError::is_retryable(&err));

    match err {
        OddsLineError::Api(api_err) => {
            assert_eq!(api_err.code, ApiErrorCode::InvalidKey);
            assert_eq!(
                api_err.user_message,
                ApiErrorCode::InvalidKey.user_message()
            );
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test(start_paused = true)]
async fn network_failures_wrap_as_unknown() {
    let transport = FakeTransport::new();
    transport.fail_all();
    let client = client_with(transport);

    let err = client.get_sports(false).await.unwrap_err();
    match err {
        OddsLineError::Api(api_err) => {
            assert_eq!(api_err.code, ApiErrorCode::UnknownError);
            assert_eq!(api_err.status, 0);
            assert!(!api_err.retryable);
            assert!(api_err.message.contains("connection refused"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test(start_paused = true)]
async fn back_to_back_calls_respect_rate_limit() {
    let transport = FakeTransport::new();
    transport.always(FakeTransport::ok(
        r#"{"timestamp":"2026-08-01T00:00:00Z","data":[]}"#,
    ));
    let client = client_with(transport.clone());

    let start = Instant::now();
    for day in 1..=3 {
        let date = format!("2026-08-0{day}T00:00:00Z");
        client
            .get_historical_events("basketball_nba", &date)
            .await
            .unwrap();
    }

    // Historical calls are uncached, so all three hit the network and the
    // second and third each wait out the ~33ms minimum interval.
    assert_eq!(transport.call_count(), 3);
    assert!(start.elapsed() >= Duration::from_millis(2 * 33));
}

#[tokio::test(start_paused = true)]
async fn event_odds_cost_uses_ten_x_multiplier() {
    let transport = FakeTransport::new();
    transport.push(FakeTransport::ok(
        r#"{"id":"e1","sport_key":"basketball_nba","sport_title":"NBA",
            "commence_time":"2026-08-02T00:00:00Z","home_team":"Lakers",
            "away_team":"Celtics","bookmakers":[]}"#,
    ));
    let client = client_with(transport);

    let query = OddsQuery {
        regions: vec!["us".to_string(), "uk".to_string()],
        markets: vec![
            "player_points".to_string(),
            "player_assists".to_string(),
            "h2h".to_string(),
        ],
        ..Default::default()
    };

    let result = client
        .get_event_odds("basketball_nba", "e1", &query)
        .await
        .unwrap();
    // 10 x 3 markets x 2 regions
    assert_eq!(result.cost, 60);
}

#[tokio::test(start_paused = true)]
async fn legacy_market_keys_are_migrated_on_the_way_out() {
    let transport = FakeTransport::new();
    transport.push(FakeTransport::ok("[]"));
    let client = client_with(transport.clone());

    let query = OddsQuery {
        markets: vec!["Moneyline".to_string(), "spread".to_string()],
        ..Default::default()
    };
    client.get_odds("basketball_nba", &query).await.unwrap();

    let calls = transport.calls();
    let (_, params) = &calls[0];
    assert!(params.contains(&("markets".to_string(), "h2h,spreads".to_string())));
}
