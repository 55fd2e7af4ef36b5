//! Minimum-interval rate limiter.
//!
//! Single-slot pacing: each outbound call must start at least
//! `1000 / rate_limit_per_sec` ms after the previous one. Bursts are smoothed
//! to one request per interval, not allowed to spike — this mirrors the
//! provider's frequency limit more conservatively than a token bucket would.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

#[derive(Debug)]
pub struct RequestPacer {
    min_interval: Duration,
    // Held across the wait so concurrent callers start in series
    last_request: Mutex<Option<Instant>>,
}

impl RequestPacer {
    pub fn new(rate_limit_per_sec: u32) -> Self {
        let per_sec = rate_limit_per_sec.max(1);
        Self {
            min_interval: Duration::from_millis(1000 / per_sec as u64),
            last_request: Mutex::new(None),
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Suspend until the minimum interval since the previous call has passed,
    /// then stamp this call as the most recent one.
    pub async fn acquire(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_from_rate() {
        assert_eq!(
            RequestPacer::new(30).min_interval(),
            Duration::from_millis(33)
        );
        assert_eq!(
            RequestPacer::new(0).min_interval(),
            Duration::from_secs(1)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_back_to_back_calls_are_spaced() {
        let pacer = RequestPacer::new(30);
        let start = Instant::now();

        for _ in 0..4 {
            pacer.acquire().await;
        }

        // 4 calls need at least 3 full intervals between their start times
        assert!(start.elapsed() >= Duration::from_millis(3 * 33));
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_time_counts_toward_interval() {
        let pacer = RequestPacer::new(30);
        pacer.acquire().await;

        tokio::time::advance(Duration::from_millis(50)).await;

        let before = Instant::now();
        pacer.acquire().await;
        // The interval already elapsed while idle, so no extra wait
        assert_eq!(Instant::now(), before);
    }
}
