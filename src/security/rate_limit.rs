//! Fixed-window rate limiting keyed by client token.
//!
//! Each token owns a window `{started, count}`. The first request in an
//! expired (or missing) window resets it to `{now, 1}`; further requests
//! increment the count until the per-window quota is reached. The check
//! must be atomic per token: two concurrent requests for the same token
//! must never both observe a stale count. `DashMap` gives per-shard entry
//! locking, so distinct tokens do not contend on a global lock.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tokio::sync::broadcast;

use crate::config::RateLimitConfig;
use crate::observability::metrics;

/// Outcome of a rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Limited,
}

/// Per-token window state.
#[derive(Debug)]
struct Window {
    started: Instant,
    count: u32,
}

/// Fixed-window rate limiter.
///
/// Injectable service: the gatekeeper only depends on `check`, so a
/// distributed backend could replace this without touching the pipeline.
#[derive(Debug)]
pub struct RateLimiter {
    windows: DashMap<String, Window>,
    interval: Duration,
    max_requests: u32,
    sweep_interval: Duration,
}

impl RateLimiter {
    /// Create a limiter from configuration.
    pub fn new(config: &RateLimitConfig) -> Self {
        Self::with_window(
            Duration::from_millis(config.interval_ms),
            config.max_requests,
            Duration::from_secs(config.sweep_interval_secs),
        )
    }

    /// Create a limiter with an explicit window (used by tests).
    pub fn with_window(interval: Duration, max_requests: u32, sweep_interval: Duration) -> Self {
        Self {
            windows: DashMap::new(),
            interval,
            max_requests,
            sweep_interval,
        }
    }

    /// Check (and consume) a request slot for the given token.
    ///
    /// The entry is held locked for the duration of the check, so the
    /// read-modify-write is atomic per token.
    pub fn check(&self, token: &str) -> Decision {
        let mut window = self
            .windows
            .entry(token.to_string())
            .or_insert_with(|| Window {
                started: Instant::now(),
                count: 0,
            });

        let now = Instant::now();
        if now.duration_since(window.started) >= self.interval {
            window.started = now;
            window.count = 1;
            return Decision::Allowed;
        }

        if window.count >= self.max_requests {
            metrics::record_rate_limited();
            return Decision::Limited;
        }

        window.count += 1;
        Decision::Allowed
    }

    /// Drop entries whose window expired more than one interval ago.
    /// Returns the number of entries removed.
    pub fn sweep(&self) -> usize {
        let before = self.windows.len();
        let horizon = self.interval * 2;
        let now = Instant::now();
        self.windows
            .retain(|_, window| now.duration_since(window.started) < horizon);
        before - self.windows.len()
    }

    /// Number of tracked tokens (for tests and diagnostics).
    pub fn tracked_tokens(&self) -> usize {
        self.windows.len()
    }

    /// Periodically sweep stale entries until shutdown is signalled.
    pub async fn run_sweeper(self: Arc<Self>, mut shutdown: broadcast::Receiver<()>) {
        let mut ticker = tokio::time::interval(self.sweep_interval);
        ticker.tick().await; // first tick fires immediately

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let removed = self.sweep();
                    if removed > 0 {
                        tracing::debug!(removed, remaining = self.windows.len(), "Swept stale rate-limit windows");
                    }
                }
                _ = shutdown.recv() => {
                    tracing::info!("Rate-limit sweeper received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(interval: Duration, quota: u32) -> RateLimiter {
        RateLimiter::with_window(interval, quota, Duration::from_secs(60))
    }

    #[test]
    fn first_request_allowed_second_limited() {
        let rl = limiter(Duration::from_secs(5), 1);

        assert_eq!(rl.check("alice"), Decision::Allowed);
        assert_eq!(rl.check("alice"), Decision::Limited);
    }

    #[test]
    fn window_expiry_resets_quota() {
        let rl = limiter(Duration::from_millis(50), 1);

        assert_eq!(rl.check("alice"), Decision::Allowed);
        assert_eq!(rl.check("alice"), Decision::Limited);

        std::thread::sleep(Duration::from_millis(60));
        assert_eq!(rl.check("alice"), Decision::Allowed);
    }

    #[test]
    fn tokens_do_not_interfere() {
        let rl = limiter(Duration::from_secs(5), 1);

        assert_eq!(rl.check("alice"), Decision::Allowed);
        assert_eq!(rl.check("bob"), Decision::Allowed);
        assert_eq!(rl.check("alice"), Decision::Limited);
        assert_eq!(rl.check("bob"), Decision::Limited);
    }

    #[test]
    fn quota_above_one_is_honored() {
        let rl = limiter(Duration::from_secs(5), 3);

        assert_eq!(rl.check("alice"), Decision::Allowed);
        assert_eq!(rl.check("alice"), Decision::Allowed);
        assert_eq!(rl.check("alice"), Decision::Allowed);
        assert_eq!(rl.check("alice"), Decision::Limited);
    }

    #[test]
    fn concurrent_checks_admit_exactly_quota() {
        let rl = Arc::new(limiter(Duration::from_secs(60), 1));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let rl = rl.clone();
                std::thread::spawn(move || rl.check("shared-token"))
            })
            .collect();

        let allowed = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|d| *d == Decision::Allowed)
            .count();

        assert_eq!(allowed, 1);
    }

    #[test]
    fn sweep_drops_only_stale_windows() {
        let rl = limiter(Duration::from_millis(20), 1);

        rl.check("stale");
        std::thread::sleep(Duration::from_millis(50));
        rl.check("fresh");

        let removed = rl.sweep();
        assert_eq!(removed, 1);
        assert_eq!(rl.tracked_tokens(), 1);
    }
}
