//! In-memory sliding-window rate governor.
//!
//! Keeps a log of admitted request instants per (identity, endpoint)
//! bucket. Expired entries are evicted lazily when their bucket is
//! touched, and a periodic sweep piggybacked on admission drops buckets
//! that have gone idle. Suitable for single-server deployments.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::ports::{AdmitDecision, AdmitRejection, AdmitStatus, GovernorKey, RateGovernor};

/// Minimum time between opportunistic full sweeps.
const SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Buckets untouched for this long are dropped by the sweep.
const BUCKET_IDLE_AFTER: Duration = Duration::from_secs(10 * 60);

/// Sliding-window request governor backed by an in-memory log.
#[derive(Debug)]
pub struct SlidingWindowGovernor {
    state: Mutex<GovernorState>,
}

#[derive(Debug)]
struct GovernorState {
    buckets: HashMap<GovernorKey, Bucket>,
    last_sweep: Instant,
}

#[derive(Debug)]
struct Bucket {
    admitted: VecDeque<Instant>,
    last_touched: Instant,
}

impl SlidingWindowGovernor {
    /// Creates an empty governor.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(GovernorState {
                buckets: HashMap::new(),
                last_sweep: Instant::now(),
            }),
        }
    }

    /// Admission decision at an explicit instant. Factored out so tests
    /// can drive the clock.
    async fn admit_at(
        &self,
        key: &GovernorKey,
        limit: u32,
        window: Duration,
        now: Instant,
    ) -> AdmitDecision {
        let mut state = self.state.lock().await;

        if now.duration_since(state.last_sweep) >= SWEEP_INTERVAL {
            state.sweep(now);
        }

        let bucket = state
            .buckets
            .entry(key.clone())
            .or_insert_with(|| Bucket::new(now));
        bucket.last_touched = now;
        bucket.evict_expired(window, now);

        if (bucket.admitted.len() as u32) < limit {
            bucket.admitted.push_back(now);
            let resets_in = bucket.next_expiry(window, now);
            AdmitDecision::Admitted(AdmitStatus {
                limit,
                remaining: limit.saturating_sub(bucket.admitted.len() as u32),
                resets_in,
            })
        } else {
            let retry_after = bucket.next_expiry(window, now);
            AdmitDecision::Rejected(AdmitRejection { limit, retry_after })
        }
    }

    #[cfg(test)]
    async fn bucket_count(&self) -> usize {
        self.state.lock().await.buckets.len()
    }
}

impl Default for SlidingWindowGovernor {
    fn default() -> Self {
        Self::new()
    }
}

impl GovernorState {
    /// Drops buckets that have not been touched for a while.
    fn sweep(&mut self, now: Instant) {
        self.buckets
            .retain(|_, bucket| now.duration_since(bucket.last_touched) < BUCKET_IDLE_AFTER);
        self.last_sweep = now;
    }
}

impl Bucket {
    fn new(now: Instant) -> Self {
        Self {
            admitted: VecDeque::new(),
            last_touched: now,
        }
    }

    /// Removes entries older than the window, oldest first.
    fn evict_expired(&mut self, window: Duration, now: Instant) {
        while let Some(front) = self.admitted.front() {
            if now.duration_since(*front) >= window {
                self.admitted.pop_front();
            } else {
                break;
            }
        }
    }

    /// Time until the oldest counted entry leaves the window.
    fn next_expiry(&self, window: Duration, now: Instant) -> Duration {
        self.admitted
            .front()
            .map(|oldest| (*oldest + window).saturating_duration_since(now))
            .unwrap_or(window)
    }
}

#[async_trait]
impl RateGovernor for SlidingWindowGovernor {
    async fn admit(&self, key: &GovernorKey, limit: u32, window: Duration) -> AdmitDecision {
        self.admit_at(key, limit, window, Instant::now()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    const WINDOW: Duration = Duration::from_secs(60);

    fn key(identity: &str) -> GovernorKey {
        GovernorKey::new(identity, "chat")
    }

    // ─── Window Accounting ───────────────────────────────────────────

    #[tokio::test]
    async fn admits_up_to_the_limit() {
        let governor = SlidingWindowGovernor::new();
        let base = Instant::now();

        for i in 0..20 {
            let decision = governor.admit_at(&key("10.0.0.1"), 20, WINDOW, base).await;
            assert!(decision.is_admitted(), "request {} should be admitted", i + 1);
        }
    }

    #[tokio::test]
    async fn rejects_the_call_after_the_limit() {
        let governor = SlidingWindowGovernor::new();
        let base = Instant::now();

        for _ in 0..5 {
            governor.admit_at(&key("10.0.0.1"), 5, WINDOW, base).await;
        }

        let decision = governor.admit_at(&key("10.0.0.1"), 5, WINDOW, base).await;
        match decision {
            AdmitDecision::Rejected(rejection) => {
                assert_eq!(rejection.limit, 5);
                assert_eq!(rejection.retry_after, WINDOW);
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn admits_again_once_the_window_has_elapsed() {
        let governor = SlidingWindowGovernor::new();
        let base = Instant::now();
        let id = key("10.0.0.1");

        for _ in 0..3 {
            governor.admit_at(&id, 3, WINDOW, base).await;
        }
        assert!(governor
            .admit_at(&id, 3, WINDOW, base + Duration::from_secs(30))
            .await
            .is_rejected());

        let decision = governor.admit_at(&id, 3, WINDOW, base + WINDOW).await;
        assert!(decision.is_admitted());
    }

    #[tokio::test]
    async fn window_slides_rather_than_resetting() {
        let governor = SlidingWindowGovernor::new();
        let base = Instant::now();
        let id = key("10.0.0.1");

        governor.admit_at(&id, 2, WINDOW, base).await;
        governor
            .admit_at(&id, 2, WINDOW, base + Duration::from_secs(40))
            .await;

        // Both entries still inside the window.
        assert!(governor
            .admit_at(&id, 2, WINDOW, base + Duration::from_secs(50))
            .await
            .is_rejected());

        // First entry has expired, the one from t+40 has not.
        assert!(governor
            .admit_at(&id, 2, WINDOW, base + Duration::from_secs(61))
            .await
            .is_admitted());
        let decision = governor
            .admit_at(&id, 2, WINDOW, base + Duration::from_secs(62))
            .await;
        match decision {
            AdmitDecision::Rejected(rejection) => {
                // Oldest counted entry is now the one from t+40.
                assert_eq!(rejection.retry_after, Duration::from_secs(38));
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn remaining_counts_down_with_each_admission() {
        let governor = SlidingWindowGovernor::new();
        let base = Instant::now();
        let id = key("10.0.0.1");

        for expected in [2u32, 1, 0] {
            match governor.admit_at(&id, 3, WINDOW, base).await {
                AdmitDecision::Admitted(status) => {
                    assert_eq!(status.limit, 3);
                    assert_eq!(status.remaining, expected);
                }
                other => panic!("expected admission, got {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn resets_in_tracks_the_oldest_entry() {
        let governor = SlidingWindowGovernor::new();
        let base = Instant::now();
        let id = key("10.0.0.1");

        match governor.admit_at(&id, 10, WINDOW, base).await {
            AdmitDecision::Admitted(status) => assert_eq!(status.resets_in, WINDOW),
            other => panic!("expected admission, got {:?}", other),
        }

        match governor
            .admit_at(&id, 10, WINDOW, base + Duration::from_secs(10))
            .await
        {
            AdmitDecision::Admitted(status) => {
                assert_eq!(status.resets_in, Duration::from_secs(50));
            }
            other => panic!("expected admission, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn rejection_retry_points_at_the_oldest_entry() {
        let governor = SlidingWindowGovernor::new();
        let base = Instant::now();
        let id = key("10.0.0.1");

        governor.admit_at(&id, 1, WINDOW, base).await;

        match governor
            .admit_at(&id, 1, WINDOW, base + Duration::from_secs(45))
            .await
        {
            AdmitDecision::Rejected(rejection) => {
                assert_eq!(rejection.retry_after, Duration::from_secs(15));
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn zero_limit_always_rejects() {
        let governor = SlidingWindowGovernor::new();
        let base = Instant::now();

        let decision = governor.admit_at(&key("10.0.0.1"), 0, WINDOW, base).await;
        match decision {
            AdmitDecision::Rejected(rejection) => assert_eq!(rejection.retry_after, WINDOW),
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    // ─── Key Independence ────────────────────────────────────────────

    #[tokio::test]
    async fn identities_are_throttled_independently() {
        let governor = SlidingWindowGovernor::new();
        let base = Instant::now();

        for _ in 0..3 {
            governor.admit_at(&key("1.1.1.1"), 3, WINDOW, base).await;
        }
        assert!(governor.admit_at(&key("1.1.1.1"), 3, WINDOW, base).await.is_rejected());
        assert!(governor.admit_at(&key("2.2.2.2"), 3, WINDOW, base).await.is_admitted());
    }

    #[tokio::test]
    async fn endpoints_are_throttled_independently() {
        let governor = SlidingWindowGovernor::new();
        let base = Instant::now();
        let chat = GovernorKey::new("10.0.0.1", "chat");
        let report = GovernorKey::new("10.0.0.1", "generate_report");

        for _ in 0..3 {
            governor.admit_at(&chat, 3, WINDOW, base).await;
        }
        assert!(governor.admit_at(&chat, 3, WINDOW, base).await.is_rejected());
        assert!(governor.admit_at(&report, 3, WINDOW, base).await.is_admitted());
    }

    // ─── Housekeeping ────────────────────────────────────────────────

    #[tokio::test]
    async fn sweep_drops_idle_buckets() {
        let governor = SlidingWindowGovernor::new();
        let base = Instant::now();

        governor.admit_at(&key("1.1.1.1"), 20, WINDOW, base).await;
        assert_eq!(governor.bucket_count().await, 1);

        // Eleven minutes later a different caller triggers the sweep;
        // the first bucket has been idle past the threshold.
        governor
            .admit_at(&key("2.2.2.2"), 20, WINDOW, base + Duration::from_secs(11 * 60))
            .await;
        assert_eq!(governor.bucket_count().await, 1);
    }

    #[tokio::test]
    async fn recently_touched_buckets_survive_the_sweep() {
        let governor = SlidingWindowGovernor::new();
        let base = Instant::now();

        governor.admit_at(&key("1.1.1.1"), 20, WINDOW, base).await;
        // Touched again at t+8min; this admission also runs a sweep, and
        // the bucket is only eight minutes idle at that point.
        governor
            .admit_at(&key("1.1.1.1"), 20, WINDOW, base + Duration::from_secs(8 * 60))
            .await;
        governor
            .admit_at(&key("2.2.2.2"), 20, WINDOW, base + Duration::from_secs(11 * 60))
            .await;

        assert_eq!(governor.bucket_count().await, 2);
    }

    #[tokio::test]
    async fn works_through_the_trait_object() {
        let governor: Arc<dyn RateGovernor> = Arc::new(SlidingWindowGovernor::new());
        let decision = governor.admit(&key("9.9.9.9"), 20, WINDOW).await;
        assert!(decision.is_admitted());
    }

    // ─── Properties ──────────────────────────────────────────────────

    use proptest::prelude::*;

    proptest! {
        /// Property: every decision matches a reference sliding window.
        /// The model keeps the admitted instants per key and drops those
        /// a full window old; the governor must agree on every step.
        #[test]
        fn prop_decisions_match_a_reference_window(
            steps in prop::collection::vec((0usize..3, 0u64..150), 1..120),
        ) {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .build()
                .unwrap();

            let governor = SlidingWindowGovernor::new();
            let limit = 5u32;
            let window = Duration::from_millis(300);
            let keys = [key("10.0.0.1"), key("10.0.0.2"), key("10.0.0.3")];
            let mut model: Vec<Vec<Instant>> = vec![Vec::new(); 3];
            let mut now = Instant::now();

            for (which, advance_ms) in steps {
                now += Duration::from_millis(advance_ms);
                let decision =
                    runtime.block_on(governor.admit_at(&keys[which], limit, window, now));

                let shadow = &mut model[which];
                shadow.retain(|at| now.duration_since(*at) < window);
                if shadow.len() < limit as usize {
                    prop_assert!(
                        decision.is_admitted(),
                        "model admits ({} in window), governor rejected",
                        shadow.len()
                    );
                    shadow.push(now);
                } else {
                    prop_assert!(
                        decision.is_rejected(),
                        "model rejects ({} in window), governor admitted",
                        shadow.len()
                    );
                }
            }
        }
    }
}
