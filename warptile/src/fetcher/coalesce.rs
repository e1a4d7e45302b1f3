//! Request coalescing for concurrent identical fetches.
//!
//! When enabled, the first fetch for a cache key becomes the leader and
//! performs the download. Fetches for the same key that arrive while the
//! leader is in flight subscribe to its result instead of issuing their own
//! request.
//!
//! ```text
//! fetch A ─┐
//!          │                            HTTP + decode
//! fetch B ─┼──► RequestCoalescer ──────► (leader only)
//!          │          │                      │
//! fetch C ─┘          ▼                      ▼
//!              [B, C receive the     ◄── broadcast
//!               leader's result]
//! ```
//!
//! If the leader's future is dropped before it completes, its entry is
//! removed and waiters receive [`TileError::Internal`].

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::debug;

use crate::bitmap::Bitmap;
use crate::error::TileError;
use crate::request::CacheKey;

/// Result shared between a leader and its waiters.
pub(crate) type SharedResult = Result<Arc<Bitmap>, TileError>;

/// Statistics for monitoring coalescing effectiveness.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoalescerStats {
    /// Total requests received
    pub total_requests: u64,
    /// Requests that were coalesced (waited for existing work)
    pub coalesced_requests: u64,
    /// Requests that triggered new work
    pub new_requests: u64,
}

impl CoalescerStats {
    /// Returns the coalescing ratio (0.0 to 1.0)
    pub fn coalescing_ratio(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.coalesced_requests as f64 / self.total_requests as f64
        }
    }
}

/// Tracks in-flight fetches by cache key.
#[derive(Default)]
pub(crate) struct RequestCoalescer {
    in_flight: Mutex<HashMap<CacheKey, broadcast::Sender<SharedResult>>>,
    stats: Mutex<CoalescerStats>,
}

/// Outcome of registering a fetch.
pub(crate) enum Registration<'a> {
    /// First fetch for the key: perform it and call [`LeaderGuard::complete`]
    Leader(LeaderGuard<'a>),
    /// Another fetch is in flight: wait on the receiver
    Follower(broadcast::Receiver<SharedResult>),
}

impl RequestCoalescer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Register a fetch for `key`.
    pub(crate) fn register(&self, key: &CacheKey) -> Registration<'_> {
        let mut in_flight = self.in_flight.lock();
        let mut stats = self.stats.lock();
        stats.total_requests += 1;

        if let Some(tx) = in_flight.get(key) {
            stats.coalesced_requests += 1;
            debug!(
                key = %key,
                coalesced = stats.coalesced_requests,
                "Coalescing request - waiting for in-flight fetch"
            );
            Registration::Follower(tx.subscribe())
        } else {
            // One message per key; waiters only ever read the single result
            let (tx, _rx) = broadcast::channel(1);
            in_flight.insert(key.clone(), tx);
            stats.new_requests += 1;
            debug!(
                key = %key,
                in_flight_count = in_flight.len(),
                "New request - starting fetch"
            );
            Registration::Leader(LeaderGuard {
                coalescer: self,
                key: Some(key.clone()),
            })
        }
    }

    /// Snapshot of the current statistics.
    pub(crate) fn stats(&self) -> CoalescerStats {
        self.stats.lock().clone()
    }

    /// Number of fetches currently in flight.
    #[cfg(test)]
    pub(crate) fn in_flight_count(&self) -> usize {
        self.in_flight.lock().len()
    }

    fn finish(&self, key: &CacheKey, result: Option<&SharedResult>) {
        let Some(tx) = self.in_flight.lock().remove(key) else {
            return;
        };

        let waiters = tx.receiver_count();
        match result {
            Some(result) => {
                // No receivers is not an error
                let _ = tx.send(result.clone());
                if waiters > 0 {
                    debug!(key = %key, waiters, "Broadcast result to coalesced waiters");
                }
            }
            None => {
                debug!(key = %key, waiters, "Leader abandoned fetch");
            }
        }
    }
}

/// Held by the leader of a coalesced fetch.
///
/// Dropping it without calling [`complete`](Self::complete) releases the key
/// and closes the channel so waiters are not left hanging.
pub(crate) struct LeaderGuard<'a> {
    coalescer: &'a RequestCoalescer,
    key: Option<CacheKey>,
}

impl LeaderGuard<'_> {
    /// Publish the leader's result to all waiters.
    pub(crate) fn complete(mut self, result: &SharedResult) {
        if let Some(key) = self.key.take() {
            self.coalescer.finish(&key, Some(result));
        }
    }
}

impl Drop for LeaderGuard<'_> {
    fn drop(&mut self) {
        if let Some(key) = self.key.take() {
            self.coalescer.finish(&key, None);
        }
    }
}

/// Wait for a leader's result.
pub(crate) async fn wait_for_leader(
    mut rx: broadcast::Receiver<SharedResult>,
) -> SharedResult {
    rx.recv().await.unwrap_or_else(|_| {
        Err(TileError::Internal(
            "coalesced fetch was abandoned before completing".to_string(),
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{TileDefaults, TileRequest};

    fn key(n: u32) -> CacheKey {
        let defaults = TileDefaults {
            width: 512,
            height: 512,
            bands: "1,2,3".to_string(),
        };
        let request = TileRequest::new([n as f64, 0.0, 1.0, 1.0], "EPSG:4326", "a.tif");
        CacheKey::from_request(&request.normalize(&defaults)).unwrap()
    }

    fn bitmap() -> Arc<Bitmap> {
        Arc::new(Bitmap::new(image::RgbaImage::new(1, 1)))
    }

    #[test]
    fn test_first_request_is_leader() {
        let coalescer = RequestCoalescer::new();
        assert!(matches!(coalescer.register(&key(1)), Registration::Leader(_)));
    }

    #[test]
    fn test_second_request_is_follower() {
        let coalescer = RequestCoalescer::new();
        let _leader = coalescer.register(&key(1));

        assert!(matches!(coalescer.register(&key(1)), Registration::Follower(_)));
        assert_eq!(coalescer.in_flight_count(), 1);
    }

    #[test]
    fn test_different_keys_not_coalesced() {
        let coalescer = RequestCoalescer::new();
        let first = coalescer.register(&key(1));
        let second = coalescer.register(&key(2));

        assert!(matches!(first, Registration::Leader(_)));
        assert!(matches!(second, Registration::Leader(_)));
        assert_eq!(coalescer.in_flight_count(), 2);
    }

    #[tokio::test]
    async fn test_follower_receives_leader_result() {
        let coalescer = RequestCoalescer::new();
        let Registration::Leader(leader) = coalescer.register(&key(1)) else {
            panic!("expected leader");
        };
        let Registration::Follower(rx) = coalescer.register(&key(1)) else {
            panic!("expected follower");
        };

        let shared = bitmap();
        leader.complete(&Ok(shared.clone()));

        let received = wait_for_leader(rx).await.unwrap();
        assert!(Arc::ptr_eq(&received, &shared));
        assert_eq!(coalescer.in_flight_count(), 0);
    }

    #[tokio::test]
    async fn test_follower_receives_leader_error() {
        let coalescer = RequestCoalescer::new();
        let Registration::Leader(leader) = coalescer.register(&key(1)) else {
            panic!("expected leader");
        };
        let Registration::Follower(rx) = coalescer.register(&key(1)) else {
            panic!("expected follower");
        };

        leader.complete(&Err(TileError::Decode("bad".to_string())));

        assert_eq!(
            wait_for_leader(rx).await.unwrap_err(),
            TileError::Decode("bad".to_string())
        );
    }

    #[tokio::test]
    async fn test_dropped_leader_releases_waiters() {
        let coalescer = RequestCoalescer::new();
        let leader = coalescer.register(&key(1));
        let Registration::Follower(rx) = coalescer.register(&key(1)) else {
            panic!("expected follower");
        };

        drop(leader);

        assert!(matches!(
            wait_for_leader(rx).await,
            Err(TileError::Internal(_))
        ));
        assert_eq!(coalescer.in_flight_count(), 0);
        assert!(matches!(coalescer.register(&key(1)), Registration::Leader(_)));
    }

    #[test]
    fn test_stats() {
        let coalescer = RequestCoalescer::new();
        let _a = coalescer.register(&key(1));
        let _b = coalescer.register(&key(1));
        let _c = coalescer.register(&key(1));
        let _d = coalescer.register(&key(2));

        let stats = coalescer.stats();
        assert_eq!(stats.total_requests, 4);
        assert_eq!(stats.coalesced_requests, 2);
        assert_eq!(stats.new_requests, 2);
        assert!((stats.coalescing_ratio() - 0.5).abs() < f64::EPSILON);
    }
}
