// ── Single-flight property cache ──
//
// Every reading the gateway exposes comes from one bulk `/api/prop`
// request. Within the TTL the memoized snapshot is served without I/O.
// Once stale, the first caller starts a refresh and every concurrent
// caller awaits that same shared future, so the device sees at most one
// fetch per window. The refresh task itself records its outcome, so a
// refresh whose waiters all went away still lands in the state. Failures
// reach all waiters of that attempt and are never memoized.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use alfen_api::Properties;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tokio::time::Instant;
use tracing::{debug, trace, warn};

use crate::error::CoreError;
use crate::snapshot::PropertySnapshot;

type RefreshFn = Arc<dyn Fn() -> BoxFuture<'static, Result<Properties, CoreError>> + Send + Sync>;
type SharedRefresh = Shared<BoxFuture<'static, Result<Arc<PropertySnapshot>, CoreError>>>;

/// TTL-bounded, single-flight cache around a bulk property fetch.
pub struct PropertyCache {
    refresh: RefreshFn,
    ttl: Duration,
    state: Arc<Mutex<CacheState>>,
}

#[derive(Default)]
struct CacheState {
    snapshot: Option<Arc<PropertySnapshot>>,
    /// Refresh currently running, tagged with its generation.
    in_flight: Option<(u64, SharedRefresh)>,
    generation: u64,
}

impl CacheState {
    fn fresh(&self, ttl: Duration) -> Option<Arc<PropertySnapshot>> {
        self.snapshot
            .as_ref()
            .filter(|snap| snap.fetched_at.elapsed() < ttl)
            .map(Arc::clone)
    }
}

impl PropertyCache {
    /// Create a cache whose refreshes call `refresh`.
    pub fn new<F, Fut>(ttl: Duration, refresh: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Properties, CoreError>> + Send + 'static,
    {
        Self {
            refresh: Arc::new(move || refresh().boxed()),
            ttl,
            state: Arc::new(Mutex::new(CacheState::default())),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The memoized snapshot, fresh or not, without triggering a refresh.
    pub fn cached(&self) -> Option<Arc<PropertySnapshot>> {
        self.lock().snapshot.clone()
    }

    /// Return a snapshot no older than the TTL, refreshing at most once
    /// for all concurrent callers.
    pub async fn get_snapshot(&self) -> Result<Arc<PropertySnapshot>, CoreError> {
        let (generation, pending) = {
            let mut state = self.lock();

            if let Some(snap) = state.fresh(self.ttl) {
                trace!("serving cached property snapshot");
                return Ok(snap);
            }

            match state.in_flight.take() {
                // A resolved refresh left in the slot never recorded its
                // outcome (its task died); start over.
                Some((generation, pending)) if pending.peek().is_none() => {
                    trace!(generation, "joining in-flight refresh");
                    state.in_flight = Some((generation, pending.clone()));
                    (generation, pending)
                }
                _ => {
                    state.generation += 1;
                    let generation = state.generation;
                    let pending = self.start_refresh(generation);
                    state.in_flight = Some((generation, pending.clone()));
                    (generation, pending)
                }
            }
        };

        let result = pending.await;
        if result.is_err() {
            // Covers a refresh task that panicked before recording itself
            release(&self.state, generation, &result);
        }
        result
    }

    /// Spawn the fetch so it progresses even if every waiter is dropped;
    /// the fetch may hold the device session lock. The task records its
    /// own outcome in the cache state.
    fn start_refresh(&self, generation: u64) -> SharedRefresh {
        let fetch = (self.refresh)();
        let state = Arc::clone(&self.state);
        let task = tokio::spawn(async move {
            debug!(generation, "refreshing property snapshot");
            let result = fetch
                .await
                .map(|props| Arc::new(PropertySnapshot::new(props, Instant::now())));
            release(&state, generation, &result);
            result
        });

        async move {
            task.await.unwrap_or_else(|e| {
                Err(CoreError::Internal(format!("property refresh task failed: {e}")))
            })
        }
        .boxed()
        .shared()
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        lock(&self.state)
    }
}

fn lock(state: &Mutex<CacheState>) -> MutexGuard<'_, CacheState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Store the outcome of `generation` and free the in-flight slot. A no-op
/// once the slot has moved on to another generation.
fn release(
    state: &Mutex<CacheState>,
    generation: u64,
    result: &Result<Arc<PropertySnapshot>, CoreError>,
) {
    let mut state = lock(state);
    if !matches!(state.in_flight, Some((g, _)) if g == generation) {
        return;
    }
    state.in_flight = None;
    match result {
        Ok(snap) => state.snapshot = Some(Arc::clone(snap)),
        Err(e) => warn!(generation, error = %e, "property refresh failed"),
    }
}
