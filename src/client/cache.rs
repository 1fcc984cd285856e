//! Single-flight manifest cache
//!
//! One entry per agent id. Concurrent first lookups share one fetch and one
//! outcome. A successful fetch is kept until it is refreshed or invalidated;
//! a failed fetch is handed to every waiter and then forgotten, so the next
//! lookup fetches again.

use std::{
    collections::HashMap,
    future::Future,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
};

use futures::future::{BoxFuture, FutureExt, Shared};

use crate::protocol::{error::A2AError, manifest::Manifest};

type SharedFetch = Shared<BoxFuture<'static, Result<Arc<Manifest>, A2AError>>>;

enum Slot {
    Ready(Arc<Manifest>),
    Pending { id: u64, fetch: SharedFetch },
}

/// Manifest cache keyed by agent id
#[derive(Default)]
pub struct ManifestCache {
    slots: Mutex<HashMap<String, Slot>>,
    next_id: AtomicU64,
}

impl ManifestCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<String, Slot>> {
        // Slots are replaced whole, so a poisoned map is still consistent
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn start(&self, fetch: impl Future<Output = Result<Manifest, A2AError>> + Send + 'static) -> (u64, SharedFetch) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let fetch = fetch.map(|result| result.map(Arc::new)).boxed().shared();
        (id, fetch)
    }

    /// Return the cached manifest or fetch it
    ///
    /// `fetch` is only invoked when no entry and no fetch in flight exist for
    /// `agent_id`.
    pub async fn get<F, Fut>(&self, agent_id: &str, fetch: F) -> Result<Arc<Manifest>, A2AError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Manifest, A2AError>> + Send + 'static,
    {
        let (id, pending) = {
            let mut slots = self.slots();
            match slots.get(agent_id) {
                Some(Slot::Ready(manifest)) => {
                    tracing::debug!(agent_id, "Manifest cache hit");
                    return Ok(manifest.clone());
                }
                Some(Slot::Pending { id, fetch }) => {
                    tracing::debug!(agent_id, "Joining in-flight manifest fetch");
                    (*id, fetch.clone())
                }
                None => {
                    tracing::debug!(agent_id, "Manifest cache miss");
                    let (id, pending) = self.start(fetch());
                    slots.insert(
                        agent_id.to_string(),
                        Slot::Pending {
                            id,
                            fetch: pending.clone(),
                        },
                    );
                    (id, pending)
                }
            }
        };

        self.settle(agent_id, id, pending).await
    }

    /// Fetch the manifest again and replace the cached entry
    ///
    /// Callers already waiting on an older fetch keep that fetch's outcome.
    pub async fn refresh<F, Fut>(&self, agent_id: &str, fetch: F) -> Result<Arc<Manifest>, A2AError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Manifest, A2AError>> + Send + 'static,
    {
        let (id, pending) = self.start(fetch());
        self.slots().insert(
            agent_id.to_string(),
            Slot::Pending {
                id,
                fetch: pending.clone(),
            },
        );
        tracing::debug!(agent_id, "Refreshing manifest");

        self.settle(agent_id, id, pending).await
    }

    /// Drop the cached entry for `agent_id`
    pub fn invalidate(&self, agent_id: &str) {
        if self.slots().remove(agent_id).is_some() {
            tracing::debug!(agent_id, "Manifest invalidated");
        }
    }

    /// Drop every cached entry
    pub fn clear(&self) {
        self.slots().clear();
    }

    /// The cached manifest, without fetching
    pub fn cached(&self, agent_id: &str) -> Option<Arc<Manifest>> {
        match self.slots().get(agent_id) {
            Some(Slot::Ready(manifest)) => Some(manifest.clone()),
            _ => None,
        }
    }

    /// Await a fetch and record its outcome
    ///
    /// Only the fetch that currently owns the slot may replace it.
    async fn settle(
        &self,
        agent_id: &str,
        id: u64,
        pending: SharedFetch,
    ) -> Result<Arc<Manifest>, A2AError> {
        let result = pending.await;

        let mut slots = self.slots();
        let owns_slot = matches!(slots.get(agent_id), Some(Slot::Pending { id: current, .. }) if *current == id);
        if owns_slot {
            match &result {
                Ok(manifest) => {
                    tracing::debug!(agent_id, name = %manifest.name, "Manifest cached");
                    slots.insert(agent_id.to_string(), Slot::Ready(manifest.clone()));
                }
                Err(err) => {
                    tracing::debug!(agent_id, error = %err, "Manifest fetch failed");
                    slots.remove(agent_id);
                }
            }
        }

        result
    }
}

impl std::fmt::Debug for ManifestCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let slots = self.slots();
        let ready = slots
            .values()
            .filter(|slot| matches!(slot, Slot::Ready(_)))
            .count();
        f.debug_struct("ManifestCache")
            .field("ready", &ready)
            .field("pending", &(slots.len() - ready))
            .finish()
    }
}
