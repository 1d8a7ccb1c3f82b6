use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per party id. An entry lives only while some caller holds
/// or waits on it, so ids that never resolve to a party do not accumulate.
#[derive(Default)]
pub struct PartyLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

/// Held lock on one party. Dropping it releases the mutex and evicts the map
/// entry when nobody else is waiting.
pub struct PartyLockGuard<'a> {
    guard: Option<OwnedMutexGuard<()>>,
    locks: &'a DashMap<String, Arc<Mutex<()>>>,
    party_id: String,
}

impl PartyLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, party_id: &str) -> PartyLockGuard<'_> {
        // Clone the Arc out so the map shard is not held across the await.
        let lock = self
            .locks
            .entry(party_id.to_string())
            .or_default()
            .value()
            .clone();
        let guard = lock.lock_owned().await;
        PartyLockGuard {
            guard: Some(guard),
            locks: &self.locks,
            party_id: party_id.to_string(),
        }
    }

    /// Number of parties with a live lock entry.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

impl Drop for PartyLockGuard<'_> {
    fn drop(&mut self) {
        // The owned guard keeps its own Arc; release it before counting.
        self.guard.take();
        self.locks
            .remove_if(&self.party_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}
