use async_trait::async_trait;

use crate::error::StoreResult;
use crate::models::WeddingParty;

/// A stored record together with the version it was read at.
#[derive(Debug, Clone)]
pub struct Versioned<T> {
    pub record: T,
    pub version: i64,
}

/// Party-keyed persistence. One record per party; members travel with
/// their party.
///
/// Implementations must report a taken wedding code on `insert` as
/// `StoreError::DuplicateCode` and a stale `expected_version` on `save` as
/// `StoreError::VersionConflict`, so the store can retry.
#[async_trait]
pub trait PartyRepository: Send + Sync {
    async fn insert(&self, party: &WeddingParty) -> StoreResult<()>;

    async fn load(&self, id: &str) -> StoreResult<Option<Versioned<WeddingParty>>>;

    /// `code` is already normalized.
    async fn load_by_code(&self, code: &str) -> StoreResult<Option<WeddingParty>>;

    async fn load_all(&self) -> StoreResult<Vec<WeddingParty>>;

    async fn save(&self, party: &WeddingParty, expected_version: i64) -> StoreResult<()>;
}
