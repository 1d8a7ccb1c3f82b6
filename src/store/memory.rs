use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::repository::{PartyRepository, Versioned};
use crate::error::{StoreError, StoreResult};
use crate::models::WeddingParty;

/// Process-local repository; contents are lost on restart.
#[derive(Default)]
pub struct InMemoryRepository {
    parties: RwLock<HashMap<String, Versioned<WeddingParty>>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PartyRepository for InMemoryRepository {
    async fn insert(&self, party: &WeddingParty) -> StoreResult<()> {
        let mut parties = self.parties.write().await;
        if parties
            .values()
            .any(|p| p.record.wedding_code == party.wedding_code)
        {
            return Err(StoreError::DuplicateCode(party.wedding_code.clone()));
        }
        parties.insert(
            party.id.clone(),
            Versioned {
                record: party.clone(),
                version: 1,
            },
        );
        Ok(())
    }

    async fn load(&self, id: &str) -> StoreResult<Option<Versioned<WeddingParty>>> {
        Ok(self.parties.read().await.get(id).cloned())
    }

    async fn load_by_code(&self, code: &str) -> StoreResult<Option<WeddingParty>> {
        Ok(self
            .parties
            .read()
            .await
            .values()
            .find(|p| p.record.wedding_code == code)
            .map(|p| p.record.clone()))
    }

    async fn load_all(&self) -> StoreResult<Vec<WeddingParty>> {
        let mut all: Vec<WeddingParty> = self
            .parties
            .read()
            .await
            .values()
            .map(|p| p.record.clone())
            .collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(all)
    }

    async fn save(&self, party: &WeddingParty, expected_version: i64) -> StoreResult<()> {
        let mut parties = self.parties.write().await;
        let Some(stored) = parties.get_mut(&party.id) else {
            return Err(StoreError::party_not_found(&party.id));
        };
        if stored.version != expected_version {
            return Err(StoreError::VersionConflict(party.id.clone()));
        }
        stored.record = party.clone();
        stored.version += 1;
        Ok(())
    }
}
