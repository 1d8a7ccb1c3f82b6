//! The wedding party store: creation, lookup and mutation of parties and
//! their members.
//!
//! Every mutation is a load-modify-save of a single party record, run under
//! that party's lock and guarded by the repository's version check. The
//! record is modified as an owned copy, so a failed save leaves nothing
//! half-applied.

pub mod customers;
pub mod locks;
pub mod memory;
pub mod repository;
pub mod sqlite;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::analytics::{self, MeasurementStats, Progress, WeddingAnalytics};
use crate::error::{StoreError, StoreResult};
use crate::models::party::{generate_wedding_code, normalize_wedding_code, parse_wedding_date};
use crate::models::{
    BasicMeasurementsInput, ContactInfo, MemberPatch, NewMember, NewParty, OrderStatus,
    PartyPatch, ShippingAddress, SuitMeasurementsInput, WeddingMember, WeddingParty,
};

pub use customers::{CustomerDirectory, InMemoryCustomerDirectory, SqliteCustomerDirectory};
pub use locks::PartyLocks;
pub use memory::InMemoryRepository;
pub use repository::{PartyRepository, Versioned};
pub use sqlite::SqliteRepository;

const MAX_CODE_ATTEMPTS: usize = 8;
const MAX_SAVE_ATTEMPTS: usize = 3;

/// Result of applying a mutation to a loaded party.
enum Outcome<T> {
    Changed(T),
    Unchanged(T),
}

pub struct WeddingPartyStore {
    parties: Arc<dyn PartyRepository>,
    customers: Arc<dyn CustomerDirectory>,
    locks: PartyLocks,
}

impl WeddingPartyStore {
    pub fn new(parties: Arc<dyn PartyRepository>, customers: Arc<dyn CustomerDirectory>) -> Self {
        Self {
            parties,
            customers,
            locks: PartyLocks::new(),
        }
    }

    pub fn sqlite(pool: SqlitePool) -> Self {
        Self::new(
            Arc::new(SqliteRepository::new(pool.clone())),
            Arc::new(SqliteCustomerDirectory::new(pool)),
        )
    }

    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryRepository::new()),
            Arc::new(InMemoryCustomerDirectory::new()),
        )
    }

    pub async fn create_party(&self, input: NewParty) -> StoreResult<WeddingParty> {
        let wedding_date = parse_wedding_date(input.wedding_date.as_deref())?;

        let now = Utc::now();
        let mut party = self.insert_with_fresh_code(&input, wedding_date, now).await?;

        // Customer records are only provisioned once the party row exists.
        let _guard = self.locks.acquire(&party.id).await;
        let groom_linked = self.link_customer(&mut party.groom_info, "groom").await;
        let bride_linked = self.link_customer(&mut party.bride_info, "bride").await;
        if !(groom_linked || bride_linked) {
            return Ok(party);
        }

        // A freshly inserted row is at version 1.
        match self.parties.save(&party, 1).await {
            Ok(()) => Ok(party),
            Err(e) => {
                tracing::warn!("Could not link customer records to party {}: {e}", party.id);
                self.get_party(&party.id).await
            }
        }
    }

    async fn insert_with_fresh_code(
        &self,
        input: &NewParty,
        wedding_date: NaiveDate,
        now: DateTime<Utc>,
    ) -> StoreResult<WeddingParty> {
        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let party = WeddingParty::new(input.clone(), wedding_date, generate_wedding_code(), now);
            match self.parties.insert(&party).await {
                Ok(()) => {
                    tracing::info!(
                        "Created wedding party {} ({}) for {}",
                        party.id,
                        party.wedding_code,
                        party.wedding_date
                    );
                    return Ok(party);
                }
                Err(StoreError::DuplicateCode(code)) => {
                    tracing::warn!("Wedding code {code} already taken (attempt {attempt})");
                }
                Err(e) => return Err(e),
            }
        }

        Err(StoreError::Conflict(
            "could not allocate a unique wedding code".to_string(),
        ))
    }

    /// Returns whether the contact was newly linked. Failures are logged and
    /// the contact is left unlinked.
    async fn link_customer(&self, contact: &mut ContactInfo, role: &str) -> bool {
        if contact.customer_id.is_some() || contact.name.trim().is_empty() {
            return false;
        }
        match self.customers.ensure_customer(contact).await {
            Ok(id) => {
                contact.customer_id = Some(id);
                true
            }
            Err(e) => {
                tracing::warn!("Could not provision {role} customer record: {e}");
                false
            }
        }
    }

    pub async fn find_by_code(&self, code: &str) -> StoreResult<Option<WeddingParty>> {
        let Some(code) = normalize_wedding_code(code) else {
            return Ok(None);
        };
        self.parties.load_by_code(&code).await
    }

    pub async fn get_party(&self, party_id: &str) -> StoreResult<WeddingParty> {
        self.parties
            .load(party_id)
            .await?
            .map(|v| v.record)
            .ok_or_else(|| StoreError::party_not_found(party_id))
    }

    pub async fn list_parties(&self) -> StoreResult<Vec<WeddingParty>> {
        self.parties.load_all().await
    }

    pub async fn update_party(&self, party_id: &str, patch: PartyPatch) -> StoreResult<WeddingParty> {
        self.transact(party_id, |party, _now| {
            party.apply(patch.clone());
            Ok(Outcome::Changed(party.clone()))
        })
        .await
    }

    pub async fn add_member(&self, party_id: &str, input: NewMember) -> StoreResult<WeddingMember> {
        input.validate()?;
        let member = self
            .transact(party_id, |party, now| {
                let member = WeddingMember::new(party.next_member_id(), input.clone(), now);
                party.push_member(member.clone());
                Ok(Outcome::Changed(member))
            })
            .await?;
        tracing::info!("Added member {} ({}) to party {party_id}", member.id, member.role);
        Ok(member)
    }

    pub async fn update_member(
        &self,
        party_id: &str,
        member_id: u64,
        patch: MemberPatch,
    ) -> StoreResult<WeddingMember> {
        patch.validate()?;
        self.transact(party_id, |party, _now| {
            let member = party.member_mut(member_id)?;
            member.apply(patch.clone());
            Ok(Outcome::Changed(member.clone()))
        })
        .await
    }

    /// Removing a member that is already gone is a no-op.
    pub async fn remove_member(&self, party_id: &str, member_id: u64) -> StoreResult<()> {
        self.transact(party_id, |party, _now| {
            if party.remove_member(member_id) {
                Ok(Outcome::Changed(()))
            } else {
                Ok(Outcome::Unchanged(()))
            }
        })
        .await
    }

    pub async fn record_measurements(
        &self,
        party_id: &str,
        member_id: u64,
        measurements: BasicMeasurementsInput,
    ) -> StoreResult<WeddingMember> {
        self.transact(party_id, |party, now| {
            let member = party.member_mut(member_id)?;
            member.record_basic_measurements(measurements.clone(), now)?;
            Ok(Outcome::Changed(member.clone()))
        })
        .await
    }

    pub async fn record_suit_measurements(
        &self,
        party_id: &str,
        member_id: u64,
        measurements: SuitMeasurementsInput,
    ) -> StoreResult<WeddingMember> {
        self.transact(party_id, |party, now| {
            let member = party.member_mut(member_id)?;
            member.record_suit_measurements(measurements.clone(), now);
            Ok(Outcome::Changed(member.clone()))
        })
        .await
    }

    pub async fn record_shipping_address(
        &self,
        party_id: &str,
        member_id: u64,
        address: ShippingAddress,
    ) -> StoreResult<WeddingMember> {
        address.validate()?;
        self.transact(party_id, |party, _now| {
            let member = party.member_mut(member_id)?;
            member.record_shipping_address(address.clone());
            Ok(Outcome::Changed(member.clone()))
        })
        .await
    }

    /// Any status may follow any other.
    pub async fn set_order_status(
        &self,
        party_id: &str,
        member_id: u64,
        status: OrderStatus,
    ) -> StoreResult<WeddingMember> {
        self.transact(party_id, |party, _now| {
            let member = party.member_mut(member_id)?;
            member.order_status = Some(status);
            Ok(Outcome::Changed(member.clone()))
        })
        .await
    }

    pub async fn member_progress(&self, party_id: &str, member_id: u64) -> StoreResult<Progress> {
        let party = self.get_party(party_id).await?;
        party
            .member(member_id)
            .map(analytics::member_progress)
            .ok_or_else(|| StoreError::member_not_found(party_id, member_id))
    }

    pub async fn party_progress(&self, party_id: &str) -> StoreResult<Progress> {
        let party = self.get_party(party_id).await?;
        Ok(analytics::party_progress(&party))
    }

    pub async fn measurement_stats(&self, party_id: &str) -> StoreResult<MeasurementStats> {
        let party = self.get_party(party_id).await?;
        Ok(analytics::measurement_stats(&party))
    }

    pub async fn analytics(&self) -> StoreResult<WeddingAnalytics> {
        let parties = self.parties.load_all().await?;
        Ok(analytics::wedding_analytics(&parties, Utc::now().date_naive()))
    }

    /// Runs `apply` against a fresh copy of the party and saves it. On a
    /// version conflict the party is reloaded and `apply` runs again.
    async fn transact<T, F>(&self, party_id: &str, mut apply: F) -> StoreResult<T>
    where
        T: Send,
        F: FnMut(&mut WeddingParty, DateTime<Utc>) -> StoreResult<Outcome<T>> + Send,
    {
        let _guard = self.locks.acquire(party_id).await;

        for attempt in 1..=MAX_SAVE_ATTEMPTS {
            let Versioned {
                record: mut party,
                version,
            } = self
                .parties
                .load(party_id)
                .await?
                .ok_or_else(|| StoreError::party_not_found(party_id))?;

            let now = Utc::now();
            party.updated_at = now;
            let value = match apply(&mut party, now)? {
                Outcome::Changed(value) => value,
                Outcome::Unchanged(value) => return Ok(value),
            };

            match self.parties.save(&party, version).await {
                Ok(()) => {
                    tracing::debug!("Saved party {party_id} at version {}", version + 1);
                    return Ok(value);
                }
                Err(StoreError::VersionConflict(_)) => {
                    tracing::warn!("Party {party_id} changed during update (attempt {attempt}), retrying");
                }
                Err(e) => return Err(e),
            }
        }

        Err(StoreError::Conflict(format!(
            "wedding party {party_id} is being modified concurrently"
        )))
    }
}
