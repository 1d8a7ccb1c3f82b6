use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::member::WeddingMember;
use crate::error::{StoreError, StoreResult};

pub const WEDDING_CODE_LEN: usize = 6;
const WEDDING_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Random public code members use to find their party.
pub fn generate_wedding_code() -> String {
    let mut rng = rand::thread_rng();
    (0..WEDDING_CODE_LEN)
        .map(|_| WEDDING_CODE_ALPHABET[rng.gen_range(0..WEDDING_CODE_ALPHABET.len())] as char)
        .collect()
}

/// Uppercases and trims a user-typed code. Returns `None` when it cannot be
/// a wedding code at all.
pub fn normalize_wedding_code(code: &str) -> Option<String> {
    let code = code.trim().to_uppercase();
    let valid = code.len() == WEDDING_CODE_LEN
        && code.bytes().all(|b| WEDDING_CODE_ALPHABET.contains(&b));
    valid.then_some(code)
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp.
pub fn parse_wedding_date(raw: Option<&str>) -> StoreResult<NaiveDate> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| StoreError::validation("weddingDate is required"))?;

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .map_err(|_| StoreError::validation(format!("weddingDate is not a valid date: {raw}")))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartyStatus {
    #[default]
    Planning,
    Measurements,
    Completed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    #[serde(default)]
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub customer_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StylePreferences {
    pub suit_color: Option<String>,
    pub color_scheme: Option<String>,
    pub fit: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeddingParty {
    pub id: String,
    pub wedding_code: String,
    pub wedding_date: NaiveDate,
    pub groom_info: ContactInfo,
    pub bride_info: ContactInfo,
    #[serde(default)]
    pub style_preferences: StylePreferences,
    pub attire_type: Option<String>,
    #[serde(default)]
    pub accessories: Vec<String>,
    pub special_requests: Option<String>,
    #[serde(default)]
    pub(crate) members: Vec<WeddingMember>,
    pub status: PartyStatus,
    pub estimated_party_size: u32,
    #[serde(default)]
    pub(crate) member_sequence: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewParty {
    #[serde(default)]
    pub groom_info: ContactInfo,
    #[serde(default)]
    pub bride_info: ContactInfo,
    pub wedding_date: Option<String>,
    #[serde(default)]
    pub style_preferences: StylePreferences,
    pub attire_type: Option<String>,
    #[serde(default)]
    pub accessories: Vec<String>,
    pub special_requests: Option<String>,
    #[serde(default)]
    pub estimated_party_size: u32,
}

/// Owner edits to a party. The wedding date and code are fixed once the
/// party exists, so they are not accepted here.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PartyPatch {
    pub groom_info: Option<ContactInfo>,
    pub bride_info: Option<ContactInfo>,
    pub style_preferences: Option<StylePreferences>,
    pub attire_type: Option<String>,
    pub accessories: Option<Vec<String>>,
    pub special_requests: Option<String>,
    pub status: Option<PartyStatus>,
    pub estimated_party_size: Option<u32>,
}

impl WeddingParty {
    pub fn new(
        input: NewParty,
        wedding_date: NaiveDate,
        wedding_code: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            wedding_code,
            wedding_date,
            groom_info: input.groom_info,
            bride_info: input.bride_info,
            style_preferences: input.style_preferences,
            attire_type: input.attire_type,
            accessories: input.accessories,
            special_requests: input.special_requests,
            members: Vec::new(),
            status: PartyStatus::Planning,
            estimated_party_size: input.estimated_party_size,
            member_sequence: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn members(&self) -> &[WeddingMember] {
        &self.members
    }

    pub fn member(&self, member_id: u64) -> Option<&WeddingMember> {
        self.members.iter().find(|m| m.id == member_id)
    }

    pub(crate) fn member_mut(&mut self, member_id: u64) -> StoreResult<&mut WeddingMember> {
        let party_id = self.id.clone();
        self.members
            .iter_mut()
            .find(|m| m.id == member_id)
            .ok_or_else(|| StoreError::member_not_found(&party_id, member_id))
    }

    pub(crate) fn next_member_id(&mut self) -> u64 {
        self.member_sequence += 1;
        self.member_sequence
    }

    pub(crate) fn push_member(&mut self, member: WeddingMember) {
        self.member_sequence = self.member_sequence.max(member.id);
        self.members.push(member);
    }

    /// Returns whether a member was actually removed.
    pub(crate) fn remove_member(&mut self, member_id: u64) -> bool {
        let before = self.members.len();
        self.members.retain(|m| m.id != member_id);
        self.members.len() != before
    }

    pub fn apply(&mut self, patch: PartyPatch) {
        if let Some(groom) = patch.groom_info {
            self.groom_info = groom;
        }
        if let Some(bride) = patch.bride_info {
            self.bride_info = bride;
        }
        if let Some(style) = patch.style_preferences {
            self.style_preferences = style;
        }
        if patch.attire_type.is_some() {
            self.attire_type = patch.attire_type;
        }
        if let Some(accessories) = patch.accessories {
            self.accessories = accessories;
        }
        if patch.special_requests.is_some() {
            self.special_requests = patch.special_requests;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(size) = patch.estimated_party_size {
            self.estimated_party_size = size;
        }
    }
}
