use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use sqlx::SqlitePool;
use std::fs;

use crate::models::party::{normalize_wedding_code, parse_wedding_date};
use crate::models::{
    BasicMeasurements, BasicMeasurementsInput, ContactInfo, MeasurementStatus, Measurements,
    MemberRole, NewMember, OrderStatus, PartyStatus, ShippingAddress, StylePreferences,
    SuitMeasurementsInput, WeddingMember, WeddingParty,
};
use crate::store::sqlite::insert_party_row;
use crate::store::WeddingPartyStore;

// Member ids in the old browser store were sometimes strings
fn deserialize_member_id<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrInt {
        String(String),
        Int(u64),
    }

    Ok(match Option::<StringOrInt>::deserialize(deserializer)? {
        Some(StringOrInt::Int(i)) => Some(i),
        Some(StringOrInt::String(s)) => s.trim().parse().ok(),
        None => None,
    })
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyBasicMeasurements {
    #[serde(flatten)]
    values: BasicMeasurementsInput,
    submitted_at: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacySuitMeasurements {
    #[serde(flatten)]
    values: SuitMeasurementsInput,
    finalized_at: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyMember {
    #[serde(default, deserialize_with = "deserialize_member_id")]
    id: Option<u64>,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    role: String,
    special_notes: Option<String>,
    measurements: Option<LegacyBasicMeasurements>,
    suit_measurements: Option<LegacySuitMeasurements>,
    shipping_address: Option<ShippingAddress>,
    order_status: Option<String>,
    #[serde(default)]
    needs_shipping: bool,
    added_at: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyParty {
    id: String,
    wedding_code: String,
    wedding_date: Option<String>,
    #[serde(default)]
    groom_info: ContactInfo,
    #[serde(default)]
    bride_info: ContactInfo,
    #[serde(default)]
    style_preferences: StylePreferences,
    attire_type: Option<String>,
    #[serde(default)]
    accessories: Vec<String>,
    special_requests: Option<String>,
    #[serde(default)]
    members: Vec<LegacyMember>,
    #[serde(default)]
    status: PartyStatus,
    #[serde(default)]
    estimated_party_size: u32,
    created_at: Option<String>,
    updated_at: Option<String>,
}

fn parse_timestamp(raw: Option<&str>, fallback: DateTime<Utc>) -> DateTime<Utc> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(fallback)
}

impl LegacyMember {
    /// The suit shape wins when a record carries both measurement shapes.
    fn into_member(self, id: u64, now: DateTime<Utc>) -> WeddingMember {
        let role = self.role.parse().unwrap_or_else(|_| {
            eprintln!("Unknown role: {}, defaulting to guest", self.role);
            MemberRole::Guest
        });

        let mut member = WeddingMember::new(
            id,
            NewMember {
                name: self.name,
                email: self.email,
                phone: self.phone,
                role,
                special_notes: self.special_notes,
            },
            parse_timestamp(self.added_at.as_deref(), now),
        );

        if let Some(suit) = self.suit_measurements {
            let finalized_at = parse_timestamp(suit.finalized_at.as_deref(), now);
            member.record_suit_measurements(suit.values, finalized_at);
        } else if let Some(basic) = self.measurements {
            let submitted_at = parse_timestamp(basic.submitted_at.as_deref(), now);
            member.measurements = Some(Measurements::Basic(BasicMeasurements::new(
                basic.values,
                submitted_at,
            )));
            member.measurement_status = MeasurementStatus::Submitted;
        }

        if let Some(address) = self.shipping_address {
            member.record_shipping_address(address);
        } else {
            member.needs_shipping = self.needs_shipping;
        }

        member.order_status = self
            .order_status
            .as_deref()
            .and_then(|s| s.parse::<OrderStatus>().ok());
        member
    }
}

impl LegacyParty {
    fn into_party(self, now: DateTime<Utc>) -> Result<WeddingParty, Box<dyn std::error::Error>> {
        let wedding_code = normalize_wedding_code(&self.wedding_code)
            .ok_or_else(|| format!("invalid wedding code: {}", self.wedding_code))?;
        let wedding_date = parse_wedding_date(self.wedding_date.as_deref())?;

        let mut party = WeddingParty {
            id: self.id,
            wedding_code,
            wedding_date,
            groom_info: self.groom_info,
            bride_info: self.bride_info,
            style_preferences: self.style_preferences,
            attire_type: self.attire_type,
            accessories: self.accessories,
            special_requests: self.special_requests,
            members: Vec::new(),
            status: self.status,
            estimated_party_size: self.estimated_party_size,
            member_sequence: 0,
            created_at: parse_timestamp(self.created_at.as_deref(), now),
            updated_at: parse_timestamp(self.updated_at.as_deref(), now),
        };

        // Numeric ids are kept; anything else is renumbered after them.
        let max_id = self.members.iter().filter_map(|m| m.id).max().unwrap_or(0);
        party.member_sequence = max_id;
        let mut seen = std::collections::HashSet::new();
        for legacy in self.members {
            let id = match legacy.id {
                Some(id) if seen.insert(id) => id,
                _ => party.next_member_id(),
            };
            party.push_member(legacy.into_member(id, now));
        }

        Ok(party)
    }
}

/// Import parties from a JSON dump of the old browser store.
pub async fn import_parties(pool: &SqlitePool, file_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let content = fs::read_to_string(file_path)?;
    let legacy: Vec<LegacyParty> = serde_json::from_str(&content)?;

    let now = Utc::now();
    let mut imported = 0;
    let mut skipped = 0;
    let mut tx = pool.begin().await?;

    for record in legacy {
        let party = record.into_party(now)?;

        let exists: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM wedding_parties WHERE id = ? OR wedding_code = ?",
        )
        .bind(&party.id)
        .bind(&party.wedding_code)
        .fetch_one(&mut *tx)
        .await?;

        if exists.0 > 0 {
            eprintln!("Skipping {} ({}): already present", party.id, party.wedding_code);
            skipped += 1;
            continue;
        }

        insert_party_row(&mut *tx, &party).await?;

        imported += 1;
    }

    tx.commit().await?;
    println!("Imported {} wedding parties ({} skipped)", imported, skipped);
    Ok(())
}

pub async fn print_analytics(pool: &SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
    let store = WeddingPartyStore::sqlite(pool.clone());
    let analytics = store.analytics().await?;
    println!("{}", serde_json::to_string_pretty(&analytics)?);
    Ok(())
}
