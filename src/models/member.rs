use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{StoreError, StoreResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    Groom,
    Groomsman,
    BestMan,
    FatherGroom,
    FatherBride,
    Guest,
}

impl MemberRole {
    pub const ALL: [MemberRole; 6] = [
        MemberRole::Groom,
        MemberRole::Groomsman,
        MemberRole::BestMan,
        MemberRole::FatherGroom,
        MemberRole::FatherBride,
        MemberRole::Guest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Groom => "groom",
            MemberRole::Groomsman => "groomsman",
            MemberRole::BestMan => "best_man",
            MemberRole::FatherGroom => "father_groom",
            MemberRole::FatherBride => "father_bride",
            MemberRole::Guest => "guest",
        }
    }
}

impl std::fmt::Display for MemberRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemberRole {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        MemberRole::ALL
            .into_iter()
            .find(|role| role.as_str() == normalized)
            .ok_or_else(|| StoreError::validation(format!("unknown member role: {s}")))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementStatus {
    #[default]
    Pending,
    Submitted,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Ordered,
    InProduction,
    Ready,
    Shipped,
    Delivered,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Ordered,
        OrderStatus::InProduction,
        OrderStatus::Ready,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Ordered => "ordered",
            OrderStatus::InProduction => "in_production",
            OrderStatus::Ready => "ready",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
        }
    }

    /// Whether the garments have left the shop.
    pub fn is_dispatched(&self) -> bool {
        matches!(self, OrderStatus::Shipped | OrderStatus::Delivered)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| StoreError::validation(format!("unknown order status: {s}")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitPreference {
    Slim,
    Modern,
    Classic,
    Relaxed,
}

/// Self-reported body measurements (inches / lbs) submitted through the
/// member portal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicMeasurementsInput {
    pub chest: Option<f64>,
    pub waist: Option<f64>,
    pub hips: Option<f64>,
    pub neck: Option<f64>,
    pub sleeve: Option<f64>,
    pub inseam: Option<f64>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
}

impl BasicMeasurementsInput {
    fn is_empty(&self) -> bool {
        *self == BasicMeasurementsInput::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicMeasurements {
    pub chest: Option<f64>,
    pub waist: Option<f64>,
    pub hips: Option<f64>,
    pub neck: Option<f64>,
    pub sleeve: Option<f64>,
    pub inseam: Option<f64>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub submitted_at: DateTime<Utc>,
}

impl BasicMeasurements {
    pub fn new(input: BasicMeasurementsInput, submitted_at: DateTime<Utc>) -> Self {
        Self {
            chest: input.chest,
            waist: input.waist,
            hips: input.hips,
            neck: input.neck,
            sleeve: input.sleeve,
            inseam: input.inseam,
            height: input.height,
            weight: input.weight,
            submitted_at,
        }
    }
}

/// Tailoring dimensions taken by staff; any field left out keeps its
/// previous value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuitMeasurementsInput {
    pub chest: Option<f64>,
    pub waist: Option<f64>,
    pub hips: Option<f64>,
    pub shoulder_width: Option<f64>,
    pub neck: Option<f64>,
    pub sleeve_length: Option<f64>,
    pub jacket_length: Option<f64>,
    pub inseam: Option<f64>,
    pub outseam: Option<f64>,
    pub thigh: Option<f64>,
    pub rise: Option<f64>,
    pub fit_preference: Option<FitPreference>,
    pub taken_by: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuitMeasurements {
    pub chest: Option<f64>,
    pub waist: Option<f64>,
    pub hips: Option<f64>,
    pub shoulder_width: Option<f64>,
    pub neck: Option<f64>,
    pub sleeve_length: Option<f64>,
    pub jacket_length: Option<f64>,
    pub inseam: Option<f64>,
    pub outseam: Option<f64>,
    pub thigh: Option<f64>,
    pub rise: Option<f64>,
    pub fit_preference: Option<FitPreference>,
    pub taken_by: Option<String>,
    pub finalized_at: DateTime<Utc>,
}

impl SuitMeasurements {
    fn empty(finalized_at: DateTime<Utc>) -> Self {
        Self {
            chest: None,
            waist: None,
            hips: None,
            shoulder_width: None,
            neck: None,
            sleeve_length: None,
            jacket_length: None,
            inseam: None,
            outseam: None,
            thigh: None,
            rise: None,
            fit_preference: None,
            taken_by: None,
            finalized_at,
        }
    }

    /// Starting point for staff measurements when only the member's own
    /// submission exists.
    fn seeded_from(basic: &BasicMeasurements, finalized_at: DateTime<Utc>) -> Self {
        Self {
            chest: basic.chest,
            waist: basic.waist,
            hips: basic.hips,
            neck: basic.neck,
            sleeve_length: basic.sleeve,
            inseam: basic.inseam,
            ..Self::empty(finalized_at)
        }
    }

    fn merge(&mut self, input: SuitMeasurementsInput, finalized_at: DateTime<Utc>) {
        self.chest = input.chest.or(self.chest);
        self.waist = input.waist.or(self.waist);
        self.hips = input.hips.or(self.hips);
        self.shoulder_width = input.shoulder_width.or(self.shoulder_width);
        self.neck = input.neck.or(self.neck);
        self.sleeve_length = input.sleeve_length.or(self.sleeve_length);
        self.jacket_length = input.jacket_length.or(self.jacket_length);
        self.inseam = input.inseam.or(self.inseam);
        self.outseam = input.outseam.or(self.outseam);
        self.thigh = input.thigh.or(self.thigh);
        self.rise = input.rise.or(self.rise);
        self.fit_preference = input.fit_preference.or(self.fit_preference);
        if input.taken_by.is_some() {
            self.taken_by = input.taken_by;
        }
        self.finalized_at = finalized_at;
    }
}

/// A member's measurements: either their own submission or the finalized
/// tailoring set, which supersedes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Measurements {
    Basic(BasicMeasurements),
    Suit(SuitMeasurements),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub recipient: Option<String>,
    pub street: String,
    pub street2: Option<String>,
    pub city: String,
    pub state: Option<String>,
    pub postal_code: String,
    pub country: String,
    pub delivery_instructions: Option<String>,
}

impl ShippingAddress {
    pub fn validate(&self) -> StoreResult<()> {
        let required = [
            ("street", &self.street),
            ("city", &self.city),
            ("postalCode", &self.postal_code),
            ("country", &self.country),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(StoreError::validation(format!("{field} is required")));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeddingMember {
    pub id: u64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: MemberRole,
    pub special_notes: Option<String>,
    pub measurement_status: MeasurementStatus,
    pub measurements: Option<Measurements>,
    pub shipping_address: Option<ShippingAddress>,
    pub order_status: Option<OrderStatus>,
    #[serde(default)]
    pub needs_shipping: bool,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMember {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: MemberRole,
    pub special_notes: Option<String>,
}

impl NewMember {
    pub fn validate(&self) -> StoreResult<()> {
        if self.name.trim().is_empty() {
            return Err(StoreError::validation("name is required"));
        }
        Ok(())
    }
}

/// Partial member update; only the fields that are present are applied.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<MemberRole>,
    pub special_notes: Option<String>,
    pub measurement_status: Option<MeasurementStatus>,
    pub order_status: Option<OrderStatus>,
    pub needs_shipping: Option<bool>,
}

impl MemberPatch {
    pub fn validate(&self) -> StoreResult<()> {
        if self.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(StoreError::validation("name must not be empty"));
        }
        Ok(())
    }
}

impl WeddingMember {
    pub fn new(id: u64, input: NewMember, added_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: input.name.trim().to_string(),
            email: input.email,
            phone: input.phone,
            role: input.role,
            special_notes: input.special_notes,
            measurement_status: MeasurementStatus::Pending,
            measurements: None,
            shipping_address: None,
            order_status: None,
            needs_shipping: false,
            added_at,
        }
    }

    pub fn basic_measurements(&self) -> Option<&BasicMeasurements> {
        match &self.measurements {
            Some(Measurements::Basic(basic)) => Some(basic),
            _ => None,
        }
    }

    pub fn suit_measurements(&self) -> Option<&SuitMeasurements> {
        match &self.measurements {
            Some(Measurements::Suit(suit)) => Some(suit),
            _ => None,
        }
    }

    pub fn apply(&mut self, patch: MemberPatch) {
        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if patch.email.is_some() {
            self.email = patch.email;
        }
        if patch.phone.is_some() {
            self.phone = patch.phone;
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
        if patch.special_notes.is_some() {
            self.special_notes = patch.special_notes;
        }
        if let Some(status) = patch.measurement_status {
            self.measurement_status = status;
        }
        if patch.order_status.is_some() {
            self.order_status = patch.order_status;
        }
        if let Some(needs_shipping) = patch.needs_shipping {
            self.needs_shipping = needs_shipping;
        }
    }

    pub fn record_basic_measurements(
        &mut self,
        input: BasicMeasurementsInput,
        now: DateTime<Utc>,
    ) -> StoreResult<()> {
        if self.suit_measurements().is_some() {
            return Err(StoreError::validation(
                "suit measurements are already finalized for this member",
            ));
        }
        if input.is_empty() {
            return Err(StoreError::validation("at least one measurement is required"));
        }
        self.measurements = Some(Measurements::Basic(BasicMeasurements::new(input, now)));
        self.measurement_status = MeasurementStatus::Submitted;
        Ok(())
    }

    pub fn record_suit_measurements(&mut self, input: SuitMeasurementsInput, now: DateTime<Utc>) {
        let mut suit = match self.measurements.take() {
            Some(Measurements::Suit(existing)) => existing,
            Some(Measurements::Basic(basic)) => SuitMeasurements::seeded_from(&basic, now),
            None => SuitMeasurements::empty(now),
        };
        suit.merge(input, now);
        self.measurements = Some(Measurements::Suit(suit));
        self.measurement_status = MeasurementStatus::Completed;
    }

    pub fn record_shipping_address(&mut self, address: ShippingAddress) {
        self.shipping_address = Some(address);
        self.needs_shipping = true;
    }
}
