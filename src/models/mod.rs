pub mod customer;
pub mod member;
pub mod party;

pub use customer::Customer;
pub use member::{
    BasicMeasurements, BasicMeasurementsInput, FitPreference, MeasurementStatus, Measurements,
    MemberPatch, MemberRole, NewMember, OrderStatus, ShippingAddress, SuitMeasurements,
    SuitMeasurementsInput, WeddingMember,
};
pub use party::{
    ContactInfo, NewParty, PartyPatch, PartyStatus, StylePreferences, WeddingParty,
};
