//! Progress, measurement statistics and cross-party analytics.
//!
//! Everything here is derived from stored party state; nothing is persisted.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::HashMap;

use crate::models::{MeasurementStatus, WeddingMember, WeddingParty};

/// Steps a member goes through: measurements, shipping address, dispatch.
pub const MEMBER_STEPS: u32 = 3;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub completed: u32,
    pub total: u32,
    pub percentage: f64,
}

impl Progress {
    fn new(completed: u32, total: u32) -> Self {
        Self {
            completed,
            total,
            percentage: percent(completed, total),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementStats {
    pub total_members: u32,
    pub basic_measurements: u32,
    pub suit_measurements: u32,
    pub shipping_addresses: u32,
    pub basic_measurements_percent: f64,
    pub suit_measurements_percent: f64,
    pub shipping_addresses_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthCount {
    pub month: &'static str,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorCount {
    pub color: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeddingAnalytics {
    pub total_weddings: u32,
    pub upcoming_weddings: u32,
    pub completed_weddings: u32,
    pub total_members: u32,
    pub pending_measurements: u32,
    pub weddings_by_month: Vec<MonthCount>,
    pub popular_colors: Vec<ColorCount>,
    pub average_party_size: f64,
}

fn percent(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

fn count_where<'a>(
    members: impl IntoIterator<Item = &'a WeddingMember>,
    pred: impl Fn(&WeddingMember) -> bool,
) -> u32 {
    members.into_iter().filter(|m| pred(*m)).count() as u32
}

pub fn member_progress(member: &WeddingMember) -> Progress {
    let steps = [
        member.measurements.is_some(),
        member.shipping_address.is_some(),
        member.order_status.is_some_and(|s| s.is_dispatched()),
    ];
    let completed = steps.into_iter().filter(|done| *done).count() as u32;
    Progress::new(completed, MEMBER_STEPS)
}

pub fn party_progress(party: &WeddingParty) -> Progress {
    let completed = party
        .members()
        .iter()
        .map(|m| member_progress(m).completed)
        .sum();
    Progress::new(completed, MEMBER_STEPS * party.members().len() as u32)
}

/// Any recorded measurements count as basic coverage; the suit count only
/// includes finalized tailoring sets.
pub fn measurement_stats(party: &WeddingParty) -> MeasurementStats {
    let members = party.members();
    let total = members.len() as u32;
    let basic = count_where(members, |m| m.measurements.is_some());
    let suit = count_where(members, |m| m.suit_measurements().is_some());
    let shipping = count_where(members, |m| m.shipping_address.is_some());

    MeasurementStats {
        total_members: total,
        basic_measurements: basic,
        suit_measurements: suit,
        shipping_addresses: shipping,
        basic_measurements_percent: percent(basic, total),
        suit_measurements_percent: percent(suit, total),
        shipping_addresses_percent: percent(shipping, total),
    }
}

pub fn wedding_analytics(parties: &[WeddingParty], today: NaiveDate) -> WeddingAnalytics {
    let total_weddings = parties.len() as u32;
    let upcoming_weddings = parties.iter().filter(|p| p.wedding_date >= today).count() as u32;
    let total_members: u32 = parties.iter().map(|p| p.members().len() as u32).sum();
    let pending_measurements: u32 = parties
        .iter()
        .map(|p| {
            count_where(p.members(), |m| {
                m.measurement_status == MeasurementStatus::Pending
            })
        })
        .sum();

    let mut by_month = [0u32; 12];
    for party in parties {
        by_month[party.wedding_date.month0() as usize] += 1;
    }

    let mut colors: HashMap<String, u32> = HashMap::new();
    for party in parties {
        let Some(color) = party.style_preferences.suit_color.as_deref() else {
            continue;
        };
        let color = color.trim().to_lowercase();
        if color.is_empty() {
            continue;
        }
        *colors.entry(color).or_default() += 1;
    }
    let mut popular_colors: Vec<ColorCount> = colors
        .into_iter()
        .map(|(color, count)| ColorCount { color, count })
        .collect();
    popular_colors.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.color.cmp(&b.color)));

    let average_party_size = if total_weddings == 0 {
        0.0
    } else {
        (total_members as f64 / total_weddings as f64 * 10.0).round() / 10.0
    };

    WeddingAnalytics {
        total_weddings,
        upcoming_weddings,
        completed_weddings: total_weddings - upcoming_weddings,
        total_members,
        pending_measurements,
        weddings_by_month: MONTHS
            .into_iter()
            .zip(by_month)
            .map(|(month, count)| MonthCount { month, count })
            .collect(),
        popular_colors,
        average_party_size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        MemberRole, NewMember, NewParty, OrderStatus, ShippingAddress, StylePreferences,
        SuitMeasurementsInput,
    };
    use chrono::Utc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn party_on(wedding_date: NaiveDate, suit_color: Option<&str>) -> WeddingParty {
        let input = NewParty {
            style_preferences: StylePreferences {
                suit_color: suit_color.map(str::to_string),
                ..Default::default()
            },
            ..Default::default()
        };
        WeddingParty::new(input, wedding_date, "ABC123".to_string(), Utc::now())
    }

    fn add_member(party: &mut WeddingParty, role: MemberRole) -> u64 {
        let id = party.next_member_id();
        party.push_member(WeddingMember::new(
            id,
            NewMember {
                name: format!("Member {id}"),
                email: None,
                phone: None,
                role,
                special_notes: None,
            },
            Utc::now(),
        ));
        id
    }

    fn address() -> ShippingAddress {
        ShippingAddress {
            recipient: None,
            street: "1 Main St".to_string(),
            street2: None,
            city: "Austin".to_string(),
            state: Some("TX".to_string()),
            postal_code: "78701".to_string(),
            country: "US".to_string(),
            delivery_instructions: None,
        }
    }

    #[test]
    fn member_progress_counts_each_step() {
        let statuses = [None, Some(OrderStatus::Ready), Some(OrderStatus::Shipped)];
        for measured in [false, true] {
            for shipped_to in [false, true] {
                for status in statuses {
                    let mut party = party_on(date(2025, 6, 15), None);
                    let id = add_member(&mut party, MemberRole::Groomsman);
                    let member = party.member_mut(id).unwrap();
                    if measured {
                        member.record_suit_measurements(SuitMeasurementsInput::default(), Utc::now());
                    }
                    if shipped_to {
                        member.record_shipping_address(address());
                    }
                    member.order_status = status;

                    let expected = measured as u32
                        + shipped_to as u32
                        + status.is_some_and(|s| s.is_dispatched()) as u32;
                    let progress = member_progress(member);
                    assert_eq!(progress.completed, expected);
                    assert_eq!(progress.total, 3);
                    assert_eq!(progress.percentage, expected as f64 / 3.0 * 100.0);
                }
            }
        }
    }

    #[test]
    fn party_progress_sums_members() {
        let mut party = party_on(date(2025, 6, 15), None);
        let best_man = add_member(&mut party, MemberRole::BestMan);
        add_member(&mut party, MemberRole::Groomsman);
        party.member_mut(best_man).unwrap().record_suit_measurements(
            SuitMeasurementsInput {
                chest: Some(42.0),
                waist: Some(34.0),
                ..Default::default()
            },
            Utc::now(),
        );

        let progress = party_progress(&party);
        assert_eq!(progress.completed, 1);
        assert_eq!(progress.total, 6);
        assert!((progress.percentage - 16.7).abs() < 0.05);
    }

    #[test]
    fn empty_party_has_zero_progress_and_stats() {
        let party = party_on(date(2025, 6, 15), None);
        assert_eq!(party_progress(&party).percentage, 0.0);

        let stats = measurement_stats(&party);
        assert_eq!(stats.total_members, 0);
        assert_eq!(stats.basic_measurements_percent, 0.0);
        assert_eq!(stats.suit_measurements_percent, 0.0);
        assert_eq!(stats.shipping_addresses_percent, 0.0);
    }

    #[test]
    fn measurement_stats_split_basic_and_suit() {
        let mut party = party_on(date(2025, 6, 15), None);
        let a = add_member(&mut party, MemberRole::Groom);
        let b = add_member(&mut party, MemberRole::Groomsman);
        add_member(&mut party, MemberRole::Guest);
        add_member(&mut party, MemberRole::Guest);

        party
            .member_mut(a)
            .unwrap()
            .record_suit_measurements(SuitMeasurementsInput::default(), Utc::now());
        let member_b = party.member_mut(b).unwrap();
        member_b
            .record_basic_measurements(
                crate::models::BasicMeasurementsInput {
                    chest: Some(38.0),
                    ..Default::default()
                },
                Utc::now(),
            )
            .unwrap();
        member_b.record_shipping_address(address());

        let stats = measurement_stats(&party);
        assert_eq!(stats.total_members, 4);
        assert_eq!(stats.basic_measurements, 2);
        assert_eq!(stats.suit_measurements, 1);
        assert_eq!(stats.shipping_addresses, 1);
        assert_eq!(stats.basic_measurements_percent, 50.0);
        assert_eq!(stats.suit_measurements_percent, 25.0);
    }

    #[test]
    fn analytics_over_no_parties() {
        let analytics = wedding_analytics(&[], date(2025, 1, 1));
        assert_eq!(analytics.total_weddings, 0);
        assert_eq!(analytics.average_party_size, 0.0);
        assert_eq!(analytics.weddings_by_month.len(), 12);
        assert!(analytics.popular_colors.is_empty());
    }

    #[test]
    fn analytics_same_color_collapses() {
        let parties = vec![
            party_on(date(2025, 6, 15), Some("navy")),
            party_on(date(2025, 9, 1), Some("Navy ")),
        ];
        let analytics = wedding_analytics(&parties, date(2025, 1, 1));
        assert_eq!(
            analytics.popular_colors,
            vec![ColorCount {
                color: "navy".to_string(),
                count: 2
            }]
        );
    }

    #[test]
    fn analytics_buckets_and_counts() {
        let mut past = party_on(date(2024, 6, 1), Some("charcoal"));
        add_member(&mut past, MemberRole::Groom);
        let mut upcoming = party_on(date(2025, 6, 20), Some("navy"));
        add_member(&mut upcoming, MemberRole::Groom);
        add_member(&mut upcoming, MemberRole::BestMan);
        let other = party_on(date(2025, 12, 31), Some("navy"));

        let today = date(2025, 3, 1);
        let analytics = wedding_analytics(&[past, upcoming, other], today);

        assert_eq!(analytics.total_weddings, 3);
        assert_eq!(analytics.upcoming_weddings, 2);
        assert_eq!(analytics.completed_weddings, 1);
        assert_eq!(analytics.total_members, 3);
        assert_eq!(analytics.pending_measurements, 3);
        assert_eq!(analytics.weddings_by_month[5], MonthCount { month: "Jun", count: 2 });
        assert_eq!(analytics.weddings_by_month[11].count, 1);
        assert_eq!(analytics.popular_colors[0].color, "navy");
        assert_eq!(analytics.popular_colors[1].color, "charcoal");
        assert_eq!(analytics.average_party_size, 1.0);
    }

    #[test]
    fn average_party_size_rounds_to_one_decimal() {
        let mut a = party_on(date(2025, 6, 1), None);
        add_member(&mut a, MemberRole::Groom);
        let b = party_on(date(2025, 6, 2), None);
        let c = party_on(date(2025, 6, 3), None);
        let analytics = wedding_analytics(&[a, b, c], date(2025, 1, 1));
        assert_eq!(analytics.average_party_size, 0.3);
    }
}
