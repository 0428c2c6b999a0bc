use std::sync::Arc;

use chrono::NaiveDate;

use super::common::*;

use crate::workflows::staffing::domain::{GeoPoint, Guard, ShiftSlot, ShiftStatus};
use crate::workflows::staffing::emergency::{
    Confidence, EmergencyFillAdvisor, EmergencyPolicy, NoProximitySignal, ProximityEstimator,
};
use crate::workflows::staffing::ranking::{FactorKind, RosterEvidence, ShiftRanker};

fn located_slot() -> ShiftSlot {
    let mut slot = morning_slot();
    slot.site_location = Some(site_location());
    slot
}

fn offset_guard(id: &str, north_km: f64) -> Guard {
    let mut guard = morning_guard(id);
    let origin = site_location();
    guard.home_location = Some(GeoPoint {
        latitude: origin.latitude + north_km / 111.2,
        longitude: origin.longitude,
    });
    guard
}

struct FixedDistance(f64);

impl ProximityEstimator for FixedDistance {
    fn distance_km(&self, _guard: &Guard, _shift: &ShiftSlot) -> Option<f64> {
        Some(self.0)
    }
}

#[test]
fn empty_pool_yields_no_recommendation() {
    let advisor = EmergencyFillAdvisor::default();
    let fill =
        advisor.suggest_emergency_fill(&morning_slot(), &[], &[], &RosterEvidence::as_of(as_of()));
    assert!(fill.is_none());
}

#[test]
fn single_guard_is_recommended_without_alternatives() {
    let advisor = EmergencyFillAdvisor::default();
    let fill = advisor
        .suggest_emergency_fill(
            &morning_slot(),
            &[morning_guard("g-a")],
            &[],
            &RosterEvidence::as_of(as_of()),
        )
        .expect("recommendation");

    assert_eq!(fill.recommendation.candidate.guard.id.0, "g-a");
    assert!(fill.alternatives.is_empty());
    // 41.5 performance + 7.5 tier + 5 preference, no location data.
    assert_eq!(fill.recommendation.emergency_score, 54);
    assert_eq!(fill.confidence, Confidence::Low);
    assert!(fill.recommendation.distance_km.is_none());
}

#[test]
fn earliest_representable_date_still_yields_a_recommendation() {
    let as_of: NaiveDate =
        serde_json::from_str("\"-262143-01-01\"").expect("minimum date deserializes");
    assert_eq!(as_of, NaiveDate::MIN);

    let fill = EmergencyFillAdvisor::default()
        .suggest_emergency_fill(
            &morning_slot(),
            &[morning_guard("g-a")],
            &eight_hour_shifts("g-b", 2, ShiftStatus::Completed),
            &RosterEvidence::as_of(as_of),
        )
        .expect("recommendation");

    assert_eq!(fill.recommendation.candidate.guard.id.0, "g-a");
    assert_eq!(fill.recommendation.recent_shifts, 0);
}

#[test]
fn emergency_ranking_ignores_hour_balance() {
    let advisor = EmergencyFillAdvisor::default();
    let fill = advisor
        .suggest_emergency_fill(
            &morning_slot(),
            &[morning_guard("g-a")],
            &[],
            &RosterEvidence::as_of(as_of()),
        )
        .expect("recommendation");

    let kinds: Vec<FactorKind> = fill.reasoning.iter().map(|factor| factor.kind).collect();
    assert!(!kinds.contains(&FactorKind::HourBalance));
    assert!(kinds.contains(&FactorKind::TravelProximity));
    assert!(kinds.contains(&FactorKind::RecentActivity));
}

#[test]
fn nearby_guard_beats_an_identical_distant_one() {
    let guards = vec![offset_guard("g-far", 40.0), offset_guard("g-near", 0.0)];
    let advisor = EmergencyFillAdvisor::default();

    let fill = advisor
        .suggest_emergency_fill(
            &located_slot(),
            &guards,
            &[],
            &RosterEvidence::as_of(as_of()),
        )
        .expect("recommendation");

    assert_eq!(fill.recommendation.candidate.guard.id.0, "g-near");
    assert_eq!(fill.recommendation.emergency_score, 74);
    assert_eq!(fill.confidence, Confidence::Medium);
    assert_eq!(fill.alternatives.len(), 1);
    assert_eq!(fill.alternatives[0].emergency_score, 54);
}

#[test]
fn at_most_three_alternatives_are_offered() {
    let guards: Vec<Guard> = (1..=6).map(|idx| morning_guard(&format!("g-{idx}"))).collect();
    let advisor = EmergencyFillAdvisor::default();

    let fill = advisor
        .suggest_emergency_fill(
            &morning_slot(),
            &guards,
            &[],
            &RosterEvidence::as_of(as_of()),
        )
        .expect("recommendation");

    assert_eq!(fill.recommendation.candidate.guard.id.0, "g-1");
    assert_eq!(
        ids(fill
            .alternatives
            .into_iter()
            .map(|alternative| alternative.candidate.guard.id)),
        vec!["g-2", "g-3", "g-4"]
    );
}

#[test]
fn recent_activity_counts_the_last_week_only() {
    let mut shifts = vec![
        shift("s-1", "g-a", "site-9", days_ago(1), ("07:00", "15:00"), ShiftStatus::Completed),
        shift("s-2", "g-a", "site-9", days_ago(3), ("07:00", "15:00"), ShiftStatus::Confirmed),
        shift("s-3", "g-a", "site-9", days_ago(7), ("07:00", "15:00"), ShiftStatus::Completed),
        shift("s-4", "g-a", "site-9", days_ago(8), ("07:00", "15:00"), ShiftStatus::Completed),
    ];
    shifts.push(shift(
        "s-5",
        "g-a",
        "site-9",
        days_ago(2),
        ("07:00", "15:00"),
        ShiftStatus::Cancelled,
    ));

    let advisor = EmergencyFillAdvisor::default();
    let fill = advisor
        .suggest_emergency_fill(
            &morning_slot(),
            &[morning_guard("g-a")],
            &shifts,
            &RosterEvidence::as_of(as_of()),
        )
        .expect("recommendation");

    assert_eq!(fill.recommendation.recent_shifts, 3);
    let activity = fill
        .reasoning
        .iter()
        .find(|factor| factor.kind == FactorKind::RecentActivity)
        .expect("activity factor");
    assert_eq!(activity.points, 6.0);
}

#[test]
fn activity_points_are_capped() {
    let shifts = eight_hour_shifts("g-a", 7, ShiftStatus::Completed);
    let advisor = EmergencyFillAdvisor::default();
    let fill = advisor
        .suggest_emergency_fill(
            &morning_slot(),
            &[morning_guard("g-a")],
            &shifts,
            &RosterEvidence::as_of(as_of()),
        )
        .expect("recommendation");

    assert_eq!(fill.recommendation.recent_shifts, 7);
    let activity = fill
        .reasoning
        .iter()
        .find(|factor| factor.kind == FactorKind::RecentActivity)
        .expect("activity factor");
    assert_eq!(activity.points, 10.0);
}

#[test]
fn results_are_reproducible_without_a_location_signal() {
    let advisor = EmergencyFillAdvisor::new(
        ShiftRanker::default(),
        Arc::new(NoProximitySignal),
        EmergencyPolicy::default(),
    );
    let guards = vec![offset_guard("g-far", 40.0), offset_guard("g-near", 0.0)];
    let evidence = RosterEvidence::as_of(as_of());

    let first = advisor.suggest_emergency_fill(&located_slot(), &guards, &[], &evidence);
    let second = advisor.suggest_emergency_fill(&located_slot(), &guards, &[], &evidence);

    assert_eq!(first, second);
    let fill = first.expect("recommendation");
    assert_eq!(fill.recommendation.candidate.guard.id.0, "g-far");
    assert!(fill.recommendation.distance_km.is_none());
}

#[test]
fn custom_estimators_feed_the_proximity_factor() {
    let advisor = EmergencyFillAdvisor::new(
        ShiftRanker::default(),
        Arc::new(FixedDistance(7.5)),
        EmergencyPolicy::default(),
    );

    let fill = advisor
        .suggest_emergency_fill(
            &morning_slot(),
            &[morning_guard("g-a")],
            &[],
            &RosterEvidence::as_of(as_of()),
        )
        .expect("recommendation");

    assert_eq!(fill.recommendation.distance_km, Some(7.5));
    // 20 * (1 - 7.5 / 30) = 15 proximity points on top of 54.
    assert_eq!(fill.recommendation.emergency_score, 69);
}
