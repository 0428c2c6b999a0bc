use chrono::NaiveDate;
use staff_intel::workflows::staffing::{
    analyze_hour_balance, calculate_guard_score, rank_guards_for_shift, EmergencyFillAdvisor,
    Guard, GuardId, PerformanceTier, RankingOptions, RosterEvidence, ShiftRecord, ShiftSlot,
    ShiftStatus, ShiftType, SiteId,
};

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 2).expect("valid evaluation date")
}

fn record(id: &str, guard: &str, site: &str, day: u32, status: ShiftStatus) -> ShiftRecord {
    ShiftRecord {
        id: id.to_string(),
        guard_id: Some(GuardId(guard.to_string())),
        site_id: SiteId(site.to_string()),
        status,
        date: NaiveDate::from_ymd_opt(2025, 6, day).expect("valid shift date"),
        start_time: "18:00".to_string(),
        end_time: "02:00".to_string(),
        late: false,
    }
}

fn roster() -> Vec<Guard> {
    let mut veteran = Guard::new("g-vet", "Morgan Hale");
    veteran.experience_years = 12.0;
    veteran.sia_license_expiry = NaiveDate::from_ymd_opt(2026, 6, 1);
    veteran.certifications = vec!["first-aid".to_string(), "door-supervision".to_string()];
    veteran.client_rating = Some(4.5);
    veteran.preferred_shift_types = vec![ShiftType::Afternoon];

    let mut rookie = Guard::new("g-rookie", "Sam Ortiz");
    rookie.experience_years = 1.0;
    rookie.sia_license_expiry = NaiveDate::from_ymd_opt(2025, 5, 1);

    vec![rookie, veteran]
}

#[test]
fn score_rank_balance_and_fill_for_an_evening_slot() {
    let guards = roster();
    let shifts = vec![
        record("s-1", "g-vet", "site-dock", 1, ShiftStatus::Completed),
        record("s-2", "g-vet", "site-dock", 2, ShiftStatus::Confirmed),
        record("s-3", "g-rookie", "site-mall", 1, ShiftStatus::NoShow),
    ];

    let veteran = &guards[1];
    let history: Vec<_> = shifts
        .iter()
        .filter(|shift| shift.is_assigned_to(&veteran.id))
        .map(ShiftRecord::history_entry)
        .collect();
    let breakdown = calculate_guard_score(veteran, &history, &[], &[], as_of());
    assert!(breakdown.total_score >= 80);
    assert!(breakdown.tier >= PerformanceTier::Gold);

    let slot = ShiftSlot::new("site-dock", "18:00", "02:00");
    assert_eq!(slot.duration_hours(), 8.0);
    assert_eq!(slot.shift_type(), ShiftType::Afternoon);

    let ranked = rank_guards_for_shift(&guards, &slot, &shifts, RankingOptions::default(), as_of());
    assert_eq!(ranked[0].guard.id.0, "g-vet");
    assert!(ranked[0].recommended);
    assert!(!ranked[1].recommended);

    let report = analyze_hour_balance(&guards, &shifts, 40.0);
    assert_eq!(report.total_hours, 8.0);
    assert_eq!(report.underutilized.len(), 2);

    let fill = EmergencyFillAdvisor::default()
        .suggest_emergency_fill(&slot, &guards, &shifts, &RosterEvidence::as_of(as_of()))
        .expect("someone can cover");
    assert_eq!(fill.recommendation.candidate.guard.id.0, "g-vet");
    assert_eq!(fill.alternatives.len(), 1);
    assert_eq!(fill.recommendation.recent_shifts, 2);
}

#[test]
fn guard_payloads_accept_sparse_json() {
    let guard: Guard = serde_json::from_value(serde_json::json!({
        "id": "g-json",
        "preferred_shift_types": ["night"],
    }))
    .expect("guard deserializes");

    assert_eq!(guard.experience_years, 0.0);
    assert!(guard.reliability.is_none());
    assert_eq!(guard.preferred_shift_types, vec![ShiftType::Night]);

    let breakdown = calculate_guard_score(&guard, &[], &[], &[], as_of());
    assert_eq!(breakdown.reliability, 85.0);
    assert_eq!(breakdown.client_feedback, 80.0);
}
