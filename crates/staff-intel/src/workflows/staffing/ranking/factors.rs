use serde::{Deserialize, Serialize};

use super::super::domain::{Guard, ShiftRecord, ShiftSlot, ShiftStatus};
use super::super::scoring::{PerformanceTier, ScoreBreakdown};
use super::policy::RankingPolicy;

/// Signals that contribute points to a candidate's suitability score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorKind {
    Performance,
    SiteExperience,
    HourBalance,
    TierBonus,
    ShiftPreference,
    TravelProximity,
    RecentActivity,
}

/// Discrete contribution to a suitability score, kept for explainability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingFactor {
    pub kind: FactorKind,
    pub label: String,
    pub points: f64,
    pub max: f64,
}

impl RankingFactor {
    pub fn new(kind: FactorKind, label: impl Into<String>, points: f64, max: f64) -> Self {
        let points = if points.is_finite() {
            points.min(max).max(0.0)
        } else {
            0.0
        };
        Self {
            kind,
            label: label.into(),
            points,
            max,
        }
    }
}

/// Hours a guard is already committed to, counting only shifts whose status is listed.
pub(crate) fn scheduled_hours(
    guard: &Guard,
    shifts: &[ShiftRecord],
    statuses: &[ShiftStatus],
) -> f64 {
    shifts
        .iter()
        .filter(|shift| shift.is_assigned_to(&guard.id) && statuses.contains(&shift.status))
        .map(ShiftRecord::duration_hours)
        .sum()
}

pub(crate) fn performance(breakdown: &ScoreBreakdown, policy: &RankingPolicy) -> RankingFactor {
    let points = f64::from(breakdown.total_score) * policy.performance_max / 100.0;
    RankingFactor::new(
        FactorKind::Performance,
        format!("Performance score {}", breakdown.total_score),
        points,
        policy.performance_max,
    )
}

pub(crate) fn site_experience(
    guard: &Guard,
    slot: &ShiftSlot,
    shifts: &[ShiftRecord],
    policy: &RankingPolicy,
) -> Option<RankingFactor> {
    let completed_here = shifts
        .iter()
        .filter(|shift| {
            shift.is_assigned_to(&guard.id)
                && shift.site_id == slot.site_id
                && shift.status == ShiftStatus::Completed
        })
        .count();

    if completed_here == 0 {
        return None;
    }

    let points =
        (policy.points_per_site_shift * completed_here as f64).min(policy.site_experience_max);
    Some(RankingFactor::new(
        FactorKind::SiteExperience,
        format!("{completed_here} completed shift(s) at this site"),
        points,
        policy.site_experience_max,
    ))
}

/// Rewards under-scheduled guards and tapers off symmetrically past the weekly target.
pub(crate) fn hour_balance(
    guard: &Guard,
    shifts: &[ShiftRecord],
    policy: &RankingPolicy,
) -> RankingFactor {
    let hours = scheduled_hours(guard, shifts, &[ShiftStatus::Confirmed, ShiftStatus::Active]);
    let target = policy.weekly_target_hours;
    let cap = policy.hour_balance_max;

    let points = if hours < target {
        ((target - hours) / 2.0).min(cap)
    } else {
        (cap - (hours - target) / 2.0).max(0.0)
    };

    RankingFactor::new(
        FactorKind::HourBalance,
        format!("{hours:.1}h scheduled against {target:.0}h target"),
        points,
        cap,
    )
}

pub(crate) fn tier_bonus(tier: PerformanceTier, policy: &RankingPolicy) -> RankingFactor {
    RankingFactor::new(
        FactorKind::TierBonus,
        format!("{} tier", tier.label()),
        tier.bonus() * policy.tier_bonus_multiplier,
        policy.tier_bonus_max,
    )
}

pub(crate) fn shift_preference(
    guard: &Guard,
    slot: &ShiftSlot,
    policy: &RankingPolicy,
) -> Option<RankingFactor> {
    let shift_type = slot.shift_type();
    if !guard.preferred_shift_types.contains(&shift_type) {
        return None;
    }

    Some(RankingFactor::new(
        FactorKind::ShiftPreference,
        format!("Prefers {} shifts", shift_type.label()),
        policy.shift_preference_max,
        policy.shift_preference_max,
    ))
}

pub(crate) fn total_points(factors: &[RankingFactor]) -> f64 {
    factors.iter().map(|factor| factor.points).sum()
}

#[cfg(test)]
mod tests {
    use super::super::super::domain::{GuardId, SiteId};
    use super::*;
    use chrono::NaiveDate;

    fn shift(
        guard: &str,
        site: &str,
        status: ShiftStatus,
        start: &str,
        end: &str,
    ) -> ShiftRecord {
        ShiftRecord {
            id: format!("{guard}-{site}-{start}"),
            guard_id: Some(GuardId(guard.to_string())),
            site_id: SiteId(site.to_string()),
            status,
            date: NaiveDate::from_ymd_opt(2025, 6, 2).expect("valid date"),
            start_time: start.to_string(),
            end_time: end.to_string(),
            late: false,
        }
    }

    #[test]
    fn hour_balance_rewards_under_scheduled_guards() {
        let guard = Guard::new("g-1", "Ada");
        let policy = RankingPolicy::default();

        let factor = hour_balance(&guard, &[], &policy);
        assert_eq!(factor.points, 15.0);

        // Exactly on target keeps the full allowance.
        let shifts: Vec<_> = (0..4)
            .map(|_| shift("g-1", "s-1", ShiftStatus::Confirmed, "08:00", "18:00"))
            .collect();
        let factor = hour_balance(&guard, &shifts, &policy);
        assert_eq!(factor.points, 15.0);
    }

    #[test]
    fn hour_balance_tapers_past_target() {
        let guard = Guard::new("g-1", "Ada");
        let policy = RankingPolicy::default();
        // 5 x 10h confirmed = 50h, ten over target.
        let shifts: Vec<_> = (0..5)
            .map(|_| shift("g-1", "s-1", ShiftStatus::Active, "08:00", "18:00"))
            .collect();
        assert_eq!(hour_balance(&guard, &shifts, &policy).points, 10.0);

        // 34h is 6 under target, 3 points.
        let shifts = vec![
            shift("g-1", "s-1", ShiftStatus::Confirmed, "08:00", "20:00"),
            shift("g-1", "s-1", ShiftStatus::Confirmed, "08:00", "20:00"),
            shift("g-1", "s-1", ShiftStatus::Confirmed, "08:00", "18:00"),
            shift("g-1", "s-1", ShiftStatus::Completed, "08:00", "18:00"),
        ];
        assert_eq!(hour_balance(&guard, &shifts, &policy).points, 3.0);
    }

    #[test]
    fn site_experience_caps_and_omits_zero() {
        let guard = Guard::new("g-1", "Ada");
        let slot = ShiftSlot::new("s-1", "08:00", "16:00");
        let policy = RankingPolicy::default();
        assert!(site_experience(&guard, &slot, &[], &policy).is_none());

        let shifts: Vec<_> = (0..7)
            .map(|_| shift("g-1", "s-1", ShiftStatus::Completed, "08:00", "16:00"))
            .collect();
        let factor = site_experience(&guard, &slot, &shifts, &policy).expect("factor present");
        assert_eq!(factor.points, 20.0);
        assert_eq!(factor.max, 20.0);
    }

    #[test]
    fn tier_bonus_scales_with_tier() {
        let policy = RankingPolicy::default();
        assert_eq!(tier_bonus(PerformanceTier::Platinum, &policy).points, 10.0);
        assert_eq!(tier_bonus(PerformanceTier::Gold, &policy).points, 7.5);
        assert_eq!(tier_bonus(PerformanceTier::Bronze, &policy).points, 2.5);
        assert_eq!(tier_bonus(PerformanceTier::Standard, &policy).points, 0.0);
    }
}
