//! Best-fit recommendation for urgent, unfilled shifts.
//!
//! Emergency fills reuse the shift ranker with hour balancing switched off, then add
//! two urgency signals: how close the guard is to the site and how active they have
//! been over the last week. Travel distance comes from a [`ProximityEstimator`] so the
//! result is reproducible for a given input.

use std::fmt;
use std::sync::Arc;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::domain::{GeoPoint, Guard, ShiftRecord, ShiftSlot, ShiftStatus};
use super::ranking::{
    FactorKind, RankedCandidate, RankingFactor, RankingOptions, RosterEvidence, ShiftRanker,
};

const EARTH_RADIUS_KM: f64 = 6371.0;
const MAX_ACTIVITY_WINDOW_DAYS: i64 = 366;

/// Source of guard-to-site travel distance.
pub trait ProximityEstimator: Send + Sync {
    /// Distance in kilometres, or `None` when no location signal exists.
    fn distance_km(&self, guard: &Guard, shift: &ShiftSlot) -> Option<f64>;
}

/// Great-circle distance between the guard's home location and the site.
#[derive(Debug, Clone, Copy, Default)]
pub struct HaversineProximity;

impl ProximityEstimator for HaversineProximity {
    fn distance_km(&self, guard: &Guard, shift: &ShiftSlot) -> Option<f64> {
        let home = guard.home_location?;
        let site = shift.site_location?;
        Some(haversine_km(home, site))
    }
}

/// Estimator for deployments without geolocation data; never awards proximity points.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProximitySignal;

impl ProximityEstimator for NoProximitySignal {
    fn distance_km(&self, _guard: &Guard, _shift: &ShiftSlot) -> Option<f64> {
        None
    }
}

pub fn haversine_km(from: GeoPoint, to: GeoPoint) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let d_lat = (to.latitude - from.latitude).to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().min(1.0).asin()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyPolicy {
    pub proximity_max: f64,
    /// Distance at which proximity points reach zero.
    pub proximity_radius_km: f64,
    pub recent_activity_max: f64,
    pub points_per_recent_shift: f64,
    pub recent_activity_days: i64,
    pub high_confidence: u8,
    pub medium_confidence: u8,
    pub alternatives: usize,
}

impl Default for EmergencyPolicy {
    fn default() -> Self {
        Self {
            proximity_max: 20.0,
            proximity_radius_km: 30.0,
            recent_activity_max: 10.0,
            points_per_recent_shift: 2.0,
            recent_activity_days: 7,
            high_confidence: 80,
            medium_confidence: 60,
            alternatives: 3,
        }
    }
}

impl EmergencyPolicy {
    pub fn validate(&self) -> Result<(), EmergencyPolicyError> {
        let values = [
            ("proximity_max", self.proximity_max),
            ("proximity_radius_km", self.proximity_radius_km),
            ("recent_activity_max", self.recent_activity_max),
            ("points_per_recent_shift", self.points_per_recent_shift),
        ];
        for (field, value) in values {
            if !value.is_finite() || value < 0.0 {
                return Err(EmergencyPolicyError::OutOfRange { field, value });
            }
        }
        if !(0..=MAX_ACTIVITY_WINDOW_DAYS).contains(&self.recent_activity_days) {
            return Err(EmergencyPolicyError::ActivityWindow(
                self.recent_activity_days,
            ));
        }
        if self.medium_confidence > self.high_confidence {
            return Err(EmergencyPolicyError::InvertedConfidence);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EmergencyPolicyError {
    #[error("{field} must be finite and non-negative (got {value})")]
    OutOfRange { field: &'static str, value: f64 },
    #[error("recent activity window must be 0..={MAX_ACTIVITY_WINDOW_DAYS} days (got {0})")]
    ActivityWindow(i64),
    #[error("medium confidence threshold must not exceed the high threshold")]
    InvertedConfidence,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ranked candidate extended with the urgency factors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyCandidate {
    pub candidate: RankedCandidate,
    pub emergency_score: u8,
    pub recent_shifts: usize,
    pub distance_km: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyFill {
    pub recommendation: EmergencyCandidate,
    pub confidence: Confidence,
    pub reasoning: Vec<RankingFactor>,
    pub alternatives: Vec<EmergencyCandidate>,
}

#[derive(Clone)]
pub struct EmergencyFillAdvisor {
    ranker: ShiftRanker,
    proximity: Arc<dyn ProximityEstimator>,
    policy: EmergencyPolicy,
}

impl fmt::Debug for EmergencyFillAdvisor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmergencyFillAdvisor")
            .field("ranker", &self.ranker)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl Default for EmergencyFillAdvisor {
    fn default() -> Self {
        Self::new(
            ShiftRanker::default(),
            Arc::new(HaversineProximity),
            EmergencyPolicy::default(),
        )
    }
}

impl EmergencyFillAdvisor {
    pub fn new(
        ranker: ShiftRanker,
        proximity: Arc<dyn ProximityEstimator>,
        policy: EmergencyPolicy,
    ) -> Self {
        Self {
            ranker,
            proximity,
            policy,
        }
    }

    pub fn policy(&self) -> &EmergencyPolicy {
        &self.policy
    }

    /// Pick the best available guard for an urgent vacancy. `None` when nobody is available.
    pub fn suggest_emergency_fill(
        &self,
        shift: &ShiftSlot,
        available_guards: &[Guard],
        all_shifts: &[ShiftRecord],
        evidence: &RosterEvidence<'_>,
    ) -> Option<EmergencyFill> {
        let ranked = self.ranker.rank_guards_for_shift(
            available_guards,
            shift,
            all_shifts,
            RankingOptions::emergency(),
            evidence,
        );

        let mut candidates: Vec<EmergencyCandidate> = ranked
            .into_iter()
            .map(|candidate| self.augment(candidate, shift, all_shifts, evidence))
            .collect();
        candidates.sort_by(|a, b| b.emergency_score.cmp(&a.emergency_score));

        let mut remaining = candidates.into_iter();
        let recommendation = remaining.next()?;
        let alternatives = remaining.take(self.policy.alternatives).collect();

        Some(EmergencyFill {
            confidence: self.confidence_for(recommendation.emergency_score),
            reasoning: recommendation.candidate.factors.clone(),
            recommendation,
            alternatives,
        })
    }

    fn augment(
        &self,
        mut candidate: RankedCandidate,
        shift: &ShiftSlot,
        all_shifts: &[ShiftRecord],
        evidence: &RosterEvidence<'_>,
    ) -> EmergencyCandidate {
        let distance_km = self
            .proximity
            .distance_km(&candidate.guard, shift)
            .filter(|distance| distance.is_finite() && *distance >= 0.0);
        let proximity = self.proximity_factor(distance_km);

        let recent_shifts = self.recent_shift_count(&candidate.guard, all_shifts, evidence);
        let activity = RankingFactor::new(
            FactorKind::RecentActivity,
            format!(
                "{recent_shifts} shift(s) in the last {} days",
                self.policy.recent_activity_days
            ),
            self.policy.points_per_recent_shift * recent_shifts as f64,
            self.policy.recent_activity_max,
        );

        let emergency_points = f64::from(candidate.score) + proximity.points + activity.points;
        let emergency_score = emergency_points.round().clamp(0.0, f64::from(u8::MAX)) as u8;

        candidate.factors.push(proximity);
        candidate.factors.push(activity);

        EmergencyCandidate {
            candidate,
            emergency_score,
            recent_shifts,
            distance_km,
        }
    }

    fn proximity_factor(&self, distance_km: Option<f64>) -> RankingFactor {
        let max = self.policy.proximity_max;
        match distance_km {
            Some(distance) => {
                let radius = self.policy.proximity_radius_km;
                let closeness = if radius > 0.0 {
                    (1.0 - distance / radius).max(0.0)
                } else {
                    0.0
                };
                RankingFactor::new(
                    FactorKind::TravelProximity,
                    format!("{distance:.1} km from site"),
                    max * closeness,
                    max,
                )
            }
            None => RankingFactor::new(
                FactorKind::TravelProximity,
                "Travel distance unknown",
                0.0,
                max,
            ),
        }
    }

    fn recent_shift_count(
        &self,
        guard: &Guard,
        all_shifts: &[ShiftRecord],
        evidence: &RosterEvidence<'_>,
    ) -> usize {
        let window_start = evidence
            .as_of
            .checked_sub_days(Days::new(
                u64::try_from(self.policy.recent_activity_days).unwrap_or(0),
            ))
            .unwrap_or(NaiveDate::MIN);
        all_shifts
            .iter()
            .filter(|shift| {
                shift.is_assigned_to(&guard.id)
                    && shift.status != ShiftStatus::Cancelled
                    && shift.date >= window_start
                    && shift.date <= evidence.as_of
            })
            .count()
    }

    fn confidence_for(&self, emergency_score: u8) -> Confidence {
        if emergency_score >= self.policy.high_confidence {
            Confidence::High
        } else if emergency_score >= self.policy.medium_confidence {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }
}
