//! Shift suitability ranking.
//!
//! Each candidate's baseline performance is combined with shift-specific factors
//! (site familiarity, committed hours, tier, shift-type preference). Every factor is
//! computed on its own as `{points, max, label}` and summed, so the breakdown stays
//! explainable and each option flag only ever touches its own factor.

pub(crate) mod factors;
mod policy;

pub use factors::{FactorKind, RankingFactor};
pub use policy::{RankingOptions, RankingPolicy, RankingPolicyError};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{history_for, FeedbackEntry, Guard, Incident, ShiftRecord, ShiftSlot};
use super::scoring::{clamp_score, PerformanceEngine, ScoreBreakdown};

/// Roster-wide inputs to the performance model besides shift history.
#[derive(Debug, Clone, Copy)]
pub struct RosterEvidence<'a> {
    pub as_of: NaiveDate,
    pub incidents: &'a [Incident],
    pub feedback: &'a [FeedbackEntry],
}

impl<'a> RosterEvidence<'a> {
    pub fn as_of(as_of: NaiveDate) -> Self {
        Self {
            as_of,
            incidents: &[],
            feedback: &[],
        }
    }

    pub fn with_incidents(mut self, incidents: &'a [Incident]) -> Self {
        self.incidents = incidents;
        self
    }

    pub fn with_feedback(mut self, feedback: &'a [FeedbackEntry]) -> Self {
        self.feedback = feedback;
        self
    }
}

/// A candidate guard annotated with its suitability for one shift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub guard: Guard,
    pub score: u8,
    pub max_score: u8,
    pub percentage: u8,
    pub factors: Vec<RankingFactor>,
    pub performance: ScoreBreakdown,
    pub recommended: bool,
}

/// Orders a candidate pool for a specific shift.
#[derive(Debug, Clone, Default)]
pub struct ShiftRanker {
    engine: PerformanceEngine,
    policy: RankingPolicy,
}

impl ShiftRanker {
    pub fn new(engine: PerformanceEngine, policy: RankingPolicy) -> Self {
        Self { engine, policy }
    }

    pub fn engine(&self) -> &PerformanceEngine {
        &self.engine
    }

    pub fn policy(&self) -> &RankingPolicy {
        &self.policy
    }

    /// Rank `guards` for `shift`, best first. Ties keep their input order.
    pub fn rank_guards_for_shift(
        &self,
        guards: &[Guard],
        shift: &ShiftSlot,
        all_shifts: &[ShiftRecord],
        options: RankingOptions,
        evidence: &RosterEvidence<'_>,
    ) -> Vec<RankedCandidate> {
        let mut candidates: Vec<RankedCandidate> = guards
            .iter()
            .map(|guard| self.evaluate(guard, shift, all_shifts, options, evidence))
            .collect();

        candidates.sort_by(|a, b| b.score.cmp(&a.score));
        candidates
    }

    /// Suitability of a single guard for `shift`.
    pub fn evaluate(
        &self,
        guard: &Guard,
        shift: &ShiftSlot,
        all_shifts: &[ShiftRecord],
        options: RankingOptions,
        evidence: &RosterEvidence<'_>,
    ) -> RankedCandidate {
        let history = history_for(&guard.id, all_shifts, evidence.as_of);
        let performance = self.engine.calculate_guard_score(
            guard,
            &history,
            evidence.incidents,
            evidence.feedback,
            evidence.as_of,
        );

        let policy = &self.policy;
        let mut candidate_factors = vec![factors::performance(&performance, policy)];

        if options.prioritize_site_experience {
            candidate_factors.extend(factors::site_experience(guard, shift, all_shifts, policy));
        }
        if options.balance_hours {
            candidate_factors.push(factors::hour_balance(guard, all_shifts, policy));
        }
        if options.prefer_high_ranking {
            candidate_factors.push(factors::tier_bonus(performance.tier, policy));
        }
        if options.consider_availability {
            candidate_factors.extend(factors::shift_preference(guard, shift, policy));
        }

        let score = clamp_score(factors::total_points(&candidate_factors).round()) as u8;
        let max_score = 100u8;

        RankedCandidate {
            guard: guard.clone(),
            score,
            max_score,
            percentage: percentage_of(score, max_score),
            factors: candidate_factors,
            performance,
            recommended: score >= policy.recommend_threshold,
        }
    }
}

fn percentage_of(score: u8, max_score: u8) -> u8 {
    if max_score == 0 {
        return 0;
    }
    clamp_score((f64::from(score) / f64::from(max_score) * 100.0).round()) as u8
}

/// Rank with the default engine and policy.
pub fn rank_guards_for_shift(
    guards: &[Guard],
    shift: &ShiftSlot,
    all_shifts: &[ShiftRecord],
    options: RankingOptions,
    as_of: NaiveDate,
) -> Vec<RankedCandidate> {
    ShiftRanker::default().rank_guards_for_shift(
        guards,
        shift,
        all_shifts,
        options,
        &RosterEvidence::as_of(as_of),
    )
}
