use serde::Serialize;

use super::domain::{history_for, Guard, GuardId, ShiftRecord};
use super::ranking::RosterEvidence;
use super::scoring::{PerformanceEngine, PerformanceTier, ScoreBreakdown};

const ATTENTION_RELIABILITY: f64 = 70.0;

#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntry {
    pub position: usize,
    pub guard_id: GuardId,
    pub guard_name: String,
    pub performance: ScoreBreakdown,
}

#[derive(Debug, Clone, Serialize)]
pub struct TierCount {
    pub tier: PerformanceTier,
    pub tier_label: &'static str,
    pub guards: usize,
}

/// Roster-wide performance view: everyone scored, best first.
#[derive(Debug, Clone, Serialize)]
pub struct PerformanceLeaderboard {
    pub entries: Vec<LeaderboardEntry>,
    pub tier_distribution: Vec<TierCount>,
    pub average_score: f64,
    /// Guards in the Standard tier or with reliability under 70.
    pub needs_attention: Vec<GuardId>,
}

impl PerformanceLeaderboard {
    pub fn build(
        engine: &PerformanceEngine,
        guards: &[Guard],
        all_shifts: &[ShiftRecord],
        evidence: &RosterEvidence<'_>,
    ) -> Self {
        let mut scored: Vec<(&Guard, ScoreBreakdown)> = guards
            .iter()
            .map(|guard| {
                let history = history_for(&guard.id, all_shifts, evidence.as_of);
                let breakdown = engine.calculate_guard_score(
                    guard,
                    &history,
                    evidence.incidents,
                    evidence.feedback,
                    evidence.as_of,
                );
                (guard, breakdown)
            })
            .collect();
        scored.sort_by(|a, b| b.1.total_score.cmp(&a.1.total_score));

        let tier_distribution = PerformanceTier::ordered()
            .into_iter()
            .map(|tier| TierCount {
                tier,
                tier_label: tier.label(),
                guards: scored
                    .iter()
                    .filter(|(_, breakdown)| breakdown.tier == tier)
                    .count(),
            })
            .collect();

        let average_score = if scored.is_empty() {
            0.0
        } else {
            let total: f64 = scored
                .iter()
                .map(|(_, breakdown)| f64::from(breakdown.total_score))
                .sum();
            (total / scored.len() as f64 * 10.0).round() / 10.0
        };

        let needs_attention = scored
            .iter()
            .filter(|(_, breakdown)| {
                breakdown.tier == PerformanceTier::Standard
                    || breakdown.reliability < ATTENTION_RELIABILITY
            })
            .map(|(guard, _)| guard.id.clone())
            .collect();

        let entries = scored
            .into_iter()
            .enumerate()
            .map(|(idx, (guard, performance))| LeaderboardEntry {
                position: idx + 1,
                guard_id: guard.id.clone(),
                guard_name: guard.name.clone(),
                performance,
            })
            .collect();

        Self {
            entries,
            tier_distribution,
            average_score,
            needs_attention,
        }
    }
}
