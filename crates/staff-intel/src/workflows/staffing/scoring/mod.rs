//! Guard performance score model.
//!
//! Six independently clamped sub-scores are combined with configurable weights into a
//! 0-100 total and a ranking tier. Sparse or malformed inputs fall back to the named
//! values in [`ScoringDefaults`], so scoring a guard never fails.

mod config;
mod rules;

pub use config::{ScoreWeights, ScoringConfig, ScoringConfigError, ScoringDefaults, TierThresholds};

pub(crate) use rules::clamp_score;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{FeedbackEntry, Guard, Incident, ShiftHistoryEntry};

/// Ranking tier derived from the performance total, ordered lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceTier {
    Standard,
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl PerformanceTier {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Platinum,
            Self::Gold,
            Self::Silver,
            Self::Bronze,
            Self::Standard,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Platinum => "Platinum",
            Self::Gold => "Gold",
            Self::Silver => "Silver",
            Self::Bronze => "Bronze",
            Self::Standard => "Standard",
        }
    }

    /// Multiplier applied by the shift ranker's tier bonus.
    pub const fn bonus(self) -> f64 {
        match self {
            Self::Platinum => 2.0,
            Self::Gold => 1.5,
            Self::Silver => 1.0,
            Self::Bronze => 0.5,
            Self::Standard => 0.0,
        }
    }
}

/// Per-guard performance breakdown. Recomputed on every call, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub reliability: f64,
    pub experience: f64,
    pub certifications: f64,
    pub client_feedback: f64,
    pub incident_response: f64,
    pub continuity: f64,
    pub total_score: u8,
    pub tier: PerformanceTier,
}

impl ScoreBreakdown {
    pub fn sub_scores(&self) -> [(&'static str, f64); 6] {
        [
            ("reliability", self.reliability),
            ("experience", self.experience),
            ("certifications", self.certifications),
            ("client_feedback", self.client_feedback),
            ("incident_response", self.incident_response),
            ("continuity", self.continuity),
        ]
    }
}

/// Stateless evaluator applying a [`ScoringConfig`] to guard records.
#[derive(Debug, Clone, Default)]
pub struct PerformanceEngine {
    config: ScoringConfig,
}

impl PerformanceEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score one guard. Incidents and feedback belonging to other guards are ignored;
    /// `as_of` is the date licence expiry is checked against.
    pub fn calculate_guard_score(
        &self,
        guard: &Guard,
        history: &[ShiftHistoryEntry],
        incidents: &[Incident],
        feedback: &[FeedbackEntry],
        as_of: NaiveDate,
    ) -> ScoreBreakdown {
        let defaults = &self.config.defaults;
        let weights = &self.config.weights;

        let reliability = rules::reliability(guard, history, defaults);
        let experience = rules::experience(guard);
        let certifications = rules::certifications(guard, as_of);
        let client_feedback = rules::client_feedback(guard, feedback, defaults);
        let incident_response = rules::incident_response(guard, incidents, defaults);
        let continuity = rules::continuity(history);

        let weighted = reliability * weights.reliability
            + experience * weights.experience
            + certifications * weights.certifications
            + client_feedback * weights.client_feedback
            + incident_response * weights.incident_response
            + continuity * weights.continuity;
        let total_score = clamp_score(weighted.round()) as u8;

        ScoreBreakdown {
            reliability,
            experience,
            certifications,
            client_feedback,
            incident_response,
            continuity,
            total_score,
            tier: self.config.tiers.tier_for(total_score),
        }
    }
}

/// Score a guard with the default configuration.
pub fn calculate_guard_score(
    guard: &Guard,
    history: &[ShiftHistoryEntry],
    incidents: &[Incident],
    feedback: &[FeedbackEntry],
    as_of: NaiveDate,
) -> ScoreBreakdown {
    PerformanceEngine::default().calculate_guard_score(guard, history, incidents, feedback, as_of)
}
