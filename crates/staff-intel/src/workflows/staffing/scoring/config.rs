use serde::{Deserialize, Serialize};

use super::PerformanceTier;

const WEIGHT_TOLERANCE: f64 = 1e-9;

/// Relative weight of each sub-score in the performance total. Must sum to 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub reliability: f64,
    pub experience: f64,
    pub certifications: f64,
    pub client_feedback: f64,
    pub incident_response: f64,
    pub continuity: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            reliability: 0.30,
            experience: 0.15,
            certifications: 0.15,
            client_feedback: 0.20,
            incident_response: 0.10,
            continuity: 0.10,
        }
    }
}

impl ScoreWeights {
    pub fn total(&self) -> f64 {
        self.reliability
            + self.experience
            + self.certifications
            + self.client_feedback
            + self.incident_response
            + self.continuity
    }

    pub fn validate(&self) -> Result<(), ScoringConfigError> {
        let total = self.total();
        if (total - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(ScoringConfigError::WeightsDoNotSumToOne { total });
        }
        let all = [
            self.reliability,
            self.experience,
            self.certifications,
            self.client_feedback,
            self.incident_response,
            self.continuity,
        ];
        if all.iter().any(|weight| !weight.is_finite() || *weight < 0.0) {
            return Err(ScoringConfigError::NegativeWeight);
        }
        Ok(())
    }
}

/// Values substituted when a guard record or its history lacks the signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringDefaults {
    /// Reliability used when there is no shift history and no stored fallback.
    pub reliability: f64,
    /// Client feedback score used when there is neither feedback nor a rating.
    pub client_feedback: f64,
    /// Incident response score for guards without incident records.
    pub incident_response: f64,
}

impl Default for ScoringDefaults {
    fn default() -> Self {
        Self {
            reliability: 85.0,
            client_feedback: 80.0,
            incident_response: 85.0,
        }
    }
}

/// Minimum total score for each tier above Standard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierThresholds {
    pub platinum: u8,
    pub gold: u8,
    pub silver: u8,
    pub bronze: u8,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            platinum: 90,
            gold: 80,
            silver: 70,
            bronze: 60,
        }
    }
}

impl TierThresholds {
    /// Highest tier whose threshold the score meets, checked from Platinum down.
    pub fn tier_for(&self, total_score: u8) -> PerformanceTier {
        [
            (self.platinum, PerformanceTier::Platinum),
            (self.gold, PerformanceTier::Gold),
            (self.silver, PerformanceTier::Silver),
            (self.bronze, PerformanceTier::Bronze),
        ]
        .into_iter()
        .find(|(threshold, _)| total_score >= *threshold)
        .map(|(_, tier)| tier)
        .unwrap_or(PerformanceTier::Standard)
    }
}

/// Complete configuration for the performance score model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub weights: ScoreWeights,
    pub defaults: ScoringDefaults,
    pub tiers: TierThresholds,
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), ScoringConfigError> {
        self.weights.validate()
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringConfigError {
    #[error("score weights must sum to 1.0 (got {total:.4})")]
    WeightsDoNotSumToOne { total: f64 },
    #[error("score weights must be finite and non-negative")]
    NegativeWeight,
}
