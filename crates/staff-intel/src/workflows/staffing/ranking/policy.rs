use serde::{Deserialize, Serialize};

/// Point ceilings and targets for shift suitability scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingPolicy {
    pub weekly_target_hours: f64,
    pub recommend_threshold: u8,
    pub performance_max: f64,
    pub site_experience_max: f64,
    pub points_per_site_shift: f64,
    pub hour_balance_max: f64,
    pub tier_bonus_max: f64,
    pub tier_bonus_multiplier: f64,
    pub shift_preference_max: f64,
}

impl Default for RankingPolicy {
    fn default() -> Self {
        Self {
            weekly_target_hours: 40.0,
            recommend_threshold: 70,
            performance_max: 50.0,
            site_experience_max: 20.0,
            points_per_site_shift: 4.0,
            hour_balance_max: 15.0,
            tier_bonus_max: 10.0,
            tier_bonus_multiplier: 5.0,
            shift_preference_max: 5.0,
        }
    }
}

impl RankingPolicy {
    pub fn ceiling_total(&self) -> f64 {
        self.performance_max
            + self.site_experience_max
            + self.hour_balance_max
            + self.tier_bonus_max
            + self.shift_preference_max
    }

    pub fn validate(&self) -> Result<(), RankingPolicyError> {
        let ceilings = [
            self.performance_max,
            self.site_experience_max,
            self.hour_balance_max,
            self.tier_bonus_max,
            self.shift_preference_max,
        ];
        if ceilings
            .iter()
            .any(|ceiling| !ceiling.is_finite() || *ceiling < 0.0)
        {
            return Err(RankingPolicyError::NegativeCeiling);
        }
        let total = self.ceiling_total();
        if (total - 100.0).abs() > 1e-9 {
            return Err(RankingPolicyError::CeilingsDoNotSumToHundred { total });
        }
        if !self.weekly_target_hours.is_finite() || self.weekly_target_hours <= 0.0 {
            return Err(RankingPolicyError::InvalidTargetHours(
                self.weekly_target_hours,
            ));
        }
        Ok(())
    }
}

/// Feature flags for the optional ranking factors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingOptions {
    pub prioritize_site_experience: bool,
    pub balance_hours: bool,
    pub prefer_high_ranking: bool,
    pub consider_availability: bool,
}

impl Default for RankingOptions {
    fn default() -> Self {
        Self {
            prioritize_site_experience: true,
            balance_hours: true,
            prefer_high_ranking: true,
            consider_availability: true,
        }
    }
}

impl RankingOptions {
    /// Flags used for urgent vacancies: long-term hour balance is ignored.
    pub const fn emergency() -> Self {
        Self {
            prioritize_site_experience: true,
            balance_hours: false,
            prefer_high_ranking: true,
            consider_availability: true,
        }
    }

    pub const fn performance_only() -> Self {
        Self {
            prioritize_site_experience: false,
            balance_hours: false,
            prefer_high_ranking: false,
            consider_availability: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RankingPolicyError {
    #[error("ranking factor ceilings must sum to 100 (got {total:.2})")]
    CeilingsDoNotSumToHundred { total: f64 },
    #[error("ranking factor ceilings must be finite and non-negative")]
    NegativeCeiling,
    #[error("weekly target hours must be positive (got {0})")]
    InvalidTargetHours(f64),
}
