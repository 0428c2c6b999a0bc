//! Roster-wide weekly hour balance diagnostics.

use serde::{Deserialize, Serialize};

use super::domain::{Guard, GuardId, ShiftRecord, ShiftStatus};
use super::ranking::factors::scheduled_hours;

const SCHEDULED_STATUSES: [ShiftStatus; 3] = [
    ShiftStatus::Confirmed,
    ShiftStatus::Active,
    ShiftStatus::Published,
];

/// Thresholds for the hour balance report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalancePolicy {
    pub target_hours: f64,
    /// Largest absolute variance still considered balanced.
    pub tolerance_hours: f64,
    pub underutilized_ratio: f64,
    pub overutilized_ratio: f64,
}

impl Default for BalancePolicy {
    fn default() -> Self {
        Self {
            target_hours: 40.0,
            tolerance_hours: 8.0,
            underutilized_ratio: 0.8,
            overutilized_ratio: 1.2,
        }
    }
}

impl BalancePolicy {
    pub fn validate(&self) -> Result<(), BalancePolicyError> {
        let values = [
            ("target_hours", self.target_hours),
            ("tolerance_hours", self.tolerance_hours),
            ("underutilized_ratio", self.underutilized_ratio),
            ("overutilized_ratio", self.overutilized_ratio),
        ];
        for (field, value) in values {
            if !value.is_finite() || value < 0.0 {
                return Err(BalancePolicyError::OutOfRange { field, value });
            }
        }
        if self.underutilized_ratio > self.overutilized_ratio {
            return Err(BalancePolicyError::InvertedRatios);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BalancePolicyError {
    #[error("{field} must be finite and non-negative (got {value})")]
    OutOfRange { field: &'static str, value: f64 },
    #[error("underutilized ratio must not exceed the overutilized ratio")]
    InvertedRatios,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardHours {
    pub guard_id: GuardId,
    pub guard_name: String,
    pub hours: f64,
    pub shifts: usize,
    pub variance: f64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourBalanceReport {
    pub target_hours: f64,
    pub guards: Vec<GuardHours>,
    pub total_hours: f64,
    pub avg_hours: f64,
    pub max_variance: f64,
    pub balanced: bool,
    pub underutilized: Vec<GuardId>,
    pub overutilized: Vec<GuardId>,
}

/// Audits scheduled hours per guard against a weekly target.
#[derive(Debug, Clone, Default)]
pub struct HourBalancer {
    policy: BalancePolicy,
}

impl HourBalancer {
    pub fn new(policy: BalancePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &BalancePolicy {
        &self.policy
    }

    /// Build the report for `target_hours`, or the policy target when `None`.
    pub fn analyze_hour_balance(
        &self,
        guards: &[Guard],
        all_shifts: &[ShiftRecord],
        target_hours: Option<f64>,
    ) -> HourBalanceReport {
        let target_hours = target_hours
            .filter(|target| target.is_finite() && *target >= 0.0)
            .unwrap_or(self.policy.target_hours);

        let entries: Vec<GuardHours> = guards
            .iter()
            .map(|guard| {
                let hours = scheduled_hours(guard, all_shifts, &SCHEDULED_STATUSES);
                let shifts = all_shifts
                    .iter()
                    .filter(|shift| {
                        shift.is_assigned_to(&guard.id)
                            && SCHEDULED_STATUSES.contains(&shift.status)
                    })
                    .count();
                let percentage = if target_hours > 0.0 {
                    (hours / target_hours * 100.0).round()
                } else {
                    0.0
                };

                GuardHours {
                    guard_id: guard.id.clone(),
                    guard_name: guard.name.clone(),
                    hours,
                    shifts,
                    variance: hours - target_hours,
                    percentage,
                }
            })
            .collect();

        let total_hours: f64 = entries.iter().map(|entry| entry.hours).sum();
        let avg_hours = if entries.is_empty() {
            0.0
        } else {
            round_tenths(total_hours / entries.len() as f64)
        };
        let max_variance = round_tenths(
            entries
                .iter()
                .map(|entry| entry.variance.abs())
                .fold(0.0, f64::max),
        );

        let underutilized = entries
            .iter()
            .filter(|entry| entry.hours < target_hours * self.policy.underutilized_ratio)
            .map(|entry| entry.guard_id.clone())
            .collect();
        let overutilized = entries
            .iter()
            .filter(|entry| entry.hours > target_hours * self.policy.overutilized_ratio)
            .map(|entry| entry.guard_id.clone())
            .collect();

        HourBalanceReport {
            target_hours,
            balanced: max_variance <= self.policy.tolerance_hours,
            guards: entries,
            total_hours,
            avg_hours,
            max_variance,
            underutilized,
            overutilized,
        }
    }
}

fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Analyze with the default policy.
pub fn analyze_hour_balance(
    guards: &[Guard],
    all_shifts: &[ShiftRecord],
    target_hours: f64,
) -> HourBalanceReport {
    HourBalancer::default().analyze_hour_balance(guards, all_shifts, Some(target_hours))
}
