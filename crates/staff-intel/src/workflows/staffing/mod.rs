//! Guard performance scoring and shift-assignment ranking.
//!
//! The score model, shift ranker, hour balancer, and emergency fill advisor are pure
//! computations over caller supplied slices. The service and router wrap them for the
//! HTTP surface, reading roster data through [`RosterRepository`].

pub mod balance;
pub mod domain;
pub mod emergency;
pub mod leaderboard;
pub mod ranking;
pub mod repository;
pub mod router;
pub mod schedule;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use balance::{
    analyze_hour_balance, BalancePolicy, BalancePolicyError, GuardHours, HourBalanceReport,
    HourBalancer,
};
pub use domain::{
    FeedbackEntry, GeoPoint, Guard, GuardId, HandlingQuality, Incident, ShiftHistoryEntry,
    ShiftRecord, ShiftSlot, ShiftStatus, ShiftType, SiteId,
};
pub use emergency::{
    Confidence, EmergencyCandidate, EmergencyFill, EmergencyFillAdvisor, EmergencyPolicy,
    EmergencyPolicyError, HaversineProximity, NoProximitySignal, ProximityEstimator,
};
pub use leaderboard::PerformanceLeaderboard;
pub use ranking::{
    rank_guards_for_shift, FactorKind, RankedCandidate, RankingFactor, RankingOptions,
    RankingPolicy, RosterEvidence, ShiftRanker,
};
pub use repository::{RepositoryError, RosterRepository};
pub use router::staffing_router;
pub use scoring::{
    calculate_guard_score, PerformanceEngine, PerformanceTier, ScoreBreakdown, ScoringConfig,
};
pub use service::{StaffingService, StaffingServiceError};
