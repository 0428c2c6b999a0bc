use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use super::balance::{HourBalanceReport, HourBalancer};
use super::domain::{history_for, Guard, GuardId, ShiftRecord, ShiftSlot, ShiftStatus};
use super::emergency::{
    EmergencyFill, EmergencyFillAdvisor, HaversineProximity, ProximityEstimator,
};
use super::leaderboard::PerformanceLeaderboard;
use super::ranking::{RankedCandidate, RankingOptions, RosterEvidence, ShiftRanker};
use super::repository::{RepositoryError, RosterRepository};
use super::scoring::{PerformanceEngine, ScoreBreakdown};
use crate::config::StaffingConfig;

/// Service composing the roster repository with the scoring and ranking engine.
pub struct StaffingService<R> {
    repository: Arc<R>,
    ranker: Arc<ShiftRanker>,
    balancer: Arc<HourBalancer>,
    advisor: Arc<EmergencyFillAdvisor>,
}

impl<R> StaffingService<R>
where
    R: RosterRepository + 'static,
{
    pub fn new(repository: Arc<R>, config: StaffingConfig) -> Self {
        Self::with_proximity(repository, config, Arc::new(HaversineProximity))
    }

    pub fn with_proximity(
        repository: Arc<R>,
        config: StaffingConfig,
        proximity: Arc<dyn ProximityEstimator>,
    ) -> Self {
        let StaffingConfig {
            scoring,
            ranking,
            balance,
            emergency,
        } = config;

        let ranker = ShiftRanker::new(PerformanceEngine::new(scoring), ranking);
        let advisor = EmergencyFillAdvisor::new(ranker.clone(), proximity, emergency);

        Self {
            repository,
            ranker: Arc::new(ranker),
            balancer: Arc::new(HourBalancer::new(balance)),
            advisor: Arc::new(advisor),
        }
    }

    /// Rank the requested guards (or the whole roster) for a shift.
    pub fn rank_for_shift(
        &self,
        shift: &ShiftSlot,
        guard_ids: Option<&[GuardId]>,
        options: RankingOptions,
        as_of: NaiveDate,
    ) -> Result<Vec<RankedCandidate>, StaffingServiceError> {
        let guards = self.select_guards(guard_ids)?;
        let shifts = self.repository.shifts()?;
        let incidents = self.repository.incidents()?;
        let feedback = self.repository.feedback()?;
        let evidence = RosterEvidence::as_of(as_of)
            .with_incidents(&incidents)
            .with_feedback(&feedback);

        let ranked = self
            .ranker
            .rank_guards_for_shift(&guards, shift, &shifts, options, &evidence);

        debug!(
            site = %shift.site_id,
            candidates = ranked.len(),
            recommended = ranked.iter().filter(|candidate| candidate.recommended).count(),
            "ranked guards for shift"
        );

        Ok(ranked)
    }

    pub fn hour_balance(
        &self,
        target_hours: Option<f64>,
    ) -> Result<HourBalanceReport, StaffingServiceError> {
        let guards = self.repository.guards()?;
        let shifts = self.repository.shifts()?;
        let report = self
            .balancer
            .analyze_hour_balance(&guards, &shifts, target_hours);

        debug!(
            guards = report.guards.len(),
            max_variance = report.max_variance,
            balanced = report.balanced,
            "analyzed hour balance"
        );

        Ok(report)
    }

    /// Recommend a guard for an urgent vacancy.
    ///
    /// Without explicit `guard_ids`, guards already holding a confirmed or active shift on
    /// the vacancy's date are treated as unavailable.
    pub fn emergency_fill(
        &self,
        shift: &ShiftSlot,
        guard_ids: Option<&[GuardId]>,
        as_of: NaiveDate,
    ) -> Result<Option<EmergencyFill>, StaffingServiceError> {
        let shifts = self.repository.shifts()?;
        let mut guards = self.select_guards(guard_ids)?;
        if guard_ids.is_none() {
            if let Some(date) = shift.date {
                guards.retain(|guard| !is_booked_on(guard, &shifts, date));
            }
        }

        let incidents = self.repository.incidents()?;
        let feedback = self.repository.feedback()?;
        let evidence = RosterEvidence::as_of(as_of)
            .with_incidents(&incidents)
            .with_feedback(&feedback);

        let fill = self
            .advisor
            .suggest_emergency_fill(shift, &guards, &shifts, &evidence);

        match &fill {
            Some(fill) => debug!(
                site = %shift.site_id,
                guard = %fill.recommendation.candidate.guard.id,
                confidence = fill.confidence.label(),
                "emergency fill suggested"
            ),
            None => debug!(site = %shift.site_id, "no guard available for emergency fill"),
        }

        Ok(fill)
    }

    pub fn guard_score(
        &self,
        guard_id: &GuardId,
        as_of: NaiveDate,
    ) -> Result<ScoreBreakdown, StaffingServiceError> {
        let guard = self
            .repository
            .guard(guard_id)?
            .ok_or(RepositoryError::NotFound)?;
        let shifts = self.repository.shifts()?;
        let incidents = self.repository.incidents()?;
        let feedback = self.repository.feedback()?;
        let history = history_for(&guard.id, &shifts, as_of);

        Ok(self.ranker.engine().calculate_guard_score(
            &guard,
            &history,
            &incidents,
            &feedback,
            as_of,
        ))
    }

    pub fn leaderboard(
        &self,
        as_of: NaiveDate,
    ) -> Result<PerformanceLeaderboard, StaffingServiceError> {
        let guards = self.repository.guards()?;
        let shifts = self.repository.shifts()?;
        let incidents = self.repository.incidents()?;
        let feedback = self.repository.feedback()?;
        let evidence = RosterEvidence::as_of(as_of)
            .with_incidents(&incidents)
            .with_feedback(&feedback);

        Ok(PerformanceLeaderboard::build(
            self.ranker.engine(),
            &guards,
            &shifts,
            &evidence,
        ))
    }

    fn select_guards(
        &self,
        guard_ids: Option<&[GuardId]>,
    ) -> Result<Vec<Guard>, StaffingServiceError> {
        match guard_ids {
            None => Ok(self.repository.guards()?),
            Some(ids) => {
                let mut guards = Vec::with_capacity(ids.len());
                for id in ids {
                    match self.repository.guard(id)? {
                        Some(guard) => guards.push(guard),
                        None => return Err(StaffingServiceError::UnknownGuard(id.clone())),
                    }
                }
                Ok(guards)
            }
        }
    }
}

fn is_booked_on(guard: &Guard, shifts: &[ShiftRecord], date: NaiveDate) -> bool {
    shifts.iter().any(|shift| {
        shift.is_assigned_to(&guard.id)
            && shift.date == date
            && matches!(shift.status, ShiftStatus::Confirmed | ShiftStatus::Active)
    })
}

/// Error raised by the staffing service.
#[derive(Debug, thiserror::Error)]
pub enum StaffingServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("unknown guard {0}")]
    UnknownGuard(GuardId),
}
