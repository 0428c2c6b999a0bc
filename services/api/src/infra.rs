use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use staff_intel::workflows::staffing::{
    FeedbackEntry, Guard, GuardId, Incident, RepositoryError, RosterRepository, ShiftRecord,
};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Everything the in-memory roster is seeded with.
#[derive(Debug, Clone, Default)]
pub(crate) struct RosterSnapshot {
    pub(crate) guards: Vec<Guard>,
    pub(crate) shifts: Vec<ShiftRecord>,
    pub(crate) incidents: Vec<Incident>,
    pub(crate) feedback: Vec<FeedbackEntry>,
}

/// Process-local roster store. Guards keep insertion order so ranking ties stay stable.
#[derive(Default, Clone)]
pub(crate) struct InMemoryRosterRepository {
    snapshot: Arc<Mutex<RosterSnapshot>>,
}

impl InMemoryRosterRepository {
    pub(crate) fn seeded(snapshot: RosterSnapshot) -> Self {
        Self {
            snapshot: Arc::new(Mutex::new(snapshot)),
        }
    }

    pub(crate) fn replace_shifts(&self, shifts: Vec<ShiftRecord>) -> Result<(), RepositoryError> {
        self.lock()?.shifts = shifts;
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, RosterSnapshot>, RepositoryError> {
        self.snapshot
            .lock()
            .map_err(|_| RepositoryError::Unavailable("roster mutex poisoned".to_string()))
    }
}

impl RosterRepository for InMemoryRosterRepository {
    fn guards(&self) -> Result<Vec<Guard>, RepositoryError> {
        Ok(self.lock()?.guards.clone())
    }

    fn guard(&self, id: &GuardId) -> Result<Option<Guard>, RepositoryError> {
        Ok(self
            .lock()?
            .guards
            .iter()
            .find(|guard| &guard.id == id)
            .cloned())
    }

    fn shifts(&self) -> Result<Vec<ShiftRecord>, RepositoryError> {
        Ok(self.lock()?.shifts.clone())
    }

    fn incidents(&self) -> Result<Vec<Incident>, RepositoryError> {
        Ok(self.lock()?.incidents.clone())
    }

    fn feedback(&self) -> Result<Vec<FeedbackEntry>, RepositoryError> {
        Ok(self.lock()?.feedback.clone())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
