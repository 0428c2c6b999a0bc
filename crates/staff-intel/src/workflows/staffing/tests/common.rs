use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{Duration, NaiveDate};
use serde_json::Value;

use crate::config::StaffingConfig;
use crate::workflows::staffing::domain::{
    FeedbackEntry, GeoPoint, Guard, GuardId, HandlingQuality, Incident, ShiftRecord, ShiftSlot,
    ShiftStatus, ShiftType, SiteId,
};
use crate::workflows::staffing::repository::{RepositoryError, RosterRepository};
use crate::workflows::staffing::{staffing_router, StaffingService};

pub(super) fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 17).expect("valid date")
}

pub(super) fn days_ago(days: i64) -> NaiveDate {
    as_of() - Duration::days(days)
}

/// Ten years in, valid licence, top client rating, nothing else on file. Scores 83.
pub(super) fn guard_a() -> Guard {
    let mut guard = Guard::new("g-a", "Avery Stone");
    guard.experience_years = 10.0;
    guard.sia_license_expiry = NaiveDate::from_ymd_opt(2026, 1, 31);
    guard.client_rating = Some(5.0);
    guard
}

pub(super) fn morning_guard(id: &str) -> Guard {
    let mut guard = guard_a();
    guard.id = GuardId(id.to_string());
    guard.name = format!("Guard {id}");
    guard.preferred_shift_types = vec![ShiftType::Morning];
    guard
}

pub(super) fn novice(id: &str) -> Guard {
    Guard::new(id, format!("Novice {id}"))
}

pub(super) fn site_location() -> GeoPoint {
    GeoPoint {
        latitude: 51.5074,
        longitude: -0.1278,
    }
}

pub(super) fn morning_slot() -> ShiftSlot {
    ShiftSlot::new("site-1", "07:00", "15:00")
}

pub(super) fn shift(
    id: &str,
    guard: &str,
    site: &str,
    date: NaiveDate,
    window: (&str, &str),
    status: ShiftStatus,
) -> ShiftRecord {
    ShiftRecord {
        id: id.to_string(),
        guard_id: Some(GuardId(guard.to_string())),
        site_id: SiteId(site.to_string()),
        status,
        date,
        start_time: window.0.to_string(),
        end_time: window.1.to_string(),
        late: false,
    }
}

/// `count` eight-hour day shifts for `guard` on consecutive days ending yesterday.
pub(super) fn eight_hour_shifts(
    guard: &str,
    count: usize,
    status: ShiftStatus,
) -> Vec<ShiftRecord> {
    (0..count)
        .map(|idx| {
            shift(
                &format!("{guard}-{idx}"),
                guard,
                "site-9",
                days_ago(idx as i64 + 1),
                ("07:00", "15:00"),
                status,
            )
        })
        .collect()
}

pub(super) fn incident(guard: &str, quality: HandlingQuality) -> Incident {
    Incident {
        guard_id: GuardId(guard.to_string()),
        handling_quality: quality,
    }
}

pub(super) fn feedback(guard: &str, rating: f64) -> FeedbackEntry {
    FeedbackEntry {
        guard_id: GuardId(guard.to_string()),
        rating,
    }
}

pub(super) fn ids(candidates: impl IntoIterator<Item = GuardId>) -> Vec<String> {
    candidates.into_iter().map(|id| id.0).collect()
}

#[derive(Default)]
pub(super) struct MemoryRoster {
    guards: Mutex<Vec<Guard>>,
    shifts: Mutex<Vec<ShiftRecord>>,
    incidents: Mutex<Vec<Incident>>,
    feedback: Mutex<Vec<FeedbackEntry>>,
}

impl MemoryRoster {
    pub(super) fn with_guards(guards: Vec<Guard>) -> Self {
        Self {
            guards: Mutex::new(guards),
            ..Self::default()
        }
    }

    pub(super) fn add_shifts(&self, shifts: Vec<ShiftRecord>) {
        self.shifts
            .lock()
            .expect("shift mutex poisoned")
            .extend(shifts);
    }

    pub(super) fn add_incident(&self, incident: Incident) {
        self.incidents
            .lock()
            .expect("incident mutex poisoned")
            .push(incident);
    }

    pub(super) fn add_feedback(&self, entry: FeedbackEntry) {
        self.feedback
            .lock()
            .expect("feedback mutex poisoned")
            .push(entry);
    }
}

impl RosterRepository for MemoryRoster {
    fn guards(&self) -> Result<Vec<Guard>, RepositoryError> {
        Ok(self.guards.lock().expect("guard mutex poisoned").clone())
    }

    fn guard(&self, id: &GuardId) -> Result<Option<Guard>, RepositoryError> {
        Ok(self
            .guards
            .lock()
            .expect("guard mutex poisoned")
            .iter()
            .find(|guard| &guard.id == id)
            .cloned())
    }

    fn shifts(&self) -> Result<Vec<ShiftRecord>, RepositoryError> {
        Ok(self.shifts.lock().expect("shift mutex poisoned").clone())
    }

    fn incidents(&self) -> Result<Vec<Incident>, RepositoryError> {
        Ok(self.incidents.lock().expect("incident mutex poisoned").clone())
    }

    fn feedback(&self) -> Result<Vec<FeedbackEntry>, RepositoryError> {
        Ok(self.feedback.lock().expect("feedback mutex poisoned").clone())
    }
}

pub(super) struct UnavailableRoster;

impl RosterRepository for UnavailableRoster {
    fn guards(&self) -> Result<Vec<Guard>, RepositoryError> {
        Err(RepositoryError::Unavailable("roster offline".to_string()))
    }

    fn guard(&self, _id: &GuardId) -> Result<Option<Guard>, RepositoryError> {
        Err(RepositoryError::Unavailable("roster offline".to_string()))
    }

    fn shifts(&self) -> Result<Vec<ShiftRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("roster offline".to_string()))
    }

    fn incidents(&self) -> Result<Vec<Incident>, RepositoryError> {
        Err(RepositoryError::Unavailable("roster offline".to_string()))
    }

    fn feedback(&self) -> Result<Vec<FeedbackEntry>, RepositoryError> {
        Err(RepositoryError::Unavailable("roster offline".to_string()))
    }
}

pub(super) fn build_service(
    roster: MemoryRoster,
) -> (Arc<StaffingService<MemoryRoster>>, Arc<MemoryRoster>) {
    let roster = Arc::new(roster);
    let service = Arc::new(StaffingService::new(
        roster.clone(),
        StaffingConfig::default(),
    ));
    (service, roster)
}

pub(super) fn router_for(roster: MemoryRoster) -> axum::Router {
    let (service, _) = build_service(roster);
    staffing_router(service)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
