use std::collections::HashSet;

use chrono::NaiveDate;

use super::super::domain::{
    FeedbackEntry, Guard, HandlingQuality, Incident, ShiftHistoryEntry, ShiftStatus,
};
use super::config::ScoringDefaults;

const NO_SHOW_PENALTY: f64 = 10.0;
const LATE_PENALTY: f64 = 2.0;
const EXPERIENCE_BASE: f64 = 50.0;
const EXPERIENCE_PER_YEAR: f64 = 5.0;
const VALID_LICENSE_POINTS: f64 = 50.0;
const POINTS_PER_CERTIFICATION: f64 = 10.0;
const CERTIFICATION_CAP: f64 = 50.0;
const INCIDENT_BASE: f64 = 80.0;
const EXCELLENT_HANDLING_BONUS: f64 = 5.0;
const POOR_HANDLING_PENALTY: f64 = 10.0;
const CONTINUITY_BASE: f64 = 60.0;
const CONTINUITY_PER_REPEAT_VISIT: f64 = 2.0;
const MAX_RATING: f64 = 5.0;

/// Clamp to `[0, 100]`; NaN collapses to zero.
pub(crate) fn clamp_score(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else if value == f64::INFINITY {
        100.0
    } else {
        0.0
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

pub(crate) fn reliability(
    guard: &Guard,
    history: &[ShiftHistoryEntry],
    defaults: &ScoringDefaults,
) -> f64 {
    if history.is_empty() {
        let fallback = guard
            .reliability
            .filter(|value| value.is_finite())
            .unwrap_or(defaults.reliability);
        return clamp_score(fallback);
    }

    let no_shows = history
        .iter()
        .filter(|entry| entry.status == ShiftStatus::NoShow)
        .count() as f64;
    let lates = history.iter().filter(|entry| entry.late).count() as f64;

    clamp_score(100.0 - NO_SHOW_PENALTY * no_shows - LATE_PENALTY * lates)
}

pub(crate) fn experience(guard: &Guard) -> f64 {
    clamp_score(EXPERIENCE_BASE + EXPERIENCE_PER_YEAR * non_negative(guard.experience_years))
}

pub(crate) fn certifications(guard: &Guard, as_of: NaiveDate) -> f64 {
    let license_points = match guard.sia_license_expiry {
        Some(expiry) if expiry > as_of => VALID_LICENSE_POINTS,
        _ => 0.0,
    };
    let certification_points = (POINTS_PER_CERTIFICATION * guard.certifications.len() as f64)
        .min(CERTIFICATION_CAP);

    clamp_score(license_points + certification_points)
}

pub(crate) fn client_feedback(
    guard: &Guard,
    feedback: &[FeedbackEntry],
    defaults: &ScoringDefaults,
) -> f64 {
    let ratings: Vec<f64> = feedback
        .iter()
        .filter(|entry| entry.guard_id == guard.id)
        .map(|entry| entry.rating)
        .filter(|rating| rating.is_finite())
        .collect();

    if !ratings.is_empty() {
        let average = ratings.iter().sum::<f64>() / ratings.len() as f64;
        return clamp_score(average / MAX_RATING * 100.0);
    }

    match guard.client_rating.filter(|rating| rating.is_finite()) {
        Some(rating) => clamp_score(rating / MAX_RATING * 100.0),
        None => clamp_score(defaults.client_feedback),
    }
}

pub(crate) fn incident_response(
    guard: &Guard,
    incidents: &[Incident],
    defaults: &ScoringDefaults,
) -> f64 {
    let own: Vec<&Incident> = incidents
        .iter()
        .filter(|incident| incident.guard_id == guard.id)
        .collect();

    if own.is_empty() {
        return clamp_score(defaults.incident_response);
    }

    let excellent = own
        .iter()
        .filter(|incident| incident.handling_quality == HandlingQuality::Excellent)
        .count() as f64;
    let poor = own
        .iter()
        .filter(|incident| incident.handling_quality == HandlingQuality::Poor)
        .count() as f64;

    clamp_score(INCIDENT_BASE + EXCELLENT_HANDLING_BONUS * excellent - POOR_HANDLING_PENALTY * poor)
}

pub(crate) fn continuity(history: &[ShiftHistoryEntry]) -> f64 {
    let distinct_sites: HashSet<&str> = history
        .iter()
        .map(|entry| entry.site_id.0.as_str())
        .collect();
    let repeat_visits = history.len().saturating_sub(distinct_sites.len()) as f64;

    clamp_score(CONTINUITY_BASE + CONTINUITY_PER_REPEAT_VISIT * repeat_visits)
}
