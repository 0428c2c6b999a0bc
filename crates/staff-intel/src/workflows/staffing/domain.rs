use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier wrapper for guards held by the staff store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GuardId(pub String);

impl fmt::Display for GuardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for guarded sites.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SiteId(pub String);

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Part of the day a shift starts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftType {
    Morning,
    Afternoon,
    Night,
}

impl ShiftType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Afternoon => "afternoon",
            Self::Night => "night",
        }
    }
}

/// Lifecycle state of a shift as recorded by the scheduling store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftStatus {
    Published,
    Confirmed,
    Active,
    Completed,
    NoShow,
    Cancelled,
    #[serde(other)]
    Other,
}

impl ShiftStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Published => "published",
            Self::Confirmed => "confirmed",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::NoShow => "no_show",
            Self::Cancelled => "cancelled",
            Self::Other => "other",
        }
    }

    /// Lenient parse used by CSV imports; unknown labels map to `Other`.
    pub fn from_label(value: &str) -> Self {
        match value
            .trim()
            .to_ascii_lowercase()
            .replace(['-', ' '], "_")
            .as_str()
        {
            "published" => Self::Published,
            "confirmed" => Self::Confirmed,
            "active" | "in_progress" => Self::Active,
            "completed" | "complete" => Self::Completed,
            "no_show" | "noshow" => Self::NoShow,
            "cancelled" | "canceled" => Self::Cancelled,
            _ => Self::Other,
        }
    }
}

/// WGS84 coordinate used for travel proximity estimates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Guard record as supplied by the HR collaborator. Read-only to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guard {
    pub id: GuardId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub experience_years: f64,
    #[serde(default)]
    pub sia_license_expiry: Option<NaiveDate>,
    #[serde(default)]
    pub certifications: Vec<String>,
    /// Client rating on a 0-5 scale, used when no feedback entries exist.
    #[serde(default)]
    pub client_rating: Option<f64>,
    /// 0-100 fallback used only when the guard has no shift history.
    #[serde(default)]
    pub reliability: Option<f64>,
    #[serde(default)]
    pub preferred_shift_types: Vec<ShiftType>,
    #[serde(default)]
    pub home_location: Option<GeoPoint>,
}

impl Guard {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: GuardId(id.into()),
            name: name.into(),
            experience_years: 0.0,
            sia_license_expiry: None,
            certifications: Vec::new(),
            client_rating: None,
            reliability: None,
            preferred_shift_types: Vec::new(),
            home_location: None,
        }
    }
}

/// One past shift attributed to a guard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftHistoryEntry {
    pub status: ShiftStatus,
    #[serde(default)]
    pub late: bool,
    pub site_id: SiteId,
}

/// How well a guard handled a reported incident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandlingQuality {
    Excellent,
    Poor,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Incident {
    pub guard_id: GuardId,
    pub handling_quality: HandlingQuality,
}

/// Client feedback on a 1-5 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub guard_id: GuardId,
    pub rating: f64,
}

/// Shift document as stored by the scheduling collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftRecord {
    pub id: String,
    #[serde(default)]
    pub guard_id: Option<GuardId>,
    pub site_id: SiteId,
    pub status: ShiftStatus,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub late: bool,
}

impl ShiftRecord {
    pub fn is_assigned_to(&self, guard_id: &GuardId) -> bool {
        self.guard_id.as_ref() == Some(guard_id)
    }

    pub fn history_entry(&self) -> ShiftHistoryEntry {
        ShiftHistoryEntry {
            status: self.status,
            late: self.late,
            site_id: self.site_id.clone(),
        }
    }
}

/// The vacancy being filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftSlot {
    pub site_id: SiteId,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub site_location: Option<GeoPoint>,
}

impl ShiftSlot {
    pub fn new(
        site_id: impl Into<String>,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
    ) -> Self {
        Self {
            site_id: SiteId(site_id.into()),
            start_time: start_time.into(),
            end_time: end_time.into(),
            date: None,
            site_location: None,
        }
    }
}

/// Collect the shifts one guard has already worked or missed by `as_of`.
///
/// Upcoming bookings and cancelled shifts are not history.
pub fn history_for(
    guard_id: &GuardId,
    shifts: &[ShiftRecord],
    as_of: NaiveDate,
) -> Vec<ShiftHistoryEntry> {
    shifts
        .iter()
        .filter(|shift| {
            shift.is_assigned_to(guard_id)
                && shift.status != ShiftStatus::Cancelled
                && shift.date <= as_of
        })
        .map(ShiftRecord::history_entry)
        .collect()
}
