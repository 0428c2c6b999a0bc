use crate::infra::{InMemoryRosterRepository, RosterSnapshot};
use chrono::{Duration, Local, NaiveDate};
use clap::Args;
use staff_intel::config::AppConfig;
use staff_intel::error::AppError;
use staff_intel::workflows::roster_import::ShiftExportImporter;
use staff_intel::workflows::staffing::{
    EmergencyFill, FeedbackEntry, GeoPoint, Guard, GuardId, HandlingQuality, HourBalanceReport,
    Incident, PerformanceLeaderboard, RankedCandidate, RankingOptions, ShiftRecord, ShiftSlot,
    ShiftStatus, ShiftType, SiteId, StaffingService, StaffingServiceError,
};
use std::path::PathBuf;
use std::sync::Arc;

const SITES: [(&str, f64, f64); 3] = [
    ("site-hq", 51.5074, -0.1278),
    ("site-docks", 51.5055, -0.0235),
    ("site-retail", 51.4613, -0.1156),
];

#[derive(Args, Debug, Default, Clone)]
pub(crate) struct RosterArgs {
    /// Evaluation date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// Shift export CSV replacing the demo roster's shifts.
    #[arg(long)]
    pub(crate) shifts_csv: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct SlotArgs {
    /// Site the vacancy belongs to.
    #[arg(long, default_value = "site-hq")]
    pub(crate) site: String,
    /// Start time (HH:MM).
    #[arg(long, default_value = "07:00")]
    pub(crate) start: String,
    /// End time (HH:MM); earlier than start means the shift runs past midnight.
    #[arg(long, default_value = "15:00")]
    pub(crate) end: String,
    /// Shift date (YYYY-MM-DD).
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) date: Option<NaiveDate>,
}

impl SlotArgs {
    fn slot(&self) -> ShiftSlot {
        let mut slot = ShiftSlot::new(self.site.clone(), self.start.clone(), self.end.clone());
        slot.date = self.date;
        slot.site_location = site_location(&self.site);
        slot
    }
}

#[derive(Args, Debug)]
pub(crate) struct RankArgs {
    #[command(flatten)]
    pub(crate) roster: RosterArgs,
    #[command(flatten)]
    pub(crate) slot: SlotArgs,
    /// Ignore completed shifts at the same site.
    #[arg(long)]
    pub(crate) no_site_experience: bool,
    /// Ignore weekly hour balancing.
    #[arg(long)]
    pub(crate) no_hour_balance: bool,
    /// Ignore the performance tier bonus.
    #[arg(long)]
    pub(crate) no_tier_bonus: bool,
    /// Ignore shift-type preferences.
    #[arg(long)]
    pub(crate) no_availability: bool,
    /// Only print the top N candidates.
    #[arg(long)]
    pub(crate) limit: Option<usize>,
}

#[derive(Args, Debug)]
pub(crate) struct BalanceArgs {
    #[command(flatten)]
    pub(crate) roster: RosterArgs,
    /// Weekly target hours (defaults to the configured target).
    #[arg(long)]
    pub(crate) target_hours: Option<f64>,
}

#[derive(Args, Debug)]
pub(crate) struct EmergencyArgs {
    #[command(flatten)]
    pub(crate) roster: RosterArgs,
    #[command(flatten)]
    pub(crate) slot: SlotArgs,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    #[command(flatten)]
    pub(crate) roster: RosterArgs,
}

pub(crate) fn run_rank(args: RankArgs) -> Result<(), AppError> {
    let (service, as_of) = build_service(&args.roster)?;
    let options = RankingOptions {
        prioritize_site_experience: !args.no_site_experience,
        balance_hours: !args.no_hour_balance,
        prefer_high_ranking: !args.no_tier_bonus,
        consider_availability: !args.no_availability,
    };
    let slot = args.slot.slot();

    let mut ranked = service.rank_for_shift(&slot, None, options, as_of)?;
    if let Some(limit) = args.limit {
        ranked.truncate(limit);
    }
    render_ranking(&slot, &ranked);
    Ok(())
}

pub(crate) fn run_balance(args: BalanceArgs) -> Result<(), AppError> {
    let (service, _) = build_service(&args.roster)?;
    let report = service.hour_balance(args.target_hours)?;
    render_balance(&report);
    Ok(())
}

pub(crate) fn run_emergency(args: EmergencyArgs) -> Result<(), AppError> {
    let (service, as_of) = build_service(&args.roster)?;
    let mut slot = args.slot.slot();
    slot.date = slot.date.or(Some(as_of));

    let fill = service.emergency_fill(&slot, None, as_of)?;
    render_emergency(&slot, fill.as_ref());
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let (service, as_of) = build_service(&args.roster)?;

    println!("Guard staffing demo (as of {as_of})");

    let leaderboard = service.leaderboard(as_of)?;
    render_leaderboard(&leaderboard);

    let tomorrow = SlotArgs {
        site: "site-hq".to_string(),
        start: "07:00".to_string(),
        end: "15:00".to_string(),
        date: as_of.succ_opt(),
    }
    .slot();
    let ranked = service.rank_for_shift(&tomorrow, None, RankingOptions::default(), as_of)?;
    render_ranking(&tomorrow, &ranked);

    let report = service.hour_balance(None)?;
    render_balance(&report);

    let tonight = SlotArgs {
        site: "site-docks".to_string(),
        start: "23:00".to_string(),
        end: "07:00".to_string(),
        date: Some(as_of),
    }
    .slot();
    let fill = service.emergency_fill(&tonight, None, as_of)?;
    render_emergency(&tonight, fill.as_ref());

    Ok(())
}

/// Demo roster, with shifts swapped for the CSV export when one is given.
pub(crate) fn load_repository(
    args: &RosterArgs,
) -> Result<(InMemoryRosterRepository, NaiveDate), AppError> {
    let as_of = args.as_of.unwrap_or_else(|| Local::now().date_naive());
    let repository = InMemoryRosterRepository::seeded(demo_roster(as_of));

    if let Some(path) = &args.shifts_csv {
        let shifts = ShiftExportImporter::from_path(path)?;
        repository
            .replace_shifts(shifts)
            .map_err(StaffingServiceError::from)?;
    }

    Ok((repository, as_of))
}

fn build_service(
    args: &RosterArgs,
) -> Result<(StaffingService<InMemoryRosterRepository>, NaiveDate), AppError> {
    let config = AppConfig::load()?;
    let (repository, as_of) = load_repository(args)?;
    Ok((
        StaffingService::new(Arc::new(repository), config.staffing),
        as_of,
    ))
}

pub(crate) fn site_location(site: &str) -> Option<GeoPoint> {
    SITES
        .iter()
        .find(|(id, _, _)| *id == site)
        .map(|(_, latitude, longitude)| GeoPoint {
            latitude: *latitude,
            longitude: *longitude,
        })
}

struct GuardSeed {
    id: &'static str,
    name: &'static str,
    experience_years: f64,
    licence_days: i64,
    certifications: &'static [&'static str],
    client_rating: Option<f64>,
    reliability: Option<f64>,
    preference: ShiftType,
    home: Option<(f64, f64)>,
}

const GUARDS: [GuardSeed; 6] = [
    GuardSeed {
        id: "g-001",
        name: "Avery Stone",
        experience_years: 10.0,
        licence_days: 365,
        certifications: &["first-aid", "cctv"],
        client_rating: Some(4.8),
        reliability: None,
        preference: ShiftType::Morning,
        home: Some((51.5150, -0.1410)),
    },
    GuardSeed {
        id: "g-002",
        name: "Blake Rivers",
        experience_years: 4.0,
        licence_days: 200,
        certifications: &["door-supervision"],
        client_rating: Some(4.2),
        reliability: None,
        preference: ShiftType::Night,
        home: Some((51.5120, -0.0300)),
    },
    GuardSeed {
        id: "g-003",
        name: "Casey Morgan",
        experience_years: 1.0,
        licence_days: -10,
        certifications: &[],
        client_rating: None,
        reliability: Some(78.0),
        preference: ShiftType::Afternoon,
        home: None,
    },
    GuardSeed {
        id: "g-004",
        name: "Devon Price",
        experience_years: 7.0,
        licence_days: 730,
        certifications: &["first-aid", "conflict-management", "cctv"],
        client_rating: Some(4.5),
        reliability: None,
        preference: ShiftType::Morning,
        home: Some((51.3900, -0.1000)),
    },
    GuardSeed {
        id: "g-005",
        name: "Emery Shah",
        experience_years: 2.0,
        licence_days: 90,
        certifications: &["first-aid"],
        client_rating: Some(3.6),
        reliability: None,
        preference: ShiftType::Night,
        home: None,
    },
    GuardSeed {
        id: "g-006",
        name: "Finley Ward",
        experience_years: 15.0,
        licence_days: 300,
        certifications: &["first-aid", "cctv", "door-supervision", "conflict-management", "k9"],
        client_rating: Some(4.9),
        reliability: None,
        preference: ShiftType::Morning,
        home: Some((51.7500, -0.3400)),
    },
];

fn window(shift_type: ShiftType) -> (&'static str, &'static str) {
    match shift_type {
        ShiftType::Morning => ("07:00", "15:00"),
        ShiftType::Afternoon => ("15:00", "23:00"),
        ShiftType::Night => ("23:00", "07:00"),
    }
}

/// Deterministic roster: two weeks of history plus the coming week's bookings.
pub(crate) fn demo_roster(as_of: NaiveDate) -> RosterSnapshot {
    let guards: Vec<Guard> = GUARDS
        .iter()
        .map(|seed| {
            let mut guard = Guard::new(seed.id, seed.name);
            guard.experience_years = seed.experience_years;
            guard.sia_license_expiry = as_of.checked_add_signed(Duration::days(seed.licence_days));
            guard.certifications = seed
                .certifications
                .iter()
                .map(|cert| cert.to_string())
                .collect();
            guard.client_rating = seed.client_rating;
            guard.reliability = seed.reliability;
            guard.preferred_shift_types = vec![seed.preference];
            guard.home_location = seed.home.map(|(latitude, longitude)| GeoPoint {
                latitude,
                longitude,
            });
            guard
        })
        .collect();

    let mut shifts = Vec::new();
    for (idx, seed) in GUARDS.iter().enumerate() {
        let (start, end) = window(seed.preference);
        let record = |id: String, day: NaiveDate, site: &str, status| ShiftRecord {
            id,
            guard_id: Some(GuardId(seed.id.to_string())),
            site_id: SiteId(site.to_string()),
            status,
            date: day,
            start_time: start.to_string(),
            end_time: end.to_string(),
            late: false,
        };

        for day in 1..=14i64 {
            if (day + idx as i64) % 3 == 0 {
                continue;
            }
            let Some(date) = as_of.checked_sub_signed(Duration::days(day)) else {
                continue;
            };
            let site = SITES[(day as usize + idx) % SITES.len()].0;
            let status = if seed.id == "g-003" && day % 3 == 2 {
                ShiftStatus::NoShow
            } else {
                ShiftStatus::Completed
            };
            let mut shift = record(
                format!("{}-h{day:02}", seed.id),
                date,
                site,
                status,
            );
            shift.late = (day * (idx as i64 + 1)) % 11 == 0;
            shifts.push(shift);
        }

        for day in 0..(idx as i64 + 2).min(7) {
            let Some(date) = as_of.checked_add_signed(Duration::days(day + 1)) else {
                continue;
            };
            let site = SITES[idx % SITES.len()].0;
            shifts.push(record(
                format!("{}-u{day:02}", seed.id),
                date,
                site,
                ShiftStatus::Confirmed,
            ));
        }
    }

    shifts.push(ShiftRecord {
        id: "open-docks-night".to_string(),
        guard_id: None,
        site_id: SiteId("site-docks".to_string()),
        status: ShiftStatus::Published,
        date: as_of,
        start_time: "23:00".to_string(),
        end_time: "07:00".to_string(),
        late: false,
    });

    let incidents = [
        ("g-002", HandlingQuality::Excellent),
        ("g-003", HandlingQuality::Poor),
        ("g-003", HandlingQuality::Poor),
        ("g-004", HandlingQuality::Excellent),
    ]
    .into_iter()
    .map(|(guard, handling_quality)| Incident {
        guard_id: GuardId(guard.to_string()),
        handling_quality,
    })
    .collect();

    let feedback = [("g-001", 5.0), ("g-001", 4.5), ("g-005", 3.0)]
        .into_iter()
        .map(|(guard, rating)| FeedbackEntry {
            guard_id: GuardId(guard.to_string()),
            rating,
        })
        .collect();

    RosterSnapshot {
        guards,
        shifts,
        incidents,
        feedback,
    }
}

fn render_leaderboard(leaderboard: &PerformanceLeaderboard) {
    println!("\nPerformance leaderboard");
    for entry in &leaderboard.entries {
        println!(
            "  {:>2}. {:<14} {:>3} {}",
            entry.position,
            entry.guard_name,
            entry.performance.total_score,
            entry.performance.tier.label()
        );
    }
    println!("  Average score: {:.1}", leaderboard.average_score);
    if leaderboard.needs_attention.is_empty() {
        println!("  Needs attention: none");
    } else {
        let ids: Vec<&str> = leaderboard
            .needs_attention
            .iter()
            .map(|id| id.0.as_str())
            .collect();
        println!("  Needs attention: {}", ids.join(", "));
    }
}

fn render_ranking(slot: &ShiftSlot, ranked: &[RankedCandidate]) {
    println!(
        "\nCandidates for {} {}-{} ({}, {:.1}h)",
        slot.site_id,
        slot.start_time,
        slot.end_time,
        slot.shift_type().label(),
        slot.duration_hours()
    );
    if ranked.is_empty() {
        println!("  No guards on the roster");
        return;
    }
    for candidate in ranked {
        let marker = if candidate.recommended { "*" } else { " " };
        println!(
            " {marker} {:<14} {:>3}/{}",
            candidate.guard.name, candidate.score, candidate.max_score
        );
        for factor in &candidate.factors {
            println!(
                "      {:<45} {:>5.1}/{:.0}",
                factor.label, factor.points, factor.max
            );
        }
    }
}

fn render_balance(report: &HourBalanceReport) {
    println!("\nHour balance (target {:.0}h)", report.target_hours);
    for entry in &report.guards {
        println!(
            "  {:<14} {:>5.1}h  {:>2} shift(s)  {:>+6.1}h  {:>3.0}%",
            entry.guard_name, entry.hours, entry.shifts, entry.variance, entry.percentage
        );
    }
    println!(
        "  Total {:.1}h, average {:.1}h, max variance {:.1}h ({})",
        report.total_hours,
        report.avg_hours,
        report.max_variance,
        if report.balanced {
            "balanced"
        } else {
            "unbalanced"
        }
    );
    let list = |ids: &[GuardId]| -> String {
        if ids.is_empty() {
            "none".to_string()
        } else {
            ids.iter()
                .map(|id| id.0.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        }
    };
    println!("  Underutilized: {}", list(&report.underutilized));
    println!("  Overutilized: {}", list(&report.overutilized));
}

fn render_emergency(slot: &ShiftSlot, fill: Option<&EmergencyFill>) {
    println!(
        "\nEmergency fill for {} {}-{}",
        slot.site_id, slot.start_time, slot.end_time
    );
    let Some(fill) = fill else {
        println!("  No recommendation available");
        return;
    };

    let pick = &fill.recommendation;
    println!(
        "  Recommended: {} (emergency score {}, {} confidence)",
        pick.candidate.guard.name, pick.emergency_score, fill.confidence
    );
    for factor in &fill.reasoning {
        println!("    - {}: {:.1}/{:.0}", factor.label, factor.points, factor.max);
    }
    if fill.alternatives.is_empty() {
        println!("  Alternatives: none");
    } else {
        println!("  Alternatives:");
        for alternative in &fill.alternatives {
            println!(
                "    - {} ({})",
                alternative.candidate.guard.name, alternative.emergency_score
            );
        }
    }
}
