use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;

use super::domain::{GuardId, ShiftSlot};
use super::ranking::RankingOptions;
use super::repository::{RepositoryError, RosterRepository};
use super::service::{StaffingService, StaffingServiceError};

#[derive(Debug, Deserialize)]
pub struct RankRequest {
    pub shift: ShiftSlot,
    #[serde(default)]
    pub options: RankingOptions,
    #[serde(default)]
    pub guard_ids: Option<Vec<GuardId>>,
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct EmergencyFillRequest {
    pub shift: ShiftSlot,
    #[serde(default)]
    pub guard_ids: Option<Vec<GuardId>>,
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HourBalanceQuery {
    #[serde(default)]
    pub target_hours: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AsOfQuery {
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

/// Router builder exposing the scoring and ranking endpoints.
pub fn staffing_router<R>(service: Arc<StaffingService<R>>) -> Router
where
    R: RosterRepository + 'static,
{
    Router::new()
        .route("/api/v1/staffing/rank", post(rank_handler::<R>))
        .route(
            "/api/v1/staffing/hour-balance",
            get(hour_balance_handler::<R>),
        )
        .route(
            "/api/v1/staffing/emergency-fill",
            post(emergency_fill_handler::<R>),
        )
        .route(
            "/api/v1/staffing/guards/:guard_id/score",
            get(guard_score_handler::<R>),
        )
        .route("/api/v1/staffing/leaderboard", get(leaderboard_handler::<R>))
        .with_state(service)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub(crate) async fn rank_handler<R>(
    State(service): State<Arc<StaffingService<R>>>,
    axum::Json(request): axum::Json<RankRequest>,
) -> Response
where
    R: RosterRepository + 'static,
{
    let as_of = request.as_of.unwrap_or_else(today);
    match service.rank_for_shift(
        &request.shift,
        request.guard_ids.as_deref(),
        request.options,
        as_of,
    ) {
        Ok(candidates) => (StatusCode::OK, axum::Json(candidates)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn hour_balance_handler<R>(
    State(service): State<Arc<StaffingService<R>>>,
    Query(query): Query<HourBalanceQuery>,
) -> Response
where
    R: RosterRepository + 'static,
{
    match service.hour_balance(query.target_hours) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn emergency_fill_handler<R>(
    State(service): State<Arc<StaffingService<R>>>,
    axum::Json(request): axum::Json<EmergencyFillRequest>,
) -> Response
where
    R: RosterRepository + 'static,
{
    let as_of = request.as_of.unwrap_or_else(today);
    match service.emergency_fill(&request.shift, request.guard_ids.as_deref(), as_of) {
        Ok(Some(fill)) => (StatusCode::OK, axum::Json(fill)).into_response(),
        Ok(None) => {
            let payload = json!({
                "recommendation": serde_json::Value::Null,
                "reason": "no recommendation available",
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn guard_score_handler<R>(
    State(service): State<Arc<StaffingService<R>>>,
    Path(guard_id): Path<String>,
    Query(query): Query<AsOfQuery>,
) -> Response
where
    R: RosterRepository + 'static,
{
    let id = GuardId(guard_id);
    let as_of = query.as_of.unwrap_or_else(today);
    match service.guard_score(&id, as_of) {
        Ok(breakdown) => {
            let payload = json!({
                "guard_id": id,
                "performance": breakdown,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn leaderboard_handler<R>(
    State(service): State<Arc<StaffingService<R>>>,
    Query(query): Query<AsOfQuery>,
) -> Response
where
    R: RosterRepository + 'static,
{
    let as_of = query.as_of.unwrap_or_else(today);
    match service.leaderboard(as_of) {
        Ok(leaderboard) => (StatusCode::OK, axum::Json(leaderboard)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: StaffingServiceError) -> Response {
    let status = match &error {
        StaffingServiceError::Repository(RepositoryError::NotFound)
        | StaffingServiceError::UnknownGuard(_) => StatusCode::NOT_FOUND,
        StaffingServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
