//! Request handlers for the timetable submission API (§6).

use axum::extract::{Path, State};
use axum::Json;

use crate::db::ScheduledEntry;
use crate::driver::{self, OptimizerKind, RunParams};
use crate::optimizer::CancellationToken;

use super::dto::{CreateTimetableRequest, TimetableResponse};
use super::error::AppError;
use super::state::AppState;

/// Population / generation defaults for API-triggered runs, matching the
/// CLI's own defaults (§6) so a submission via HTTP and via `run
/// --num-of-individuals 50 --generations 200` explore a comparable search
/// budget.
const DEFAULT_NUM_INDIVIDUALS: usize = 50;
const DEFAULT_GENERATIONS: usize = 200;

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

fn run_optimizer(state: &AppState, request: CreateTimetableRequest) -> Result<TimetableResponse, AppError> {
    let mut proposals = Vec::with_capacity(request.proposals.len());
    for dto in request.proposals {
        let proposal = dto.into_proposal().map_err(AppError::BadRequest)?;
        proposals.push(proposal);
    }

    let params = RunParams {
        kind: OptimizerKind::Direct,
        num_individuals: DEFAULT_NUM_INDIVIDUALS,
        generations: DEFAULT_GENERATIONS,
        heuristics_combination_length: 0,
    };

    let output = driver::run(
        request.start_date,
        request.end_date,
        proposals,
        &state.config,
        params,
        &CancellationToken::new(),
    )?;

    let schedule = output.schedule;
    let schedules: Vec<ScheduledEntry> = (0..schedule.len())
        .map(|i| ScheduledEntry {
            proposal_id: schedule.context().proposal(i).id,
            start_datetime: schedule.binding(i),
        })
        .collect();

    let stored = state.store.create(output.start_date, output.end_date, schedules);
    Ok(stored.into())
}

/// `POST /api/v1/timetables`
pub async fn create_timetable(
    State(state): State<AppState>,
    Json(request): Json<CreateTimetableRequest>,
) -> Result<Json<TimetableResponse>, AppError> {
    let response = run_optimizer(&state, request)?;
    Ok(Json(response))
}

/// `GET /api/v1/timetables/{id}`
pub async fn get_timetable(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<TimetableResponse>, AppError> {
    let stored = state.store.get(id)?;
    Ok(Json(stored.into()))
}

/// `PUT /api/v1/timetables/{id}`: re-runs the optimizer against the new
/// body and overwrites the stored timetable at `id`.
pub async fn update_timetable(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<CreateTimetableRequest>,
) -> Result<Json<TimetableResponse>, AppError> {
    state.store.get(id)?;

    let mut proposals = Vec::with_capacity(request.proposals.len());
    for dto in request.proposals {
        proposals.push(dto.into_proposal().map_err(AppError::BadRequest)?);
    }

    let params = RunParams {
        kind: OptimizerKind::Direct,
        num_individuals: DEFAULT_NUM_INDIVIDUALS,
        generations: DEFAULT_GENERATIONS,
        heuristics_combination_length: 0,
    };

    let output = driver::run(
        request.start_date,
        request.end_date,
        proposals,
        &state.config,
        params,
        &CancellationToken::new(),
    )?;

    let schedule = output.schedule;
    let schedules: Vec<ScheduledEntry> = (0..schedule.len())
        .map(|i| ScheduledEntry {
            proposal_id: schedule.context().proposal(i).id,
            start_datetime: schedule.binding(i),
        })
        .collect();

    let stored = state.store.update(id, output.start_date, output.end_date, schedules)?;
    Ok(Json(stored.into()))
}

/// `DELETE /api/v1/timetables/{id}`
pub async fn delete_timetable(State(state): State<AppState>, Path(id): Path<i64>) -> Result<axum::http::StatusCode, AppError> {
    state.store.delete(id)?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}
