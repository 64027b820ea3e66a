use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post, put},
    Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::Claims;
use crate::errors::AppError;
use crate::models::{CompletedWorkoutDetails, Exercise, UserWorkout, WorkoutDay};
use crate::services::calendar_export_service::export_schedule;
use crate::services::schedule_service::{is_completed, is_skipped, resolve_day_for_date};

use super::routes::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_active_workout))
        .route("/day", get(get_day_for_date))
        .route("/complete", post(mark_completion))
        .route("/completed", get(get_completed_details))
        .route("/days/:day_id/exercises", put(update_day_exercises))
        .route("/export.ics", get(export_calendar))
}

#[derive(Debug, Deserialize)]
pub struct DayQuery {
    pub date: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct ResolvedDayResponse {
    pub day: Option<WorkoutDay>,
    pub completed: bool,
    pub skipped: bool,
}

#[derive(Debug, Deserialize)]
pub struct MarkCompletionRequest {
    pub workout_day_id: String,
    pub date: NaiveDate,
    pub completed: bool,
}

#[derive(Debug, Deserialize)]
pub struct CompletedDetailsQuery {
    pub workout_day_id: Uuid,
    pub date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct UpdateExercisesRequest {
    pub exercises: Vec<Exercise>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

pub async fn get_active_workout(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Json<Option<UserWorkout>>, AppError> {
    let user_id = claims.user_id()?;
    let workout = state.schedule.get_active_workout(user_id).await?;
    Ok(Json(workout))
}

/// The template day that falls on a date, with its completion status.
pub async fn get_day_for_date(
    State(state): State<AppState>,
    claims: Claims,
    Query(query): Query<DayQuery>,
) -> Result<Json<ResolvedDayResponse>, AppError> {
    let user_id = claims.user_id()?;
    let workout = state
        .schedule
        .get_active_workout(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("No active workout".to_string()))?;

    Ok(Json(ResolvedDayResponse {
        day: resolve_day_for_date(&workout, query.date).cloned(),
        completed: is_completed(&workout, query.date),
        skipped: is_skipped(&workout, query.date),
    }))
}

pub async fn mark_completion(
    State(state): State<AppState>,
    claims: Claims,
    Json(request): Json<MarkCompletionRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    let user_id = claims.user_id()?;
    state
        .schedule
        .mark_completion(
            user_id,
            &request.workout_day_id,
            request.date,
            request.completed,
        )
        .await?;
    Ok(Json(SuccessResponse { success: true }))
}

pub async fn get_completed_details(
    State(state): State<AppState>,
    claims: Claims,
    Query(query): Query<CompletedDetailsQuery>,
) -> Result<Json<Option<CompletedWorkoutDetails>>, AppError> {
    let user_id = claims.user_id()?;
    let details = state
        .schedule
        .completed_workout_details(user_id, query.workout_day_id, query.date)
        .await?;
    Ok(Json(details))
}

pub async fn update_day_exercises(
    State(state): State<AppState>,
    claims: Claims,
    Path(day_id): Path<Uuid>,
    Json(request): Json<UpdateExercisesRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    let user_id = claims.user_id()?;
    state
        .schedule
        .update_day_exercises(day_id, &request.exercises, user_id, request.date)
        .await?;
    Ok(Json(SuccessResponse { success: true }))
}

/// Download the next 30 days of the active schedule as an iCalendar file.
pub async fn export_calendar(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Response, AppError> {
    let user_id = claims.user_id()?;
    let workout = state
        .schedule
        .get_active_workout(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("No active workout to export".to_string()))?;

    let ics = export_schedule(&workout);

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/calendar;charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"workout_schedule.ics\"",
            ),
        ],
        ics,
    )
        .into_response())
}
