use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;

use crate::auth::Claims;
use crate::errors::AppError;
use crate::models::{CreateProgressRequest, WorkoutProgress};
use crate::services::progress_insights_service::{
    completion_stats, current_streak, top_exercises, weekly_volume, CompletionStats,
    WeeklyVolumePoint,
};

use super::routes::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_progress).post(add_progress))
        .route("/insights", get(get_insights))
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct ProgressInsightsResponse {
    pub weekly_volume: Vec<WeeklyVolumePoint>,
    pub top_exercises: Vec<String>,
    pub stats: CompletionStats,
    pub current_streak: u32,
}

pub async fn get_progress(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Json<Vec<WorkoutProgress>>, AppError> {
    let user_id = claims.user_id()?;
    let entries = state.progress.exercise_progress(user_id).await?;
    Ok(Json(entries))
}

pub async fn add_progress(
    State(state): State<AppState>,
    claims: Claims,
    Json(request): Json<CreateProgressRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    let user_id = claims.user_id()?;
    if request.exercise.trim().is_empty() {
        return Err(AppError::Validation("Exercise name is required".to_string()));
    }
    state
        .progress
        .add_progress(
            user_id,
            &request.exercise,
            request.weight,
            request.sets,
            request.reps,
            request.date,
        )
        .await?;
    Ok(Json(SuccessResponse { success: true }))
}

/// Aggregated chart data: weekly training volume, most logged exercises,
/// adherence statistics and the current completion streak.
pub async fn get_insights(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Json<ProgressInsightsResponse>, AppError> {
    let user_id = claims.user_id()?;
    let entries = state.progress.exercise_progress(user_id).await?;
    let records = state.progress.completed_workouts(user_id).await?;

    Ok(Json(ProgressInsightsResponse {
        weekly_volume: weekly_volume(&entries),
        top_exercises: top_exercises(&entries, 3),
        stats: completion_stats(&records),
        current_streak: current_streak(&records),
    }))
}
