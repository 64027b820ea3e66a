use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::auth::Claims;
use crate::errors::AppError;
use crate::models::WorkoutTemplate;
use crate::services::plan_generation_service::template_context;

use super::routes::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateWorkoutRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub current_template_context: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateWorkoutResponse {
    pub template: WorkoutTemplate,
}

/// Generate a workout template from a free-text prompt. When the caller
/// sends no plan context but presents a valid token, the context is built
/// server-side from their active template.
pub async fn generate_workout(
    State(state): State<AppState>,
    claims: Option<Claims>,
    Json(request): Json<GenerateWorkoutRequest>,
) -> Result<Json<GenerateWorkoutResponse>, AppError> {
    let prompt = request
        .prompt
        .as_deref()
        .map(str::trim)
        .filter(|prompt| !prompt.is_empty())
        .ok_or_else(|| AppError::Validation("Prompt is required".to_string()))?;

    let context = match request.current_template_context {
        Some(context) => Some(context),
        None => active_plan_context(&state, claims.as_ref()).await,
    };

    let template = state.generator.generate(prompt, context.as_deref()).await?;

    Ok(Json(GenerateWorkoutResponse { template }))
}

/// A schedule lookup failure only costs the context, not the generation.
async fn active_plan_context(state: &AppState, claims: Option<&Claims>) -> Option<String> {
    let user_id = claims.and_then(|claims| claims.user_id().ok())?;
    match state.schedule.get_active_workout(user_id).await {
        Ok(workout) => workout.map(|workout| template_context(&workout.template)),
        Err(e) => {
            warn!("Skipping plan context, schedule lookup failed: {e}");
            None
        }
    }
}
