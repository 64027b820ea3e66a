use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::Claims;
use crate::errors::AppError;
use crate::models::{is_generated_id, WorkoutTemplate};

use super::routes::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_templates).post(create_template))
        .route("/save-generated", post(save_generated))
        .route("/:id", get(get_template))
        .route("/:id/activate", post(activate_template))
}

#[derive(Debug, Serialize)]
pub struct CreateTemplateResponse {
    pub id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct ActivateTemplateRequest {
    pub start_date: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Seed templates, the user's own templates, and unsaved generated ones.
pub async fn list_templates(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Json<Vec<WorkoutTemplate>>, AppError> {
    let user_id = claims.user_id()?;
    let templates = state.templates.list_templates(Some(user_id)).await?;
    Ok(Json(templates))
}

pub async fn get_template(
    State(state): State<AppState>,
    _claims: Claims,
    Path(id): Path<String>,
) -> Result<Json<WorkoutTemplate>, AppError> {
    let template = state
        .templates
        .get_template(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Template not found".to_string()))?;
    Ok(Json(template))
}

pub async fn create_template(
    State(state): State<AppState>,
    claims: Claims,
    Json(template): Json<WorkoutTemplate>,
) -> Result<Json<CreateTemplateResponse>, AppError> {
    let user_id = claims.user_id()?;
    let id = state.templates.create_template(&template, user_id).await?;
    if is_generated_id(&template.id) {
        state.templates.remove_generated(&template.id);
    }
    Ok(Json(CreateTemplateResponse { id }))
}

/// Park a generated template in the ephemeral tier so it survives
/// navigation until the user decides to keep it.
pub async fn save_generated(
    State(state): State<AppState>,
    claims: Claims,
    Json(template): Json<WorkoutTemplate>,
) -> Result<Json<SuccessResponse>, AppError> {
    let user_id = claims.user_id()?;
    state.templates.save_generated(template, user_id)?;
    Ok(Json(SuccessResponse { success: true }))
}

/// Put a template on the user's schedule. A still-ephemeral generated
/// template is persisted first, then the binding switch happens in one
/// transaction.
pub async fn activate_template(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<String>,
    Json(request): Json<ActivateTemplateRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    let user_id = claims.user_id()?;

    let template_id = if is_generated_id(&id) {
        let template = state
            .templates
            .get_template(&id)
            .await?
            .ok_or_else(|| AppError::NotFound("Generated template not found".to_string()))?;
        let template_id = state.templates.create_template(&template, user_id).await?;
        // The durable copy owns the template now.
        state.templates.remove_generated(&id);
        template_id
    } else {
        Uuid::parse_str(&id)
            .map_err(|_| AppError::Validation("Invalid template id".to_string()))?
    };

    state
        .schedule
        .activate_template(user_id, template_id, request.start_date)
        .await?;

    Ok(Json(SuccessResponse { success: true }))
}
