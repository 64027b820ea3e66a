use axum::{extract::FromRef, routing::get, routing::post, Router};
use sqlx::PgPool;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::JwtService;
use crate::services::{
    OpenAiClient, PlanGenerationService, ProgressService, ScheduleService, TemplateService,
};

use super::generate::generate_workout;
use super::health::health_check;
use super::{progress, schedule, templates};

#[derive(Clone)]
pub struct AppState {
    pub jwt: JwtService,
    pub generator: PlanGenerationService,
    pub templates: TemplateService,
    pub schedule: ScheduleService,
    pub progress: ProgressService,
}

impl AppState {
    pub fn new(db: PgPool, jwt_secret: &str, openai: OpenAiClient) -> Self {
        let templates = TemplateService::new(db.clone());
        let schedule = ScheduleService::new(db.clone(), templates.clone());
        let progress = ProgressService::new(db);

        Self {
            jwt: JwtService::new(jwt_secret),
            generator: PlanGenerationService::new(openai),
            templates,
            schedule,
            progress,
        }
    }
}

impl FromRef<AppState> for JwtService {
    fn from_ref(state: &AppState) -> JwtService {
        state.jwt.clone()
    }
}

pub fn create_routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/generate-workout", post(generate_workout))
        .nest("/api/templates", templates::routes())
        .nest("/api/schedule", schedule::routes())
        .nest("/api/progress", progress::routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
