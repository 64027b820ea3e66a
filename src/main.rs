use gym_planner::api::routes::{create_routes, AppState};
use gym_planner::config::{run_migrations, AppConfig, DatabaseConfig};
use gym_planner::services::OpenAiClient;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let app_config = AppConfig::from_env()?;
    let db_config = DatabaseConfig::from_env()?;

    let pool = db_config.create_pool().await?;
    run_migrations(&pool).await?;

    let openai = OpenAiClient::new(
        app_config.openai_api_key.clone(),
        app_config.openai_model.clone(),
        app_config.openai_base_url.clone(),
    )?;

    let state = AppState::new(pool, &app_config.jwt_secret, openai);
    let app = create_routes(state);

    let listener = TcpListener::bind(app_config.server_address()).await?;
    info!(
        "Gym planner server starting on http://{}",
        app_config.server_address()
    );
    info!(
        "Health check available at http://{}/health",
        app_config.server_address()
    );

    axum::serve(listener, app).await?;

    Ok(())
}
